// Application layer: configuration, the messages exchanged with the TUI and
// the event loop that drives sessions against the backend.

pub mod app;
pub mod config;
pub mod protocol;

pub use app::{run, AppState};
pub use config::{load_config, Config, ConfigError, UiConfig};
pub use protocol::{ApiEvent, AppSnapshot, UiUpdate, UserCommand};
