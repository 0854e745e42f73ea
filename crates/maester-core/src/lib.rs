// Core types and pure state logic for the maester client: answer payloads,
// citation resolution, the session list, feedback votes and source links.

pub mod citations;
pub mod feedback;
pub mod model;
pub mod session;
pub mod source;

pub use citations::{resolve, Span};
pub use feedback::{FeedbackLedger, FeedbackVote};
pub use model::{AnswerBody, Citation, QueryResult, ScoreBand, Segment};
pub use session::{Session, SessionId, SessionManager, SessionStatus, Transition};
