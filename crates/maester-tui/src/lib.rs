// Terminal client for the legal Q&A service.

pub mod tui;
