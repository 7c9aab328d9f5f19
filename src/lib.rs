pub mod cli;
pub mod config;
pub mod error;
pub mod mailer;
pub mod report;
pub mod roster;
pub mod scanner;
pub mod sender;
