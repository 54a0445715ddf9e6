//! Git history module

pub mod log_line;
pub mod history;

pub use log_line::parse_author_line;
pub use history::GitHistory;
