pub mod operation;
pub mod prompt;
pub mod session;
