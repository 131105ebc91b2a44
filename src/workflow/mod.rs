pub mod session;
pub mod text_operation;
