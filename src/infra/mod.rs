pub mod console_store;
pub mod llm;
