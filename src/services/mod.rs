pub mod draft_store;
pub mod language_model;

pub use draft_store::DraftStore;
pub use language_model::{GeneratedText, LanguageModelService};
