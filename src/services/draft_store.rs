/// Destination for saved drafts. Returns whether the draft was stored.
pub trait DraftStore: Send + Sync {
    fn save_draft(&self, user_id: &str, text: &str) -> bool;
}
