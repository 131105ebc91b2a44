use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::DraftStore;
use crate::workflow::text_operation::TextOperationService;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub text_operations: TextOperationService,
    pub drafts: Arc<dyn DraftStore>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        text_operations: TextOperationService,
        drafts: Arc<dyn DraftStore>,
    ) -> Self {
        Self {
            config,
            text_operations,
            drafts,
        }
    }
}
