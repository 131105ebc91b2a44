use crate::domain::operation::{OperationRequest, OperationResult};
use crate::domain::session::Session;
use crate::error::{AppError, AppResult};
use crate::services::DraftStore;
use crate::workflow::text_operation::TextOperationService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
    NothingToSave,
}

/// Rejects blank input before any backend call is made.
pub fn validate_input(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "enter some text to process".to_string(),
        ));
    }
    Ok(())
}

/// Runs one request and records its outcome on the session. A failed
/// operation leaves the previous result in place.
pub async fn process_request(
    service: &TextOperationService,
    session: &mut Session,
    request: &OperationRequest,
) -> AppResult<OperationResult> {
    validate_input(&request.text)?;
    session.original_text = request.text.clone();

    let result = service.execute(request).await;
    if let Some(output) = result.output() {
        session.current_result = Some(output.to_string());
    }
    Ok(result)
}

pub fn save_current_draft(session: &Session, store: &dyn DraftStore, user_id: &str) -> SaveOutcome {
    let Some(result) = session.current_result.as_deref().filter(|_| session.has_result()) else {
        return SaveOutcome::NothingToSave;
    };

    if store.save_draft(user_id, result) {
        SaveOutcome::Saved
    } else {
        SaveOutcome::Failed
    }
}
