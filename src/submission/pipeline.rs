use crate::store::{StoreError, SubmissionStore};

use super::parser::RawPayload;
use super::validate::{self, FieldError};

#[derive(Debug)]
pub enum PipelineResult {
    Accepted { id: String },
    Rejected { errors: Vec<FieldError> },
}

/// Validate a decoded payload and store it when it passes.
///
/// Rejected payloads leave the store untouched. Only store faults are
/// returned as errors.
pub async fn run(
    store: &dyn SubmissionStore,
    payload: RawPayload,
) -> Result<PipelineResult, StoreError> {
    let record = match validate::validate(&payload) {
        Ok(record) => record,
        Err(errors) => {
            tracing::debug!("Submission rejected with {} field errors: {:?}", errors.len(), errors);
            return Ok(PipelineResult::Rejected { errors });
        }
    };

    let has_resume = record.resume.is_some();
    let id = store.append(record).await?;
    tracing::info!(submission_id = %id, has_resume, "Assessment request accepted");

    Ok(PipelineResult::Accepted { id })
}
