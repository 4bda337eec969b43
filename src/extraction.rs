use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExtratoError, Result};
use crate::models::ExtractResult;

/// Fixed delay between job polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Polling attempts before giving up, a one-minute ceiling.
pub const MAX_POLL_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Created,
    Running,
    Succeeded,
    Failed,
}

/// One poll of an extraction job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    pub status: JobStatus,
    #[serde(default)]
    pub output_content: Option<ExtractResult>,
}

/// The document-extraction boundary: submit a statement, poll the job.
/// The production implementation talks HTTP; tests script one.
pub trait ExtractionService {
    /// Submit a document plus the names of already-registered banks
    /// (a hint for the extractor's bank detection). Returns the job id.
    fn submit(&self, document: &[u8], known_banks: &[String]) -> Result<String>;

    fn poll(&self, job_id: &str) -> Result<JobState>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    document: String,
    known_banks: &'a [String],
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

pub struct HttpExtractionService {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpExtractionService {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ExtractionService for HttpExtractionService {
    fn submit(&self, document: &[u8], known_banks: &[String]) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(document);
        let body = SubmitRequest {
            document: format!("data:application/pdf;base64,{encoded}"),
            known_banks,
        };
        let response = self
            .client
            .post(format!("{}/extractions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?;
        let submitted: SubmitResponse = response.json()?;
        debug!(job_id = %submitted.id, "extraction job submitted");
        Ok(submitted.id)
    }

    fn poll(&self, job_id: &str) -> Result<JobState> {
        let response = self
            .client
            .get(format!("{}/extractions/{job_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}

/// Poll a job to completion: 2-second interval, 30 attempts. `failed`
/// stops immediately; transient poll errors are tolerated and retried,
/// with the last attempt's error surfaced if the ceiling is reached.
/// Exhaustion without a terminal state is `ExtractionTimeout`.
pub fn wait_for_result(service: &dyn ExtractionService, job_id: &str) -> Result<ExtractResult> {
    wait_with(service, job_id, POLL_INTERVAL, MAX_POLL_ATTEMPTS)
}

pub fn wait_with(
    service: &dyn ExtractionService,
    job_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<ExtractResult> {
    let mut last_error: Option<ExtratoError> = None;

    for attempt in 1..=max_attempts {
        std::thread::sleep(interval);

        match service.poll(job_id) {
            Ok(state) => {
                last_error = None;
                match state.status {
                    JobStatus::Succeeded => {
                        return state.output_content.ok_or_else(|| {
                            ExtratoError::ExtractionFailed(
                                "job succeeded without an extract payload".to_string(),
                            )
                        });
                    }
                    JobStatus::Failed => {
                        return Err(ExtratoError::ExtractionFailed(
                            "the document could not be processed".to_string(),
                        ));
                    }
                    JobStatus::Created | JobStatus::Running => {
                        debug!(job_id, attempt, status = ?state.status, "extraction still processing");
                    }
                }
            }
            Err(e) => {
                warn!(job_id, attempt, error = %e, "polling attempt failed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Err(ExtratoError::ExtractionTimeout(max_attempts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedService {
        polls: RefCell<VecDeque<Result<JobState>>>,
    }

    impl ScriptedService {
        fn new(polls: Vec<Result<JobState>>) -> Self {
            Self { polls: RefCell::new(polls.into_iter().collect()) }
        }

        fn remaining(&self) -> usize {
            self.polls.borrow().len()
        }
    }

    impl ExtractionService for ScriptedService {
        fn submit(&self, _document: &[u8], _known_banks: &[String]) -> Result<String> {
            Ok("job-1".to_string())
        }

        fn poll(&self, _job_id: &str) -> Result<JobState> {
            self.polls
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(JobState { status: JobStatus::Running, output_content: None }))
        }
    }

    fn running() -> Result<JobState> {
        Ok(JobState { status: JobStatus::Running, output_content: None })
    }

    fn succeeded() -> Result<JobState> {
        Ok(JobState {
            status: JobStatus::Succeeded,
            output_content: Some(ExtractResult {
                bank: "Nubank".to_string(),
                document: "fatura.pdf".to_string(),
                summary: None,
                transactions: Vec::new(),
            }),
        })
    }

    #[test]
    fn test_waits_through_running_states() {
        let service = ScriptedService::new(vec![
            Ok(JobState { status: JobStatus::Created, output_content: None }),
            running(),
            succeeded(),
        ]);
        let result = wait_with(&service, "job-1", Duration::ZERO, 30).unwrap();
        assert_eq!(result.bank, "Nubank");
    }

    #[test]
    fn test_failed_stops_immediately() {
        let service = ScriptedService::new(vec![
            running(),
            Ok(JobState { status: JobStatus::Failed, output_content: None }),
            succeeded(),
        ]);
        let err = wait_with(&service, "job-1", Duration::ZERO, 30).unwrap_err();
        assert!(matches!(err, ExtratoError::ExtractionFailed(_)));
        // The scripted success was never consumed.
        assert_eq!(service.remaining(), 1);
    }

    #[test]
    fn test_times_out_after_max_attempts() {
        let polls: Vec<Result<JobState>> = (0..40).map(|_| running()).collect();
        let service = ScriptedService::new(polls);
        let err = wait_with(&service, "job-1", Duration::ZERO, 5).unwrap_err();
        assert!(matches!(err, ExtratoError::ExtractionTimeout(5)));
        assert_eq!(service.remaining(), 35);
    }

    #[test]
    fn test_transient_errors_are_retried() {
        let service = ScriptedService::new(vec![
            Err(ExtratoError::Other("connection reset".to_string())),
            Err(ExtratoError::Other("connection reset".to_string())),
            succeeded(),
        ]);
        let result = wait_with(&service, "job-1", Duration::ZERO, 30).unwrap();
        assert_eq!(result.bank, "Nubank");
    }

    #[test]
    fn test_last_attempt_error_is_surfaced() {
        let service = ScriptedService::new(vec![
            running(),
            Err(ExtratoError::Other("gateway unavailable".to_string())),
        ]);
        let err = wait_with(&service, "job-1", Duration::ZERO, 2).unwrap_err();
        assert!(matches!(err, ExtratoError::Other(msg) if msg == "gateway unavailable"));
    }

    #[test]
    fn test_success_without_payload_is_failure() {
        let service = ScriptedService::new(vec![Ok(JobState {
            status: JobStatus::Succeeded,
            output_content: None,
        })]);
        let err = wait_with(&service, "job-1", Duration::ZERO, 30).unwrap_err();
        assert!(matches!(err, ExtratoError::ExtractionFailed(_)));
    }

    #[test]
    fn test_job_state_wire_format() {
        let state: JobState = serde_json::from_str(
            r#"{"status": "succeeded", "outputContent": {
                "bank": "Itau", "document": "extrato.pdf", "transactions": []}}"#,
        )
        .unwrap();
        assert_eq!(state.status, JobStatus::Succeeded);
        assert_eq!(state.output_content.unwrap().bank, "Itau");

        let pending: JobState = serde_json::from_str(r#"{"status": "created"}"#).unwrap();
        assert_eq!(pending.status, JobStatus::Created);
        assert!(pending.output_content.is_none());
    }
}
