// ── Asynchronous job completion ──
//
// Deletions answer `202 Accepted` with a job; `JobPoller` turns that job
// into a single future that resolves once the controller reports it
// finished or failed.

use tokio::time::{Instant, sleep, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use cfops_api::CloudFoundryClient;
use cfops_api::types::{ErrorDetails, JobStatus};

use crate::config::JobPollConfig;
use crate::error::CoreError;

/// Error code reported when a job fails without `error_details`.
const UNKNOWN_ERROR_CODE: &str = "UnknownError";

/// Polls `GET /v2/jobs/{id}` at a fixed interval until a terminal state,
/// the deadline, or cancellation.
#[derive(Debug, Clone)]
pub struct JobPoller {
    client: CloudFoundryClient,
    config: JobPollConfig,
    cancel: CancellationToken,
}

impl JobPoller {
    pub fn new(client: CloudFoundryClient, config: JobPollConfig, cancel: CancellationToken) -> Self {
        Self {
            client,
            config,
            cancel,
        }
    }

    /// Wait for `job_id` to finish.
    ///
    /// The first status fetch is immediate. A fetch still in flight when
    /// the deadline passes is abandoned and reported as
    /// [`CoreError::PollTimeout`], and no fetch is started once the
    /// deadline has passed. Once the token is cancelled no further fetch
    /// is issued.
    pub async fn await_completion(&self, job_id: &str) -> Result<(), CoreError> {
        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let timed_out = || CoreError::PollTimeout {
            job_id: job_id.to_owned(),
            waited: started.elapsed(),
        };

        loop {
            let fetched = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(CoreError::Cancelled),
                fetched = timeout_at(deadline, self.client.get_job(job_id)) => fetched,
            };
            let Ok(job) = fetched else {
                return Err(timed_out());
            };
            let job = job?;

            trace!(job_id, status = ?job.entity.status, "polled job");
            match job.entity.status {
                JobStatus::Finished => {
                    debug!(job_id, elapsed = ?started.elapsed(), "job finished");
                    return Ok(());
                }
                JobStatus::Failed => return Err(job_failed(job.entity.error_details)),
                JobStatus::Queued | JobStatus::Running => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out());
            }
            let pause = self.config.interval.min(deadline - now);

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(CoreError::Cancelled),
                () = sleep(pause) => {}
            }

            // A sleep clipped to the deadline leaves no time for another fetch.
            if Instant::now() >= deadline {
                return Err(timed_out());
            }
        }
    }
}

fn job_failed(details: Option<ErrorDetails>) -> CoreError {
    match details {
        Some(ErrorDetails {
            code,
            description,
            error_code,
        }) => CoreError::JobFailed {
            code,
            error_code,
            description,
        },
        None => CoreError::JobFailed {
            code: 0,
            error_code: UNKNOWN_ERROR_CODE.to_owned(),
            description: "job failed without error details".to_owned(),
        },
    }
}
