//! Overview of the signed-in user's applications: how many sit in each
//! status, and the latest few.

use serde::Serialize;
use tracing::debug;

use super::JobTrackerClient;
use crate::errors::ApiError;
use crate::models::{Job, JobStatus};

pub const RECENT_JOBS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    /// One entry per status, in [`JobStatus::ALL`] order, zeros included.
    pub counts: Vec<StatusCount>,
    pub recent: Vec<Job>,
}

/// Counts `jobs` by status and keeps the [`RECENT_JOBS`] latest by applied
/// date. Jobs sharing a date keep the order they came in.
pub fn summarize(jobs: &[Job]) -> JobSummary {
    let counts = JobStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: jobs.iter().filter(|job| job.status == status).count(),
        })
        .collect();

    let mut recent = jobs.to_vec();
    recent.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
    recent.truncate(RECENT_JOBS);

    JobSummary { counts, recent }
}

impl JobTrackerClient {
    /// Summary over the first server page of jobs.
    pub async fn summary(&self) -> Result<JobSummary, ApiError> {
        let jobs = self.first_page_jobs().await?;
        debug!(jobs = jobs.len(), "Summarizing jobs");
        Ok(summarize(&jobs))
    }
}
