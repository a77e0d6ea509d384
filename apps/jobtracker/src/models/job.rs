#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Applied,
    Interviewing,
    Offered,
    Accepted,
    Rejected,
    OnHold,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offered,
        JobStatus::Accepted,
        JobStatus::Rejected,
        JobStatus::OnHold,
    ];

    /// Wire name, also used as the `status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "APPLIED",
            JobStatus::Interviewing => "INTERVIEWING",
            JobStatus::Offered => "OFFERED",
            JobStatus::Accepted => "ACCEPTED",
            JobStatus::Rejected => "REJECTED",
            JobStatus::OnHold => "ON_HOLD",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown job status '{0}' (expected one of APPLIED, INTERVIEWING, OFFERED, ACCEPTED, REJECTED, ON_HOLD)")]
pub struct ParseJobStatusError(String);

impl FromStr for JobStatus {
    type Err = ParseJobStatusError;

    /// Case-insensitive; `on-hold` and `on hold` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseJobStatusError(s.to_string()))
    }
}

/// A job application as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub job_role: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub applied_date: NaiveDate,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_used: Option<String>,
}

/// The writable fields of a job, sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub job_role: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub applied_date: NaiveDate,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_used: Option<String>,
}

impl From<Job> for JobInput {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            job_role: job.job_role,
            company_name: job.company_name,
            comment: job.comment,
            applied_date: job.applied_date,
            status: job.status,
            resume_used: job.resume_used,
        }
    }
}
