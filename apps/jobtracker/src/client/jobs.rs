#![allow(dead_code)]

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::listing::JobsQuery;
use super::JobTrackerClient;
use crate::errors::ApiError;
use crate::gateway::{ApiRequest, FormPart};
use crate::models::page::Listing;
use crate::models::{Job, JobInput, JobStatus, Page};

/// Sent in place of a resume; the server rejects uploads without a file part.
const PLACEHOLDER_RESUME_NAME: &str = "no-resume.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn placeholder() -> Self {
        Self {
            file_name: PLACEHOLDER_RESUME_NAME.to_string(),
            content_type: "text/plain".to_string(),
            bytes: Bytes::new(),
        }
    }
}

impl JobTrackerClient {
    /// GET /jobs/{id}
    pub async fn get_job(&self, id: i64) -> Result<Job, ApiError> {
        let id_segment = id.to_string();
        let url = self.gateway.endpoint(&["jobs", id_segment.as_str()], &[])?;
        self.gateway.get(url).await
    }

    /// POST /jobs as multipart: a `job` JSON part and a `resume` file part.
    pub async fn add_job(&self, job: &JobInput, resume: Option<ResumeFile>) -> Result<Value, ApiError> {
        let url = self.gateway.endpoint(&["jobs"], &[])?;
        let resume = resume.unwrap_or_else(ResumeFile::placeholder);
        let job_json = serde_json::to_vec(job).map_err(ApiError::Encode)?;

        let parts = vec![
            FormPart {
                name: "job".to_string(),
                file_name: None,
                content_type: "application/json".to_string(),
                bytes: Bytes::from(job_json),
            },
            FormPart {
                name: "resume".to_string(),
                file_name: Some(resume.file_name),
                content_type: resume.content_type,
                bytes: resume.bytes,
            },
        ];

        let created = self
            .gateway
            .send_raw(ApiRequest::new(Method::POST, url).multipart(parts))
            .await?;
        info!(company = %job.company_name, role = %job.job_role, "Job added");
        Ok(created)
    }

    /// PUT /jobs/{id}
    pub async fn update_job(&self, id: i64, job: &JobInput) -> Result<Job, ApiError> {
        let id_segment = id.to_string();
        let url = self.gateway.endpoint(&["jobs", id_segment.as_str()], &[])?;
        let body = serde_json::to_value(job).map_err(ApiError::Encode)?;
        let updated = self
            .gateway
            .send(ApiRequest::new(Method::PUT, url).json(body))
            .await?;
        info!(id, "Job updated");
        Ok(updated)
    }

    /// DELETE /jobs/{id}
    pub async fn delete_job(&self, id: i64) -> Result<Value, ApiError> {
        let id_segment = id.to_string();
        let url = self.gateway.endpoint(&["jobs", id_segment.as_str()], &[])?;
        let payload = self
            .gateway
            .send_raw(ApiRequest::new(Method::DELETE, url))
            .await?;
        info!(id, "Job deleted");
        Ok(payload)
    }

    /// GET /jobs?page=
    pub async fn all_jobs(&self, page: u32) -> Result<Page<Job>, ApiError> {
        self.query_jobs(&JobsQuery::All { page }).await
    }

    /// GET /jobs?status=&page=
    pub async fn jobs_by_status(&self, status: JobStatus, page: u32) -> Result<Page<Job>, ApiError> {
        self.query_jobs(&JobsQuery::ByStatus { status, page }).await
    }

    /// GET /jobs/company/{name}?page=
    pub async fn jobs_by_company(&self, company: &str, page: u32) -> Result<Page<Job>, ApiError> {
        self.query_jobs(&JobsQuery::ByCompany {
            company: company.to_string(),
            page,
        })
        .await
    }

    /// GET /jobs/between?from=&to=&page= (ISO dates, inclusive)
    pub async fn jobs_between(&self, from: &str, to: &str, page: u32) -> Result<Page<Job>, ApiError> {
        self.query_jobs(&JobsQuery::Between {
            from: from.to_string(),
            to: to.to_string(),
            page,
        })
        .await
    }

    pub(crate) async fn query_jobs(&self, query: &JobsQuery) -> Result<Page<Job>, ApiError> {
        let listing: Listing<Job> = self.fetch_listing(query).await?;
        Ok(listing.into_page(query.page()))
    }

    pub(crate) async fn fetch_listing(&self, query: &JobsQuery) -> Result<Listing<Job>, ApiError> {
        Ok(serde_json::from_value(self.fetch_payload(query).await?)?)
    }

    /// The listing payload as sent, before it is read as a page or a list.
    pub(crate) async fn fetch_payload(&self, query: &JobsQuery) -> Result<Value, ApiError> {
        let segments = query.segments();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let url = self.gateway.endpoint(&segments, &query.params())?;
        self.gateway.get(url).await
    }
}
