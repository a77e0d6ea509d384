//! Listing Accessor: routes a set of filter criteria to a server query.
//!
//! The backend only filters on one dimension at a time. Routing is an ordered
//! rule table and the first rule whose predicate holds decides the plan:
//!
//! | # | criteria set                  | plan                                 |
//! |---|-------------------------------|--------------------------------------|
//! | 1 | none                          | `GET /jobs?page=`                    |
//! | 2 | status only                   | `GET /jobs?status=&page=`            |
//! | 3 | company only                  | `GET /jobs/company/{name}?page=`     |
//! | 4 | date bounds only (one or two) | `GET /jobs/between?from=&to=&page=`  |
//! | 5 | anything else                 | first server page, filtered locally  |
//!
//! Rule 5 only ever sees `GET /jobs?page=0`, so the totals it reports describe
//! the filtered first server page, not the whole data set.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use super::JobTrackerClient;
use crate::errors::ApiError;
use crate::models::{Job, JobStatus, Page};

/// Page size used when paginating locally filtered results.
pub const LOCAL_PAGE_SIZE: u32 = 10;

/// Stand-ins for a missing lower/upper date bound.
pub const OPEN_RANGE_START: &str = "1900-01-01";
pub const OPEN_RANGE_END: &str = "2100-12-31";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub status: Option<JobStatus>,
    pub company: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Company filter, ignoring blank input.
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref().filter(|c| !c.trim().is_empty())
    }

    fn has_dates(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Number of filter dimensions in use; the two date bounds count as one.
    fn dimensions(&self) -> usize {
        [self.status.is_some(), self.company().is_some(), self.has_dates()]
            .into_iter()
            .filter(|set| *set)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions() == 0
    }

    /// Local predicate: status equality, case-insensitive company substring,
    /// inclusive date bounds.
    pub fn matches(&self, job: &Job) -> bool {
        if self.status.is_some_and(|status| job.status != status) {
            return false;
        }
        if let Some(company) = self.company() {
            if !job
                .company_name
                .to_lowercase()
                .contains(&company.to_lowercase())
            {
                return false;
            }
        }
        if self.date_from.is_some_and(|from| job.applied_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| job.applied_date > to) {
            return false;
        }
        true
    }
}

/// A query the server can answer directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobsQuery {
    All { page: u32 },
    ByStatus { status: JobStatus, page: u32 },
    ByCompany { company: String, page: u32 },
    Between { from: String, to: String, page: u32 },
}

impl JobsQuery {
    pub fn page(&self) -> u32 {
        match self {
            JobsQuery::All { page }
            | JobsQuery::ByStatus { page, .. }
            | JobsQuery::ByCompany { page, .. }
            | JobsQuery::Between { page, .. } => *page,
        }
    }

    /// Unescaped path segments; the gateway escapes them.
    pub fn segments(&self) -> Vec<String> {
        match self {
            JobsQuery::All { .. } | JobsQuery::ByStatus { .. } => vec!["jobs".into()],
            JobsQuery::ByCompany { company, .. } => {
                vec!["jobs".into(), "company".into(), company.clone()]
            }
            JobsQuery::Between { .. } => vec!["jobs".into(), "between".into()],
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let page = ("page", self.page().to_string());
        match self {
            JobsQuery::All { .. } | JobsQuery::ByCompany { .. } => vec![page],
            JobsQuery::ByStatus { status, .. } => vec![("status", status.to_string()), page],
            JobsQuery::Between { from, to, .. } => {
                vec![("from", from.clone()), ("to", to.clone()), page]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPlan {
    Server(JobsQuery),
    /// Fetch the first unfiltered page and filter/paginate it locally.
    Local,
}

struct ListingRule {
    name: &'static str,
    applies: fn(&FilterCriteria) -> bool,
    plan: fn(&FilterCriteria, u32) -> ListingPlan,
}

const LISTING_RULES: &[ListingRule] = &[
    ListingRule {
        name: "unfiltered",
        applies: |c| c.is_empty(),
        plan: |_, page| ListingPlan::Server(JobsQuery::All { page }),
    },
    ListingRule {
        name: "status",
        applies: |c| c.status.is_some() && c.dimensions() == 1,
        plan: |c, page| match c.status {
            Some(status) => ListingPlan::Server(JobsQuery::ByStatus { status, page }),
            None => ListingPlan::Local,
        },
    },
    ListingRule {
        name: "company",
        applies: |c| c.company().is_some() && c.dimensions() == 1,
        plan: |c, page| match c.company() {
            Some(company) => ListingPlan::Server(JobsQuery::ByCompany {
                company: company.to_string(),
                page,
            }),
            None => ListingPlan::Local,
        },
    },
    ListingRule {
        name: "date range",
        applies: |c| c.has_dates() && c.dimensions() == 1,
        plan: |c, page| {
            ListingPlan::Server(JobsQuery::Between {
                from: c
                    .date_from
                    .map_or_else(|| OPEN_RANGE_START.to_string(), |d| d.to_string()),
                to: c
                    .date_to
                    .map_or_else(|| OPEN_RANGE_END.to_string(), |d| d.to_string()),
                page,
            })
        },
    },
    ListingRule {
        name: "combined",
        applies: |_| true,
        plan: |_, _| ListingPlan::Local,
    },
];

/// Picks the plan for `criteria`; first matching rule wins.
pub fn plan_listing(criteria: &FilterCriteria, page: u32) -> ListingPlan {
    LISTING_RULES
        .iter()
        .find(|rule| (rule.applies)(criteria))
        .map(|rule| {
            debug!(rule = rule.name, page, "Listing rule selected");
            (rule.plan)(criteria, page)
        })
        .unwrap_or(ListingPlan::Local)
}

/// Filters `jobs` with `criteria` and returns page `page` of the result.
pub fn filter_locally(jobs: Vec<Job>, criteria: &FilterCriteria, page: u32) -> Page<Job> {
    let filtered: Vec<Job> = jobs.into_iter().filter(|job| criteria.matches(job)).collect();
    Page::slice(filtered, page, LOCAL_PAGE_SIZE)
}

/// Jobs carried by a first-page payload. An absent payload or a page without
/// `content` holds no jobs.
pub fn source_items(payload: Value) -> Result<Vec<Job>, ApiError> {
    let items = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Object(mut page) => match page.remove("content") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(content) => content,
        },
        other => other,
    };
    Ok(serde_json::from_value(items)?)
}

impl JobTrackerClient {
    /// Every job on the first server page, the source for local filtering.
    pub async fn first_page_jobs(&self) -> Result<Vec<Job>, ApiError> {
        source_items(self.fetch_payload(&JobsQuery::All { page: 0 }).await?)
    }

    /// Lists jobs matching `criteria`, page `page` (0-based).
    pub async fn list_jobs(&self, page: u32, criteria: &FilterCriteria) -> Result<Page<Job>, ApiError> {
        match plan_listing(criteria, page) {
            ListingPlan::Server(query) => self.query_jobs(&query).await,
            ListingPlan::Local => {
                let source = self.first_page_jobs().await?;
                let page = filter_locally(source, criteria, page);
                warn!(
                    total = page.total_elements,
                    "Combined filters applied to the first server page only; totals may be incomplete"
                );
                Ok(page)
            }
        }
    }
}
