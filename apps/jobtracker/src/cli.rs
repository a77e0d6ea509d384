//! Command-line front-end over [`JobTrackerClient`].

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::client::{FilterCriteria, JobTrackerClient, ResumeFile};
use crate::config::Config;
use crate::errors::ApiError;
use crate::gateway::SessionExpiredHook;
use crate::models::{JobInput, JobStatus, LoginRequest, SignUpRequest};

#[derive(Debug, Parser)]
#[command(name = "jobtracker", version, about = "Keep track of your job applications")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in (falls back to JOBTRACKER_EMAIL / JOBTRACKER_PASSWORD)
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Count applications per status and show the latest ones
    Summary,
    /// List job applications
    List(ListArgs),
    /// Show one job application
    Show { id: i64 },
    /// Record a new job application
    Add {
        #[command(flatten)]
        job: JobArgs,
        /// Resume to attach; an empty placeholder is sent when omitted
        #[arg(long)]
        resume: Option<std::path::PathBuf>,
    },
    /// Change fields of an existing job application
    Update {
        id: i64,
        #[command(flatten)]
        changes: JobChanges,
    },
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// 0-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long)]
    pub status: Option<JobStatus>,
    /// Case-insensitive company name
    #[arg(long)]
    pub company: Option<String>,
    /// Applied on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Applied on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl From<ListArgs> for FilterCriteria {
    fn from(args: ListArgs) -> Self {
        FilterCriteria {
            status: args.status,
            company: args.company,
            date_from: args.from,
            date_to: args.to,
        }
    }
}

#[derive(Debug, Args)]
pub struct JobArgs {
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub company: String,
    #[arg(long, default_value = "APPLIED")]
    pub status: JobStatus,
    /// Date applied (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub applied: Option<NaiveDate>,
    #[arg(long)]
    pub comment: Option<String>,
    /// Employer's own reference for the posting
    #[arg(long)]
    pub job_id: Option<String>,
    #[arg(long)]
    pub resume_used: Option<String>,
}

impl From<JobArgs> for JobInput {
    fn from(args: JobArgs) -> Self {
        JobInput {
            job_id: args.job_id,
            job_role: args.role,
            company_name: args.company,
            comment: args.comment,
            applied_date: args
                .applied
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            status: args.status,
            resume_used: args.resume_used,
        }
    }
}

/// Fields to overwrite on an existing job; anything left out is kept.
#[derive(Debug, Args)]
pub struct JobChanges {
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub status: Option<JobStatus>,
    #[arg(long)]
    pub applied: Option<NaiveDate>,
    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long)]
    pub job_id: Option<String>,
    #[arg(long)]
    pub resume_used: Option<String>,
}

impl JobChanges {
    pub fn apply(self, job: &mut JobInput) {
        if let Some(role) = self.role {
            job.job_role = role;
        }
        if let Some(company) = self.company {
            job.company_name = company;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(applied) = self.applied {
            job.applied_date = applied;
        }
        if self.comment.is_some() {
            job.comment = self.comment;
        }
        if self.job_id.is_some() {
            job.job_id = self.job_id;
        }
        if self.resume_used.is_some() {
            job.resume_used = self.resume_used;
        }
    }
}

/// The CLI's answer to a 401: there is no login screen, so point at the command.
fn session_expired_hook() -> SessionExpiredHook {
    Arc::new(|route: &str| {
        eprintln!("Your session has expired ({route}). Run `jobtracker login` or set JOBTRACKER_EMAIL and JOBTRACKER_PASSWORD.");
    })
}

pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let client = JobTrackerClient::from_config(config, session_expired_hook())
        .context("Failed to build HTTP client")?;
    info!("Using job tracker API at {}", client.gateway().base_url());

    if let Command::Login { email, password } = &cli.command {
        let (config_email, config_password) = config.credentials().unzip();
        let request = LoginRequest {
            email: email
                .clone()
                .or_else(|| config_email.map(str::to_string))
                .context("--email or JOBTRACKER_EMAIL is required")?,
            password: password
                .clone()
                .or_else(|| config_password.map(str::to_string))
                .context("--password or JOBTRACKER_PASSWORD is required")?,
        };
        return print_json(&client.login(&request).await?);
    }

    if !matches!(cli.command, Command::Signup { .. }) {
        if let Some((email, password)) = config.credentials() {
            client
                .login(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .context("Sign-in with JOBTRACKER_EMAIL failed")?;
        }
    }

    match cli.command {
        Command::Signup {
            name,
            email,
            password,
        } => print_json(
            &client
                .sign_up(&SignUpRequest {
                    name,
                    email,
                    password,
                })
                .await?,
        ),
        Command::Login { .. } => Ok(()),
        Command::Logout => print_json(&client.logout().await?),
        Command::Whoami => print_json(&client.current_user().await?),
        Command::Summary => print_json(&client.summary().await?),
        Command::List(args) => {
            let page = args.page;
            let criteria = FilterCriteria::from(args);
            print_json(&client.list_jobs(page, &criteria).await?)
        }
        Command::Show { id } => print_json(&client.get_job(id).await?),
        Command::Add { job, resume } => {
            let resume = match resume {
                Some(path) => Some(load_resume(&path).await?),
                None => None,
            };
            print_json(&client.add_job(&JobInput::from(job), resume).await?)
        }
        Command::Update { id, changes } => {
            let mut job = JobInput::from(client.get_job(id).await?);
            changes.apply(&mut job);
            print_json(&client.update_job(id, &job).await?)
        }
        Command::Delete { id } => print_json(&client.delete_job(id).await?),
    }
}

pub async fn load_resume(path: &Path) -> Result<ResumeFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read resume '{}'", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(ResumeFile {
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        bytes: Bytes::from(bytes),
    })
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Lines shown for a failed command: the primary message first, then any
/// other server messages that differ from it.
pub fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let Some(api_error) = err.downcast_ref::<ApiError>() else {
        return vec![format!("error: {err:#}")];
    };
    let details = api_error.details();
    let mut lines = vec![format!("error: {}", details.primary_message)];
    lines.extend(
        details
            .supplementary_messages()
            .into_iter()
            .map(|m| format!("  - {m}")),
    );
    lines
}
