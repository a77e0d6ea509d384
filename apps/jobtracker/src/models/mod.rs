pub mod job;
pub mod page;
pub mod user;

pub use job::{Job, JobInput, JobStatus};
pub use page::Page;
pub use user::{LoginRequest, SignUpRequest, User};
