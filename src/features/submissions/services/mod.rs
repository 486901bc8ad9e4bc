mod commit_service;
mod draft_service;

pub use commit_service::{CommitEngine, CommitService};
pub use draft_service::DraftService;
