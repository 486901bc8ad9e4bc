mod draft;
mod pending_file;

pub use draft::ReportDraft;
pub use pending_file::PendingFile;
