//! Dependency installation and layer archive construction

pub mod archiver;
pub mod installer;

pub use archiver::{build_archive, list_entries, verify_layout, ArchivedLayer};
pub use installer::{validate_source, Installer};
