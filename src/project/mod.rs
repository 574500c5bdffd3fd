//! # Project Rows
//!
//! Turns a loaded sheet into project records: the classification policy,
//! the row classifier, the color table and the field extractor.
pub mod classify;
pub mod color;
pub mod column;
pub mod extract;
pub mod policy;
pub mod record;
pub mod summary;

pub use classify::Classification;
pub use classify::Signal;
pub use classify::SkipReason;
pub use color::Color;
pub use color::ColorStatus;
pub use color::ColorTable;
pub use column::Column;
pub use extract::extract_projects;
pub use extract::ExtractOptions;
pub use extract::Extraction;
pub use extract::ExtractionIssue;
pub use policy::ClassificationPolicy;
pub use record::ProjectRecord;
pub use summary::Summary;
