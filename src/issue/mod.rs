//! Read access to issue files and the single write the compaction flow needs:
//! flipping an issue to `compacted`.
mod crud;
mod id;
mod metadata;

pub use crud::{list_issues, mark_issue_compacted, read_issue, Issue, IssueError};
pub use id::{is_uuid, issue_id_from_filename};
pub use metadata::IssueFrontmatter;
