//! Project-local feature compaction store.
//!
//! Layout under `.centy/features/`:
//! - `instruction.md`: instructions for the summarizing LLM
//! - `compact.md`: the current features summary
//! - `migrations/`: one append-only record per applied compaction
mod crud;
mod instruction;
mod store;

pub use crud::{
    get_compact, get_instruction, list_uncompacted_issues, mark_issues_compacted,
    save_migration, update_compact, FeatureError,
};
pub use instruction::DEFAULT_INSTRUCTION_CONTENT;
pub use store::LocalFeatureStore;
