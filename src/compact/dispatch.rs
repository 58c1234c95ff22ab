//! Mode selection and the top-level compaction command.

use super::apply::{apply_compaction, ApplyError};
use super::backend::{BackendError, CompactBackend, UncompactedIssues};
use super::context::{
    render_inventory, render_inventory_json, CompactionContext, NOTHING_TO_COMPACT,
};
use super::parser::{parse_llm_response, ParseError};
use crate::utils::format_display_path;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Apply-input path that means "read the reply from stdin".
pub const STDIN_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum CompactError {
    #[error("Centy not initialized. Run 'centy init' first.")]
    NotInitialized,

    #[error("Failed to read LLM response from {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write compaction context to {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse LLM response: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error("Failed to {operation}: {error}")]
    Collaborator {
        operation: &'static str,
        error: BackendError,
    },

    #[error("Failed to encode inventory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Raw command-line choices, before precedence is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactOptions {
    pub apply: Option<PathBuf>,
    pub list: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactMode {
    Apply(PathBuf),
    Inventory { json: bool },
    WriteFile(PathBuf),
    Stdout,
}

impl CompactMode {
    /// Apply wins over inventory, inventory over file output, and stdout is
    /// the fallback.
    #[must_use]
    pub fn select(options: &CompactOptions) -> Self {
        if let Some(path) = &options.apply {
            return CompactMode::Apply(path.clone());
        }
        if options.list {
            return CompactMode::Inventory { json: options.json };
        }
        match &options.output {
            Some(path) => CompactMode::WriteFile(path.clone()),
            None => CompactMode::Stdout,
        }
    }
}

fn collaborator(operation: &'static str) -> impl FnOnce(BackendError) -> CompactError {
    move |error| {
        if error.code == "NOT_INITIALIZED" {
            CompactError::NotInitialized
        } else {
            CompactError::Collaborator { operation, error }
        }
    }
}

/// Run one compaction command in `mode`, writing user-facing output to `out`.
pub async fn run_compact<W: Write + Send>(
    backend: &dyn CompactBackend,
    project_path: &Path,
    mode: &CompactMode,
    out: &mut W,
) -> Result<(), CompactError> {
    debug!(?mode, project = %project_path.display(), "Running compaction");
    match mode {
        CompactMode::Apply(source) => run_apply(backend, project_path, source, out).await,
        CompactMode::Inventory { json } => {
            let listing = load_uncompacted(backend, project_path).await?;
            let rendered = if *json {
                render_inventory_json(&listing)?
            } else {
                render_inventory(&listing)
            };
            writeln!(out, "{rendered}")?;
            Ok(())
        }
        CompactMode::WriteFile(path) => {
            let Some(document) = build_context(backend, project_path, out).await? else {
                return Ok(());
            };
            tokio::fs::write(path, document)
                .await
                .map_err(|source| CompactError::WriteOutput {
                    path: path.display().to_string(),
                    source,
                })?;
            let shown = format_display_path(&path.to_string_lossy());
            info!(path = %shown, "Compaction context written");
            writeln!(out, "Compaction context written to {shown}")?;
            Ok(())
        }
        CompactMode::Stdout => {
            if let Some(document) = build_context(backend, project_path, out).await? {
                write!(out, "{document}")?;
            }
            Ok(())
        }
    }
}

async fn load_uncompacted(
    backend: &dyn CompactBackend,
    project_path: &Path,
) -> Result<UncompactedIssues, CompactError> {
    let initialized = backend
        .is_initialized(project_path)
        .await
        .map_err(collaborator("check project"))?;
    if !initialized {
        return Err(CompactError::NotInitialized);
    }
    backend
        .list_uncompacted_issues(project_path)
        .await
        .map_err(collaborator("list uncompacted issues"))
}

/// Render the context document, or print the nothing-to-compact notice and
/// return `None` when there are no issues.
async fn build_context<W: Write + Send>(
    backend: &dyn CompactBackend,
    project_path: &Path,
    out: &mut W,
) -> Result<Option<String>, CompactError> {
    let listing = load_uncompacted(backend, project_path).await?;
    if listing.issues.is_empty() {
        writeln!(out, "{NOTHING_TO_COMPACT}")?;
        return Ok(None);
    }

    let instructions = backend
        .get_instruction(project_path)
        .await
        .map_err(collaborator("read instructions"))?;
    let summary = backend
        .get_compact(project_path)
        .await
        .map_err(collaborator("read current summary"))?;

    let context = CompactionContext {
        instructions,
        current_summary: summary.as_content().map(str::to_string),
        issues: listing.issues,
    };
    Ok(Some(context.render()))
}

async fn read_reply(source: &Path) -> Result<String, CompactError> {
    let read_error = |source_err: io::Error| CompactError::ReadInput {
        path: source.display().to_string(),
        source: source_err,
    };
    if source.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(read_error)?;
        return Ok(text);
    }
    tokio::fs::read_to_string(source).await.map_err(read_error)
}

async fn run_apply<W: Write + Send>(
    backend: &dyn CompactBackend,
    project_path: &Path,
    source: &Path,
    out: &mut W,
) -> Result<(), CompactError> {
    let reply = read_reply(source).await?;
    let parsed = parse_llm_response(&reply)?;
    info!(
        issue_ids = parsed.migration.issue_ids.len(),
        "Parsed LLM response"
    );

    let report = apply_compaction(backend, project_path, &parsed).await?;
    for warning in &report.warnings {
        writeln!(out, "Warning: {warning}")?;
    }
    writeln!(out, "{}", report.confirmation())?;
    Ok(())
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod dispatch_tests;
