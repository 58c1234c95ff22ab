use super::*;
use crate::compact::context::{CONTEXT_TITLE, MISSING_SUMMARY_PLACEHOLDER};
use crate::compact::test_support::{issue, Call, RecordingBackend};
use tempfile::TempDir;

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

async fn run(backend: &RecordingBackend, mode: &CompactMode) -> Result<String, CompactError> {
    let mut buf = Vec::new();
    run_compact(backend, Path::new("/tmp/project"), mode, &mut buf).await?;
    Ok(output(buf))
}

#[test]
fn test_apply_takes_precedence() {
    let options = CompactOptions {
        apply: Some(PathBuf::from("reply.md")),
        list: true,
        json: true,
        output: Some(PathBuf::from("ctx.md")),
    };
    assert_eq!(
        CompactMode::select(&options),
        CompactMode::Apply(PathBuf::from("reply.md"))
    );
}

#[test]
fn test_inventory_beats_output() {
    let options = CompactOptions {
        list: true,
        output: Some(PathBuf::from("ctx.md")),
        ..CompactOptions::default()
    };
    assert_eq!(
        CompactMode::select(&options),
        CompactMode::Inventory { json: false }
    );
}

#[test]
fn test_output_then_stdout() {
    let options = CompactOptions {
        output: Some(PathBuf::from("ctx.md")),
        ..CompactOptions::default()
    };
    assert_eq!(
        CompactMode::select(&options),
        CompactMode::WriteFile(PathBuf::from("ctx.md"))
    );
    assert_eq!(
        CompactMode::select(&CompactOptions::default()),
        CompactMode::Stdout
    );
}

#[tokio::test]
async fn test_not_initialized_is_reported_cleanly() {
    let backend = RecordingBackend::default();
    let err = run(&backend, &CompactMode::Stdout).await.unwrap_err();

    assert!(matches!(err, CompactError::NotInitialized));
    assert_eq!(err.to_string(), "Centy not initialized. Run 'centy init' first.");
    assert_eq!(backend.calls(), vec![Call::IsInitialized]);
}

#[tokio::test]
async fn test_inventory_lists_issues() {
    let backend = RecordingBackend::initialized()
        .with_issues(vec![issue(1, "Search"), issue(2, "Export")]);
    let text = run(&backend, &CompactMode::Inventory { json: false })
        .await
        .unwrap();

    assert_eq!(
        text,
        "Uncompacted issues (2):\n#1 [closed] Search\n#2 [closed] Export\n"
    );
    assert_eq!(backend.count(|c| *c == Call::GetInstruction), 0);
}

#[tokio::test]
async fn test_inventory_json() {
    let backend = RecordingBackend::initialized().with_issues(vec![issue(4, "Tags")]);
    let text = run(&backend, &CompactMode::Inventory { json: true })
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["totalCount"], 1);
    assert_eq!(value["issues"][0]["title"], "Tags");
}

#[tokio::test]
async fn test_stdout_renders_context() {
    let backend = RecordingBackend::initialized().with_issues(vec![issue(3, "Webhooks")]);
    let text = run(&backend, &CompactMode::Stdout).await.unwrap();

    assert!(text.starts_with(CONTEXT_TITLE));
    assert!(text.contains("Compact the issues."));
    assert!(text.contains(MISSING_SUMMARY_PLACEHOLDER));
    assert!(text.contains("### #3 Webhooks"));
}

#[tokio::test]
async fn test_stdout_uses_existing_summary() {
    let backend = RecordingBackend {
        summary: Some("# Features\n- Login".to_string()),
        ..RecordingBackend::initialized().with_issues(vec![issue(1, "Search")])
    };
    let text = run(&backend, &CompactMode::Stdout).await.unwrap();

    assert!(text.contains("- Login"));
    assert!(!text.contains(MISSING_SUMMARY_PLACEHOLDER));
}

#[tokio::test]
async fn test_zero_issues_short_circuits() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("context.md");
    let backend = RecordingBackend::initialized();

    let text = run(&backend, &CompactMode::WriteFile(target.clone()))
        .await
        .unwrap();

    assert_eq!(text, format!("{NOTHING_TO_COMPACT}\n"));
    assert!(!target.exists());
    assert_eq!(
        backend.calls(),
        vec![Call::IsInitialized, Call::ListUncompacted]
    );
}

#[tokio::test]
async fn test_write_file_mode() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("context.md");
    let backend = RecordingBackend::initialized().with_issues(vec![issue(9, "Audit log")]);

    let text = run(&backend, &CompactMode::WriteFile(target.clone()))
        .await
        .unwrap();

    assert!(text.starts_with("Compaction context written to "));
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with(CONTEXT_TITLE));
    assert!(written.contains("Audit log"));
}

#[tokio::test]
async fn test_write_file_into_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("missing").join("context.md");
    let backend = RecordingBackend::initialized().with_issues(vec![issue(1, "Search")]);

    let err = run(&backend, &CompactMode::WriteFile(target))
        .await
        .unwrap_err();
    assert!(matches!(err, CompactError::WriteOutput { .. }));
}

#[tokio::test]
async fn test_apply_skips_listing_and_init_check() {
    let dir = TempDir::new().unwrap();
    let reply = dir.path().join("reply.md");
    std::fs::write(
        &reply,
        "### MIGRATION_CONTENT\n```yaml\nid: 12345678-1234-4234-8234-123456789abc\n```\n\
         ### COMPACT_CONTENT\n```markdown\n# Features\n```\n",
    )
    .unwrap();
    let backend = RecordingBackend::default();

    let text = run(&backend, &CompactMode::Apply(reply)).await.unwrap();

    assert!(text.contains("1 issue(s) marked as compacted"));
    assert_eq!(backend.count(|c| *c == Call::IsInitialized), 0);
    assert_eq!(backend.count(|c| *c == Call::ListUncompacted), 0);
}

#[tokio::test]
async fn test_apply_unparseable_reply_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let reply = dir.path().join("reply.md");
    std::fs::write(&reply, "I could not summarize these issues.").unwrap();
    let backend = RecordingBackend::initialized();

    let err = run(&backend, &CompactMode::Apply(reply)).await.unwrap_err();

    assert!(matches!(err, CompactError::Parse(ParseError::NoSections)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_apply_prints_warning_without_ids() {
    let dir = TempDir::new().unwrap();
    let reply = dir.path().join("reply.md");
    std::fs::write(
        &reply,
        "MIGRATION_CONTENT\ntitle: cleanup\nCOMPACT_CONTENT\n# Features\n",
    )
    .unwrap();
    let backend = RecordingBackend::initialized();

    let text = run(&backend, &CompactMode::Apply(reply)).await.unwrap();

    assert!(text.starts_with("Warning: No issue IDs found in migration"));
    assert!(text.contains("no issues marked"));
}

#[tokio::test]
async fn test_apply_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let backend = RecordingBackend::initialized();

    let err = run(&backend, &CompactMode::Apply(dir.path().join("nope.md")))
        .await
        .unwrap_err();
    assert!(matches!(err, CompactError::ReadInput { .. }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_apply_step_failure_propagates_prefix() {
    let dir = TempDir::new().unwrap();
    let reply = dir.path().join("reply.md");
    std::fs::write(&reply, "MIGRATION_CONTENT\ntitle: x\nCOMPACT_CONTENT\n# F\n").unwrap();
    let backend = RecordingBackend {
        fail_update: Some(BackendError::new("IO_ERROR", "read-only file system")),
        ..RecordingBackend::initialized()
    };

    let err = run(&backend, &CompactMode::Apply(reply)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to update summary: read-only file system"
    );
}

#[test]
fn test_collaborator_maps_not_initialized() {
    let err = collaborator("list uncompacted issues")(BackendError::new("NOT_INITIALIZED", "x"));
    assert!(matches!(err, CompactError::NotInitialized));

    let err = collaborator("read instructions")(BackendError::new("IO_ERROR", "denied"));
    assert_eq!(err.to_string(), "Failed to read instructions: denied");
}
