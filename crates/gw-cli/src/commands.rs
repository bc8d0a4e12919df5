use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use gw_session::{
    CommitPushSession, CommitPushView, InMemoryStatusQuery, RecordingExecutor, SessionOutcome,
    TeamPrefs, UpdateSession, UpdateView,
};
use gw_status::{ActionSets, ConflictReport, Placeholder, StatusClassifier};
use gw_types::{Perspective, StatusSnapshot};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::*;
use crate::config::TeamConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = TeamConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Classify(args) => cmd_classify(args, &config, &cli.format),
        Command::CommitStatus(args) => cmd_commit_status(args, &config, &cli.format).await,
        Command::UpdateStatus(args) => cmd_update_status(args, &config, &cli.format).await,
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<StatusSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = StatusSnapshot::from_json(&text)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    debug!(path = %path.display(), files = snapshot.records.len(), "loaded snapshot");
    Ok(snapshot)
}

fn prefs_for(config: &TeamConfig, no_layout: bool) -> TeamPrefs {
    let mut prefs = config.session.clone();
    if no_layout {
        prefs.include_layout = false;
    }
    prefs
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_classify(args: ClassifyArgs, config: &TeamConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let perspective = Perspective::from(args.perspective);
    let sets = StatusClassifier::from_config(&config.classifier).classify(&snapshot.records, perspective);

    match format {
        OutputFormat::Json => print_json(&classify_json(perspective, &sets)),
        OutputFormat::Text => {
            println!("Perspective: {}", perspective.to_string().cyan());
            print_paths("commit", &sets.to_commit);
            print_paths("add", &sets.to_add);
            print_paths("delete", &sets.to_delete);
            print_paths("layout", &sets.modified_layout);
            print_paths("merge conflicts", &sets.merge_conflicts);
            print_paths("delete conflicts", &sets.delete_conflicts);
            print_paths("other conflicts", &sets.other_conflicts);
            print_paths("needs merge", &sets.needs_merge);
            println!("Unchanged: {}", sets.unchanged.len());
            Ok(())
        }
    }
}

async fn cmd_commit_status(args: SessionArgs, config: &TeamConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let mut session = CommitPushSession::new(
        Arc::new(InMemoryStatusQuery::new(snapshot)),
        Arc::new(RecordingExecutor::new()),
        &config.classifier,
        prefs_for(config, args.no_layout),
    )?;
    let outcome = session.open().await?;

    match format {
        OutputFormat::Json => print_json(&commit_status_json(&outcome)?),
        OutputFormat::Text => {
            match &outcome {
                SessionOutcome::Ready(view) => print_commit_view(view),
                SessionOutcome::Blocked(report) => print_blocked("Commit/push", report),
                SessionOutcome::Aborted => println!("{}", "Aborted.".yellow()),
            }
            Ok(())
        }
    }
}

async fn cmd_update_status(args: SessionArgs, config: &TeamConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let mut session = UpdateSession::new(
        Arc::new(InMemoryStatusQuery::new(snapshot)),
        Arc::new(RecordingExecutor::new()),
        &config.classifier,
        prefs_for(config, args.no_layout),
    )?;
    let outcome = session.open().await?;

    match format {
        OutputFormat::Json => print_json(&update_status_json(&outcome)?),
        OutputFormat::Text => {
            match &outcome {
                SessionOutcome::Ready(view) => print_update_view(view),
                SessionOutcome::Blocked(report) => print_blocked("Update", report),
                SessionOutcome::Aborted => println!("{}", "Aborted.".yellow()),
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

fn classify_json(perspective: Perspective, sets: &ActionSets) -> Value {
    json!({
        "perspective": perspective.as_str(),
        "to_commit": sets.to_commit,
        "to_add": sets.to_add,
        "to_delete": sets.to_delete,
        "modified_layout": sets.modified_layout,
        "merge_conflicts": sets.merge_conflicts,
        "delete_conflicts": sets.delete_conflicts,
        "other_conflicts": sets.other_conflicts,
        "needs_merge": sets.needs_merge,
        "unchanged": sets.unchanged,
    })
}

fn blocked_json(report: &ConflictReport) -> Value {
    json!({
        "outcome": "blocked",
        "category": report.category,
        "message_key": report.category.message_key(),
        "files": report.files,
        "elided": report.elided,
    })
}

fn commit_status_json(outcome: &SessionOutcome<CommitPushView>) -> anyhow::Result<Value> {
    Ok(match outcome {
        SessionOutcome::Ready(view) => json!({
            "outcome": "ready",
            "session": view.session.to_string(),
            "commit": view.commit_list,
            "push": view.push_list,
            "push_enabled": view.push.enabled,
            "push_placeholder": view.push.placeholder.message_key(),
            "overridden": view.overridden,
            "include_layout": view.include_layout,
            "layout_toggle": view.layout_toggle,
            "handle": serde_json::to_value(&view.handle)?,
        }),
        SessionOutcome::Blocked(report) => blocked_json(report),
        SessionOutcome::Aborted => json!({ "outcome": "aborted" }),
    })
}

fn update_status_json(outcome: &SessionOutcome<UpdateView>) -> anyhow::Result<Value> {
    Ok(match outcome {
        SessionOutcome::Ready(view) => json!({
            "outcome": "ready",
            "session": view.session.to_string(),
            "update": view.files.files_to_update,
            "forced": view.forced_files,
            "layout": view.files.modified_layout,
            "enabled": view.update.enabled,
            "placeholder": view.update.placeholder.message_key(),
            "include_layout": view.include_layout,
            "layout_toggle": view.layout_toggle,
            "handle": serde_json::to_value(&view.handle)?,
        }),
        SessionOutcome::Blocked(report) => blocked_json(report),
        SessionOutcome::Aborted => json!({ "outcome": "aborted" }),
    })
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn print_paths(label: &str, paths: &BTreeSet<PathBuf>) {
    if paths.is_empty() {
        return;
    }
    println!("{} ({}):", label.bold(), paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
}

fn print_placeholder(placeholder: Placeholder) {
    if placeholder != Placeholder::None {
        println!("  {}", placeholder.text().dimmed());
    }
}

fn enabled_label(enabled: bool) -> colored::ColoredString {
    if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    }
}

fn print_commit_view(view: &CommitPushView) {
    println!("Session {}", view.session.to_string().cyan());

    println!("{} ({}):", "Commit".bold(), view.commit_list.len());
    for path in &view.commit_list {
        println!("  {}", path.display());
    }
    if view.layout_toggle {
        let state = if view.include_layout { "included" } else { "excluded" };
        println!("  layout changes {}", state.yellow());
    }

    println!("{} ({}): {}", "Push".bold(), view.push_list.len(), enabled_label(view.push.enabled));
    for path in &view.push_list {
        println!("  {}", path.display());
    }
    print_placeholder(view.push.placeholder);

    if !view.overridden.is_empty() {
        println!("{}", "Remote conflicts resolved locally:".yellow());
        for path in &view.overridden {
            println!("  {}", path.display());
        }
    }
}

fn print_update_view(view: &UpdateView) {
    println!("Session {}", view.session.to_string().cyan());
    println!(
        "{} ({}): {}",
        "Update".bold(),
        view.visible_files.len(),
        enabled_label(view.update.enabled)
    );
    for path in &view.files.files_to_update {
        println!("  {}", path.display());
    }
    for path in &view.forced_files {
        println!("  {} {}", path.display(), "(layout)".dimmed());
    }
    print_placeholder(view.update.placeholder);
    if view.layout_toggle && !view.include_layout {
        println!("  {} changed layout files excluded", view.files.modified_layout.len());
    }
}

fn print_blocked(action: &str, report: &ConflictReport) {
    println!("{} {} blocked: {}", "✗".red().bold(), action, report.category.describe());
    print!("{}", report.render());
    if report.elided {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use gw_types::{FileStatusRecord, RepoStatus, StatusHandle};

    use super::*;

    fn write_snapshot(snapshot: &StatusSnapshot) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(snapshot.to_json().unwrap().as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_snapshot_from_file() {
        let snapshot = StatusSnapshot::new(
            vec![FileStatusRecord::uniform("src/A.java", RepoStatus::Modified)],
            StatusHandle::new(true, false),
        );
        let file = write_snapshot(&snapshot);
        assert_eq!(load_snapshot(file.path()).unwrap(), snapshot);
    }

    #[test]
    fn load_snapshot_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_snapshot(file.path()).is_err());
    }

    #[test]
    fn no_layout_overrides_config() {
        let config = TeamConfig::default();
        assert!(prefs_for(&config, false).include_layout);
        assert!(!prefs_for(&config, true).include_layout);
    }

    #[tokio::test]
    async fn commit_status_json_lists_plan() {
        let snapshot = StatusSnapshot::new(
            vec![FileStatusRecord::uniform("src/A.java", RepoStatus::Modified)],
            StatusHandle::default(),
        );
        let mut session = CommitPushSession::new(
            Arc::new(InMemoryStatusQuery::new(snapshot)),
            Arc::new(RecordingExecutor::new()),
            &TeamConfig::default().classifier,
            TeamPrefs::default(),
        )
        .unwrap();
        let outcome = session.open().await.unwrap();

        let value = commit_status_json(&outcome).unwrap();
        assert_eq!(value["outcome"], "ready");
        assert_eq!(value["commit"], json!(["src/A.java"]));
        assert_eq!(value["push_enabled"], true);
        assert_eq!(value["push_placeholder"], Value::Null);
    }

    #[tokio::test]
    async fn update_status_json_reports_conflicts() {
        let snapshot = StatusSnapshot::new(
            vec![FileStatusRecord::new("src/B.java", RepoStatus::UpToDate, RepoStatus::Unresolved)],
            StatusHandle::default(),
        );
        let mut session = UpdateSession::new(
            Arc::new(InMemoryStatusQuery::new(snapshot)),
            Arc::new(RecordingExecutor::new()),
            &TeamConfig::default().classifier,
            TeamPrefs::default(),
        )
        .unwrap();
        let outcome = session.open().await.unwrap();

        let value = update_status_json(&outcome).unwrap();
        assert_eq!(value["outcome"], "blocked");
        assert_eq!(value["category"], "unresolved-conflicts");
        assert_eq!(value["files"], json!(["B.java"]));
    }

    #[test]
    fn classify_json_uses_perspective() {
        let records = vec![FileStatusRecord::new(
            "A.java",
            RepoStatus::NeedsAdd,
            RepoStatus::UpToDate,
        )];
        let sets = StatusClassifier::from_config(&TeamConfig::default().classifier)
            .classify(&records, Perspective::Remote);
        let value = classify_json(Perspective::Remote, &sets);
        assert_eq!(value["perspective"], "remote");
        assert_eq!(value["to_add"], json!([]));
        assert_eq!(value["unchanged"], json!(["A.java"]));
    }
}
