// crates/trackplan-cli/src/main.rs
// ============================================================================
// Module: Trackplan CLI Entry Point
// Description: Command dispatcher for tracking-plan validation workflows.
// Purpose: Check a tracking plan and its event files and report every issue.
// Dependencies: clap, serde_json, trackplan-config, trackplan-core, trackplan-validator
// ============================================================================

//! ## Overview
//! The Trackplan CLI loads a tracking plan and an events directory, resolves
//! every event's payload, runs schema-level checks, and prints one report
//! line per issue. The run reports every defect it finds; a plan that fails
//! to load is the only early exit.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use trackplan_config::EventFile;
use trackplan_config::TrackingPlan;
use trackplan_config::load_events_dir;
use trackplan_config::load_plan;
use trackplan_core::PayloadIssue;
use trackplan_core::resolve_event_payload;
use trackplan_validator::check_resolved_payload;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Tracking-plan validation CLI.
#[derive(Parser, Debug)]
#[command(name = "trackplan", version, about = "Validate tracking plans and event files")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Checks a tracking plan and its event files.
    Check(CheckCommand),
}

/// Arguments for the check command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Path to the tracking-plan YAML file.
    #[arg(long)]
    plan: PathBuf,
    /// Path to the events directory.
    #[arg(long)]
    events: PathBuf,
    /// Report output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per issue.
    Text,
    /// Single JSON report document.
    Json,
}

// ============================================================================
// SECTION: Report Model
// ============================================================================

/// Full check report across every event.
#[derive(Debug, Serialize)]
struct CheckReport {
    /// Per-event reports in file order.
    events: Vec<EventReport>,
    /// Total issue count across all events.
    issue_count: usize,
}

/// Report for one event file.
#[derive(Debug, Serialize)]
struct EventReport {
    /// Event name derived from the file stem.
    name: String,
    /// Source file the event was loaded from.
    file: String,
    /// Issues found while resolving and checking the event.
    issues: Vec<PayloadIssue>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(command) => command_check(&command),
    }
}

/// Executes the check command.
fn command_check(command: &CheckCommand) -> ExitCode {
    let plan = match load_plan(&command.plan) {
        Ok(plan) => plan,
        Err(err) => return emit_error(&err.to_string()),
    };
    let events = match load_events_dir(&command.events) {
        Ok(events) => events,
        Err(err) => return emit_error(&err.to_string()),
    };

    let report = check_events(&plan, &events);
    let rendered = match command.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => match render_json(&report) {
            Ok(rendered) => rendered,
            Err(message) => return emit_error(&message),
        },
    };
    if write_stdout(&rendered).is_err() {
        return ExitCode::FAILURE;
    }

    if report.issue_count == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ============================================================================
// SECTION: Check Pipeline
// ============================================================================

/// Resolves and checks every event against the plan.
fn check_events(plan: &TrackingPlan, events: &[EventFile]) -> CheckReport {
    let spec = plan.resolution_spec();
    let mut reports = Vec::with_capacity(events.len());
    let mut issue_count = 0;

    for event in events {
        let resolution = resolve_event_payload(&spec, &event.payload);
        let mut issues = resolution.issues;
        issues.extend(check_resolved_payload(&resolution.payload, &plan.dicts));
        issue_count += issues.len();
        reports.push(EventReport {
            name: event.name.clone(),
            file: event.path.display().to_string(),
            issues,
        });
    }

    CheckReport {
        events: reports,
        issue_count,
    }
}

// ============================================================================
// SECTION: Report Rendering
// ============================================================================

/// Renders the report as one line per issue plus a summary line.
fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();
    for event in &report.events {
        for issue in &event.issues {
            out.push_str(&format!("{}: {}: {}\n", event.file, issue.path, issue.message));
        }
    }
    let events = report.events.len();
    out.push_str(&format!("{} issue(s) across {events} event(s)\n", report.issue_count));
    out
}

/// Renders the report as a single JSON document.
fn render_json(report: &CheckReport) -> Result<String, String> {
    serde_json::to_string_pretty(report)
        .map(|mut rendered| {
            rendered.push('\n');
            rendered
        })
        .map_err(|err| format!("failed to serialize report: {err}"))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes rendered output to stdout.
fn write_stdout(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(message.as_bytes())
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "{message}");
    ExitCode::FAILURE
}
