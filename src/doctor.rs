//! Configuration check for zet.
//!
//! Provides the `check` command functionality:
//! - Environment settings (editor, pager, git user, repository paths)
//! - Utility directories used alongside notes
//! - Repository existence and git remote checks

use std::path::{Path, PathBuf};

use crate::config::{Config, REPO_NAME};
use crate::runner::ProcessRunner;
use crate::sync::SyncWorkflow;

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";

/// Health status for a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Check passed
    Ok,
    /// Setting is missing but nothing depends on it yet
    Warning(String),
    /// Something the tool needs is broken
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }
}

/// Utility directories reported alongside the repository.
#[derive(Debug)]
pub struct UtilityDirs {
    pub pictures: Option<PathBuf>,
    pub screenshots: Option<PathBuf>,
    pub downloads: Option<PathBuf>,
}

impl UtilityDirs {
    fn discover() -> Self {
        let pictures = dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            .map(|p| p.join(REPO_NAME));
        Self {
            screenshots: pictures.clone(),
            pictures,
            downloads: dirs::download_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join("Downloads"))),
        }
    }
}

/// Everything `check` reports.
#[derive(Debug)]
pub struct ConfigReport {
    pub editor: String,
    pub pager: Option<String>,
    pub git_user: Option<String>,
    pub repos: Option<PathBuf>,
    pub repo: Option<PathBuf>,
    pub utility: UtilityDirs,
    pub repo_status: HealthStatus,
    /// `None` when the repository is missing and the remote was not checked.
    pub remote_status: Option<HealthStatus>,
}

/// Gathers the configuration report.
///
/// A missing repository short-circuits the remote check.
pub fn gather_report<R: ProcessRunner + ?Sized>(config: &Config, runner: &R) -> ConfigReport {
    let repo_status = repo_health(config.repo());
    let remote_status = match (config.repo(), repo_status.is_ok()) {
        (Some(repo), true) => Some(
            match SyncWorkflow::new(repo, runner, config.remote_override()).verify_remote() {
                Ok(()) => HealthStatus::Ok,
                Err(e) => HealthStatus::Error(e.to_string()),
            },
        ),
        _ => None,
    };

    ConfigReport {
        editor: config.editor().to_string(),
        pager: config.pager().map(str::to_string),
        git_user: config.git_user().map(str::to_string),
        repos: config.repos().map(Path::to_path_buf),
        repo: config.repo().map(Path::to_path_buf),
        utility: UtilityDirs::discover(),
        repo_status,
        remote_status,
    }
}

fn repo_health(repo: Option<&Path>) -> HealthStatus {
    match repo {
        None => HealthStatus::Error("ZETDIR not set".to_string()),
        Some(path) if path.is_dir() => HealthStatus::Ok,
        Some(path) => HealthStatus::Error(format!("{} does not exist", path.display())),
    }
}

/// Performs all checks and prints the report.
pub fn run_config_check<R: ProcessRunner + ?Sized>(config: &Config, runner: &R) {
    print_report(&gather_report(config, runner));
}

// ============================================================================
// Pretty Printing
// ============================================================================

fn status_symbol(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => "\u{2713}",
        HealthStatus::Warning(_) => "!",
        HealthStatus::Error(_) => "\u{2717}",
    }
}

fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Warning(_) => YELLOW,
        HealthStatus::Error(_) => RED,
    }
}

fn status_line(label: &str, status: &HealthStatus) -> String {
    let detail = match status {
        HealthStatus::Ok => "OK".to_string(),
        HealthStatus::Warning(w) => w.clone(),
        HealthStatus::Error(e) => e.clone(),
    };
    format!(
        "  {}{}{} {}: {}",
        status_color(status),
        status_symbol(status),
        RESET,
        label,
        detail
    )
}

fn value_line(label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("  {BLUE}{label}:{RESET} {v}"),
        None => format!("  {BLUE}{label}:{RESET} {YELLOW}not set{RESET}"),
    }
}

fn path_value(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.display().to_string())
}

fn print_report(report: &ConfigReport) {
    println!("{UNDERLINE}{GREEN}Checking Zet Config{RESET}");
    println!();

    println!("{BOLD}System{RESET}");
    println!("{}", value_line("Editor", Some(&report.editor)));
    println!("{}", value_line("Pager", report.pager.as_deref()));
    println!();

    println!("{BOLD}Repository Variables{RESET}");
    println!("{}", value_line("RepoName", Some(REPO_NAME)));
    match path_value(report.repos.as_ref()) {
        Some(repos) => println!("{}", value_line("Repos Variable", Some(&repos))),
        None => println!(
            "  {BLUE}Repos Variable:{RESET} {RED}Variable not set. Must point to the `zet` git repo locally.{RESET}"
        ),
    }
    println!("{}", value_line("GitUser", report.git_user.as_deref()));
    println!(
        "{}",
        value_line("Repo", path_value(report.repo.as_ref()).as_deref())
    );
    println!();

    println!("{BOLD}Utility Directories{RESET}");
    let utility = &report.utility;
    println!(
        "{}",
        value_line("Pictures Directory", path_value(utility.pictures.as_ref()).as_deref())
    );
    println!(
        "{}",
        value_line(
            "Screenshots Directory",
            path_value(utility.screenshots.as_ref()).as_deref()
        )
    );
    println!(
        "{}",
        value_line("Downloads Directory", path_value(utility.downloads.as_ref()).as_deref())
    );
    println!();

    println!("{BOLD}Directories Exist{RESET}");
    println!("{}", status_line("Zet Git Repo Exists", &report.repo_status));
    match &report.remote_status {
        Some(status) => println!("{}", status_line("Zet Git Remote", status)),
        None => println!(
            "{}",
            status_line(
                "Zet Git Remote",
                &HealthStatus::Warning("zet repo does not exist on host".to_string())
            )
        ),
    }
}
