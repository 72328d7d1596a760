use anyhow::{Context, Result};
use even_ratio::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Pass/fail counts of the exported run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub cases: usize,
    pub passed: usize,
    pub failed: usize,
}

impl From<&BatchRun> for Tally {
    fn from(run: &BatchRun) -> Self {
        Self {
            cases: run.total(),
            passed: run.passed,
            failed: run.failed(),
        }
    }
}

/// What produced an export.
#[derive(Debug, Serialize)]
pub struct Payload {
    /// Subcommand name (`single`, `random`, `batch`).
    pub command: String,
    /// Subcommand arguments as they were resolved.
    pub args: Value,
    pub table: TableCfg,
    pub tally: Tally,
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    even_ratio_version: &'static str,
    callsite: Callsite,
    run: &'a Payload,
    outputs: [String; 1],
}

/// Write `<stem>.provenance.json` next to `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: git_rev(),
        even_ratio_version: even_ratio::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        run: &payload,
        outputs: [artifact.to_string_lossy().into_owned()],
    };
    let path = sidecar_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

/// `runs/seed7.csv` → `runs/seed7.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Commit hash from `GIT_COMMIT` (build time, then runtime), else `git rev-parse HEAD`.
pub fn git_rev() -> String {
    option_env!("GIT_COMMIT")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .or_else(|| {
            let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            if !output.status.success() {
                return None;
            }
            String::from_utf8(output.stdout)
                .ok()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
