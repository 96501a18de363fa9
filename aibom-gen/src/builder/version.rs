//! Tool version resolution
//!
//! Resolution order: explicit build-time override, the crate version baked
//! in by cargo, `git describe` against the working tree, a bare commit id,
//! and finally the literal `devel`.

use std::process::Command;

/// Build-time override, e.g. `AIBOMGEN_VERSION=v1.2.3 cargo build`.
const VERSION_OVERRIDE: Option<&str> = option_env!("AIBOMGEN_VERSION");
const COMMIT_OVERRIDE: Option<&str> = option_env!("AIBOMGEN_COMMIT");

pub fn tool_version() -> String {
    if let Some(v) = VERSION_OVERRIDE {
        let v = v.trim();
        if !v.is_empty() && v != "dev" {
            return v.to_string();
        }
    }

    let pkg = env!("CARGO_PKG_VERSION");
    if !pkg.is_empty() && pkg != "0.0.0" {
        return pkg.to_string();
    }

    if let Some(described) = git_describe() {
        return described;
    }

    if let Some(commit) = COMMIT_OVERRIDE {
        let commit = commit.trim();
        if !commit.is_empty() {
            return format!("commit-{}", commit);
        }
    }

    "devel".to_string()
}

fn git_describe() -> Option<String> {
    let run = |args: &[&str]| -> Option<String> {
        let out = Command::new("git").args(args).output().ok()?;
        if !out.status.success() {
            return None;
        }
        let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
        (!s.is_empty()).then_some(s)
    };

    run(&["describe", "--tags", "--always", "--dirty"])
        .or_else(|| run(&["rev-parse", "--short", "HEAD"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_version_is_never_empty() {
        assert!(!tool_version().is_empty());
    }
}
