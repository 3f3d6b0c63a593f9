//! Build script for embedding the release tag at compile time.
//!
//! Sets `REPORTGATE_RELEASE`, consumed by [`reportgate::RELEASE`] via
//! `env!()`. The tag is `{version}+{git short hash}`; the hash part is
//! dropped when git is unavailable (e.g. Docker builds without `.git`).

use std::process::Command;

/// Try an override env var first (for Docker builds), then fall back to git.
fn git_or_env(env_key: &str, args: &[&str]) -> Option<String> {
    std::env::var(env_key)
        .ok()
        .filter(|s| !s.is_empty() && s != "unknown")
        .or_else(|| {
            Command::new("git")
                .args(args)
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

fn main() {
    // Re-run when HEAD changes (branch switch, new commit)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");
    println!("cargo:rerun-if-env-changed=REPORTGATE_RELEASE_OVERRIDE");
    println!("cargo:rerun-if-env-changed=REPORTGATE_GIT_SHORT_OVERRIDE");

    let release = std::env::var("REPORTGATE_RELEASE_OVERRIDE")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());
            match git_or_env(
                "REPORTGATE_GIT_SHORT_OVERRIDE",
                &["rev-parse", "--short", "HEAD"],
            ) {
                Some(short) => format!("{version}+{short}"),
                None => version,
            }
        });

    println!("cargo:rustc-env=REPORTGATE_RELEASE={release}");
}
