//! System diagnostics and dependency checking.
//!
//! Verifies that the external collaborators are reachable before a batch is
//! started: the audio-cutting tool must be on PATH and the alignment service
//! needs an endpoint plus token.

use crate::config::Config;
use crate::defaults::ALIGN_TOKEN_ENV;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Dependency is available
    Ok,
    /// Dependency is not found
    NotFound,
    /// Dependency is present but looks misconfigured
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str) -> CheckResult {
    match Command::new(command).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but -version failed", command)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check whether an alignment token is available from config or environment.
fn check_alignment_token(config: &Config) -> CheckResult {
    if config.alignment.token.is_some() {
        return CheckResult::Ok;
    }
    match std::env::var(ALIGN_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => CheckResult::Ok,
        _ => CheckResult::NotFound,
    }
}

/// Run all dependency checks and print results.
///
/// Returns false when a hard requirement is missing, so the caller can exit
/// non-zero before any work starts.
pub fn check_dependencies(config: &Config) -> bool {
    println!("Checking external dependencies...\n");
    let mut all_ok = true;

    print!("{} (audio cutting): ", config.extraction.tool);
    match check_command(&config.extraction.tool) {
        CheckResult::Ok => println!("✓ OK"),
        CheckResult::NotFound => {
            all_ok = false;
            println!("✗ NOT FOUND");
            println!("  Install: sudo apt install ffmpeg  (Debian/Ubuntu)");
            println!("           brew install ffmpeg      (macOS)");
        }
        CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
    }

    print!("alignment endpoint: ");
    if config.alignment.endpoint.is_empty() {
        all_ok = false;
        println!("✗ NOT CONFIGURED (set [alignment] endpoint or CORPUSCUT_ALIGN_ENDPOINT)");
    } else {
        println!("✓ {}", config.alignment.endpoint);
    }

    print!("alignment token: ");
    match check_alignment_token(config) {
        CheckResult::Ok => println!("✓ OK"),
        _ => {
            println!("- not set");
            println!("  If the service requires auth: export {ALIGN_TOKEN_ENV}=your_token");
        }
    }

    println!();
    if all_ok {
        println!("✓ Ready to process the corpus.");
    } else {
        println!("⚠ Missing dependencies; the batch will not run correctly.");
    }
    all_ok
}
