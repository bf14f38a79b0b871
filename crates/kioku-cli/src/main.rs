//! kioku script runner
//!
//! Runs a line-oriented command script against a fresh in-memory filesystem.
//!
//! ## Usage
//!
//! ```bash
//! # Script from a file
//! kioku --config kioku.toml setup.kioku
//!
//! # Script from stdin
//! printf 'write /a/b.txt 0 hello\ntree\n' | kioku
//! ```
//!
//! Set `RUST_LOG=kioku_store=trace` to watch every namespace mutation.

mod command;
mod shell;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use kioku_vfs::FsConfig;

use crate::shell::Shell;

/// Run a command script against an in-memory filesystem.
///
/// Commands: mkdir, touch, write P OFFSET TEXT, append P TEXT, cat, ls,
/// tree [P], mv A B, rm, rmdir, truncate P N, stat, df. Lines starting
/// with `#` are comments.
#[derive(Debug, Parser)]
#[command(name = "kioku", version)]
struct Cli {
    /// TOML file with permissions and limits.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script to run. Reads stdin when omitted.
    script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            tracing::info!(failures, "script finished with errors");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("kioku: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<usize> {
    let config = match &cli.config {
        Some(path) => FsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FsConfig::default(),
    };
    tracing::debug!(?config, "starting");

    let shell = Shell::new(config);
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    let failures = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            shell.run(BufReader::new(file), &mut out, &mut err).await?
        }
        None => shell.run(io::stdin().lock(), &mut out, &mut err).await?,
    };

    tracing::debug!(nodes = shell.fs().paths().len(), failures, "script done");
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_run_with_config_and_script_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kioku.toml");
        let script = dir.path().join("setup.kioku");
        fs::write(&config, "max_file_size = 4\n").unwrap();
        fs::write(&script, "write /ok 0 abcd\nwrite /too-big 0 abcde\n").unwrap();

        let failures = run(Cli {
            config: Some(config),
            script: Some(script),
        })
        .await
        .unwrap();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn test_missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(Cli {
            config: None,
            script: Some(dir.path().join("absent")),
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("opening script"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from(["kioku", "--config", "c.toml", "s.kioku"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert_eq!(cli.script, Some(PathBuf::from("s.kioku")));
    }
}
