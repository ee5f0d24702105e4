mod cli;
mod config;
mod format;
mod git;
mod github;
mod keepalive;
mod model;
mod section;
mod storage;
mod update;

#[cfg(test)]
mod test_utils;

use std::{env, io, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.debug, rust_log.as_deref()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// `--debug` wins, then `RUST_LOG`, then INFO.
fn log_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(debug: bool, rust_log: Option<&str>) -> String {
        log_filter(debug, rust_log).to_string()
    }

    #[test]
    fn rust_log_is_respected() {
        assert_eq!(filter(false, Some("warn")), EnvFilter::new("warn").to_string());
    }

    #[test]
    fn info_when_rust_log_unset_or_blank() {
        let info = EnvFilter::new("info").to_string();
        assert_eq!(filter(false, None), info);
        assert_eq!(filter(false, Some("  ")), info);
    }

    #[test]
    fn debug_flag_overrides_rust_log() {
        assert_eq!(filter(true, Some("warn")), EnvFilter::new("debug").to_string());
    }
}
