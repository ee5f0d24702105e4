//! CLI interface for the activity updater.
//!
//! Built to run unattended from a scheduler: arguments and environment in,
//! a rewritten document (and a commit) out. Nothing prompts.
//!
//! - `activity update` — refresh the section, commit and push.
//! - `activity preview` — print the refreshed document, change nothing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    config::{Config, PartialConfig},
    git::Git,
    model::RawLimit,
    update::{self, Outcome},
};

/// Activity — keep a document's activity section in sync with your GitHub history.
#[derive(Debug, Parser)]
#[command(name = "activity", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Config file. Defaults to `~/.activity/config.toml` when present.
    #[arg(long, global = true, env = "ACTIVITY_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug detail to stderr.
    #[arg(
        long,
        global = true,
        env = "ACTIVITY_DEBUG",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: bool,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"The document must contain an activity section:

  <!--START_SECTION:activity-->
  <!--END_SECTION:activity-->

Everything between the markers is replaced on each run.
A missing end marker is restored after the new lines.
A missing document is created.

Examples:
  activity --username octocat update
  activity --username octocat --max-lines 5 preview
  activity --events events.json --target-file PROFILE.md update --no-push"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh the activity section, then commit and push it.
    ///
    /// Makes a keep-alive empty commit first when enabled and the
    /// repository has been quiet for too long.
    Update {
        /// Write the document but leave git alone.
        #[arg(long)]
        no_push: bool,
    },

    /// Print the refreshed document to stdout without writing anything.
    Preview,
}

/// Settings that can also come from the config file.
#[derive(Debug, Args)]
struct SettingsArgs {
    /// GitHub user whose public activity is shown.
    #[arg(long, global = true, env = "ACTIVITY_USERNAME")]
    username: Option<String>,

    /// Document holding the activity section.
    #[arg(long, global = true, env = "ACTIVITY_TARGET_FILE")]
    target_file: Option<PathBuf>,

    /// Number of activity lines to show. Invalid values fall back to 10.
    #[arg(long, global = true, env = "ACTIVITY_MAX_LINES")]
    max_lines: Option<String>,

    /// Commit message for the document update.
    #[arg(long, global = true, env = "ACTIVITY_COMMIT_MESSAGE")]
    commit_message: Option<String>,

    /// Commit message for keep-alive empty commits.
    #[arg(long, global = true, env = "ACTIVITY_EMPTY_COMMIT_MESSAGE")]
    empty_commit_message: Option<String>,

    #[arg(long, global = true, env = "ACTIVITY_COMMITTER_NAME")]
    committer_name: Option<String>,

    #[arg(long, global = true, env = "ACTIVITY_COMMITTER_EMAIL")]
    committer_email: Option<String>,

    /// Allow keep-alive empty commits.
    #[arg(long, global = true, env = "ACTIVITY_ENABLE_EMPTY_COMMIT", value_name = "BOOL")]
    enable_empty_commit: Option<bool>,

    /// Days without commits before a keep-alive commit is made.
    #[arg(long, global = true, env = "ACTIVITY_KEEP_ALIVE_DAYS")]
    keep_alive_days: Option<i64>,

    /// `GH_CONFIG_DIR` to run `gh` with.
    #[arg(long, global = true, env = "ACTIVITY_GH_CONFIG_DIR")]
    gh_config_dir: Option<PathBuf>,

    /// Read events from a JSON file instead of the GitHub API.
    #[arg(long, global = true)]
    events: Option<PathBuf>,
}

impl SettingsArgs {
    fn into_partial(self) -> PartialConfig {
        PartialConfig {
            username: self.username,
            target_file: self.target_file,
            max_lines: self.max_lines.map(RawLimit::Text),
            commit_message: self.commit_message,
            empty_commit_message: self.empty_commit_message,
            committer_name: self.committer_name,
            committer_email: self.committer_email,
            enable_empty_commit: self.enable_empty_commit,
            keep_alive_days: self.keep_alive_days,
            gh_config_dir: self.gh_config_dir,
            events_file: self.events,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(cli.config, cli.settings)?;

    match cli.command {
        Command::Update { no_push } => cmd_update(&config, !no_push),
        Command::Preview => cmd_preview(&config),
    }
}

/// Resolve configuration from flags, the config file, and defaults.
fn load_config(path: Option<PathBuf>, settings: SettingsArgs) -> Result<Config, String> {
    let file = match path {
        Some(path) => PartialConfig::load(&path, true),
        None => match Config::default_path() {
            Some(path) => PartialConfig::load(&path, false),
            None => Ok(PartialConfig::default()),
        },
    }
    .map_err(|e| e.to_string())?;

    Ok(Config::resolve(settings.into_partial(), file))
}

fn cmd_update(config: &Config, publish: bool) -> Result<(), String> {
    let git = Git::new(".");
    let outcome = update::run(config, &git, publish).map_err(|e| e.to_string())?;

    let path = config.target_file.display();
    match outcome {
        Outcome::Unchanged => eprintln!("{path} already up to date"),
        Outcome::Written => eprintln!("Updated {path}"),
        Outcome::Published => eprintln!("Updated and pushed {path}"),
    }
    Ok(())
}

fn cmd_preview(config: &Config) -> Result<(), String> {
    let rendered = update::compute(config).map_err(|e| e.to_string())?;
    println!("{}", rendered.document.to_text());
    Ok(())
}
