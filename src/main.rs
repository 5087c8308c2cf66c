//! Command-line interface for the profile-dynamo binary.
//!
//! `generate` aggregates the profile data and writes the rendered README;
//! `snapshot` aggregates and prints the snapshot as JSON for inspection.

// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::{
    io,
    path::PathBuf,
    process,
    time::Duration
};

use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use profile_dynamo::{
    Aggregator, AggregatorOptions, Capabilities, Credentials, Error, GeminiClient, GitHubClient, ProfileConfig,
    ProfileSnapshot, RenderContext, WakaTimeClient, load_config, write_readme
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for generating a dynamic profile README.
#[derive(Debug, Parser)]
#[command(name = "profile-dynamo", version, about = "Generate a dynamic GitHub profile README")]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
/// Supported commands exposed by the CLI.
enum Command {
    /// Aggregate profile data and write the rendered README.
    Generate(GenerateArgs),
    /// Aggregate profile data and print the snapshot as JSON.
    Snapshot(SnapshotArgs)
}

/// Credentials and settings shared by every command.
#[derive(Debug, Args, Default)]
struct SourceArgs {
    /// Optional YAML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Account to build the profile for.
    #[arg(long = "username", env = "GITHUB_USERNAME", value_name = "LOGIN")]
    username: Option<String>,

    /// Personal access token for the GitHub API.
    #[arg(long = "github-token", env = "GH_PAT_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// API key for the generative-text service.
    #[arg(long = "llm-api-key", env = "LLM_API_KEY", hide_env_values = true)]
    llm_api_key: Option<String>,

    /// Legacy variable name for the generative-text key.
    #[arg(long = "google-api-key", env = "GOOGLE_API_KEY", hide_env_values = true, hide = true)]
    google_api_key: Option<String>,

    /// WakaTime API key; the coding summary is skipped without it.
    #[arg(long = "wakatime-api-key", env = "WAKATIME_API_KEY", hide_env_values = true)]
    wakatime_api_key: Option<String>,

    /// Seed for the motivational quote picker, for reproducible output.
    #[arg(long = "quote-seed", value_name = "SEED")]
    quote_seed: Option<u64>
}

impl SourceArgs {
    fn credentials(&self) -> Credentials {
        Credentials {
            github_token:     self.github_token.clone(),
            llm_api_key:      self.llm_api_key.clone(),
            google_api_key:   self.google_api_key.clone(),
            wakatime_api_key: self.wakatime_api_key.clone()
        }
    }
}

#[derive(Debug, Args)]
/// Arguments accepted by the `generate` subcommand.
struct GenerateArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// Template path; overrides `output.template_path`.
    #[arg(long = "template", value_name = "PATH")]
    template: Option<PathBuf>,

    /// Destination path; overrides `output.readme_path`.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf>
}

#[derive(Debug, Args)]
/// Arguments accepted by the `snapshot` subcommand.
struct SnapshotArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

/// Validated startup state shared by both commands.
struct Prepared {
    config:       ProfileConfig,
    capabilities: Capabilities,
    options:      AggregatorOptions
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run(Cli::parse()).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Executes the parsed command.
///
/// # Errors
///
/// Propagates startup failures (configuration, credentials), the
/// domain-fatal spotlight error, and output failures.
async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Snapshot(args) => run_snapshot(args).await
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), Error> {
    let prepared = prepare(&args.sources)?;
    let (template_path, output_path) = resolve_paths(&args, &prepared.config);
    let context = RenderContext {
        header_image: prepared.config.header_image.clone(),
        social:       prepared.config.social.clone()
    };

    let snapshot = collect_snapshot(&prepared).await?;
    write_readme(&snapshot, &template_path, &output_path, &context)?;

    info!("Profile README generated for {}", snapshot.username);
    Ok(())
}

async fn run_snapshot(args: SnapshotArgs) -> Result<(), Error> {
    let prepared = prepare(&args.sources)?;
    let snapshot = collect_snapshot(&prepared).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &snapshot, args.pretty)
}

/// Loads configuration and validates credentials before any client exists.
fn prepare(args: &SourceArgs) -> Result<Prepared, Error> {
    let config = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => ProfileConfig::default()
    };
    let username = config.resolve_username(args.username.as_deref())?;
    let capabilities = Capabilities::initialize(args.credentials())?;

    let options = AggregatorOptions {
        username,
        wakatime_enabled: config.features.wakatime,
        achievements_enabled: config.features.achievements,
        quote_seed: args.quote_seed
    };

    Ok(Prepared {
        config,
        capabilities,
        options
    })
}

fn resolve_paths(args: &GenerateArgs, config: &ProfileConfig) -> (PathBuf, PathBuf) {
    (
        args.template
            .clone()
            .unwrap_or_else(|| config.output.template_path.clone()),
        args.output
            .clone()
            .unwrap_or_else(|| config.output.readme_path.clone())
    )
}

async fn collect_snapshot(prepared: &Prepared) -> Result<ProfileSnapshot, Error> {
    let capabilities = &prepared.capabilities;
    let github = GitHubClient::new(&capabilities.github_token)?;
    let wakatime = capabilities
        .wakatime_api_key
        .as_deref()
        .map(WakaTimeClient::new)
        .transpose()?;
    let generator = GeminiClient::new(&capabilities.llm_api_key, &prepared.config.llm.model)?;

    if !capabilities.has_wakatime() {
        info!("WAKATIME_API_KEY not set, coding summary disabled");
    }

    let aggregator = Aggregator::new(github, wakatime, generator, prepared.options.clone());

    let pb = spinner(format!("Collecting profile data for {}...", prepared.options.username));
    let snapshot = aggregator.aggregate().await;
    pb.finish_and_clear();

    snapshot
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn write_json<W, T>(writer: &mut W, value: &T, pretty: bool) -> Result<(), Error>
where
    W: io::Write,
    T: Serialize
{
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }

    Ok(())
}
