//! Command-line surface of `tenantctl`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tenantctl_config::load_config;
use tenantctl_core::OrgId;
use tenantctl_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{handle_create, handle_delete, handle_diagnose, handle_keys};
use crate::prompt::StdinPrompt;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let trace_id = Uuid::new_v4().to_string();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        build_sha: option_env!("TENANTCTL_BUILD_SHA").unwrap_or(env!("CARGO_PKG_VERSION")),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let command = command_label(&cli.command);
    info!(command, trace_id = %trace_id, "running command");

    match dispatch(cli, &trace_id).await {
        Ok(()) => {
            debug!(command, "command finished");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let path = cli.config.ok_or_else(|| {
        CliError::validation(
            "configuration file is required (pass --config or set TENANTCTL_CONFIG)",
        )
    })?;
    let config = load_config(&path)?;
    let ctx = AppContext::connect(
        &config,
        trace_id,
        Duration::from_secs(cli.timeout),
        cli.output,
    )?;

    match cli.command {
        Command::Create(args) => handle_create(&ctx, args).await,
        Command::Delete(args) => {
            let mut prompt = StdinPrompt::new(cli.output);
            handle_delete(&ctx, args, &mut prompt).await
        }
        Command::Keys(args) => {
            let mut prompt = StdinPrompt::new(cli.output);
            handle_keys(&ctx, args, &mut prompt).await
        }
        Command::Test(args) => handle_diagnose(&ctx, args).await,
    }
}

#[derive(Parser)]
#[command(
    name = "tenantctl",
    version,
    about = "Provision tenant organizations, datasources, and API keys"
)]
pub(crate) struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "TENANTCTL_CONFIG",
        help = "Path to the JSON configuration file"
    )]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "TENANTCTL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Per-request HTTP timeout in seconds"
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select output format for command results"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,
    #[arg(long, global = true, default_value_t = LogFormat::infer())]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create (or reuse) an organization, switch to it, and provision its datasource.
    Create(CreateArgs),
    /// Delete an organization by name after confirmation.
    Delete(DeleteArgs),
    /// List, delete, and create API keys interactively.
    Keys(KeysArgs),
    /// Switch to an organization to check connectivity and credentials.
    Test(TestArgs),
}

#[derive(Args)]
pub(crate) struct CreateArgs {
    #[arg(help = "Tenant name")]
    pub(crate) name: String,
    #[arg(
        short = 'i',
        long = "id",
        help = "Use an existing organization id instead of creating one"
    )]
    pub(crate) id: Option<OrgId>,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    #[arg(help = "Organization name")]
    pub(crate) name: String,
    #[arg(long, help = "Skip the confirmation question")]
    pub(crate) yes: bool,
}

#[derive(Args, Default)]
pub(crate) struct KeysArgs {
    #[arg(long, help = "Switch to this organization before managing keys")]
    pub(crate) org_id: Option<OrgId>,
}

#[derive(Args, Default)]
pub(crate) struct TestArgs {
    #[arg(long, help = "Organization to switch to (defaults to 1)")]
    pub(crate) org_id: Option<OrgId>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Create(_) => "create",
        Command::Delete(_) => "delete",
        Command::Keys(_) => "keys",
        Command::Test(_) => "test",
    }
}
