// # dns01 - DNS-01 challenge record tool
//
// This binary is a THIN integration layer over the provider crates. It:
// 1. Reads provider configuration from a JSON file or environment variables
// 2. Initializes logging and the runtime
// 3. Registers providers and builds the configured one
// 4. Runs a single present / cleanup / timeout operation
//
// ## Configuration
//
// ### Provider (environment, used when --config is absent)
// - `SAKURACLOUD_ACCESS_TOKEN`: API token (required)
// - `SAKURACLOUD_ACCESS_TOKEN_SECRET`: API secret (required)
// - `SAKURACLOUD_TTL`: TXT record TTL in seconds (default 120)
// - `SAKURACLOUD_PROPAGATION_TIMEOUT`: seconds (default 60)
// - `SAKURACLOUD_POLLING_INTERVAL`: seconds (default 2)
// - `SAKURACLOUD_HTTP_TIMEOUT`: seconds (default 10)
// - `SAKURACLOUD_ZONE`: API zone (default is1a)
// - `SAKURACLOUD_API_ROOT_URL`: API root URL
// - `DNS01_MODE`: `dry-run` to log writes instead of sending them
//
// ### Logging
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export SAKURACLOUD_ACCESS_TOKEN=...
// export SAKURACLOUD_ACCESS_TOKEN_SECRET=...
//
// dns01 present --domain example.com --key-auth "$KEY_AUTH"
// dns01 timeout
// dns01 cleanup --domain example.com --key-auth "$KEY_AUTH"
// ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dns01_core::{ChallengeProvider, ProviderConfig, ProviderRegistry, SakuraCloudConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum Dns01ExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Provider call failed
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Publish and remove DNS-01 challenge TXT records
#[derive(Parser, Debug)]
#[command(name = "dns01", version, about, long_about = None)]
struct Cli {
    /// Provider configuration file (JSON); defaults to SAKURACLOUD_* environment variables
    #[arg(short = 'c', long = "config", env = "DNS01_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", env = "DNS01_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the challenge TXT record
    Present(ChallengeArgs),
    /// Remove the challenge TXT record
    Cleanup(ChallengeArgs),
    /// Print the propagation timeout and polling interval in seconds
    Timeout,
}

#[derive(Args, Debug)]
struct ChallengeArgs {
    /// Domain being validated (e.g., example.com or *.example.com)
    #[arg(short = 'd', long = "domain")]
    domain: String,

    /// Key authorization of the challenge
    #[arg(short = 'k', long = "key-auth", env = "DNS01_KEY_AUTH")]
    key_auth: String,

    /// ACME challenge token
    #[arg(short = 't', long = "token", default_value = "")]
    token: String,
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => anyhow::bail!(
            "DNS01_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            other
        ),
    }
}

/// Load the provider configuration from a file or the environment
fn load_provider_config(path: Option<&PathBuf>) -> Result<ProviderConfig> {
    match path {
        Some(path) => ProviderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load provider config from {}", path.display())),
        None => {
            let config = SakuraCloudConfig::from_env()
                .map_err(|e| e.with_provider("sakuracloud"))?;
            Ok(ProviderConfig::SakuraCloud(config))
        }
    }
}

fn build_registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "sakuracloud")]
    dns01_provider_sakuracloud::register(&registry);

    registry
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr so `timeout` output stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let provider = match load_provider_config(cli.config.as_ref())
        .and_then(|config| build_registry().create_provider(&config).map_err(Into::into))
    {
        Ok(provider) => provider,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    info!("Using provider: {}", provider.provider_name());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(provider.as_ref(), cli.command));

    match result {
        Ok(()) => Dns01ExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            Dns01ExitCode::RuntimeError.into()
        }
    }
}

/// Run one operation against the provider
async fn run(provider: &dyn ChallengeProvider, command: Command) -> Result<()> {
    match command {
        Command::Present(args) => {
            provider
                .present(&args.domain, &args.token, &args.key_auth)
                .await?;
            info!("Presented challenge for {}", args.domain);
        }
        Command::Cleanup(args) => {
            provider
                .clean_up(&args.domain, &args.token, &args.key_auth)
                .await?;
            info!("Cleaned up challenge for {}", args.domain);
        }
        Command::Timeout => {
            let (timeout, interval) = provider.timeout();
            println!("{} {}", timeout.as_secs(), interval.as_secs());
        }
    }

    Ok(())
}
