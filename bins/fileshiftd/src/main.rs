//! fileshiftd: HTTP service for image type detection and conversion.

use clap::Parser;
use fileshift_server::ServerConfig;
use fileshift_telemetry::TelemetryConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fileshiftd")]
#[command(about = "Serve /health, /version and /transform over HTTP")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "FILESHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, env = "FILESHIFT_BIND")]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "FILESHIFT_PORT")]
    port: Option<u16>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "FILESHIFT_LOG", default_value = "info")]
    log_level: String,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    fileshift_telemetry::init_with_config(
        TelemetryConfig::default()
            .with_level(cli.log_level)
            .with_json(cli.json_logs),
    )?;

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate()?;

    fileshift_server::serve(config).await
}
