use dotenvy::dotenv;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use crmserver::main_module::run_axum_server;
use crmserver::{AppConfig, AppState};

const USAGE: &str = "\
Usage: crmserver [--config <file>] [--port <port>]

Options:
  --config <file>   TOML configuration (default: crmserver.toml if present)
  --port <port>     Override the listening port
  -h, --help        Show this help

Environment variables prefixed with CRM_ override file settings,
e.g. CRM_DATA__DATA_DIR=/srv/crm or CRM_SYNC__INTERVAL_SECS=0.";

struct CliArgs {
    config: Option<PathBuf>,
    port: Option<u16>,
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut cli = CliArgs {
        config: None,
        port: None,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                let value = iter.next().ok_or("--config needs a file path")?;
                cli.config = Some(PathBuf::from(value));
            }
            "--port" => {
                let value = iter.next().ok_or("--port needs a number")?;
                cli.port = Some(value.parse().map_err(|_| format!("invalid port: {value}"))?);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Some(cli))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("Run 'crmserver --help' for usage information");
            std::process::exit(2);
        }
    };

    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    info!(
        "Starting crmserver {} with data in {}",
        env!("CARGO_PKG_VERSION"),
        config.data.data_dir.display()
    );

    let app_state = Arc::new(AppState::new(config));

    #[cfg(feature = "sync")]
    let poller = match app_state.config.sync.interval_secs {
        0 => None,
        secs => Some(crmserver::tasks::spawn_sync_poller(
            app_state.clone(),
            std::time::Duration::from_secs(secs),
        )),
    };

    if let Err(e) = run_axum_server(app_state).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    #[cfg(feature = "sync")]
    {
        if let Some(handle) = poller {
            handle.abort();
        }
    }

    info!("crmserver stopped");
    Ok(())
}
