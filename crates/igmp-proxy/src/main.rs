//! igmp-proxy - IGMP proxy configuration handler
//!
//! Runs once per configuration commit: reads `protocols igmp-proxy`,
//! validates it, writes igmpproxy.conf and restarts or stops the daemon.
//! Exits 1 with the message on stdout when the configuration is invalid.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use confmode_common::{
    run_handler, CfgMgrError, CliShellStore, ConfigStore, ConfigTree, ServiceControl,
    SystemdServiceControl,
};
use igmp_proxy::{
    constants::DISABLED_WARNING, extract, render, verify, IgmpProxyMgr, ProxyState, CONFIG_FILE,
    SERVICE_NAME,
};

/// IGMP proxy configuration handler
#[derive(Parser, Debug)]
#[command(name = "igmp-proxy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read the configuration tree from this file instead of the live session
    #[arg(short = 'c', long)]
    config_file: Option<PathBuf>,

    /// Generated daemon configuration file
    #[arg(short = 'o', long, default_value = CONFIG_FILE)]
    output: PathBuf,

    /// systemd unit to stop or restart
    #[arg(short = 's', long, default_value = SERVICE_NAME)]
    service: String,

    /// Run systemctl without sudo
    #[arg(long)]
    no_sudo: bool,

    /// Validate and print the generated file; touch neither file nor service
    #[arg(long, conflicts_with = "dump_json")]
    dry_run: bool,

    /// Print the extracted configuration as JSON and exit
    #[arg(long)]
    dump_json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing; `RUST_LOG` overrides `--log-level`.
///
/// Logs go to stderr, stdout is reserved for operator messages.
fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut store: Box<dyn ConfigStore> = match &args.config_file {
        Some(path) => Box::new(
            ConfigTree::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
        ),
        None => Box::new(CliShellStore::new()),
    };

    if args.dump_json {
        let state = extract(store.as_mut()).await?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    if args.dry_run {
        let state = extract(store.as_mut()).await?;
        verify(&state)?;
        match &state {
            ProxyState::Absent => println!("IGMP proxy is not configured"),
            ProxyState::Present(config) if config.disabled => println!("{}", DISABLED_WARNING),
            ProxyState::Present(config) => print!("{}", render(config)),
        }
        return Ok(());
    }

    let service: Arc<dyn ServiceControl> = Arc::new(SystemdServiceControl::new(!args.no_sudo));
    let mgr = IgmpProxyMgr::new(service)
        .with_config_path(&args.output)
        .with_service_name(&args.service);

    let state = run_handler(&mgr, store.as_mut()).await?;
    debug!(active = state.is_active(), "igmp-proxy done");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<CfgMgrError>() {
            Some(err) if err.is_config_error() => {
                println!("{}", err);
                ExitCode::from(1)
            }
            _ => {
                error!("igmp-proxy failed: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
