use std::io::Write;
use std::process;

use clap::Parser;
use tracing::{error, info};

use uptime_monitor::cli::Args;
use uptime_monitor::logging::init_logging;
use uptime_monitor::notification::Dispatcher;
use uptime_monitor::{HealthMonitor, HttpProber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.verbose, args.quiet)?;

    let config = match args.monitor_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let dispatcher = Dispatcher::from_configs(args.channel_config().channel_configs());

    if args.test_notify {
        let results = dispatcher.test_all().await;
        let mut failed = false;
        let mut stdout = std::io::stdout().lock();
        for (channel, result) in results {
            match result {
                Ok(()) => writeln!(stdout, "{channel}: ok")?,
                Err(e) => {
                    failed = true;
                    writeln!(stdout, "{channel}: {e}")?;
                }
            }
        }
        stdout.flush()?;
        if failed {
            process::exit(1);
        }
        return Ok(());
    }

    let monitor = HealthMonitor::new(config, HttpProber::new(), dispatcher);

    tokio::select! {
        _ = monitor.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
