use std::{fs, net::SocketAddr, path::PathBuf};

use clap::Parser;
use rs_baccarat::config::SimulationConfig;
use rs_baccarat_server::baccarat_server::app;
use tokio::signal;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3001")]
    addr: SocketAddr,

    /// JSON file with simulation settings. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abandon a simulation after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Worker threads for batches. 1 runs batches one after another.
    #[arg(long)]
    threads: Option<usize>,
}

fn load_config(args: &Args) -> Result<SimulationConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Unable to read {}: {}", path.display(), e))?;
            SimulationConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => SimulationConfig::default(),
    };
    if args.timeout_ms.is_some() {
        config.timeout_ms = args.timeout_ms;
    }
    if let Some(threads) = args.threads {
        config.parallel = threads > 1;
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| e.to_string())?;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

#[tokio::main]
pub async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            event!(Level::ERROR, error = %e, "Invalid configuration");
            return;
        }
    };
    event!(
        Level::INFO,
        simulations_per_round = config.simulations_per_round,
        rounds = config.rounds,
        parallel = config.parallel,
        "Loaded configuration"
    );

    let listener = match tokio::net::TcpListener::bind(args.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            event!(Level::ERROR, addr = %args.addr, error = %e, "Unable to bind");
            return;
        }
    };
    event!(Level::INFO, "Listening on http://{}", args.addr);

    let server = axum::serve(listener, app(config));

    // Handle graceful shutdown on Ctrl+C
    tokio::select! {
        result = server => {
            if let Err(err) = result {
                event!(Level::ERROR, error = %err, "Server error");
            }
        }
        _ = signal::ctrl_c() => {
            event!(Level::INFO, "Received Ctrl+C, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["run-server"]);
        assert_eq!("127.0.0.1:3001", args.addr.to_string());
        let config = load_config(&args).unwrap();
        assert_eq!(SimulationConfig::default(), config);
    }

    #[test]
    fn timeout_overrides_config() {
        let args = Args::parse_from(["run-server", "--timeout-ms", "250"]);
        let config = load_config(&args).unwrap();
        assert_eq!(Some(250), config.timeout_ms);
    }
}
