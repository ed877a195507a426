use std::net::SocketAddr;
use std::process::ExitCode;

use billsim::api::cli::{Cli, Command, run_reference, run_simulate};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = match Cli::parse().command {
        Command::Serve(args) => {
            let addr = SocketAddr::new(args.host, args.port);
            if let Err(e) = billsim::api::run_http_server(addr).await {
                tracing::error!(%addr, error = %e, "server error");
                return ExitCode::FAILURE;
            }
            return ExitCode::SUCCESS;
        }
        Command::Simulate(args) => run_simulate(&args),
        Command::Reference(args) => run_reference(&args),
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
