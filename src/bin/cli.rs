//! idspoll CLI
//!
//! One-shot queries against an instrument.

use std::time::Duration;

use clap::{Parser, Subcommand};
use idspoll::protocol::method;
use idspoll::transport::TcpTransport;
use idspoll::{IdsError, RpcClient};

/// idspoll CLI
#[derive(Parser, Debug)]
#[command(name = "idspoll-cli")]
#[command(about = "One-shot queries against a displacement interferometer")]
struct Args {
    /// Instrument address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:9090")]
    endpoint: String,

    /// Exchange timeout in seconds
    #[arg(short, long, default_value = "1.0")]
    timeout: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Displacement of all axes
    Displacements,

    /// Absolute positions of all axes
    Positions,

    /// Reference positions of all axes
    References,

    /// Whether a measurement is running
    Enabled,

    /// Displacement of one axis
    Axis {
        /// Axis index (0-2)
        axis: usize,
    },

    /// Call any method and print the raw reply
    Raw {
        /// Method name; short names are prefixed with the displacement namespace
        method: String,

        /// JSON params, e.g. '[0]'
        params: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> idspoll::Result<()> {
    let timeout = Duration::try_from_secs_f64(args.timeout)
        .map_err(|e| IdsError::Config(format!("timeout: {}", e)))?;

    let transport = TcpTransport::connect(&args.endpoint, timeout)?;
    let config = idspoll::Config::builder()
        .endpoint(&args.endpoint)
        .io_timeout(timeout)
        .build();
    let mut client = RpcClient::new(transport, &config);

    let unavailable = || IdsError::Transport("no value returned".to_string());

    match args.command {
        Commands::Displacements => {
            let values = client.axes_displacement().ok_or_else(unavailable)?;
            println!("{} {} {}", values[0], values[1], values[2]);
        }
        Commands::Positions => {
            let values = client.absolute_positions().ok_or_else(unavailable)?;
            println!("{} {} {}", values[0], values[1], values[2]);
        }
        Commands::References => {
            let values = client.reference_positions().ok_or_else(unavailable)?;
            println!("{} {} {}", values[0], values[1], values[2]);
        }
        Commands::Enabled => {
            let enabled = client.measurement_enabled().ok_or_else(unavailable)?;
            println!("{}", enabled);
        }
        Commands::Axis { axis } => {
            let value = client.axis_displacement(axis).ok_or_else(unavailable)?;
            println!("{}", value);
        }
        Commands::Raw { method: name, params } => {
            let params = params
                .map(|p| serde_json::from_str::<serde_json::Value>(&p))
                .transpose()
                .map_err(|e| IdsError::Config(format!("params: {}", e)))?;
            let reply = client.call(&method::qualify(&name), params.as_ref())?;
            match (reply.result, reply.error) {
                (Some(result), _) => println!("{}", result),
                (None, Some(error)) => println!("error: {}", error),
                (None, None) => println!("(empty reply)"),
            }
        }
    }

    Ok(())
}
