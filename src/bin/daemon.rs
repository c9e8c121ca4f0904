//! idspoll Daemon Binary
//!
//! Polls an instrument in the background and logs every refresh until the
//! process exits or `quit` is read. Control lines are read from stdin:
//!
//! ```text
//! suspend | resume | period <seconds> | get <PARAM> | set <PARAM> <value> | params | quit
//! ```

use std::io::BufRead;
use std::time::Duration;

use clap::Parser;
use idspoll::poller::Param;
use idspoll::transport::TcpTransport;
use idspoll::{Config, ControlSurface, Poller};
use tracing_subscriber::{fmt, EnvFilter};

/// idspoll Daemon
#[derive(Parser, Debug)]
#[command(name = "idspoll-daemon")]
#[command(about = "Poll a displacement interferometer and publish its readings")]
#[command(version)]
struct Args {
    /// Instrument address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:9090")]
    endpoint: String,

    /// Delay between poll cycles in seconds
    #[arg(short, long, default_value = "0.1")]
    poll_period: f64,

    /// Exchange timeout in seconds
    #[arg(short, long, default_value = "1.0")]
    timeout: f64,

    /// Request/reply buffer size in bytes
    #[arg(short, long, default_value = "512")]
    buffer_size: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,idspoll=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("idspoll daemon v{}", idspoll::VERSION);
    tracing::info!("Instrument: {}", args.endpoint);

    let timeout = match Duration::try_from_secs_f64(args.timeout) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Invalid timeout {}: {}", args.timeout, e);
            std::process::exit(2);
        }
    };

    // Build config from args
    let config = Config::builder()
        .endpoint(&args.endpoint)
        .io_timeout(timeout)
        .poll_period(args.poll_period)
        .buffer_size(args.buffer_size)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(2);
    }

    // Connect once; there is no reconnect
    let transport = match TcpTransport::connect(&config.endpoint, config.io_timeout) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.endpoint, e);
            std::process::exit(1);
        }
    };

    let poller = match Poller::new(transport, &config) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to create poller: {}", e);
            std::process::exit(1);
        }
    };

    poller.controls().set_refresh_callback(|snapshot| {
        tracing::info!(
            cycle = snapshot.cycle,
            displacement = ?snapshot.displacement,
            absolute = ?snapshot.absolute_position,
            reference = ?snapshot.reference_position,
            enabled = snapshot.measurement_enabled,
            "refresh"
        );
    });

    let handle = match poller.spawn() {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to start poller: {}", e);
            std::process::exit(1);
        }
    };

    let controls = handle.controls();
    let stdin = std::io::stdin();
    let mut quit = false;
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!("stdin: {}", e);
                break;
            }
        };
        if !handle_command(&controls, line.trim()) {
            quit = true;
            break;
        }
    }

    // Only `quit` stops polling; without a control stream the loop runs
    // until the process is killed
    let stopped = if quit {
        handle.shutdown()
    } else {
        tracing::info!("stdin closed, control lines disabled");
        handle.join()
    };

    if let Err(e) = stopped {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Daemon stopped");
}

/// Apply one control line. Returns false on `quit`.
fn handle_command(controls: &ControlSurface, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let result = match (words.next(), words.next(), words.next()) {
        (None, _, _) => Ok(()),
        (Some("quit") | Some("exit"), _, _) => return false,
        (Some("suspend"), None, _) => {
            controls.request_suspend();
            Ok(())
        }
        (Some("resume"), None, _) => {
            controls.resume();
            Ok(())
        }
        (Some("period"), Some(value), None) => match value.parse::<f64>() {
            Ok(seconds) => {
                controls.set_poll_period(seconds);
                Ok(())
            }
            Err(e) => Err(format!("bad period '{}': {}", value, e)),
        },
        (Some("get"), Some(name), None) => controls
            .read_param(name)
            .map(|value| println!("{} = {}", name, value))
            .map_err(|e| e.to_string()),
        (Some("set"), Some(name), Some(value)) => match value.parse::<f64>() {
            Ok(v) => controls.write_param(name, v).map_err(|e| e.to_string()),
            Err(e) => Err(format!("bad value '{}': {}", value, e)),
        },
        (Some("params"), None, _) => {
            for param in Param::all() {
                match controls.read_param(&param.name()) {
                    Ok(value) => println!("{} = {}", param, value),
                    Err(e) => println!("{} = <{}>", param, e),
                }
            }
            Ok(())
        }
        (Some(other), _, _) => Err(format!("unknown command '{}'", other)),
    };

    if let Err(message) = result {
        tracing::warn!("{}", message);
    }
    true
}
