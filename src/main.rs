//! Audiosync - command-line front end
//!
//! Aligns two audio files once, prints file information, or runs the HTTP
//! service.

use anyhow::Result;
use audiosync::audio::correlate::CorrelationMethod;
use audiosync::server::{AppState, ServerConfig};
use audiosync::{SyncConfig, SyncOutcome, SyncProcessor};
use std::path::PathBuf;
use tracing::error;

/// What the command line asked for
#[derive(Debug, PartialEq)]
enum Action {
    Help,
    Version,
    Run(Options),
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    serve: bool,
    port: Option<u16>,
    bind: Option<String>,
    config: Option<PathBuf>,
    method: Option<CorrelationMethod>,
    info: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("audiosync=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Action::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Action::Version) => {
            println!("audiosync {} ({})", audiosync::VERSION, audiosync::BUILD_DATE);
            return Ok(());
        }
        Ok(Action::Run(options)) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    };

    let mut config = match &options.config {
        Some(path) => SyncConfig::load(path),
        None => SyncConfig::default(),
    };
    if let Some(method) = options.method {
        config.correlation = method;
    }
    let processor = SyncProcessor::new(config);

    if options.serve {
        return run_server(processor, &options);
    }
    if let Some(path) = &options.info {
        return print_file_info(&processor, path);
    }
    match options.files.as_slice() {
        [reference, target] => sync_files(&processor, reference, target),
        _ => {
            eprintln!("Error: expected REFERENCE and TARGET files");
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        let value = |name: &str| {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", name))
        };

        match args[i].as_str() {
            "--help" | "-h" => return Ok(Action::Help),
            "--version" | "-v" => return Ok(Action::Version),
            "--serve" | "-s" => options.serve = true,
            "--port" | "-p" => {
                let raw = value("--port")?;
                options.port = Some(
                    raw.parse()
                        .map_err(|_| format!("Invalid port: {}", raw))?,
                );
                i += 1;
            }
            "--bind" | "-b" => {
                options.bind = Some(value("--bind")?);
                i += 1;
            }
            "--config" | "-c" => {
                options.config = Some(PathBuf::from(value("--config")?));
                i += 1;
            }
            "--method" | "-m" => {
                options.method = Some(value("--method")?.parse()?);
                i += 1;
            }
            "--info" | "-i" => {
                options.info = Some(PathBuf::from(value("--info")?));
                i += 1;
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("Unknown argument: {}", arg));
            }
            path => {
                if options.files.len() == 2 {
                    return Err(format!("Unexpected argument: {}", path));
                }
                options.files.push(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(Action::Run(options))
}

fn print_help() {
    println!("Usage: audiosync [OPTIONS] <REFERENCE> <TARGET>");
    println!("       audiosync --serve [--port PORT] [--bind ADDR]");
    println!("       audiosync --info <FILE>");
    println!();
    println!("Options:");
    println!("  -s, --serve             Run the HTTP service (env: HOST, PORT, APIKEY)");
    println!("  -p, --port PORT         Port for --serve (default: 5009)");
    println!("  -b, --bind ADDR         Bind address for --serve (default: 0.0.0.0)");
    println!("  -c, --config PATH       Load alignment settings from a JSON file");
    println!("  -m, --method METHOD     Correlation method: auto, direct or fft");
    println!("  -i, --info FILE         Print duration and sample rate of FILE");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("The offset is printed in seconds; a positive value means the target");
    println!("starts that far into the reference.");
}

fn sync_files(
    processor: &SyncProcessor,
    reference: &std::path::Path,
    target: &std::path::Path,
) -> Result<()> {
    let output = match processor.sync_files(reference, target) {
        Ok(SyncOutcome::Success { offset_seconds }) => {
            println!("{}", serde_json::json!({ "offset": offset_seconds }));
            return Ok(());
        }
        Ok(SyncOutcome::Failure { message }) => {
            serde_json::json!({ "success": false, "error": message })
        }
        Err(e) => {
            error!("Failed to sync: {}", e);
            serde_json::json!({ "error": e.to_string() })
        }
    };
    println!("{}", output);
    std::process::exit(1);
}

fn print_file_info(processor: &SyncProcessor, path: &std::path::Path) -> Result<()> {
    match processor.file_info(path) {
        Ok(info) => {
            println!("{}", serde_json::to_string_pretty(&info)?);
            if info.exists {
                return Ok(());
            }
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
        }
    }
    std::process::exit(1);
}

fn run_server(processor: SyncProcessor, options: &Options) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = options.port {
        config.port = port;
    }
    if let Some(bind) = &options.bind {
        config.bind_addr = bind.clone();
    }
    if config.api_key.is_none() {
        tracing::warn!("APIKEY not set, /sync is unauthenticated");
    }

    let state = AppState::new(processor, config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(audiosync::server::start_server(state))
}
