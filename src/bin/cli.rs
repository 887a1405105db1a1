//! kvwire CLI Client
//!
//! Command-line interface for talking to a RESP server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kvwire::config::{DEFAULT_HOST, DEFAULT_PORT};
use kvwire::{Client, ClientError, Config};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// kvwire CLI
#[derive(Parser, Debug)]
#[command(name = "kvwire-cli")]
#[command(about = "CLI for RESP key-value servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Password to authenticate with after connecting
    #[arg(short = 'a', long)]
    password: Option<String>,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Check whether a key exists
    Exists { key: String },

    /// Set a key's time-to-live
    Expire {
        key: String,

        /// Whole seconds until expiry
        seconds: u64,
    },

    /// Show a key's remaining time-to-live
    Ttl { key: String },

    /// Remove every key
    Flushall,

    /// Store a JSON document
    SetJson {
        key: String,

        /// Document text, e.g. '{"a":1}'
        json: String,
    },

    /// Fetch a JSON document
    GetJson { key: String },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    let config = builder.build();

    tracing::debug!("kvwire-cli v{} -> {}", kvwire::VERSION, config.addr());

    let mut client = match Client::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, args.command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute one subcommand and render its result
fn run(client: &mut Client, command: Commands) -> kvwire::Result<String> {
    let output = match command {
        Commands::Ping => render_bool(client.ping()?),
        Commands::Get { key } => client.get(&key)?.unwrap_or_else(|| "(nil)".to_string()),
        Commands::Set { key, value } => render_bool(client.set(&key, &value)?),
        Commands::Del { key } => render_bool(client.del(&key)?),
        Commands::Exists { key } => render_bool(client.exists(&key)?),
        Commands::Expire { key, seconds } => {
            render_bool(client.expire(&key, Duration::from_secs(seconds))?)
        }
        Commands::Ttl { key } => client.ttl(&key)?.to_string(),
        Commands::Flushall => render_bool(client.flush_all()?),
        Commands::SetJson { key, json } => {
            let document: Value = serde_json::from_str(&json)
                .map_err(|e| ClientError::Config(format!("invalid JSON argument: {}", e)))?;
            render_bool(client.set_json(&key, &document)?)
        }
        Commands::GetJson { key } => match client.get_json::<Value>(&key)? {
            Some(document) => serde_json::to_string_pretty(&document)
                .map_err(ClientError::Serialization)?,
            None => "(nil)".to_string(),
        },
    };
    Ok(output)
}

fn render_bool(value: bool) -> String {
    let text = if value { "OK" } else { "(false)" };
    text.to_string()
}
