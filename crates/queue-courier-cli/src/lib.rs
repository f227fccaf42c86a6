//! # Queue Courier CLI
//!
//! Command-line interface for inspecting and exercising queues:
//! - Receiving messages and printing them as JSON
//! - Sending message batches
//!
//! Works against AWS SQS or the in-memory provider.

use clap::{Parser, Subcommand};
use queue_courier::{
    AwsSqsConfig, InMemoryConfig, ProviderConfig, ProviderType, QueueClient, QueueClientFactory,
    QueueError, QueueName, ReceiveOptions,
};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// ============================================================================
// CLI Structure
// ============================================================================

/// Queue Courier CLI - read from and write to managed message queues
#[derive(Parser)]
#[command(name = "queue-courier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read from and write to managed message queues")]
pub struct Cli {
    /// Queue provider to use (aws or memory)
    #[arg(short, long, default_value = "aws", env = "QUEUE_COURIER_PROVIDER")]
    pub provider: String,

    /// AWS region override
    #[arg(long, env = "QUEUE_COURIER_REGION")]
    pub region: Option<String>,

    /// Provider endpoint override (e.g. a local SQS emulator)
    #[arg(long, env = "QUEUE_COURIER_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Logging level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Receive messages from a queue and print them as JSON
    Receive {
        /// Queue to read from
        #[arg(short, long)]
        queue: String,

        /// Maximum number of messages to request
        #[arg(short, long, default_value = "10")]
        max_messages: u32,

        /// Long-poll wait bound in seconds
        #[arg(short, long, default_value = "10")]
        wait_time: u32,

        /// Decode message bodies as JSON
        #[arg(long)]
        json_body: bool,
    },

    /// Send messages to a queue
    Send {
        /// Queue to write to
        #[arg(short, long)]
        queue: String,

        /// Ordering group attached to every message
        #[arg(short, long)]
        group_id: Option<String>,

        /// Message bodies; each is parsed as JSON when possible, otherwise
        /// sent as raw text
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

impl Commands {
    fn queue(&self) -> &str {
        match self {
            Commands::Receive { queue, .. } => queue,
            Commands::Send { queue, .. } => queue,
        }
    }
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let client = create_client(&cli).await?;

    match cli.command {
        Commands::Receive {
            queue,
            max_messages,
            wait_time,
            json_body,
        } => execute_receive_command(&client, &queue, max_messages, wait_time, json_body).await,
        Commands::Send {
            queue,
            group_id,
            messages,
        } => execute_send_command(&client, &queue, group_id.as_deref(), &messages).await,
    }
}

/// Initialize logging based on CLI arguments
fn initialize_logging(cli: &Cli) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(&cli.log_level).map_err(|e| CliError::InvalidArgument {
        arg: "log-level".to_string(),
        message: e.to_string(),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

/// Build a queue client from the global provider flags
async fn create_client(cli: &Cli) -> Result<QueueClient, CliError> {
    let provider_type: ProviderType = cli.provider.parse()?;

    let config = match provider_type {
        ProviderType::AwsSqs => ProviderConfig::AwsSqs(AwsSqsConfig {
            region: cli.region.clone(),
            endpoint_url: cli.endpoint_url.clone(),
        }),
        // Register the target queue so lookups against the empty in-memory
        // provider succeed
        ProviderType::InMemory => ProviderConfig::InMemory(InMemoryConfig {
            queues: vec![cli.command.queue().to_string()],
            ..Default::default()
        }),
    };

    Ok(QueueClientFactory::create_client(config).await?)
}

fn parse_queue_name(queue: &str) -> Result<QueueName, CliError> {
    queue.parse().map_err(|e: queue_courier::ValidationError| {
        CliError::InvalidArgument {
            arg: "queue".to_string(),
            message: e.to_string(),
        }
    })
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Execute receive command
async fn execute_receive_command(
    client: &QueueClient,
    queue: &str,
    max_messages: u32,
    wait_time: u32,
    json_body: bool,
) -> Result<(), CliError> {
    let name = parse_queue_name(queue)?;

    let mut options = ReceiveOptions::new()
        .with_max_messages(max_messages)
        .with_wait_time_seconds(wait_time);
    if json_body {
        options = options.parse_json();
    }

    let messages = client.receive(&name, &options).await?;
    println!("{}", serde_json::to_string_pretty(&messages)?);

    Ok(())
}

/// Execute send command
async fn execute_send_command(
    client: &QueueClient,
    queue: &str,
    group_id: Option<&str>,
    messages: &[String],
) -> Result<(), CliError> {
    let name = parse_queue_name(queue)?;

    // A body that parses as a JSON object goes out structured; everything
    // else is sent as raw text
    let bodies: Vec<serde_json::Value> = messages
        .iter()
        .map(|text| match serde_json::from_str(text) {
            Ok(value @ serde_json::Value::Object(_)) => value,
            _ => serde_json::Value::String(text.clone()),
        })
        .collect();

    client.send(&name, &bodies, group_id).await?;
    println!("sent {} messages to {}", bodies.len(), name);

    Ok(())
}
