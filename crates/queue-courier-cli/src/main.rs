use queue_courier_cli::run_cli;
use tracing::error;

#[tokio::main]
async fn main() {
    // Run CLI and handle errors
    if let Err(e) = run_cli().await {
        error!("CLI error: {}", e);

        // Exit with appropriate code based on error type
        let exit_code = match e {
            queue_courier_cli::CliError::InvalidArgument { .. } => 1,
            queue_courier_cli::CliError::Queue(_) => 2,
            queue_courier_cli::CliError::Output(_) => 3,
        };

        std::process::exit(exit_code);
    }
}
