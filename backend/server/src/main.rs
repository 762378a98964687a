use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    match site::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
