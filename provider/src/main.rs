use hemmer_provider_sdk::{init_logging, serve};
use terraform_provider_todo::{TodoProvider, VERSION};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    tracing::info!(version = VERSION, "Starting todo provider");
    serve(TodoProvider::new(VERSION)).await
}
