use tracing::info;
use weekgrid::startup;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting weekgrid");

    // Load configuration
    let config = startup::load_config()?;

    // Run the console until quit or a termination signal
    startup::start_calendar(config).await
}
