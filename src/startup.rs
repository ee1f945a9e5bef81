use crate::commands::{self, ConsoleCommand};
use crate::components::WeekCalendarHandle;
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use rust_i18n::t;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the calendar actor and drive it from standard input
pub async fn start_calendar(config: Config) -> miette::Result<()> {
    rust_i18n::set_locale(&config.locale);
    info!("Setting locale to {}", config.locale);

    let handle = WeekCalendarHandle::new(&config)?;

    // Create shutdown channel
    let (shutdown_send, mut shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_handle).await;
    });

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print(&mut stdout, &format!("{}\n", t!("console.welcome"))).await?;
    let first = handle.settled().await?;
    print(&mut stdout, &commands::calendar::render_grid(&first)).await?;

    loop {
        print(&mut stdout, &t!("console.prompt")).await?;

        let line = tokio::select! {
            line = lines.next_line() => line.map_err(Error::from)?,
            _ = &mut shutdown_recv => {
                info!("Shutdown signal received");
                return Ok(());
            }
        };

        // End of input
        let Some(line) = line else {
            break;
        };

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(message) => {
                print(&mut stdout, &format!("{}\n", message)).await?;
                continue;
            }
        };

        let outcome = tokio::select! {
            outcome = commands::execute(&handle, command) => outcome,
            _ = &mut shutdown_recv => {
                info!("Shutdown signal received");
                return Ok(());
            }
        };

        match outcome {
            Ok(Some(mut output)) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
                print(&mut stdout, &output).await?
            }
            Ok(None) => break,
            Err(e) => {
                error!("Command failed: {}", e);
                print(&mut stdout, &format!("{}\n", e)).await?;
            }
        }
    }

    print(&mut stdout, &format!("{}\n", t!("console.goodbye"))).await?;
    handle.shutdown().await?;

    Ok(())
}

async fn print(stdout: &mut tokio::io::Stdout, text: &str) -> Result<(), Error> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
