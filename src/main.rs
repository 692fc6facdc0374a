use anyhow::Context;
use clap::Parser;
use small_library::domain::ports::Clock;
use small_library::utils::{logger, validation::Validate};
use small_library::{AppConfig, CliArgs, FixedClock, Registry, Shell, SystemClock};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = AppConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    logger::init_cli_logger(args.verbose, &config.logging)
        .context("Failed to initialise logging")?;

    tracing::info!("Starting small-library v{}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let clock: Box<dyn Clock> = match args.today {
        Some(date) => {
            tracing::info!("Using fixed date {}", date);
            Box::new(FixedClock(date))
        }
        None => Box::new(SystemClock),
    };

    let storage = config.local_storage();
    tracing::info!("Data directory: {}", storage.base_path().display());
    let mut registry = Registry::open(storage, config.lending_policy());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Shell::new(&mut registry, clock, stdin.lock(), stdout.lock())
        .run()
        .context("Terminal I/O failed")?;

    Ok(())
}
