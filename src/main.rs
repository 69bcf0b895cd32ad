use agriserve_cache::cli::commands::SimulateOptions;
use agriserve_cache::cli::{log_directive, Cli, Commands};
use agriserve_cache::types::config::Config;
use agriserve_cache::CacheResult;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> CacheResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet); a file that exists must parse
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default_config()
    };

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(log_directive(&log_level)?);

    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            agriserve_cache::cli::commands::init(path).await?;
        }
        Commands::Config => {
            agriserve_cache::cli::commands::config_cmd(&cli.config).await?;
        }
        Commands::Doctor => {
            agriserve_cache::cli::commands::doctor(&cli.config).await?;
        }
        Commands::Simulate {
            input,
            intent,
            user,
            json,
        } => {
            let options = SimulateOptions {
                input,
                intent,
                user,
                json,
            };
            agriserve_cache::cli::commands::simulate(options, &config).await?;
        }
        Commands::Version => {
            agriserve_cache::cli::commands::version();
        }
    }

    Ok(())
}
