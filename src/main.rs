use clap::Parser;
use polquiz::cli::{Cli, Commands};
use polquiz::types::config::Config;
use polquiz::PolquizResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> PolquizResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = Config::load_or_default(&cli.config);

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("polquiz={}", log_level)
            .parse()
            .unwrap_or_else(|_| "polquiz=info".parse().expect("fallback directive is valid")),
    );

    // stdout is reserved for the MCP channel
    if config.general.log_format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            polquiz::cli::commands::init(path).await?;
        }
        Commands::Serve => {
            polquiz::cli::commands::serve(&config).await?;
        }
        Commands::Quizzes => {
            polquiz::cli::commands::quizzes()?;
        }
        Commands::Take { quiz, seed, svg } => {
            polquiz::cli::commands::take(&quiz, seed, svg.as_deref(), &config).await?;
        }
        Commands::Config => {
            polquiz::cli::commands::config_cmd(&cli.config).await?;
        }
        Commands::Version => {
            polquiz::cli::commands::version();
        }
    }

    Ok(())
}
