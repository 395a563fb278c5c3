use clap::Parser;
use platform_ui_devtools::cli::{TokensCli, TokensCommand};
use platform_ui_devtools::config::Config;
use platform_ui_devtools::tokens::orchestrator::{self, VerifyOptions};
use platform_ui_devtools::{EXIT_FAILURE, EXIT_SUCCESS, logging};
use tracing::{error, info};

fn main() {
    let cli = TokensCli::parse();
    let verbose = match &cli.command {
        TokensCommand::Verify(args) => args.verbose,
        TokensCommand::Fix(args) => args.verbose,
        TokensCommand::Init(_) => false,
    };
    logging::init(logging::resolve_level(&cli.global.log_level, verbose));

    match run(&cli) {
        Ok(true) => std::process::exit(EXIT_SUCCESS),
        Ok(false) => std::process::exit(EXIT_FAILURE),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Run one subcommand; `Ok(false)` means violations were found
fn run(cli: &TokensCli) -> anyhow::Result<bool> {
    if let TokensCommand::Init(args) = &cli.command {
        Config::init(&cli.global.config, args.r#override)?;
        info!("Config file initialized at {}", cli.global.config);
        return Ok(true);
    }

    let config = Config::load(&cli.global.config, &cli.global.config_overrides)?;
    let base = std::env::current_dir()?;

    match &cli.command {
        TokensCommand::Init(_) => Ok(true),
        TokensCommand::Verify(args) => orchestrator::verify(
            &config.tokens,
            &base,
            &VerifyOptions {
                format: args.format,
                output: args.output.as_deref(),
                dry_run: args.dry_run,
            },
        ),
        TokensCommand::Fix(args) => orchestrator::fix(&config.tokens, &base, args.dry_run, args.verbose),
    }
}
