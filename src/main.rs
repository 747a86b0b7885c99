//! sqlformula - a terminal SQL editor with schema-aware autocompletion.

use sqlformula::binding::BindingConfig;
use sqlformula::cli::Cli;
use sqlformula::config::Config;
use sqlformula::error::Result;
use sqlformula::{logging, tui};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else if !cli.print_schema {
        logging::init_file_logging();
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_overrides(&cli.overrides());

    let registry = config.registry()?;
    if cli.print_schema {
        print!("{}", registry.format_for_display());
        return Ok(0);
    }

    let binding = BindingConfig::new(config.editor, registry);
    let value = cli.initial_value()?;

    if cli.is_headless() {
        return tui::headless::run_headless(cli, binding, value);
    }

    let text = tui::run(binding, value)?;
    println!("{text}");
    Ok(0)
}
