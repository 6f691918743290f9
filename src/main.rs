//! Frame Latency Analyzer - Main CLI Application

use clap::Parser;
use frame_latency_analyzer::{
    app::App,
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationLevel},
    error::{AppError, ErrorReporter, Result},
    output::OutputFormatterFactory,
    PKG_NAME, VERSION,
};
use std::process;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command line you ran.");
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        reporter.report_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    if cli.env_example {
        print!("{}", EnvManager::create_example_env_content());
        return Ok(());
    }
    if cli.env_help {
        print!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!(
            "Built {} from commit {}",
            option_env!("BUILD_TIME").unwrap_or("unknown"),
            option_env!("GIT_COMMIT").unwrap_or("unknown")
        );
        eprintln!("Debug mode enabled");
        eprintln!();
    }

    let config = load_config(cli)?;

    if config.debug {
        eprintln!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    let warnings = validate_config(&config)?;
    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    for warning in warnings
        .iter()
        .filter(|w| config.verbose || w.level != ValidationLevel::Info)
    {
        eprintln!("{}", formatter.format_warning(&warning.format(config.enable_color))?);
    }

    let report = App::new(config)?.run()?;

    if report.analyses.iter().all(|a| !a.has_files()) {
        eprintln!("{}", formatter.format_warning("No latency files were found in any dataset")?);
    }

    Ok(())
}
