//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_with_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from defaults, `lookup` and the CLI, then validate
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if !cli.datasets.is_empty() {
            config.datasets = cli.datasets.clone();
        }
        if let Some(ref output) = cli.output {
            config.output_path = output.clone();
        }
        if let Some(bins) = cli.bins {
            config.bins = bins;
        }
        if let Some(factor) = cli.iqr_factor {
            config.iqr_factor = factor;
        }
        if let Some(width) = cli.width {
            config.width = width;
        }
        if let Some(height) = cli.height {
            config.height = height;
        }
        if let Some(format) = cli.format {
            config.output_format = format;
        }
        if let Some(log_format) = cli.log_format {
            config.log_format = log_format;
        }
        if let Some(enable_color) = cli.color_override() {
            config.enable_color = enable_color;
        }

        // CLI-only switches
        config.plot = !cli.no_plot;
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: datasets={}, bins={}, iqr_factor={}, enable_color={}",
                config.datasets.len(), config.bins, config.iqr_factor, config.enable_color
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    for dataset in &config.datasets {
        summary.push(format!("Dataset: {}", dataset));
    }
    summary.push(format!("Output: {}", config.output_path.display()));
    summary.push(format!("Bins: {}", config.bins));
    summary.push(format!("IQR Factor: {}", config.iqr_factor));
    summary.push(format!("Canvas: {}x{}", config.width, config.height));
    let (rows, cols) = config.grid_shape();
    summary.push(format!("Grid: {}x{}", rows, cols));
    summary.push(format!("Plot: {}", config.plot));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Log Format: {:?}", config.log_format));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
