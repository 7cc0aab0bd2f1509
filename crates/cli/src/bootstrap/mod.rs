use ferrous_stub_domain::{CliOverrides, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Loads the configuration file (if any), applies command-line overrides and
/// validates the result.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// only carries the rendered response.
pub fn init_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = Config::get_config_path() {
        info!(path = %path, "Configuration file found");
    }
}
