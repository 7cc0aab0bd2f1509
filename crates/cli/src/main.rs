use clap::Parser;
use ferrous_stub_domain::CliOverrides;
use ferrous_stub_infrastructure::dns::{StubResolver, UdpTransport};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

mod bootstrap;
mod output;

#[derive(Parser)]
#[command(name = "ferrous-stub")]
#[command(version)]
#[command(about = "Ferrous Stub - minimal DNS stub resolver")]
struct Cli {
    /// Hostname to look up
    hostname: String,

    /// Server to query, IP or IP:PORT; repeat to add fallbacks
    #[arg(short = 's', long = "server", value_name = "ADDR")]
    servers: Vec<String>,

    /// Record type (A, NS, CNAME, SOA, PTR, MX, TXT, AAAA or TYPEnn)
    #[arg(short = 't', long = "type", value_name = "TYPE", conflicts_with = "mxlookup")]
    record_type: Option<String>,

    /// MX lookup
    #[arg(short = 'm', long)]
    mxlookup: bool,

    /// Time to wait for each attempt, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Re-sends after a timeout, shared across all servers
    #[arg(long)]
    retries: Option<u32>,

    /// Send an iterative query (RD flag clear)
    #[arg(long)]
    no_recurse: bool,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let record_type = if self.mxlookup {
            Some("MX".to_string())
        } else {
            self.record_type.clone()
        };

        CliOverrides {
            servers: self.servers.clone(),
            timeout_ms: self.timeout,
            max_retries: self.retries,
            recursion_desired: self.no_recurse.then_some(false),
            record_type,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);

    let record_type = config.resolver.query_type()?;
    let resolver = StubResolver::new(&config.resolver, Arc::new(UdpTransport::new()))?;

    debug!(
        hostname = %cli.hostname,
        record_type = %record_type,
        servers = ?resolver.servers(),
        timeout_ms = config.resolver.timeout_ms,
        max_retries = config.resolver.max_retries,
        "Resolving"
    );

    let started = Instant::now();
    let message = resolver
        .resolve(&cli.hostname, record_type)
        .await
        .inspect_err(|e| error!(hostname = %cli.hostname, error = %e, "Lookup failed"))?;

    print!("{}", output::render(&message, started.elapsed()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mxlookup_sets_record_type() {
        let cli = Cli::parse_from(["ferrous-stub", "-m", "sandiego.edu"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.record_type.as_deref(), Some("MX"));
        assert_eq!(overrides.recursion_desired, None);
    }

    #[test]
    fn test_repeated_servers_keep_order() {
        let cli = Cli::parse_from([
            "ferrous-stub",
            "-s",
            "172.16.7.15",
            "--server",
            "8.8.8.8:53",
            "--no-recurse",
            "--retries",
            "0",
            "www.sandiego.edu",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.servers, vec!["172.16.7.15", "8.8.8.8:53"]);
        assert_eq!(overrides.recursion_desired, Some(false));
        assert_eq!(overrides.max_retries, Some(0));
    }

    #[test]
    fn test_type_conflicts_with_mxlookup() {
        let result = Cli::try_parse_from(["ferrous-stub", "-m", "-t", "AAAA", "example.com"]);
        assert!(result.is_err());
    }
}
