// Configuration - command line flags with environment fallbacks
//
// Both binaries flatten these argument groups into their own clap parsers.

use crate::pages::PageDefaults;
use crate::record::Metric;
use crate::store::LoadOptions;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/ssbg_data_cleaned.csv";
pub const DEFAULT_PORT: u16 = 8050;

/// Where the dataset lives and how strictly it is checked
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Cleaned SSBG CSV file
    #[arg(long = "data", env = "SSBG_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Refuse to load a dataset whose total columns disagree with their components
    #[arg(long, env = "SSBG_STRICT")]
    pub strict: bool,
}

impl DataArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            strict_invariants: self.strict,
        }
    }
}

/// HTTP server settings and page defaults
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "SSBG_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "SSBG_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Map metric shown before the user picks one (expenditures | recipients)
    #[arg(long, default_value_t = Metric::Recipients)]
    pub default_metric: Metric,

    /// State opened by /state
    #[arg(long, default_value = "Alabama")]
    pub default_state: String,

    /// Directory served under /static
    #[arg(long, default_value = "web")]
    pub static_dir: PathBuf,
}

/// Settings the router needs at request time
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub defaults: PageDefaults,
    pub static_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            defaults: PageDefaults::default(),
            static_dir: PathBuf::from("web"),
        }
    }
}

impl ServeArgs {
    /// `host:port`; anything that is not an IP address is rejected here
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            defaults: PageDefaults {
                metric: self.default_metric,
                state: self.default_state.clone(),
            },
            static_dir: self.static_dir.clone(),
        }
    }
}

/// `RUST_LOG` filter, `info` when unset
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
