use crate::{
    args,
    db,
};
use clap::Parser;
use log::info;

#[derive(Debug, PartialEq)]
pub enum ReleaseEnvironment {
    Development,
    Production,
}

impl ReleaseEnvironment {
    pub fn value(&self) -> String {
        match *self {
            ReleaseEnvironment::Development => String::from("development"),
            ReleaseEnvironment::Production => String::from("production"),
        }
    }
}

/// Parsed command line. Falls back to the defaults when the process
///
/// arguments aren't ours, e.g. under the test harness.
pub fn args() -> args::Args {
    args::Args::try_parse().unwrap_or_else(|_| args::Args::parse_from([crate::APP_NAME]))
}

/// Strict parse for binaries, exits on `--help` or unknown flags
pub fn parse_args() -> args::Args {
    args::Args::parse()
}

/// Helper for separation of dev and prod concerns
pub fn get_release_env() -> ReleaseEnvironment {
    if args().release_env == "prod" {
        ReleaseEnvironment::Production
    } else {
        ReleaseEnvironment::Development
    }
}

/// Rocket config for the running release environment
pub fn rocket_config(port: u16) -> rocket::Config {
    let base = if get_release_env() == ReleaseEnvironment::Production {
        rocket::Config::release_default()
    } else {
        rocket::Config::debug_default()
    };
    rocket::Config { port, ..base }
}

/// vehicles api port
pub fn get_app_port() -> u16 {
    args().port
}

/// pricing service port
pub fn get_app_pricing_port() -> u16 {
    args().pricing_port
}

/// discovery registry port
pub fn get_app_registry_port() -> u16 {
    args().registry_port
}

/// discovery registry url without a trailing slash
pub fn get_registry_url() -> String {
    String::from(args().registry_url.trim_end_matches('/'))
}

pub fn is_registry_enabled() -> bool {
    args().registry_enabled
}

pub fn get_instance_host() -> String {
    args().instance_host
}

/// Fixed pricing endpoint, `None` means resolve through discovery
pub fn get_pricing_endpoint() -> Option<String> {
    let endpoint = args().pricing_endpoint;
    if endpoint.is_empty() {
        None
    } else {
        Some(String::from(endpoint.trim_end_matches('/')))
    }
}

/// lease duration in millis
pub fn get_lease_duration_ms() -> i64 {
    lease_millis(args().lease_duration)
}

fn lease_millis(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}

pub fn get_renewal_interval() -> std::time::Duration {
    std::time::Duration::from_secs(args().renewal_interval.max(1))
}

pub fn get_eviction_interval() -> std::time::Duration {
    std::time::Duration::from_secs(args().eviction_interval.max(1))
}

/// Current time as unix millis
pub fn now_millis() -> i64 {
    chrono::offset::Utc::now().timestamp_millis()
}

// DoS prevention
pub const fn string_limit() -> usize {
    512
}

/// Shared http client for calls between services
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(crate::HTTP_CLIENT_TIMEOUT))
        .build()
}

/// Put all app pre-checks here
pub fn start_up() {
    info!(
        "{} is starting up in {} mode",
        crate::APP_NAME,
        get_release_env().value()
    );
    // open the store before the first request does
    lazy_static::initialize(&db::DATABASE_LOCK);
}

// Tests
//-------------------------------------------------------------------------------
