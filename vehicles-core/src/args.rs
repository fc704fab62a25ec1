//! core command line arguments
use clap::Parser;

/// cmd line args
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// set release environment
    #[arg(
        short,
        long,
        help = "Set release environment (dev, prod)",
        default_value = "dev"
    )]
    pub release_env: String,
    /// Vehicles API port
    #[arg(long, help = "Set vehicles api port", default_value = "8080")]
    pub port: u16,
    /// Pricing service port
    #[arg(long, help = "Set pricing service port", default_value = "8082")]
    pub pricing_port: u16,
    /// Registry port
    #[arg(long, help = "Set discovery registry port", default_value = "8761")]
    pub registry_port: u16,
    /// Registry base url
    #[arg(
        long,
        help = "Discovery registry base url.",
        default_value = "http://localhost:8761/eureka"
    )]
    pub registry_url: String,
    /// Register with the discovery registry
    #[arg(
        long,
        help = "Register this service with the discovery registry",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub registry_enabled: bool,
    /// Host name advertised to the registry
    #[arg(
        long,
        help = "Host name other services use to reach this instance",
        default_value = "localhost"
    )]
    pub instance_host: String,
    /// Fixed pricing endpoint
    #[arg(
        long,
        help = "Skip discovery and call the pricing service at this url",
        default_value = ""
    )]
    pub pricing_endpoint: String,
    /// Lease duration in seconds
    #[arg(
        long,
        help = "Seconds an instance stays registered without renewal",
        default_value = "90"
    )]
    pub lease_duration: u64,
    /// Renewal interval in seconds
    #[arg(
        long,
        help = "Seconds between lease renewals",
        default_value = "30"
    )]
    pub renewal_interval: u64,
    /// Eviction interval in seconds
    #[arg(
        long,
        help = "Seconds between registry eviction runs",
        default_value = "60"
    )]
    pub eviction_interval: u64,
}
