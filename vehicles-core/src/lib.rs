pub mod args;
pub mod assembler;
pub mod car;
pub mod catchers;
pub mod db;
pub mod discovery;
pub mod error;
pub mod models;
pub mod payload;
pub mod price;
pub mod pricing_client;
pub mod reqres;
pub mod utils;

pub const APP_NAME: &str = "vehicles";

// LMDB Keys
pub const CAR_DB_KEY:           &str = "car-";
pub const CAR_LIST_DB_KEY:      &str = "car-list";
pub const CAR_SEQUENCE_DB_KEY:  &str = "car-seq";
pub const PRICE_DB_KEY:         &str = "price-";
pub const PRICE_LIST_DB_KEY:    &str = "price-list";
// End LMDB Keys

/// Application name the vehicles API registers under
pub const VEHICLES_APP: &str = "vehicles-api";
/// Application name the pricing service registers under
pub const PRICING_APP: &str = "pricing-service";

/// Default vehicles API port
pub const DEFAULT_APP_PORT: u16 = 8080;
/// Default pricing service port
pub const DEFAULT_PRICING_PORT: u16 = 8082;
/// Default registry port
pub const DEFAULT_REGISTRY_PORT: u16 = 8761;
/// Timeout in seconds for every outbound http call
pub const HTTP_CLIENT_TIMEOUT: u64 = 5;
/// Shown in place of a price when the pricing service can't be reached
pub const CONSULT_PRICE: &str = "(consult price)";
