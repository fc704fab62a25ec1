// Price repo/service layer
use crate::{
    db,
    error::VehiclesError,
    models::Price,
};
use lazy_static::lazy_static;
use log::{
    debug,
    error,
    info,
};
use std::sync::Mutex;

/// Currency every seeded price is quoted in
pub const DEFAULT_CURRENCY: &str = "USD";

/// Prices loaded on pricing service start up, keyed by vehicle id
pub const SEED_PRICES: [(u64, f64); 19] = [
    (1, 14001.0),
    (2, 21750.5),
    (3, 9450.0),
    (4, 17899.99),
    (5, 12300.0),
    (6, 24995.0),
    (7, 8200.75),
    (8, 15640.0),
    (9, 19999.0),
    (10, 11275.25),
    (11, 22480.0),
    (12, 13860.4),
    (13, 7995.0),
    (14, 18320.0),
    (15, 16015.6),
    (16, 10540.0),
    (17, 23150.0),
    (18, 14730.8),
    (19, 20400.0),
];

lazy_static! {
    static ref SEED_LOCK: Mutex<()> = Mutex::new(());
}

fn price_key(vehicle_id: u64) -> String {
    format!("{}{}", crate::PRICE_DB_KEY, vehicle_id)
}

/// Price lookup by vehicle id
pub fn find(vehicle_id: u64) -> Result<Price, VehiclesError> {
    match db::get::<Price>(&price_key(vehicle_id))? {
        Some(price) => Ok(price),
        None => {
            error!("price not found for vehicle: {}", vehicle_id);
            Err(VehiclesError::PriceNotFound(vehicle_id))
        }
    }
}

/// Price lookup for all
pub fn find_all() -> Result<Vec<Price>, VehiclesError> {
    let index: Vec<u64> = db::get(crate::PRICE_LIST_DB_KEY)?.unwrap_or_default();
    let mut prices: Vec<Price> = Vec::new();
    for vehicle_id in index {
        match find(vehicle_id) {
            Ok(price) => prices.push(price),
            Err(VehiclesError::PriceNotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(prices)
}

/// Write the seed table. Prices that already exist are left alone.
pub fn seed() -> Result<usize, VehiclesError> {
    let _guard = SEED_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut index: Vec<u64> = db::get(crate::PRICE_LIST_DB_KEY)?.unwrap_or_default();
    let mut written: usize = 0;
    for (vehicle_id, amount) in SEED_PRICES {
        if db::get::<Price>(&price_key(vehicle_id))?.is_some() {
            continue;
        }
        let price = Price {
            vehicle_id,
            currency: String::from(DEFAULT_CURRENCY),
            price: amount,
        };
        debug!("insert price: {:?}", &price);
        db::put(&price_key(vehicle_id), &price)?;
        if !index.contains(&vehicle_id) {
            index.push(vehicle_id);
        }
        written += 1;
    }
    db::put(crate::PRICE_LIST_DB_KEY, &index)?;
    info!("seeded {} prices", written);
    Ok(written)
}

// Tests
//-------------------------------------------------------------------------------
