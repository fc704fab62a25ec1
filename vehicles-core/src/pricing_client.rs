//! Client side lookup of vehicle prices

use crate::{
    discovery::DiscoveryClient,
    error::VehiclesError,
    models::Price,
    utils,
};
use log::{
    debug,
    error,
};
use reqwest::StatusCode;

/// Base url of the pricing service, fixed or discovered
async fn pricing_url() -> Result<String, VehiclesError> {
    if let Some(endpoint) = utils::get_pricing_endpoint() {
        return Ok(endpoint);
    }
    if !utils::is_registry_enabled() {
        return Err(VehiclesError::Discovery(String::from(
            "registry disabled and no pricing endpoint set",
        )));
    }
    DiscoveryClient::from_args()?
        .resolve(crate::PRICING_APP)
        .await
}

/// Fetch the price of a vehicle from the pricing service at `base`
pub async fn fetch_price_from(base: &str, vehicle_id: u64) -> Result<Price, VehiclesError> {
    let url = format!("{}/prices/{}", base.trim_end_matches('/'), vehicle_id);
    debug!("fetching price from {}", url);
    let response = utils::http_client()?.get(url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(VehiclesError::PriceNotFound(vehicle_id));
    }
    let price = response.error_for_status()?.json::<Price>().await?;
    Ok(price)
}

/// Fetch the price of a vehicle from the pricing service
pub async fn fetch_price(vehicle_id: u64) -> Result<Price, VehiclesError> {
    let base = pricing_url().await?;
    fetch_price_from(&base, vehicle_id).await
}

/// `USD 14001.00`, or the consult placeholder when the lookup failed
pub fn display_price(vehicle_id: u64, price: Result<Price, VehiclesError>) -> String {
    match price {
        Ok(price) => price.display(),
        Err(e) => {
            error!("unexpected error retrieving price for vehicle {}: {}", vehicle_id, e);
            String::from(crate::CONSULT_PRICE)
        }
    }
}

/// Price for display, falls back to a placeholder when the pricing
///
/// service can't answer.
pub async fn get_price(vehicle_id: u64) -> String {
    display_price(vehicle_id, fetch_price(vehicle_id).await)
}
