use rocket::{
    get,
    serde::json::Json,
};

use vehicles_core::{
    error::VehiclesError,
    models,
    price,
    reqres,
};

// JSON APIs

#[get("/health")]
pub async fn health() -> Json<reqres::HealthResponse> {
    Json(Default::default())
}

/// Get the price of a vehicle
#[get("/<vehicle_id>")]
pub async fn get_price(vehicle_id: u64) -> Result<Json<models::Price>, VehiclesError> {
    let m_price = price::find(vehicle_id)?;
    Ok(Json(m_price))
}

/// Get all prices
#[get("/")]
pub async fn list_prices() -> Result<Json<Vec<models::Price>>, VehiclesError> {
    let m_prices = price::find_all()?;
    Ok(Json(m_prices))
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::stage;
    use rocket::{
        http::Status,
        local::blocking::Client,
    };
    use std::time::Duration;
    use vehicles_core::{
        error::VehiclesError,
        models::Price,
        price,
        pricing_client,
        reqres::ErrorResponse,
    };

    /// Port of the pricing service launched over real http
    const LIVE_PORT: u16 = 38082;

    fn client() -> Client {
        price::seed().expect("seeded prices");
        Client::tracked(stage(rocket::build())).expect("valid rocket instance")
    }

    #[test]
    fn get_price_test() {
        let client = client();
        let response = client.get("/prices/1").dispatch();
        assert_eq!(Status::Ok, response.status());
        let actual: Price = response.into_json().expect("price");
        assert_eq!(1, actual.vehicle_id);
        assert_eq!("USD", actual.currency);
        assert_eq!(14001.0, actual.price);
    }

    #[test]
    fn trailing_slash_test() {
        let client = client();
        let response = client.get("/prices/1/").dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[test]
    fn price_not_found_test() {
        let client = client();
        let response = client.get("/prices/4242").dispatch();
        assert_eq!(Status::NotFound, response.status());
        let error: ErrorResponse = response.into_json().expect("error response");
        assert_eq!("Cannot find price for Vehicle 4242", error.message);
    }

    #[test]
    fn list_prices_test() {
        let client = client();
        let response = client.get("/prices").dispatch();
        assert_eq!(Status::Ok, response.status());
        let prices: Vec<Price> = response.into_json().expect("prices");
        assert!(prices.len() >= price::SEED_PRICES.len());
        assert!(prices.iter().any(|p| p.vehicle_id == 1 && p.price == 14001.0));
    }

    #[test]
    fn health_test() {
        let client = client();
        let response = client.get("/health").dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn priced_over_http_test() -> Result<(), VehiclesError> {
        price::seed()?;
        let config = rocket::Config {
            port: LIVE_PORT,
            ..rocket::Config::debug_default()
        };
        let ignited = stage(rocket::custom(&config))
            .ignite()
            .await
            .expect("ignited rocket");
        let shutdown = ignited.shutdown();
        tokio::spawn(ignited.launch());
        let base = format!("http://127.0.0.1:{}", LIVE_PORT);
        let mut fetched = pricing_client::fetch_price_from(&base, 1).await;
        // wait for liftoff
        for _ in 0..50 {
            if !matches!(fetched, Err(VehiclesError::Discovery(_))) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            fetched = pricing_client::fetch_price_from(&base, 1).await;
        }
        assert_eq!("USD 14001.00", pricing_client::display_price(1, fetched));
        let missing = pricing_client::fetch_price_from(&base, 4242).await;
        assert!(matches!(missing, Err(VehiclesError::PriceNotFound(4242))));
        shutdown.notify();
        Ok(())
    }
}
