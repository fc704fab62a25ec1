// Car repo/service layer
use crate::{
    db,
    error::VehiclesError,
    models::*,
    pricing_client,
    utils,
};
use lazy_static::lazy_static;
use log::{
    debug,
    error,
    info,
};
use std::sync::{
    Mutex,
    MutexGuard,
};

/// Manufacturers the inventory accepts, by code
pub const MANUFACTURERS: [(u32, &str); 5] = [
    (100, "Audi"),
    (101, "Chevrolet"),
    (102, "Ford"),
    (103, "BMW"),
    (104, "Dodge"),
];

lazy_static! {
    /// Serializes read-modify-write of the car index and id sequence
    static ref INDEX_LOCK: Mutex<()> = Mutex::new(());
}

fn lock_index() -> MutexGuard<'static, ()> {
    INDEX_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn car_key(id: u64) -> String {
    format!("{}{}", crate::CAR_DB_KEY, id)
}

fn read_index() -> Result<Vec<u64>, VehiclesError> {
    Ok(db::get::<Vec<u64>>(crate::CAR_LIST_DB_KEY)?.unwrap_or_default())
}

/// Ids are never reused, even after a delete
fn next_id() -> Result<u64, VehiclesError> {
    let last = db::get::<u64>(crate::CAR_SEQUENCE_DB_KEY)?.unwrap_or(0);
    let id = last + 1;
    db::put(crate::CAR_SEQUENCE_DB_KEY, &id)?;
    Ok(id)
}

pub fn manufacturer_name(code: u32) -> Option<&'static str> {
    MANUFACTURERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Required field checks. Returns the car with its canonical manufacturer name.
pub fn validate(c: Car) -> Result<Car, VehiclesError> {
    let mut errors: Vec<String> = Vec::new();
    if c.details.model.trim().is_empty() {
        errors.push(String::from("details.model must not be blank"));
    }
    if c.details.body.trim().is_empty() {
        errors.push(String::from("details.body must not be blank"));
    }
    let limited = [
        ("details.model", &c.details.model),
        ("details.body", &c.details.body),
        ("details.fuelType", &c.details.fuel_type),
        ("details.engine", &c.details.engine),
        ("details.externalColor", &c.details.external_color),
    ];
    for (field, value) in limited {
        if value.len() >= utils::string_limit() {
            errors.push(format!("{} is too long", field));
        }
    }
    let manufacturer = manufacturer_name(c.details.manufacturer.code);
    if manufacturer.is_none() {
        errors.push(format!(
            "details.manufacturer.code {} is unknown",
            c.details.manufacturer.code
        ));
    }
    if !(-90.0..=90.0).contains(&c.location.lat) {
        errors.push(String::from("location.lat must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&c.location.lon) {
        errors.push(String::from("location.lon must be between -180 and 180"));
    }
    match manufacturer {
        Some(name) if errors.is_empty() => {
            let mut car = c;
            car.details.manufacturer.name = String::from(name);
            Ok(car)
        }
        _ => {
            error!("invalid car: {:?}", errors);
            Err(VehiclesError::Validation(errors))
        }
    }
}

/// Create a new car
pub fn create(c: Car) -> Result<Car, VehiclesError> {
    let valid = validate(c)?;
    let _guard = lock_index();
    let id = next_id()?;
    let ts = chrono::offset::Utc::now().timestamp();
    let new_car = Car {
        id,
        created_at: ts,
        modified_at: ts,
        price: String::new(),
        ..valid
    };
    debug!("insert car: {:?}", &new_car);
    db::put(&car_key(id), &new_car)?;
    // in order to retrieve all cars, write ids to the car index
    let mut index = read_index()?;
    if index.is_empty() {
        debug!("creating car index");
    }
    index.push(id);
    db::put(crate::CAR_LIST_DB_KEY, &index)?;
    info!("created car: {}", id);
    Ok(new_car)
}

/// Single car lookup
pub fn find(id: u64) -> Result<Car, VehiclesError> {
    match db::get::<Car>(&car_key(id))? {
        Some(car) => Ok(car),
        None => {
            error!("car not found: {}", id);
            Err(VehiclesError::CarNotFound(id))
        }
    }
}

/// Single car lookup with its current price
pub async fn find_with_price(id: u64) -> Result<Car, VehiclesError> {
    let mut car = find(id)?;
    car.price = pricing_client::get_price(id).await;
    Ok(car)
}

/// Car lookup for all
pub fn find_all() -> Result<Vec<Car>, VehiclesError> {
    let index = read_index()?;
    let mut cars: Vec<Car> = Vec::new();
    for id in index {
        match find(id) {
            Ok(car) => cars.push(car),
            Err(VehiclesError::CarNotFound(_)) => error!("car index is stale for: {}", id),
            Err(e) => return Err(e),
        }
    }
    Ok(cars)
}

/// Replace the car stored under `id`. The path id wins over any id in the body.
pub fn modify(id: u64, c: Car) -> Result<Car, VehiclesError> {
    info!("modify car: {}", id);
    let _guard = lock_index();
    let stored = find(id)?;
    let valid = validate(c)?;
    let ts = chrono::offset::Utc::now().timestamp();
    let u_car = Car::update(stored, valid, ts);
    db::put(&car_key(id), &u_car)?;
    Ok(u_car)
}

/// Delete a car by id
pub fn delete(id: u64) -> Result<(), VehiclesError> {
    info!("delete car: {}", id);
    let _guard = lock_index();
    find(id)?;
    db::remove(&car_key(id))?;
    let index: Vec<u64> = read_index()?.into_iter().filter(|i| *i != id).collect();
    db::put(crate::CAR_LIST_DB_KEY, &index)?;
    Ok(())
}

// Tests
//-------------------------------------------------------------------------------
