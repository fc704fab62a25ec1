use rocket::{
    delete,
    get,
    post,
    put,
    response::status::{
        Created,
        NoContent,
    },
    serde::json::Json,
};

use vehicles_core::{
    assembler,
    car,
    error::VehiclesError,
    payload::CarPayload,
    reqres,
};

// JSON APIs

/// Liveness for the registry and load balancers
#[get("/health")]
pub async fn health() -> Json<reqres::HealthResponse> {
    Json(Default::default())
}

/// Find all cars in the inventory
#[get("/")]
pub async fn list_cars() -> Result<Json<reqres::CarCollection>, VehiclesError> {
    let m_cars = car::find_all()?;
    Ok(Json(assembler::to_collection(m_cars)))
}

/// Find a car by id, priced by the pricing service
#[get("/<id>")]
pub async fn get_car(id: u64) -> Result<Json<reqres::CarResource>, VehiclesError> {
    let m_car = car::find_with_price(id).await?;
    Ok(Json(assembler::to_resource(m_car)))
}

/// Add a new car. Accepts json or xml.
#[post("/", data = "<req_car>")]
pub async fn create_car(
    req_car: Result<CarPayload, VehiclesError>,
) -> Result<Created<Json<reqres::CarResource>>, VehiclesError> {
    let m_car = car::create(req_car?.into_inner())?;
    let resource = assembler::to_resource(m_car);
    let location = String::from(&resource.links.self_link.href);
    Ok(Created::new(location).body(Json(resource)))
}

/// Replace the car stored under `id`
#[put("/<id>", data = "<req_car>")]
pub async fn update_car(
    id: u64,
    req_car: Result<CarPayload, VehiclesError>,
) -> Result<Json<reqres::CarResource>, VehiclesError> {
    let m_car = car::modify(id, req_car?.into_inner())?;
    Ok(Json(assembler::to_resource(m_car)))
}

/// Delete a car from the inventory
#[delete("/<id>")]
pub async fn delete_car(id: u64) -> Result<NoContent, VehiclesError> {
    car::delete(id)?;
    Ok(NoContent)
}

// Tests
//-------------------------------------------------------------------------------
