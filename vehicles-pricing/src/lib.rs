pub mod controller;

use rocket::{
    routes,
    Build,
    Rocket,
};
use vehicles_core::catchers;

/// Mount the pricing api onto `rocket`
pub fn stage(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", routes![controller::health])
        .mount(
            "/prices",
            routes![controller::get_price, controller::list_prices],
        )
        .register("/", catchers::all())
}
