pub mod controller;

use rocket::{
    routes,
    Build,
    Rocket,
};
use vehicles_core::catchers;

/// Mount the vehicles api onto `rocket`
pub fn stage(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", routes![controller::health])
        .mount(
            "/cars",
            routes![
                controller::list_cars,
                controller::get_car,
                controller::create_car,
                controller::update_car,
                controller::delete_car,
            ],
        )
        .register("/", catchers::all())
}
