pub mod controller;
pub mod registry;

use rocket::{
    routes,
    Build,
    Rocket,
};
use vehicles_core::catchers;

/// Mount the registry api onto `rocket` with an empty table
pub fn stage(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .manage(registry::ServiceRegistry::new())
        .mount("/", routes![controller::health])
        .mount(
            "/eureka/apps",
            routes![
                controller::register,
                controller::renew,
                controller::cancel,
                controller::get_applications,
                controller::get_application,
                controller::get_instance,
            ],
        )
        .register("/", catchers::all())
}
