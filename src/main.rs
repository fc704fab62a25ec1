#[macro_use]
extern crate rocket;

use vehicles::*;
use vehicles_core::*;

// The only changes in here should be mounting new controller methods

#[launch]
async fn rocket() -> _ {
    utils::parse_args();
    env_logger::init();
    utils::start_up();
    let config = utils::rocket_config(utils::get_app_port());
    log::info!("vehicles-api is online");
    stage(rocket::custom(&config)).attach(discovery::Registration::new(VEHICLES_APP))
}
