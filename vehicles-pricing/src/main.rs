#[macro_use]
extern crate rocket;

use vehicles_core::*;
use vehicles_pricing::*;

// The only changes in here should be mounting new controller methods

#[launch]
async fn rocket() -> _ {
    utils::parse_args();
    env_logger::init();
    utils::start_up();
    match price::seed() {
        Ok(n) => log::info!("seeded {} prices", n),
        Err(e) => log::error!("failed to seed prices: {}", e),
    }
    let config = utils::rocket_config(utils::get_app_pricing_port());
    log::info!("pricing-service is online");
    stage(rocket::custom(&config)).attach(discovery::Registration::new(PRICING_APP))
}
