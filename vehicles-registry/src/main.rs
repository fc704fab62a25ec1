#[macro_use]
extern crate rocket;

use rocket::fairing::AdHoc;
use vehicles_core::*;
use vehicles_registry::*;

// The only changes in here should be mounting new controller methods

#[launch]
async fn rocket() -> _ {
    utils::parse_args();
    env_logger::init();
    let config = utils::rocket_config(utils::get_app_registry_port());
    log::info!("discovery registry is online");
    stage(rocket::custom(&config)).attach(AdHoc::on_liftoff("Lease Eviction", |rocket| {
        Box::pin(async move {
            let registry = match rocket.state::<registry::ServiceRegistry>() {
                Some(registry) => registry.clone(),
                None => {
                    log::error!("registry state is not managed, eviction disabled");
                    return;
                }
            };
            let shutdown = rocket.shutdown();
            tokio::spawn(async move {
                tokio::pin!(shutdown);
                let lease_ms = utils::get_lease_duration_ms();
                let mut interval = tokio::time::interval(utils::get_eviction_interval());
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = interval.tick() => {
                            let evicted = registry.evict_expired(utils::now_millis(), lease_ms).await;
                            if evicted > 0 {
                                log::info!("evicted {} expired instances", evicted);
                            }
                        }
                    }
                }
            });
        })
    }))
}
