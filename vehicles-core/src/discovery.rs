//! Discovery registry client and the fairing that keeps a service registered

use crate::{
    error::VehiclesError,
    reqres::{
        ApplicationInfo,
        InstanceInfo,
        InstanceRegistration,
        InstanceStatus,
    },
    utils,
};
use log::{
    debug,
    error,
    info,
    warn,
};
use rand::seq::SliceRandom;
use reqwest::StatusCode;
use rocket::{
    fairing::{
        Fairing,
        Info,
        Kind,
    },
    Orbit,
    Rocket,
};

/// `host:app:port`, unique per running instance
pub fn instance_id(host: &str, app: &str, port: u16) -> String {
    format!("{}:{}:{}", host, app, port)
}

/// Random pick among the instances that are up
pub fn choose_instance(instances: &[InstanceInfo]) -> Option<&InstanceInfo> {
    let up: Vec<&InstanceInfo> = instances
        .iter()
        .filter(|i| i.status == InstanceStatus::Up)
        .collect();
    up.choose(&mut rand::thread_rng()).copied()
}

pub struct DiscoveryClient {
    base_url: String,
    client: reqwest::Client,
}

impl DiscoveryClient {
    pub fn new(base_url: &str) -> Result<Self, VehiclesError> {
        Ok(DiscoveryClient {
            base_url: String::from(base_url.trim_end_matches('/')),
            client: utils::http_client()?,
        })
    }

    /// Client for the registry named on the command line
    pub fn from_args() -> Result<Self, VehiclesError> {
        DiscoveryClient::new(&utils::get_registry_url())
    }

    fn app_url(&self, app: &str) -> String {
        format!("{}/apps/{}", self.base_url, app)
    }

    pub async fn register(
        &self,
        app: &str,
        registration: &InstanceRegistration,
    ) -> Result<(), VehiclesError> {
        info!("registering {} as {}", registration.instance_id, app);
        self.client
            .post(self.app_url(app))
            .json(registration)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Renew the lease. `false` means the registry no longer knows the
    ///
    /// instance and it has to register again.
    pub async fn renew(&self, app: &str, instance_id: &str) -> Result<bool, VehiclesError> {
        debug!("renewing lease of {}", instance_id);
        let response = self
            .client
            .put(format!("{}/{}", self.app_url(app), instance_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }

    pub async fn cancel(&self, app: &str, instance_id: &str) -> Result<(), VehiclesError> {
        info!("cancelling {}", instance_id);
        self.client
            .delete(format!("{}/{}", self.app_url(app), instance_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Renew the lease and register again when the registry has
    ///
    /// forgotten the instance. `false` means a new registration was sent.
    pub async fn heartbeat(
        &self,
        app: &str,
        registration: &InstanceRegistration,
    ) -> Result<bool, VehiclesError> {
        if self.renew(app, &registration.instance_id).await? {
            return Ok(true);
        }
        warn!("registry lost {}, registering again", registration.instance_id);
        self.register(app, registration).await?;
        Ok(false)
    }

    pub async fn get_application(&self, app: &str) -> Result<ApplicationInfo, VehiclesError> {
        let response = self.client.get(self.app_url(app)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(VehiclesError::ApplicationNotFound(String::from(app)));
        }
        let info = response
            .error_for_status()?
            .json::<ApplicationInfo>()
            .await?;
        Ok(info)
    }

    /// Base url of a live instance of `app`
    pub async fn resolve(&self, app: &str) -> Result<String, VehiclesError> {
        let application = self.get_application(app).await?;
        match choose_instance(&application.instances) {
            Some(instance) => Ok(instance.base_url()),
            None => {
                warn!("no instance of {} is up", app);
                Err(VehiclesError::ApplicationNotFound(String::from(app)))
            }
        }
    }
}

/// Registers the launching service, renews its lease in the background
///
/// and cancels it on shutdown.
pub struct Registration {
    app: &'static str,
}

impl Registration {
    pub fn new(app: &'static str) -> Self {
        Registration { app }
    }

    fn registration(&self, port: u16) -> InstanceRegistration {
        let host = utils::get_instance_host();
        InstanceRegistration {
            instance_id: instance_id(&host, self.app, port),
            host_name: host,
            port,
            status: InstanceStatus::Up,
        }
    }
}

#[rocket::async_trait]
impl Fairing for Registration {
    fn info(&self) -> Info {
        Info {
            name: "Discovery Registration",
            kind: Kind::Liftoff | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        if !utils::is_registry_enabled() {
            info!("registry disabled, {} stays unregistered", self.app);
            return;
        }
        let client = match DiscoveryClient::from_args() {
            Ok(client) => client,
            Err(e) => {
                error!("failed to build discovery client: {}", e);
                return;
            }
        };
        let app = self.app;
        let registration = self.registration(rocket.config().port);
        if let Err(e) = client.register(app, &registration).await {
            error!("failed to register {}: {}", registration.instance_id, e);
        }
        let shutdown = rocket.shutdown();
        tokio::spawn(async move {
            tokio::pin!(shutdown);
            let mut interval = tokio::time::interval(utils::get_renewal_interval());
            // the first tick completes immediately
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = interval.tick() => {
                        if let Err(e) = client.heartbeat(app, &registration).await {
                            error!("failed to renew {}: {}", registration.instance_id, e);
                        }
                    }
                }
            }
        });
    }

    async fn on_shutdown(&self, rocket: &Rocket<Orbit>) {
        if !utils::is_registry_enabled() {
            return;
        }
        let registration = self.registration(rocket.config().port);
        match DiscoveryClient::from_args() {
            Ok(client) => {
                if let Err(e) = client.cancel(self.app, &registration.instance_id).await {
                    error!("failed to cancel {}: {}", registration.instance_id, e);
                }
            }
            Err(e) => error!("failed to build discovery client: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(port: u16, status: InstanceStatus) -> InstanceInfo {
        InstanceInfo {
            instance_id: instance_id("localhost", crate::PRICING_APP, port),
            app: String::from("PRICING-SERVICE"),
            host_name: String::from("localhost"),
            port,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn instance_id_test() {
        let expected = "localhost:pricing-service:8082";
        assert_eq!(expected, instance_id("localhost", crate::PRICING_APP, 8082));
    }

    #[test]
    fn choose_instance_test() {
        let instances = vec![
            instance(8082, InstanceStatus::Down),
            instance(8083, InstanceStatus::Up),
            instance(8084, InstanceStatus::OutOfService),
        ];
        let chosen = choose_instance(&instances).map(|i| i.base_url());
        assert_eq!(Some(String::from("http://localhost:8083")), chosen);
        assert!(choose_instance(&instances[..1]).is_none());
        assert!(choose_instance(&[]).is_none());
    }

    #[tokio::test]
    async fn unreachable_registry_test() -> Result<(), VehiclesError> {
        let client = DiscoveryClient::new("http://127.0.0.1:1/eureka/")?;
        let actual = client.resolve(crate::PRICING_APP).await;
        assert!(matches!(actual, Err(VehiclesError::Discovery(_))));
        Ok(())
    }
}
