//! In-memory table of registered service instances

use log::{
    debug,
    info,
};
use std::{
    collections::HashMap,
    sync::Arc,
};
use tokio::sync::RwLock;

use vehicles_core::{
    error::VehiclesError,
    reqres::{
        ApplicationInfo,
        InstanceInfo,
        InstanceRegistration,
    },
};

/// Instances keyed by upper case application name, then instance id
#[derive(Clone)]
pub struct ServiceRegistry {
    apps: Arc<RwLock<HashMap<String, HashMap<String, InstanceInfo>>>>,
}

fn app_key(app: &str) -> String {
    app.to_uppercase()
}

fn to_application(name: &str, instances: &HashMap<String, InstanceInfo>) -> ApplicationInfo {
    let mut instances: Vec<InstanceInfo> = instances.values().cloned().collect();
    instances.sort_by(|a, b| a.instance_id.cmp(&b.instance_id));
    ApplicationInfo {
        name: String::from(name),
        instances,
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            apps: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register or replace an instance of `app`
    pub async fn register(&self, app: &str, r: InstanceRegistration, now: i64) -> InstanceInfo {
        let name = app_key(app);
        let info = InstanceInfo {
            instance_id: r.instance_id,
            app: String::from(&name),
            host_name: r.host_name,
            port: r.port,
            status: r.status,
            registered_at: now,
            last_renewal: now,
        };
        let mut apps = self.apps.write().await;
        apps.entry(name)
            .or_default()
            .insert(String::from(&info.instance_id), info.clone());
        info!("registered instance: {}", info.instance_id);
        info
    }

    /// Push the lease of an instance forward
    pub async fn renew(&self, app: &str, instance_id: &str, now: i64) -> Result<(), VehiclesError> {
        let mut apps = self.apps.write().await;
        match apps
            .get_mut(&app_key(app))
            .and_then(|instances| instances.get_mut(instance_id))
        {
            Some(instance) => {
                instance.last_renewal = now;
                debug!("renewed instance: {}", instance_id);
                Ok(())
            }
            None => Err(VehiclesError::InstanceNotFound(String::from(instance_id))),
        }
    }

    /// Remove an instance. Applications without instances are dropped.
    pub async fn cancel(&self, app: &str, instance_id: &str) -> Result<(), VehiclesError> {
        let name = app_key(app);
        let mut apps = self.apps.write().await;
        let instances = apps
            .get_mut(&name)
            .ok_or_else(|| VehiclesError::InstanceNotFound(String::from(instance_id)))?;
        if instances.remove(instance_id).is_none() {
            return Err(VehiclesError::InstanceNotFound(String::from(instance_id)));
        }
        if instances.is_empty() {
            apps.remove(&name);
        }
        info!("cancelled instance: {}", instance_id);
        Ok(())
    }

    pub async fn get_application(&self, app: &str) -> Result<ApplicationInfo, VehiclesError> {
        let name = app_key(app);
        let apps = self.apps.read().await;
        match apps.get(&name) {
            Some(instances) if !instances.is_empty() => Ok(to_application(&name, instances)),
            _ => Err(VehiclesError::ApplicationNotFound(String::from(app))),
        }
    }

    pub async fn get_instance(
        &self,
        app: &str,
        instance_id: &str,
    ) -> Result<InstanceInfo, VehiclesError> {
        let apps = self.apps.read().await;
        apps.get(&app_key(app))
            .and_then(|instances| instances.get(instance_id))
            .cloned()
            .ok_or_else(|| VehiclesError::InstanceNotFound(String::from(instance_id)))
    }

    /// All applications sorted by name
    pub async fn list_applications(&self) -> Vec<ApplicationInfo> {
        let apps = self.apps.read().await;
        let mut applications: Vec<ApplicationInfo> = apps
            .iter()
            .map(|(name, instances)| to_application(name, instances))
            .collect();
        applications.sort_by(|a, b| a.name.cmp(&b.name));
        applications
    }

    /// Drop instances whose last renewal is older than `lease_ms`.
    ///
    /// Returns the number of evicted instances.
    pub async fn evict_expired(&self, now: i64, lease_ms: i64) -> usize {
        let mut apps = self.apps.write().await;
        let mut evicted: usize = 0;
        for instances in apps.values_mut() {
            instances.retain(|id, instance| {
                let alive = now - instance.last_renewal <= lease_ms;
                if !alive {
                    info!("evicting expired instance: {}", id);
                    evicted += 1;
                }
                alive
            });
        }
        apps.retain(|_, instances| !instances.is_empty());
        evicted
    }

    pub async fn instance_count(&self) -> usize {
        let apps = self.apps.read().await;
        apps.values().map(|instances| instances.len()).sum()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use vehicles_core::reqres::InstanceStatus;

    fn registration(port: u16) -> InstanceRegistration {
        InstanceRegistration {
            instance_id: format!("localhost:pricing-service:{}", port),
            host_name: String::from("localhost"),
            port,
            status: InstanceStatus::Up,
        }
    }

    #[tokio::test]
    async fn register_test() -> Result<(), VehiclesError> {
        let registry = ServiceRegistry::new();
        registry.register("pricing-service", registration(8082), 1000).await;
        registry.register("pricing-service", registration(8083), 1000).await;
        // same id again replaces
        registry.register("PRICING-SERVICE", registration(8083), 2000).await;
        assert_eq!(2, registry.instance_count().await);
        let app = registry.get_application("Pricing-Service").await?;
        assert_eq!("PRICING-SERVICE", app.name);
        assert_eq!(2, app.instances.len());
        let instance = registry
            .get_instance("pricing-service", "localhost:pricing-service:8083")
            .await?;
        assert_eq!(2000, instance.registered_at);
        assert_eq!("http://localhost:8083", instance.base_url());
        Ok(())
    }

    #[tokio::test]
    async fn renew_test() -> Result<(), VehiclesError> {
        let registry = ServiceRegistry::new();
        let info = registry.register("vehicles-api", registration(8080), 1000).await;
        registry.renew("vehicles-api", &info.instance_id, 5000).await?;
        let actual = registry.get_instance("vehicles-api", &info.instance_id).await?;
        assert_eq!(5000, actual.last_renewal);
        assert_eq!(1000, actual.registered_at);
        let missing = registry.renew("vehicles-api", "nope", 5000).await;
        assert!(matches!(missing, Err(VehiclesError::InstanceNotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn cancel_test() -> Result<(), VehiclesError> {
        let registry = ServiceRegistry::new();
        let info = registry.register("vehicles-api", registration(8080), 1000).await;
        registry.cancel("vehicles-api", &info.instance_id).await?;
        assert_eq!(0, registry.instance_count().await);
        assert!(registry.list_applications().await.is_empty());
        let actual = registry.get_application("vehicles-api").await;
        assert!(matches!(actual, Err(VehiclesError::ApplicationNotFound(_))));
        let again = registry.cancel("vehicles-api", &info.instance_id).await;
        assert!(matches!(again, Err(VehiclesError::InstanceNotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn evict_expired_test() -> Result<(), VehiclesError> {
        let registry = ServiceRegistry::new();
        let stale = registry.register("pricing-service", registration(8082), 0).await;
        let fresh = registry.register("pricing-service", registration(8083), 0).await;
        registry.register("vehicles-api", registration(8080), 0).await;
        registry.renew("pricing-service", &fresh.instance_id, 80_000).await?;
        let evicted = registry.evict_expired(100_000, 90_000).await;
        assert_eq!(2, evicted);
        assert_eq!(1, registry.instance_count().await);
        let stale = registry.get_instance("pricing-service", &stale.instance_id).await;
        assert!(stale.is_err());
        let apps = registry.list_applications().await;
        assert_eq!(1, apps.len());
        assert_eq!("PRICING-SERVICE", apps[0].name);
        Ok(())
    }
}
