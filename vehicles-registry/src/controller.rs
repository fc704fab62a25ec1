use rocket::{
    delete,
    get,
    http::Status,
    post,
    put,
    serde::json::Json,
    State,
};

use vehicles_core::{
    error::VehiclesError,
    reqres,
    utils,
};

use crate::registry::ServiceRegistry;

// JSON APIs

#[get("/health")]
pub async fn health() -> Json<reqres::HealthResponse> {
    Json(Default::default())
}

/// Register an instance of `app`
#[post("/<app>", data = "<req_registration>")]
pub async fn register(
    app: &str,
    req_registration: Json<reqres::InstanceRegistration>,
    registry: &State<ServiceRegistry>,
) -> Status {
    registry
        .register(app, req_registration.into_inner(), utils::now_millis())
        .await;
    Status::NoContent
}

/// Heartbeat, 404 tells the client to register again
#[put("/<app>/<instance_id>")]
pub async fn renew(
    app: &str,
    instance_id: &str,
    registry: &State<ServiceRegistry>,
) -> Result<Status, VehiclesError> {
    registry
        .renew(app, instance_id, utils::now_millis())
        .await?;
    Ok(Status::Ok)
}

#[delete("/<app>/<instance_id>")]
pub async fn cancel(
    app: &str,
    instance_id: &str,
    registry: &State<ServiceRegistry>,
) -> Result<Status, VehiclesError> {
    registry.cancel(app, instance_id).await?;
    Ok(Status::Ok)
}

#[get("/")]
pub async fn get_applications(registry: &State<ServiceRegistry>) -> Json<reqres::Applications> {
    Json(reqres::Applications {
        applications: registry.list_applications().await,
    })
}

#[get("/<app>")]
pub async fn get_application(
    app: &str,
    registry: &State<ServiceRegistry>,
) -> Result<Json<reqres::ApplicationInfo>, VehiclesError> {
    let m_app = registry.get_application(app).await?;
    Ok(Json(m_app))
}

#[get("/<app>/<instance_id>")]
pub async fn get_instance(
    app: &str,
    instance_id: &str,
    registry: &State<ServiceRegistry>,
) -> Result<Json<reqres::InstanceInfo>, VehiclesError> {
    let m_instance = registry.get_instance(app, instance_id).await?;
    Ok(Json(m_instance))
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::stage;
    use rocket::{
        http::{
            ContentType,
            Status,
        },
        local::blocking::Client,
    };
    use std::time::Duration;
    use vehicles_core::{
        discovery::DiscoveryClient,
        error::VehiclesError,
        reqres::{
            ApplicationInfo,
            Applications,
            InstanceInfo,
            InstanceRegistration,
            InstanceStatus,
        },
        PRICING_APP,
    };

    const INSTANCE_ID: &str = "localhost:pricing-service:8082";
    /// Port of the registry launched over real http
    const LIVE_PORT: u16 = 38761;

    fn client() -> Client {
        Client::tracked(stage(rocket::build())).expect("valid rocket instance")
    }

    fn register(client: &Client) {
        let body = serde_json::json!({
            "instanceId": INSTANCE_ID,
            "hostName": "localhost",
            "port": 8082,
            "status": "UP"
        });
        let response = client
            .post("/eureka/apps/pricing-service")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch();
        assert_eq!(Status::NoContent, response.status());
    }

    #[test]
    fn register_and_get_test() {
        let client = client();
        register(&client);
        let response = client.get("/eureka/apps/PRICING-SERVICE").dispatch();
        assert_eq!(Status::Ok, response.status());
        let app: ApplicationInfo = response.into_json().expect("application");
        assert_eq!("PRICING-SERVICE", app.name);
        assert_eq!(1, app.instances.len());
        assert_eq!(InstanceStatus::Up, app.instances[0].status);
        assert_eq!("http://localhost:8082", app.instances[0].base_url());

        let uri = format!("/eureka/apps/pricing-service/{}", INSTANCE_ID);
        let response = client.get(uri.as_str()).dispatch();
        assert_eq!(Status::Ok, response.status());
        let instance: InstanceInfo = response.into_json().expect("instance");
        assert_eq!(8082, instance.port);

        let response = client.get("/eureka/apps").dispatch();
        let apps: Applications = response.into_json().expect("applications");
        assert_eq!(1, apps.applications.len());
    }

    #[test]
    fn renew_test() {
        let client = client();
        let uri = format!("/eureka/apps/pricing-service/{}", INSTANCE_ID);
        let response = client.put(uri.as_str()).dispatch();
        assert_eq!(Status::NotFound, response.status());
        register(&client);
        let response = client.put(uri.as_str()).dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[test]
    fn cancel_test() {
        let client = client();
        register(&client);
        let uri = format!("/eureka/apps/pricing-service/{}", INSTANCE_ID);
        let response = client.delete(uri.as_str()).dispatch();
        assert_eq!(Status::Ok, response.status());
        let response = client.delete(uri.as_str()).dispatch();
        assert_eq!(Status::NotFound, response.status());
        let response = client.get("/eureka/apps/pricing-service").dispatch();
        assert_eq!(Status::NotFound, response.status());
    }

    #[test]
    fn bad_registration_test() {
        let client = client();
        let response = client
            .post("/eureka/apps/pricing-service")
            .header(ContentType::JSON)
            .body("{\"hostName\": \"localhost\"}")
            .dispatch();
        assert_eq!(Status::UnprocessableEntity, response.status());
    }

    #[test]
    fn health_test() {
        let client = client();
        let response = client.get("/health").dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn heartbeat_registers_again_test() -> Result<(), VehiclesError> {
        let config = rocket::Config {
            port: LIVE_PORT,
            ..rocket::Config::debug_default()
        };
        let ignited = stage(rocket::custom(&config))
            .ignite()
            .await
            .expect("ignited rocket");
        let shutdown = ignited.shutdown();
        tokio::spawn(ignited.launch());
        let client = DiscoveryClient::new(&format!("http://127.0.0.1:{}/eureka", LIVE_PORT))?;
        let registration = InstanceRegistration {
            instance_id: String::from(INSTANCE_ID),
            host_name: String::from("localhost"),
            port: 8082,
            status: InstanceStatus::Up,
        };
        // the registry has never seen the instance, so the renewal
        // is answered with 404 and the instance is registered again
        let mut renewed = client.heartbeat(PRICING_APP, &registration).await;
        for _ in 0..50 {
            if !matches!(renewed, Err(VehiclesError::Discovery(_))) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            renewed = client.heartbeat(PRICING_APP, &registration).await;
        }
        assert!(!renewed?);
        let app = client.get_application(PRICING_APP).await?;
        assert_eq!(1, app.instances.len());
        assert_eq!(INSTANCE_ID, app.instances[0].instance_id);
        assert!(client.heartbeat(PRICING_APP, &registration).await?);
        assert_eq!("http://localhost:8082", client.resolve(PRICING_APP).await?);
        client.cancel(PRICING_APP, INSTANCE_ID).await?;
        assert!(!client.heartbeat(PRICING_APP, &registration).await?);
        shutdown.notify();
        Ok(())
    }
}
