//! Structs for all http requests and responses

use serde::{
    Deserialize,
    Serialize,
};

use crate::models::Car;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        HealthResponse {
            status: String::from("UP"),
        }
    }
}

// START HAL Structs

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: String) -> Link {
        Link { href }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CarLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub cars: Link,
}

/// A car plus its navigation links
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CarResource {
    #[serde(flatten)]
    pub car: Car,
    #[serde(rename = "_links")]
    pub links: CarLinks,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EmbeddedCars {
    #[serde(rename = "carList")]
    pub car_list: Vec<CarResource>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CarCollection {
    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub embedded: Option<EmbeddedCars>,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

// END HAL Structs

// START Registry Structs

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    #[default]
    Up,
    Down,
    Starting,
    OutOfService,
    Unknown,
}

/// Body of a registration request
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRegistration {
    pub instance_id: String,
    pub host_name: String,
    pub port: u16,
    #[serde(default)]
    pub status: InstanceStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub app: String,
    pub host_name: String,
    pub port: u16,
    pub status: InstanceStatus,
    /// unix millis
    pub registered_at: i64,
    /// unix millis
    pub last_renewal: i64,
}

impl InstanceInfo {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host_name, self.port)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ApplicationInfo {
    pub name: String,
    pub instances: Vec<InstanceInfo>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Applications {
    pub applications: Vec<ApplicationInfo>,
}

// END Registry Structs
