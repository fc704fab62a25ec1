//! Domain records stored in LMDB and exchanged over http

use serde::{
    Deserialize,
    Serialize,
};

/// Stored and sent as `USED` / `NEW`, read case-insensitively
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    #[default]
    Used,
    New,
}

impl TryFrom<String> for Condition {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "USED" => Ok(Condition::Used),
            "NEW" => Ok(Condition::New),
            _ => Err(format!("unknown condition: {}", s)),
        }
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        match c {
            Condition::Used => String::from("USED"),
            Condition::New => String::from("NEW"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Manufacturer {
    pub code: u32,
    #[serde(default)]
    pub name: String,
}

impl Manufacturer {
    pub fn new(code: u32, name: &str) -> Manufacturer {
        Manufacturer {
            code,
            name: String::from(name),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub body: String,
    pub model: String,
    pub manufacturer: Manufacturer,
    #[serde(default)]
    pub number_of_doors: u8,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub mileage: u32,
    #[serde(default)]
    pub model_year: u16,
    #[serde(default)]
    pub production_year: u16,
    #[serde(default)]
    pub external_color: String,
}

/// Where a car is parked. Only the coordinates are required.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub modified_at: i64,
    #[serde(default)]
    pub condition: Condition,
    pub details: Details,
    pub location: Location,
    /// Filled from the pricing service on lookup, never persisted
    #[serde(default)]
    pub price: String,
}

impl Car {
    /// Full replace of the client editable fields, keeping identity and
    ///
    /// creation time of the stored car.
    pub fn update(stored: Car, c: Car, modified_at: i64) -> Car {
        Car {
            id: stored.id,
            created_at: stored.created_at,
            modified_at,
            condition: c.condition,
            details: c.details,
            location: c.location,
            price: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub vehicle_id: u64,
    pub currency: String,
    pub price: f64,
}

impl Price {
    /// `USD 14001.00`
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_json_test() {
        let body = r#"{
            "condition": "NEW",
            "details": {
                "body": "sedan",
                "model": "Impala",
                "manufacturer": { "code": 101 },
                "numberOfDoors": 4,
                "mileage": 32280,
                "modelYear": 2018,
                "externalColor": "white"
            },
            "location": { "lat": 40.73061, "lon": -73.935242 }
        }"#;
        let car: Car = serde_json::from_str(body).unwrap();
        assert_eq!(0, car.id);
        assert_eq!(Condition::New, car.condition);
        assert_eq!("Impala", car.details.model);
        assert_eq!(101, car.details.manufacturer.code);
        assert_eq!(2018, car.details.model_year);
        assert_eq!(None, car.location.city);
    }

    #[test]
    fn update_test() {
        let stored = Car {
            id: 9,
            created_at: 100,
            modified_at: 100,
            ..Default::default()
        };
        let incoming = Car {
            id: 77,
            created_at: 5,
            condition: Condition::New,
            ..Default::default()
        };
        let actual = Car::update(stored, incoming, 200);
        assert_eq!(9, actual.id);
        assert_eq!(100, actual.created_at);
        assert_eq!(200, actual.modified_at);
        assert_eq!(Condition::New, actual.condition);
    }

    #[test]
    fn price_display_test() {
        let price = Price {
            vehicle_id: 1,
            currency: String::from("USD"),
            price: 14001.0,
        };
        assert_eq!("USD 14001.00", price.display());
    }
}
