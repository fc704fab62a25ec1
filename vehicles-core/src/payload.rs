//! Request body guard for cars sent as json or xml

use crate::{
    error::VehiclesError,
    models::Car,
};
use log::debug;
use rocket::{
    data::{
        self,
        Data,
        FromData,
        Limits,
        ToByteUnit,
    },
    http::{
        ContentType,
        Status,
    },
    outcome::Outcome,
    Request,
};

/// Largest xml body accepted when no `xml` limit is configured
const XML_LIMIT_KIB: u64 = 1024;

/// Car body decoded according to the request content type. Anything
///
/// that is not xml is read as json.
#[derive(Debug)]
pub struct CarPayload(pub Car);

impl CarPayload {
    pub fn into_inner(self) -> Car {
        self.0
    }
}

/// `text/xml`, `application/xml` and `+xml` suffixed types
pub fn is_xml(ct: &ContentType) -> bool {
    let sub = ct.sub().as_str().to_ascii_lowercase();
    ct.is_xml()
        || (ct.top().as_str().eq_ignore_ascii_case("application")
            && (sub == "xml" || sub.ends_with("+xml")))
}

fn malformed(reason: String) -> (Status, VehiclesError) {
    (Status::BadRequest, VehiclesError::MalformedBody(reason))
}

pub fn from_json(body: &str) -> Result<Car, VehiclesError> {
    serde_json::from_str::<Car>(body).map_err(|e| VehiclesError::MalformedBody(e.to_string()))
}

pub fn from_xml(body: &str) -> Result<Car, VehiclesError> {
    quick_xml::de::from_str::<Car>(body).map_err(|e| VehiclesError::MalformedBody(e.to_string()))
}

#[rocket::async_trait]
impl<'r> FromData<'r> for CarPayload {
    type Error = VehiclesError;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        let xml = req.content_type().map(is_xml).unwrap_or(false);
        let limit = if xml {
            req.limits().get("xml").unwrap_or(XML_LIMIT_KIB.kibibytes())
        } else {
            req.limits().get("json").unwrap_or(Limits::JSON)
        };
        let body = match data.open(limit).into_string().await {
            Ok(s) if s.is_complete() => s.into_inner(),
            Ok(_) => {
                return Outcome::Error((
                    Status::PayloadTooLarge,
                    VehiclesError::MalformedBody(String::from("body exceeds size limit")),
                ))
            }
            Err(e) => return Outcome::Error(malformed(e.to_string())),
        };
        let parsed = if xml {
            from_xml(&body)
        } else {
            from_json(&body)
        };
        match parsed {
            Ok(car) => {
                debug!("decoded car body, xml: {}", xml);
                Outcome::Success(CarPayload(car))
            }
            Err(VehiclesError::MalformedBody(reason)) => Outcome::Error(malformed(reason)),
            Err(e) => Outcome::Error(malformed(e.to_string())),
        }
    }
}
