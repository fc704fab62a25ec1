//! Resource assembly: plain cars in, link annotated resources out

use crate::{
    models::Car,
    reqres::{
        CarCollection,
        CarLinks,
        CarResource,
        CollectionLinks,
        EmbeddedCars,
        Link,
    },
};

/// Collection path the car controller is mounted on
pub const CARS_PATH: &str = "/cars";

pub fn car_href(id: u64) -> String {
    format!("{}/{}", CARS_PATH, id)
}

pub fn to_resource(car: Car) -> CarResource {
    let links = CarLinks {
        self_link: Link::new(car_href(car.id)),
        cars: Link::new(String::from(CARS_PATH)),
    };
    CarResource { car, links }
}

/// An empty list renders without `_embedded`
pub fn to_collection(cars: Vec<Car>) -> CarCollection {
    let embedded = if cars.is_empty() {
        None
    } else {
        Some(EmbeddedCars {
            car_list: cars.into_iter().map(to_resource).collect(),
        })
    };
    CarCollection {
        embedded,
        links: CollectionLinks {
            self_link: Link::new(String::from(CARS_PATH)),
        },
    }
}
