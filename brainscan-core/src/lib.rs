pub mod gateways;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use brainscan_entities::{diagnosis::*, facility::*, geo::*, upload::*};
}

/// The amenity tag value of the facilities that are searched for.
pub const FACILITY_CATEGORY: &str = "hospital";
