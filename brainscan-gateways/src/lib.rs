//! HTTP based implementations of the gateways defined in `brainscan-core`.

pub mod classifier;
pub mod geolocation;
pub mod overpass;

pub use reqwest::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
