use duration_str::{deserialize_duration, deserialize_option_duration};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("brainscan.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub location: Option<Location>,
    pub discovery: Option<Discovery>,
    pub gateway: Option<Gateway>,
    pub classifier: Option<Classifier>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Location {
    pub provider: Option<LocationProvider>,
    pub default_lat: f64,
    pub default_lng: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for Location {
    fn default() -> Self {
        Config::default().location.expect("Location configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationProvider {
    IpApi,
    None,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Discovery {
    #[serde(deserialize_with = "deserialize_duration")]
    pub query_timeout: Duration,
}

impl Default for Discovery {
    fn default() -> Self {
        Config::default().discovery.expect("Discovery configuration")
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub overpass: Option<Overpass>,
    pub ip_api: Option<IpApi>,
}

impl Default for Gateway {
    fn default() -> Self {
        Config::default().gateway.expect("Gateway configuration")
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Overpass {
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub server_timeout: Option<Duration>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IpApi {
    pub api_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Classifier {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for Classifier {
    fn default() -> Self {
        Config::default().classifier.expect("Classifier configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.location.is_some());
        assert!(cfg.discovery.is_some());
        assert!(cfg.classifier.is_some());
        let gateway = cfg.gateway.unwrap();
        assert!(gateway.overpass.is_some());
        assert!(gateway.ip_api.is_some());
    }

    #[test]
    fn default_location_config() {
        let cfg = Location::default();
        assert_eq!(cfg.provider, Some(LocationProvider::IpApi));
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(Discovery::default().query_timeout, Duration::from_secs(30));
    }

    #[test]
    fn parse_full_config_example_from_file() {
        let cfg_string = fs::read_to_string("src/config/brainscan.full-example.toml").unwrap();
        let cfg: Config = toml::from_str(&cfg_string).unwrap();
        assert_eq!(cfg.classifier.unwrap().timeout, Duration::from_secs(120));
        let overpass = cfg.gateway.unwrap().overpass.unwrap();
        assert_eq!(overpass.server_timeout, Some(Duration::from_secs(40)));
    }

    #[test]
    fn parse_partial_config() {
        let cfg: Config = toml::from_str(
            r#"
            [location]
            provider = "none"
            default-lat = 0.0
            default-lng = 0.0
            timeout = "1s"

            [gateway.overpass]
            api-url = "http://localhost:12345/api/interpreter"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.location.unwrap().provider, Some(LocationProvider::None));
        assert!(cfg.discovery.is_none());
        let overpass = cfg.gateway.unwrap().overpass.unwrap();
        assert!(overpass.server_timeout.is_none());
    }
}
