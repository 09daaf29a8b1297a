use anyhow::{anyhow, Result};
use brainscan_application::prelude::DiscoveryConfig;
use brainscan_entities::geo::MapPoint;
use brainscan_gateways::{overpass, Url};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "brainscan.toml";

const ENV_NAME_CLASSIFIER_URL: &str = "BRAINSCAN_CLASSIFIER_URL";
const ENV_NAME_OVERPASS_URL: &str = "BRAINSCAN_OVERPASS_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub location: LocationGateway,
    pub overpass: Overpass,
    pub classifier: Classifier,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(url) = env::var(ENV_NAME_CLASSIFIER_URL) {
            cfg.classifier.api_url = url.parse()?;
        }
        if let Ok(url) = env::var(ENV_NAME_OVERPASS_URL) {
            cfg.overpass.api_url = url.parse()?;
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub enum LocationGateway {
    IpApi { api_url: Url },
    /// Only positions given on the command line are used.
    None,
}

#[derive(Debug, Clone)]
pub struct Overpass {
    pub api_url: Url,
    pub server_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    pub api_url: Url,
    pub timeout: Duration,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            location,
            discovery,
            gateway,
            classifier,
        } = from;

        let raw::Location {
            provider,
            default_lat,
            default_lng,
            timeout: geolocation_timeout,
        } = location.unwrap_or_default();
        let default_position = MapPoint::try_from_lat_lng_deg(default_lat, default_lng)
            .ok_or_else(|| anyhow!("Invalid default position ({default_lat},{default_lng})"))?;

        let raw::Discovery { query_timeout } = discovery.unwrap_or_default();
        let discovery = DiscoveryConfig {
            default_position,
            geolocation_timeout,
            query_timeout,
        };

        let raw::Gateway {
            overpass: raw_overpass,
            ip_api,
        } = gateway.unwrap_or_default();

        let location = match provider.unwrap_or(raw::LocationProvider::IpApi) {
            raw::LocationProvider::IpApi => {
                let api_url = ip_api
                    .and_then(|raw::IpApi { api_url }| api_url)
                    .as_deref()
                    .unwrap_or(brainscan_gateways::geolocation::DEFAULT_IP_API_URL)
                    .parse()?;
                LocationGateway::IpApi { api_url }
            }
            raw::LocationProvider::None => LocationGateway::None,
        };

        let (api_url, server_timeout) = raw_overpass
            .map(|raw::Overpass { api_url, server_timeout }| (api_url, server_timeout))
            .unwrap_or_default();
        let overpass = Overpass {
            api_url: api_url
                .as_deref()
                .unwrap_or(overpass::DEFAULT_API_URL)
                .parse()?,
            server_timeout: server_timeout.unwrap_or(overpass::DEFAULT_SERVER_TIMEOUT),
        };
        if overpass.server_timeout > query_timeout {
            log::warn!(
                "The Overpass server timeout ({:?}) exceeds the query timeout ({:?})",
                overpass.server_timeout,
                query_timeout
            );
        }

        let raw::Classifier { api_url, timeout } = classifier.unwrap_or_default();
        let classifier = Classifier {
            api_url: api_url.parse()?,
            timeout,
        };

        Ok(Self {
            discovery,
            location,
            overpass,
            classifier,
        })
    }
}
