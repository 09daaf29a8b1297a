use async_trait::async_trait;
use brainscan_core::{
    entities::MapPoint,
    gateways::location::{GeolocationError, LocationProvider},
};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_IP_API_URL: &str = "http://ip-api.com/json";

/// Approximates the current position by the public IP address
/// using an ip-api.com compatible service.
#[derive(Debug, Clone)]
pub struct IpApi {
    client: reqwest::Client,
    api_url: Url,
}

impl IpApi {
    pub fn new(api_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, api_url })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn position_from_response(res: IpApiResponse) -> Result<MapPoint, GeolocationError> {
    if res.status != "success" {
        log::warn!(
            "IP geolocation failed: {}",
            res.message.as_deref().unwrap_or(&res.status)
        );
        return Err(GeolocationError::PositionUnavailable);
    }
    match (res.lat, res.lon) {
        (Some(lat), Some(lon)) => MapPoint::try_from_lat_lng_deg(lat, lon).ok_or_else(|| {
            log::warn!("IP geolocation returned an invalid position: {lat},{lon}");
            GeolocationError::Unknown
        }),
        _ => Err(GeolocationError::PositionUnavailable),
    }
}

fn status_error(status: StatusCode) -> GeolocationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GeolocationError::PermissionDenied,
        _ => GeolocationError::Unknown,
    }
}

fn transport_error(err: reqwest::Error) -> GeolocationError {
    log::warn!("IP geolocation request failed: {}", err);
    if err.is_timeout() {
        GeolocationError::Timeout
    } else if err.is_connect() {
        GeolocationError::PositionUnavailable
    } else {
        GeolocationError::Unknown
    }
}

#[async_trait]
impl LocationProvider for IpApi {
    async fn current_position(&self) -> Result<MapPoint, GeolocationError> {
        log::debug!("Requesting position from {}", self.api_url);
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("fields", "status,message,lat,lon")])
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("IP geolocation service responded with {}", status);
            return Err(status_error(status));
        }
        let res: IpApiResponse = response.json().await.map_err(|err| {
            log::warn!("Unexpected IP geolocation response: {}", err);
            GeolocationError::Unknown
        })?;
        position_from_response(res)
    }
}
