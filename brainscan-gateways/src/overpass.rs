use async_trait::async_trait;
use brainscan_core::{
    entities::*,
    gateways::facilities::{FacilityLocator, LocatorError},
};
use reqwest::Url;
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};

pub const DEFAULT_API_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_SERVER_TIMEOUT: Duration = Duration::from_secs(25);

/// A facility locator based on the OpenStreetMap Overpass API.
#[derive(Debug, Clone)]
pub struct Overpass {
    client: reqwest::Client,
    api_url: Url,
    server_timeout: Duration,
}

impl Overpass {
    /// The `server_timeout` limits the processing time on the server side
    /// while the `client_timeout` limits the whole request.
    pub fn new(
        api_url: Url,
        server_timeout: Duration,
        client_timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(client_timeout)
            .build()?;
        Ok(Self {
            client,
            api_url,
            server_timeout,
        })
    }
}

/// Overpass QL query for all nodes, ways and relations
/// tagged with `amenity=<category>` around the center.
pub fn query(ctx: &QueryContext, category: &str, server_timeout: Duration) -> String {
    let (lat, lng) = ctx.center.to_lat_lng_deg();
    let radius = ctx.radius.to_meters().round() as u64;
    let around = format!("(around:{radius},{lat},{lng})");
    let filter = format!("[\"amenity\"=\"{category}\"]");
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  \
         node{filter}{around};\n  \
         way{filter}{around};\n  \
         relation{filter}{around};\n\
         );\n\
         out center;",
        timeout = server_timeout.as_secs(),
    )
}

#[async_trait]
impl FacilityLocator for Overpass {
    async fn find_facilities(
        &self,
        ctx: &QueryContext,
        category: &str,
    ) -> Result<Vec<Facility>, LocatorError> {
        let data = query(ctx, category, self.server_timeout);
        log::debug!(
            "Searching '{}' facilities within {} around {} ({})",
            category,
            ctx.radius,
            ctx.center,
            self.api_url
        );
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("data", data)])
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Overpass API responded with {}", status);
            return Err(LocatorError::Status(status.as_u16()));
        }
        let body = response.text().await.map_err(transport_error)?;
        parse_facilities(&body)
    }
}

fn transport_error(err: reqwest::Error) -> LocatorError {
    log::warn!("Overpass request failed: {}", err);
    if err.is_timeout() {
        LocatorError::Timeout
    } else {
        LocatorError::Transport(err.to_string())
    }
}

/// Elements are decoded one by one, so a malformed
/// element does not spoil the whole result.
#[derive(Debug, Deserialize)]
struct QueryResult {
    elements: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<u64>,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<Center>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ElementShape {
    /// A node with its own coordinates
    Point(MapPoint),
    /// A way or relation represented by its center
    Centered(MapPoint),
    Unsupported,
}

impl Element {
    fn shape(&self) -> ElementShape {
        if let Some(Center { lat, lon }) = self.center {
            return MapPoint::try_from_lat_lng_deg(lat, lon)
                .map(ElementShape::Centered)
                .unwrap_or(ElementShape::Unsupported);
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => MapPoint::try_from_lat_lng_deg(lat, lon)
                .map(ElementShape::Point)
                .unwrap_or(ElementShape::Unsupported),
            _ => ElementShape::Unsupported,
        }
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn into_facility(self) -> Option<Facility> {
        let pos = match self.shape() {
            ElementShape::Point(pos) | ElementShape::Centered(pos) => pos,
            ElementShape::Unsupported => return None,
        };
        let name = self.tag("name").unwrap_or(Facility::DEFAULT_NAME).to_owned();
        let phone = self.tag("phone").map(ToOwned::to_owned);
        let address = self
            .tag("addr:full")
            .or_else(|| self.tag("addr:street"))
            .map(ToOwned::to_owned);
        let kind = self.tag("healthcare").map(ToOwned::to_owned);
        Some(Facility {
            name,
            phone,
            address,
            kind,
            pos,
        })
    }
}

/// Parse the JSON response of an Overpass query.
///
/// Elements without any usable position are skipped.
pub fn parse_facilities(json: &str) -> Result<Vec<Facility>, LocatorError> {
    let QueryResult { elements } =
        serde_json::from_str(json).map_err(|err| LocatorError::Schema(err.to_string()))?;
    let count = elements.len();
    let facilities: Vec<_> = elements
        .into_iter()
        .filter_map(|value| {
            let element = match serde_json::from_value::<Element>(value) {
                Ok(element) => element,
                Err(err) => {
                    log::trace!("Skipping malformed element: {err}");
                    return None;
                }
            };
            let (kind, id) = (element.kind.clone(), element.id);
            let facility = element.into_facility();
            if facility.is_none() {
                log::trace!("Skipping element {kind:?} {id:?} without position");
            }
            facility
        })
        .collect();
    if facilities.len() < count {
        log::debug!(
            "Skipped {} of {} elements without usable position",
            count - facilities.len(),
            count
        );
    }
    Ok(facilities)
}
