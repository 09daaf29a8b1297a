use crate::geo::*;

/// A medical facility as reported by a geodata service.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub name: String,

    /// A phone number to get in contact
    pub phone: Option<String>,

    /// Either the full address or at least the street
    pub address: Option<String>,

    /// The healthcare classification, e.g. "hospital" or "clinic"
    pub kind: Option<String>,

    pub pos: MapPoint,
}

impl Facility {
    pub const DEFAULT_NAME: &'static str = "Medical Center";
    pub const PHONE_NOT_AVAILABLE: &'static str = "Not available";
    pub const ADDRESS_NOT_SPECIFIED: &'static str = "Address not specified";
    pub const DEFAULT_KIND: &'static str = "General Hospital";

    pub fn display_phone(&self) -> &str {
        self.phone.as_deref().unwrap_or(Self::PHONE_NOT_AVAILABLE)
    }

    pub fn display_address(&self) -> &str {
        self.address
            .as_deref()
            .unwrap_or(Self::ADDRESS_NOT_SPECIFIED)
    }

    pub fn display_kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(Self::DEFAULT_KIND)
    }
}

/// The reference position and search radius of a single discovery request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryContext {
    pub center: MapPoint,
    pub radius: Distance,
}

impl QueryContext {
    pub const SEARCH_RADIUS: Distance = Distance::from_km(10.0);

    pub const fn new(center: MapPoint) -> Self {
        Self {
            center,
            radius: Self::SEARCH_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedFacility {
    pub facility: Facility,
    /// Distance from the reference position of the query
    pub distance: Distance,
}

/// Facilities ordered by ascending distance.
///
/// The position within the sequence is the identity of a facility
/// for everything that is rendered from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedFacilities(Vec<RankedFacility>);

impl RankedFacilities {
    /// Callers must provide entries sorted by distance.
    pub fn from_sorted(ranked: Vec<RankedFacility>) -> Self {
        debug_assert!(ranked.iter().all(|r| r.distance.is_valid()));
        debug_assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
        Self(ranked)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedFacility> {
        self.0.iter()
    }

    pub fn nearest(&self) -> Option<&RankedFacility> {
        self.0.first()
    }
}
