use super::*;
use gateways::location::GeolocationError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// User facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The default position is used instead.
    GeolocationFailed(GeolocationError),
    FacilitiesFound(usize),
    NoFacilitiesFound,
    LocatorFailed,
    ServiceConnected,
    ServiceUnstable,
    ServiceUnreachable,
    AnalysisComplete,
    TumorDetected(TumorClass),
}

impl Advisory {
    pub const fn severity(&self) -> Severity {
        use GeolocationError as G;
        match self {
            Self::GeolocationFailed(G::PermissionDenied) => Severity::Warning,
            Self::GeolocationFailed(_) => Severity::Error,
            Self::FacilitiesFound(_) | Self::ServiceConnected | Self::AnalysisComplete => {
                Severity::Success
            }
            Self::NoFacilitiesFound => Severity::Info,
            Self::ServiceUnstable | Self::TumorDetected(_) => Severity::Warning,
            Self::LocatorFailed | Self::ServiceUnreachable => Severity::Error,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use GeolocationError as G;
        match self {
            Self::GeolocationFailed(G::PermissionDenied) => {
                f.write_str("Location permission denied. Using default location.")
            }
            Self::GeolocationFailed(G::PositionUnavailable) => {
                f.write_str("Location information unavailable. Using default location.")
            }
            Self::GeolocationFailed(G::Timeout) => {
                f.write_str("Location request timed out. Using default location.")
            }
            Self::GeolocationFailed(G::Unknown) => {
                f.write_str("An unknown error occurred while locating. Using default location.")
            }
            Self::FacilitiesFound(count) => write!(f, "Found {count} medical centers nearby"),
            Self::NoFacilitiesFound => f.write_str("No hospitals found in the vicinity"),
            Self::LocatorFailed => f.write_str("Error fetching hospital data. Please try again."),
            Self::ServiceConnected => f.write_str("Connected to AI analysis server"),
            Self::ServiceUnstable => f.write_str("AI server connection unstable"),
            Self::ServiceUnreachable => f.write_str(
                "Cannot connect to AI server. Make sure the classification service is running.",
            ),
            Self::AnalysisComplete => f.write_str("Analysis complete!"),
            Self::TumorDetected(class) => {
                write!(f, "Tumor detected ({class}). Finding nearby hospitals...")
            }
        }
    }
}
