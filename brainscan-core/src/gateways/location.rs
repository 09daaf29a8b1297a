use async_trait::async_trait;
use brainscan_entities::geo::MapPoint;
use thiserror::Error;

/// The reasons why the current position could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("An unknown error occurred while locating")]
    Unknown,
}

#[async_trait]
pub trait LocationProvider {
    /// Request a fresh position, previously cached positions must not be returned.
    async fn current_position(&self) -> Result<MapPoint, GeolocationError>;
}

#[async_trait]
impl<T> LocationProvider for Box<T>
where
    T: LocationProvider + Send + Sync + ?Sized,
{
    async fn current_position(&self) -> Result<MapPoint, GeolocationError> {
        (**self).current_position().await
    }
}
