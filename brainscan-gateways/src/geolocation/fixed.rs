use async_trait::async_trait;
use brainscan_core::{
    entities::MapPoint,
    gateways::location::{GeolocationError, LocationProvider},
};

/// A position that is known in advance, e.g. given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(Option<MapPoint>);

impl FixedPosition {
    pub const fn new(pos: MapPoint) -> Self {
        Self(Some(pos))
    }

    /// A provider that never knows where it is.
    pub const fn unavailable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl LocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<MapPoint, GeolocationError> {
        self.0.ok_or(GeolocationError::PositionUnavailable)
    }
}
