use async_trait::async_trait;
use brainscan_entities::facility::{Facility, QueryContext};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("The geodata service could not be reached: {0}")]
    Transport(String),
    #[error("The geodata service did not respond in time")]
    Timeout,
    #[error("The geodata service responded with status {0}")]
    Status(u16),
    #[error("Unexpected geodata response: {0}")]
    Schema(String),
}

#[async_trait]
pub trait FacilityLocator {
    /// Find all facilities of the given category within the radius of the query.
    ///
    /// Sends exactly one request and never retries.
    async fn find_facilities(
        &self,
        ctx: &QueryContext,
        category: &str,
    ) -> Result<Vec<Facility>, LocatorError>;
}

#[async_trait]
impl<T> FacilityLocator for Box<T>
where
    T: FacilityLocator + Send + Sync + ?Sized,
{
    async fn find_facilities(
        &self,
        ctx: &QueryContext,
        category: &str,
    ) -> Result<Vec<Facility>, LocatorError> {
        (**self).find_facilities(ctx, category).await
    }
}
