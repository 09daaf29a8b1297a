use async_trait::async_trait;
use brainscan_entities::{diagnosis::*, upload::ImageUpload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Cannot connect to the classification service: {0}")]
    Transport(String),
    #[error("The classification service responded with status {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Unexpected response from the classification service: {0}")]
    Schema(String),
}

#[async_trait]
pub trait ClassificationGateway {
    async fn predict(&self, upload: &ImageUpload) -> Result<Prediction, ClassificationError>;
    async fn health(&self) -> Result<ServiceHealth, ClassificationError>;
}
