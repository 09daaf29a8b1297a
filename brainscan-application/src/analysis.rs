use super::*;
use crate::{error::AnalysisError, prelude::Advisory};
use gateways::classify::{ClassificationError, ClassificationGateway};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub prediction: Prediction,
    pub advisories: Vec<Advisory>,
}

impl AnalysisReport {
    pub fn tumor_detected(&self) -> bool {
        self.prediction.class.is_tumor()
    }
}

/// Validate the upload and let the remote service classify it.
///
/// Invalid uploads are rejected without contacting the service.
pub async fn analyze_scan<G>(
    gateway: &G,
    upload: &ImageUpload,
) -> Result<AnalysisReport, AnalysisError>
where
    G: ClassificationGateway,
{
    usecases::validate_image_upload(upload)?;
    let prediction = gateway.predict(upload).await.map_err(|err| {
        warn!("Analysis of {} failed: {}", upload.file_name, err);
        err
    })?;
    info!(
        "{} classified as {} ({:.1}%)",
        upload.file_name,
        prediction.class,
        prediction.confidence_percent()
    );
    let mut advisories = vec![Advisory::AnalysisComplete];
    if prediction.class.is_tumor() {
        advisories.push(Advisory::TumorDetected(prediction.class));
    }
    Ok(AnalysisReport {
        prediction,
        advisories,
    })
}

pub async fn check_service<G>(gateway: &G) -> Advisory
where
    G: ClassificationGateway,
{
    match gateway.health().await {
        Ok(health) if health.is_healthy() => {
            debug!(
                "Classification service is healthy (model: {})",
                health.model_mode.as_deref().unwrap_or("unknown")
            );
            Advisory::ServiceConnected
        }
        Ok(health) => {
            warn!("Classification service reports status '{}'", health.status);
            Advisory::ServiceUnstable
        }
        Err(err @ ClassificationError::Service { .. }) => {
            warn!("{err}");
            Advisory::ServiceUnstable
        }
        Err(err) => {
            warn!("{err}");
            Advisory::ServiceUnreachable
        }
    }
}
