use async_trait::async_trait;
use brainscan_core::{
    entities::*,
    gateways::classify::{ClassificationError, ClassificationGateway},
};
use reqwest::{
    multipart::{Form, Part},
    Url,
};
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";

const IMAGE_FIELD_NAME: &str = "image";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Client of the remote MRI classification service.
#[derive(Debug, Clone)]
pub struct ClassificationService {
    client: reqwest::Client,
    base_url: Url,
}

impl ClassificationService {
    pub fn new(mut base_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, name: &str) -> Result<Url, ClassificationError> {
        self.base_url
            .join(name)
            .map_err(|err| ClassificationError::Transport(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    confidence_scores: HashMap<String, f64>,
    processing_time: Option<f64>,
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    model_mode: Option<String>,
}

fn transport_error(err: reqwest::Error) -> ClassificationError {
    log::warn!("Classification request failed: {}", err);
    ClassificationError::Transport(err.to_string())
}

fn service_error(status: u16, body: &str) -> ClassificationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|res| res.error)
        .unwrap_or_else(|_| format!("Server error: {status}"));
    ClassificationError::Service { status, message }
}

fn parse_prediction(json: &str) -> Result<Prediction, ClassificationError> {
    let PredictResponse {
        prediction,
        confidence,
        confidence_scores,
        processing_time,
        request_id,
    } = serde_json::from_str(json).map_err(|err| ClassificationError::Schema(err.to_string()))?;
    let label = prediction
        .ok_or_else(|| ClassificationError::Schema("No prediction in response".into()))?;
    let class = label
        .parse::<TumorClass>()
        .map_err(|_| ClassificationError::Schema(format!("Unknown category '{label}'")))?;
    let confidence = confidence
        .filter(|c| (0.0..=1.0).contains(c))
        .ok_or_else(|| ClassificationError::Schema("Missing or invalid confidence".into()))?;
    let mut confidence_scores: Vec<_> = confidence_scores
        .into_iter()
        .filter_map(|(label, score)| match label.parse::<TumorClass>() {
            Ok(class) => Some((class, score)),
            Err(_) => {
                log::warn!("Ignoring confidence score of unknown category '{label}'");
                None
            }
        })
        .collect();
    confidence_scores.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    let processing_time = processing_time
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64);
    Ok(Prediction {
        class,
        confidence,
        confidence_scores,
        processing_time,
        request_id,
    })
}

fn parse_health(json: &str) -> Result<ServiceHealth, ClassificationError> {
    let HealthResponse { status, model_mode } =
        serde_json::from_str(json).map_err(|err| ClassificationError::Schema(err.to_string()))?;
    Ok(ServiceHealth { status, model_mode })
}

#[async_trait]
impl ClassificationGateway for ClassificationService {
    async fn predict(&self, upload: &ImageUpload) -> Result<Prediction, ClassificationError> {
        let url = self.endpoint("predict")?;
        log::debug!("Uploading {:?} to {}", upload, url);
        let part = Part::bytes(upload.data.clone())
            .file_name(upload.file_name.clone())
            .mime_str(
                upload
                    .content_type
                    .as_deref()
                    .unwrap_or(FALLBACK_CONTENT_TYPE),
            )
            .map_err(transport_error)?;
        let form = Form::new().part(IMAGE_FIELD_NAME, part);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        parse_prediction(&body)
    }

    async fn health(&self) -> Result<ServiceHealth, ClassificationError> {
        let url = self.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        parse_health(&body)
    }
}
