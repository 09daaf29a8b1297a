use std::time::Duration;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The categories a brain MRI scan is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TumorClass {
    Glioma,
    Meningioma,
    NoTumor,
    Pituitary,
}

impl TumorClass {
    pub const fn is_tumor(self) -> bool {
        !matches!(self, Self::NoTumor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: TumorClass,
    /// In the range `[0, 1]`
    pub confidence: f64,
    /// Ordered by descending confidence
    pub confidence_scores: Vec<(TumorClass, f64)>,
    pub processing_time: Option<Duration>,
    pub request_id: Option<String>,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub status: String,
    pub model_mode: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
