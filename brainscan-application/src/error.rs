use brainscan_core::{gateways::classify::ClassificationError, usecases};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Invalid(#[from] usecases::Error),
    #[error(transparent)]
    Classification(#[from] ClassificationError),
}
