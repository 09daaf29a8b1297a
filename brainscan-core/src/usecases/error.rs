use crate::util::validate::UploadInvalidation;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Please select an MRI image first")]
    EmptyUpload,
    #[error("File too large ({:.2}MB). Maximum size is 10MB.", megabytes(.size))]
    UploadTooLarge { size: usize },
    #[error("Invalid file type. Please upload JPEG, PNG, BMP, TIFF, or DICOM files.")]
    UploadFileType,
}

fn megabytes(size: &usize) -> f64 {
    *size as f64 / 1024.0 / 1024.0
}

impl From<UploadInvalidation> for Error {
    fn from(err: UploadInvalidation) -> Self {
        match err {
            UploadInvalidation::Empty => Self::EmptyUpload,
            UploadInvalidation::TooLarge { size } => Self::UploadTooLarge { size },
            UploadInvalidation::FileType => Self::UploadFileType,
        }
    }
}
