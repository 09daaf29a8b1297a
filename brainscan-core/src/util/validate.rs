use brainscan_entities::upload::ImageUpload;
use thiserror::Error;

pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

const ACCEPTED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/bmp",
    "image/tiff",
];

const ACCEPTED_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".bmp", ".tiff", ".dcm"];

pub trait Validate {
    type Error;
    fn validate(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadInvalidation {
    #[error("Empty file")]
    Empty,
    #[error("File too large ({size} bytes)")]
    TooLarge { size: usize },
    #[error("Invalid file type")]
    FileType,
}

fn is_accepted_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(content_type))
}

impl Validate for ImageUpload {
    type Error = UploadInvalidation;
    fn validate(&self) -> Result<(), Self::Error> {
        if self.data.is_empty() {
            return Err(Self::Error::Empty);
        }
        if self.size() > MAX_UPLOAD_SIZE {
            return Err(Self::Error::TooLarge { size: self.size() });
        }
        let accepted_type = self
            .content_type
            .as_deref()
            .is_some_and(is_accepted_content_type);
        let accepted_extension = self
            .extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
        if !accepted_type && !accepted_extension {
            return Err(Self::Error::FileType);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, content_type: Option<&str>, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: file_name.into(),
            content_type: content_type.map(Into::into),
            data: vec![0xFF; size],
        }
    }

    #[test]
    fn accept_known_extensions() {
        assert!(upload("scan.jpg", None, 10).validate().is_ok());
        assert!(upload("scan.JPEG", None, 10).validate().is_ok());
        assert!(upload("scan.dcm", None, 10).validate().is_ok());
        assert!(upload("scan.tiff", None, 10).validate().is_ok());
    }

    #[test]
    fn accept_known_content_type_with_unknown_extension() {
        assert!(upload("scan.img", Some("image/png"), 10).validate().is_ok());
        assert!(upload("scan", Some("IMAGE/BMP"), 10).validate().is_ok());
    }

    #[test]
    fn reject_unknown_file_types() {
        assert_eq!(
            upload("scan.gif", Some("image/gif"), 10).validate(),
            Err(UploadInvalidation::FileType)
        );
        assert_eq!(
            upload("notes.txt", None, 10).validate(),
            Err(UploadInvalidation::FileType)
        );
    }

    #[test]
    fn reject_oversized_files() {
        assert!(upload("scan.png", None, MAX_UPLOAD_SIZE).validate().is_ok());
        assert_eq!(
            upload("scan.png", None, MAX_UPLOAD_SIZE + 1).validate(),
            Err(UploadInvalidation::TooLarge {
                size: MAX_UPLOAD_SIZE + 1
            })
        );
    }

    #[test]
    fn reject_empty_files() {
        assert_eq!(
            upload("scan.png", None, 0).validate(),
            Err(UploadInvalidation::Empty)
        );
    }
}
