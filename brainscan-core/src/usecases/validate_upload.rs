use super::prelude::*;
use crate::util::validate::Validate;

pub fn validate_image_upload(upload: &ImageUpload) -> Result<()> {
    upload.validate().map_err(|err| {
        log::debug!("Rejected upload {}: {}", upload.file_name, err);
        Error::from(err)
    })
}
