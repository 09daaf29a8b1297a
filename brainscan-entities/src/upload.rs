/// An image file held in memory for the duration of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The lowercase file extension including the leading dot.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rfind('.')
            .map(|idx| self.file_name[idx..].to_lowercase())
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str) -> ImageUpload {
        ImageUpload {
            file_name: file_name.into(),
            content_type: None,
            data: vec![0; 3],
        }
    }

    #[test]
    fn file_extension() {
        assert_eq!(upload("scan.PNG").extension().as_deref(), Some(".png"));
        assert_eq!(upload("a.b.dcm").extension().as_deref(), Some(".dcm"));
        assert_eq!(upload("scan").extension(), None);
        assert_eq!(upload("scan.png").size(), 3);
    }
}
