// Uploaded file domain model and validation rules
use bytes::Bytes;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types the analyzer understands (.csv, .xlsx, .xls).
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

/// One uploaded spreadsheet. Lives only for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: String, mime_type: String, bytes: Bytes) -> Self {
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Check the upstream contract: accepted MIME type and size ceiling.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !ACCEPTED_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(ValidationError::UnsupportedType(self.mime_type.clone()));
        }
        if self.size_bytes() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge(self.size_bytes()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid file type '{0}'; only .csv, .xlsx and .xls files are allowed")]
    UnsupportedType(String),
    #[error("file is too large ({0} bytes); maximum is 10MB")]
    TooLarge(usize),
}
