use thiserror::Error;

const IMAGE_MEDIA_PREFIX: &str = "image/";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("selected file is not an image (media type \"{0}\")")]
    InvalidMediaType(String),
}

/// A file as handed over by the user, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCandidate {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// An accepted image. Immutable for the duration of a pipeline run and
/// owned exclusively by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Accepts any candidate whose declared media type is in the image family.
/// No size limit is enforced here; a display layer may advertise one.
pub fn validate(candidate: ImageCandidate) -> Result<SelectedImage, ValidationError> {
    if !candidate.media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        return Err(ValidationError::InvalidMediaType(candidate.media_type));
    }

    Ok(SelectedImage {
        file_name: candidate.file_name,
        media_type: candidate.media_type,
        bytes: candidate.bytes,
    })
}
