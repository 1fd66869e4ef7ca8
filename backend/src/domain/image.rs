//! Recipe image uploads delivered as base64 data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Largest decoded image accepted, in bytes.
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Image formats accepted for recipe pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// File extension used when storing the image.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// Guess the format of a stored file from its extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::from_subtype(extension)
    }

    /// MIME type served for the image.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Reasons a data URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageUploadError {
    #[error("image must be a data URL of the form data:image/<type>;base64,<payload>")]
    Malformed,
    #[error("image type {0} is not supported")]
    UnsupportedFormat(String),
    #[error("image payload is not valid base64")]
    InvalidBase64,
    #[error("image payload is empty")]
    Empty,
    #[error("image exceeds {max} bytes")]
    TooLarge { max: usize },
}

/// Decoded image ready to be written to storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Decode a `data:image/<type>;base64,<payload>` string.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{ImageFormat, ImageUpload};
    ///
    /// let upload = ImageUpload::from_data_url("data:image/png;base64,aGVsbG8=")
    ///     .expect("valid data url");
    /// assert_eq!(upload.format(), ImageFormat::Png);
    /// assert_eq!(upload.bytes(), b"hello");
    /// ```
    pub fn from_data_url(value: &str) -> Result<Self, ImageUploadError> {
        let rest = value
            .trim()
            .strip_prefix("data:image/")
            .ok_or(ImageUploadError::Malformed)?;
        let (subtype, payload) = rest
            .split_once(";base64,")
            .ok_or(ImageUploadError::Malformed)?;
        let format = ImageFormat::from_subtype(subtype)
            .ok_or_else(|| ImageUploadError::UnsupportedFormat(subtype.to_owned()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ImageUploadError::InvalidBase64)?;
        if bytes.is_empty() {
            return Err(ImageUploadError::Empty);
        }
        if bytes.len() > IMAGE_MAX_BYTES {
            return Err(ImageUploadError::TooLarge {
                max: IMAGE_MAX_BYTES,
            });
        }
        Ok(Self { format, bytes })
    }

    /// Detected format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
