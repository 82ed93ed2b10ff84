//! `data:<mime>;base64,<payload>` encoding for images crossing the API boundary.
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

const DEFAULT_MIME: &str = "image/png";

/// Image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        InlineImage { mime_type: mime_type.into(), bytes }
    }

    /// Build from a base64 payload, rejecting payloads that do not decode.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Option<Self> {
        let bytes = BASE64.decode(payload.trim()).ok()?;
        Some(InlineImage::new(mime_type, bytes))
    }

    pub fn base64_payload(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload())
    }
}

/// Parse a data URI. Returns `None` for anything that is not a single-comma
/// `data:` URI with a decodable base64 payload.
pub fn parse(uri: &str) -> Option<InlineImage> {
    let rest = uri.strip_prefix("data:")?;
    let mut pieces = rest.split(',');
    let header = pieces.next()?;
    let payload = pieces.next()?;
    if pieces.next().is_some() {
        return None;
    }
    let mime = header.split(';').next().unwrap_or("").trim();
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
    InlineImage::from_base64(mime, payload)
}
