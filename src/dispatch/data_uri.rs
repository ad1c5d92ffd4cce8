use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose};
use std::fmt;

pub const PNG_MEDIA_TYPE: &str = "image/png";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// A base64 `data:` URI. The payload is kept as received and only checked on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    media_type: String,
    payload: String,
}

impl DataUri {
    pub fn png(payload: impl Into<String>) -> Self {
        Self {
            media_type: PNG_MEDIA_TYPE.to_string(),
            payload: payload.into(),
        }
    }

    pub fn parse(source: &str) -> Result<Self> {
        let rest = source
            .strip_prefix("data:")
            .ok_or_else(|| Error::invalid_response("not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::invalid_response("data URI has no payload separator"))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::invalid_response("data URI is not base64 encoded"))?;

        Ok(Self {
            media_type: media_type.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(general_purpose::STANDARD.decode(&self.payload)?)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, self.payload)
    }
}

pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}
