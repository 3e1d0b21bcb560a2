//! Inline `data:` URIs as found in self-contained glTF files.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::SceneError;

#[derive(Debug, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub base64: bool,
    pub data: &'a str,
}

impl<'a> DataUri<'a> {
    /// Splits `uri` into its media type and payload, or returns `None` when it
    /// is not a `data:` URI.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let (mime_type, base64) = match header.strip_suffix(";base64") {
            Some(mime_type) => (mime_type, true),
            None => (header, false),
        };
        let mime_type = mime_type.split(';').next().unwrap_or_default();
        Some(Self { mime_type, base64, data })
    }

    pub fn decode(&self) -> Result<Vec<u8>, SceneError> {
        if !self.base64 {
            return Ok(self.data.as_bytes().to_vec());
        }
        STANDARD.decode(self.data).map_err(|e| SceneError::Parse {
            url: format!("data:{};base64", self.mime_type),
            reason: e.to_string(),
        })
    }
}

/// The subtype of a media type (`png` for `image/png`), used as a format hint.
pub fn subtype(mime_type: &str) -> &str {
    mime_type.rsplit('/').next().unwrap_or(mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_payloads_decode() {
        let uri = DataUri::parse("data:application/octet-stream;base64,AAECAw==").unwrap();
        assert_eq!(uri.mime_type, "application/octet-stream");
        assert!(uri.base64);
        assert_eq!(uri.decode().unwrap(), [0, 1, 2, 3]);
    }

    #[test]
    fn plain_payloads_are_taken_verbatim() {
        let uri = DataUri::parse("data:text/plain;charset=utf-8,moon").unwrap();
        assert_eq!(uri.mime_type, "text/plain");
        assert_eq!(subtype(uri.mime_type), "plain");
        assert_eq!(uri.decode().unwrap(), b"moon");
    }

    #[test]
    fn other_uris_are_not_data() {
        assert_eq!(DataUri::parse("station.bin"), None);
        assert_eq!(DataUri::parse("data:no-comma"), None);
    }

    #[test]
    fn broken_base64_is_a_parse_error() {
        let uri = DataUri::parse("data:application/gltf-buffer;base64,@@@").unwrap();
        assert!(matches!(uri.decode(), Err(SceneError::Parse { .. })));
    }
}
