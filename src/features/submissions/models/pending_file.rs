use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// The uploaded photo held in the session store until commit.
///
/// The session medium expects character data, so the raw bytes travel as
/// base64 text; metadata rides alongside so the original file can be
/// reconstructed exactly at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFile {
    /// Base64-encoded file content
    pub content: String,
    pub name: String,
    pub content_type: String,
    pub size: i64,
}

impl PendingFile {
    pub fn from_bytes(name: &str, content_type: &str, bytes: &[u8]) -> Self {
        Self {
            content: STANDARD.encode(bytes),
            name: name.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len() as i64,
        }
    }

    /// Decode the stored text form back to the original bytes
    pub fn decode_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_byte_values() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let pending = PendingFile::from_bytes("photo.jpg", "image/jpeg", &bytes);

        assert_eq!(pending.size, 256);
        assert_eq!(pending.decode_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_empty_and_jpeg_magic() {
        let empty = PendingFile::from_bytes("e.bin", "application/octet-stream", &[]);
        assert_eq!(empty.decode_bytes().unwrap(), Vec::<u8>::new());
        assert_eq!(empty.size, 0);

        let magic = [0xffu8, 0xd8, 0xff, 0xe0];
        let jpeg = PendingFile::from_bytes("p.jpg", "image/jpeg", &magic);
        assert_eq!(jpeg.decode_bytes().unwrap(), magic);
    }

    #[test]
    fn test_survives_json_round_trip() {
        let bytes = vec![0u8, 159, 146, 150, 10, 13];
        let pending = PendingFile::from_bytes("p.png", "image/png", &bytes);

        let json = serde_json::to_string(&pending).unwrap();
        let restored: PendingFile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, pending);
        assert_eq!(restored.decode_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_corrupt_text_fails_to_decode() {
        let pending = PendingFile {
            content: "not base64 !!!".to_string(),
            name: "p.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 3,
        };
        assert!(pending.decode_bytes().is_err());
    }
}
