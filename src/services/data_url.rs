use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;

/// Largest decoded payload accepted for a hosted file.
pub const MAX_HOSTED_FILE_BYTES: usize = 2 * 1024 * 1024;

lazy_static! {
    static ref DATA_URL: Regex =
        Regex::new(r"^data:([A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9!#$&^_.+-]+)(?:;[^,;]+=[^,;]+)*;base64,(.*)$")
            .expect("data url pattern is valid");
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DataUrlError {
    #[error("Malformed data URL")]
    Malformed,
    #[error("Invalid base64 payload")]
    InvalidBase64,
    #[error("File too large")]
    TooLarge,
}

#[derive(Debug)]
pub struct DecodedDataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn decode(data_url: &str) -> Result<DecodedDataUrl, DataUrlError> {
    let caps = DATA_URL.captures(data_url.trim()).ok_or(DataUrlError::Malformed)?;
    let mime_type = caps[1].to_ascii_lowercase();
    let payload = &caps[2];

    // Cheap upper bound before decoding: 4 base64 chars carry 3 bytes
    if payload.len() / 4 * 3 > MAX_HOSTED_FILE_BYTES + 3 {
        return Err(DataUrlError::TooLarge);
    }

    let bytes = STANDARD.decode(payload).map_err(|_| DataUrlError::InvalidBase64)?;
    if bytes.len() > MAX_HOSTED_FILE_BYTES {
        return Err(DataUrlError::TooLarge);
    }

    Ok(DecodedDataUrl { mime_type, bytes })
}

pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
