use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Response relayed to the caller: the captured stdout of a client program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueResponse {
    pub value: String,
}

/// Upper bound on key and value sizes forwarded to the client programs.
pub const MAX_ARG_BYTES: usize = 512;

/// A key must be non-empty, at most `MAX_ARG_BYTES` bytes, and free of
/// control characters.
pub fn validate_key(key: &str) -> Result<(), GatewayError> {
    check_arg(key).map_err(GatewayError::InvalidKey)
}

/// Values are bound by the same rules as keys.
pub fn validate_value(value: &str) -> Result<(), GatewayError> {
    check_arg(value).map_err(GatewayError::InvalidValue)
}

fn check_arg(arg: &str) -> Result<(), String> {
    if arg.is_empty() {
        return Err("must not be empty".to_string());
    }
    if arg.len() > MAX_ARG_BYTES {
        return Err(format!(
            "must not exceed {} bytes, got {}",
            MAX_ARG_BYTES,
            arg.len()
        ));
    }
    let re = Regex::new(r"\A[^\p{Cc}]+\z").unwrap();
    if !re.is_match(arg) {
        return Err("must not contain control characters".to_string());
    }
    Ok(())
}
