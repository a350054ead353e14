use core::fmt::Write;
use heapless::String;

use crate::constants::TELEMETRY_PAYLOAD_MAX;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidKey,
    Overflow,
}

/// True if `s` can be emitted between JSON quotes without escaping.
pub(crate) fn is_plain_json_str(s: &str) -> bool {
    !s.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

/// Formats readings as a flat JSON object, e.g. `{"temperature":21.50}`.
///
/// Non-finite values are written as `null`.
pub fn format_payload(
    readings: &[(&str, f32)],
) -> Result<String<TELEMETRY_PAYLOAD_MAX>, Error> {
    let mut payload: String<TELEMETRY_PAYLOAD_MAX> = String::new();

    payload.push('{').map_err(|_| Error::Overflow)?;
    for (i, (key, value)) in readings.iter().enumerate() {
        if key.is_empty() || !is_plain_json_str(key) {
            return Err(Error::InvalidKey);
        }
        if i > 0 {
            payload.push(',').map_err(|_| Error::Overflow)?;
        }

        let written = if value.is_finite() {
            write!(payload, "\"{}\":{:.2}", key, value)
        } else {
            write!(payload, "\"{}\":null", key)
        };
        written.map_err(|_| Error::Overflow)?;
    }
    payload.push('}').map_err(|_| Error::Overflow)?;

    log::debug!("Formatted telemetry payload: {}", payload);
    Ok(payload)
}
