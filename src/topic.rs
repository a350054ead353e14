//! MQTT topic layout.
//!
//! Every per-device topic has three levels: `devices/<device_id>/<kind>`.
//! The broker side routes on the second level, so a device id must be a
//! single, wildcard-free topic level.

use core::fmt::Write;
use heapless::String;

use crate::constants::TOPIC_PREFIX;

pub use crate::constants::STATUS_TOPIC;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidDeviceId,
    Overflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidDeviceId => f.write_str("device id is not a valid topic level"),
            Error::Overflow => f.write_str("topic does not fit the buffer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// Device → broker sensor data
    Telemetry,
    /// Broker → device commands
    Commands,
    /// Broker → device update notifications
    Ota,
}

impl TopicKind {
    pub const ALL: [TopicKind; 3] = [TopicKind::Telemetry, TopicKind::Commands, TopicKind::Ota];

    pub const fn suffix(self) -> &'static str {
        match self {
            TopicKind::Telemetry => "telemetry",
            TopicKind::Commands => "commands",
            TopicKind::Ota => "ota",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.suffix() == suffix)
    }
}

/// A parsed per-device topic, borrowing the device id from the topic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTopic<'a> {
    pub device_id: &'a str,
    pub kind: TopicKind,
}

/// Returns true if `s` can be used as one topic level and DHCP hostname.
pub fn is_valid_level(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| matches!(c, '/' | '+' | '#' | '\0') || c.is_whitespace())
}

/// Splits `devices/<id>/<kind>` into its parts.
///
/// Anything else, including [`STATUS_TOPIC`], yields `None`.
pub fn parse(topic: &str) -> Option<DeviceTopic<'_>> {
    let mut levels = topic.split('/');

    if levels.next()? != TOPIC_PREFIX {
        return None;
    }
    let device_id = levels.next()?;
    let kind = TopicKind::from_suffix(levels.next()?)?;

    if levels.next().is_some() || !is_valid_level(device_id) {
        return None;
    }

    Some(DeviceTopic { device_id, kind })
}

/// Returns true if `topic` is exactly the `kind` topic of `device_id`.
pub fn matches(topic: &str, device_id: &str, kind: TopicKind) -> bool {
    if !is_valid_level(device_id) {
        return false;
    }

    let Some(rest) = topic
        .strip_prefix(TOPIC_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return false;
    };

    rest.strip_prefix(device_id)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|suffix| suffix == kind.suffix())
}

/// Builds the `kind` topic for `device_id` into a fixed-capacity string.
pub fn build<const N: usize>(device_id: &str, kind: TopicKind) -> Result<String<N>, Error> {
    if !is_valid_level(device_id) {
        return Err(Error::InvalidDeviceId);
    }

    let mut topic = String::new();
    write!(topic, "{}/{}/{}", TOPIC_PREFIX, device_id, kind.suffix())
        .map_err(|_| Error::Overflow)?;

    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOPIC_MAX_LEN;

    #[test]
    fn parse_accepts_each_kind() {
        for kind in TopicKind::ALL {
            let topic: String<TOPIC_MAX_LEN> = build("esp32_device_001", kind).unwrap();
            let parsed = parse(&topic).unwrap();
            assert_eq!(parsed.device_id, "esp32_device_001");
            assert_eq!(parsed.kind, kind);
        }
    }

    #[test]
    fn parse_rejects_foreign_topics() {
        assert_eq!(parse(STATUS_TOPIC), None);
        assert_eq!(parse("devices//telemetry"), None);
        assert_eq!(parse("devices/a/telemetry/extra"), None);
        assert_eq!(parse("sensors/a/telemetry"), None);
        assert_eq!(parse("devices/a/logs"), None);
        assert_eq!(parse("devices/+/telemetry"), None);
    }

    #[test]
    fn matches_is_exact() {
        assert!(matches("devices/dev1/ota", "dev1", TopicKind::Ota));
        assert!(!matches("devices/dev1/ota", "dev", TopicKind::Ota));
        assert!(!matches("devices/dev10/ota", "dev1", TopicKind::Ota));
        assert!(!matches("devices/dev1/ota", "dev1", TopicKind::Commands));
        assert!(!matches("devices/dev1/otax", "dev1", TopicKind::Ota));
    }

    #[test]
    fn matches_agrees_with_parse_on_multi_level_ids() {
        assert_eq!(parse("devices/a/b/ota"), None);
        assert!(!matches("devices/a/b/ota", "a/b", TopicKind::Ota));
        assert!(!matches("devices//ota", "", TopicKind::Ota));
    }

    #[test]
    fn build_reports_overflow() {
        assert_eq!(
            build::<16>("esp32_device_001", TopicKind::Telemetry),
            Err(Error::Overflow)
        );
    }

    #[test]
    fn build_rejects_wildcards() {
        assert_eq!(
            build::<TOPIC_MAX_LEN>("dev/1", TopicKind::Commands),
            Err(Error::InvalidDeviceId)
        );
        assert_eq!(
            build::<TOPIC_MAX_LEN>("", TopicKind::Commands),
            Err(Error::InvalidDeviceId)
        );
    }
}
