use embassy_time::Duration;
use log::LevelFilter;

use crate::constants::*;
use crate::topic::{self, TopicKind};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    EmptyDeviceId,
    DeviceIdTooLong,
    InvalidDeviceId,
    InvalidSsid,
    InvalidWifiPassword,
    MissingServerHost,
    InvalidPort,
    ZeroInterval(Interval),
    TopicMismatch(TopicKind),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::EmptyDeviceId => f.write_str("device id is empty"),
            Error::DeviceIdTooLong => {
                write!(f, "device id exceeds {} bytes", DEVICE_ID_MAX_LEN)
            }
            Error::InvalidDeviceId => f.write_str("device id is not a valid topic level"),
            Error::InvalidSsid => {
                write!(f, "wifi ssid must be 1..={} bytes", WIFI_SSID_MAX_LEN)
            }
            Error::InvalidWifiPassword => write!(
                f,
                "wifi password must be empty, {}..={} bytes or {} hex digits",
                WIFI_PASSWORD_MIN_LEN, WIFI_PASSWORD_MAX_LEN, WIFI_PSK_HEX_LEN
            ),
            Error::MissingServerHost => f.write_str("server host is empty"),
            Error::InvalidPort => f.write_str("server port is 0"),
            Error::ZeroInterval(interval) => write!(f, "{:?} interval is 0", interval),
            Error::TopicMismatch(kind) => {
                write!(f, "{} topic does not follow devices/<id>/{}", kind.suffix(), kind.suffix())
            }
        }
    }
}

/// WPA2 passphrase, or the raw 256-bit PSK written as hex.
fn is_valid_psk(password: &str) -> bool {
    (WIFI_PASSWORD_MIN_LEN..=WIFI_PASSWORD_MAX_LEN).contains(&password.len())
        || (password.len() == WIFI_PSK_HEX_LEN
            && password.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Names one of the timing fields of [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    OtaCheck,
    SensorRead,
    DeepSleep,
}

/// Per-device topic names, always `devices/<device_id>/<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topics {
    pub telemetry: &'static str,
    pub commands: &'static str,
    pub ota: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    // Device ID (MQTT client id, DHCP hostname and topic segment)
    pub device_id: &'static str,

    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key (empty for open networks)
    pub wifi_password: &'static str,

    // MQTT broker hostname or IP address
    pub server_host: &'static str,

    // MQTT broker port (8883 for TLS)
    pub server_port: u16,

    // Topics derived from the device ID
    pub topics: Topics,

    // Interval between firmware update checks, in milliseconds
    pub ota_check_interval_ms: u32,

    // Interval between sensor reads, in milliseconds
    pub sensor_read_interval_ms: u32,

    // Deep-sleep duration in low-power mode, in seconds
    pub deep_sleep_duration_secs: u32,

    // Verbose serial output
    pub debug: bool,
}

/// Builds a [`Config`] from literals.
///
/// Topics are concatenated from the device id at compile time, so a
/// record produced here always satisfies the topic layout.
#[macro_export]
macro_rules! device_config {
    (
        device_id: $device_id:literal,
        wifi_ssid: $wifi_ssid:literal,
        wifi_password: $wifi_password:literal,
        server_host: $server_host:literal,
        server_port: $server_port:literal,
        ota_check_interval_ms: $ota_check_interval_ms:literal,
        sensor_read_interval_ms: $sensor_read_interval_ms:literal,
        deep_sleep_duration_secs: $deep_sleep_duration_secs:literal,
        debug: $debug:literal $(,)?
    ) => {
        $crate::config::Config {
            device_id: $device_id,
            wifi_ssid: $wifi_ssid,
            wifi_password: $wifi_password,
            server_host: $server_host,
            server_port: $server_port,
            topics: $crate::config::Topics {
                telemetry: concat!("devices/", $device_id, "/telemetry"),
                commands: concat!("devices/", $device_id, "/commands"),
                ota: concat!("devices/", $device_id, "/ota"),
            },
            ota_check_interval_ms: $ota_check_interval_ms,
            sensor_read_interval_ms: $sensor_read_interval_ms,
            deep_sleep_duration_secs: $deep_sleep_duration_secs,
            debug: $debug,
        }
    };
}

/// Shipped template; every field but the device id must be replaced.
pub const TEMPLATE: Config = crate::device_config! {
    device_id: "esp32_device_001",
    wifi_ssid: "your_wifi_ssid",
    wifi_password: "your_wifi_password",
    server_host: "your-server-address.com",
    server_port: 8883,
    ota_check_interval_ms: 3_600_000,
    sensor_read_interval_ms: 30_000,
    deep_sleep_duration_secs: 60,
    debug: true,
};

impl Config {
    pub const fn topic(&self, kind: TopicKind) -> &'static str {
        match kind {
            TopicKind::Telemetry => self.topics.telemetry,
            TopicKind::Commands => self.topics.commands,
            TopicKind::Ota => self.topics.ota,
        }
    }

    const fn raw_interval(&self, interval: Interval) -> u64 {
        match interval {
            Interval::OtaCheck => self.ota_check_interval_ms as u64,
            Interval::SensorRead => self.sensor_read_interval_ms as u64,
            Interval::DeepSleep => self.deep_sleep_duration_secs as u64,
        }
    }

    pub const fn ota_check_interval(&self) -> Duration {
        Duration::from_millis(self.ota_check_interval_ms as u64)
    }

    pub const fn sensor_read_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_read_interval_ms as u64)
    }

    pub const fn deep_sleep_duration(&self) -> Duration {
        Duration::from_secs(self.deep_sleep_duration_secs as u64)
    }

    pub const fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// True while Wi-Fi credentials or the broker host still carry template values.
    pub fn is_template(&self) -> bool {
        self.wifi_ssid == TEMPLATE.wifi_ssid
            || self.wifi_password == TEMPLATE.wifi_password
            || self.server_host == TEMPLATE.server_host
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.device_id.is_empty() {
            return Err(Error::EmptyDeviceId);
        }
        if self.device_id.len() > DEVICE_ID_MAX_LEN {
            return Err(Error::DeviceIdTooLong);
        }
        if !topic::is_valid_level(self.device_id) {
            return Err(Error::InvalidDeviceId);
        }

        if self.wifi_ssid.is_empty() || self.wifi_ssid.len() > WIFI_SSID_MAX_LEN {
            return Err(Error::InvalidSsid);
        }
        let psk_len = self.wifi_password.len();
        if psk_len != 0 && !is_valid_psk(self.wifi_password) {
            return Err(Error::InvalidWifiPassword);
        }

        if self.server_host.is_empty() {
            return Err(Error::MissingServerHost);
        }
        if self.server_port == 0 {
            return Err(Error::InvalidPort);
        }

        for interval in [Interval::OtaCheck, Interval::SensorRead, Interval::DeepSleep] {
            if self.raw_interval(interval) == 0 {
                return Err(Error::ZeroInterval(interval));
            }
        }

        for kind in TopicKind::ALL {
            if !topic::matches(self.topic(kind), self.device_id, kind) {
                return Err(Error::TopicMismatch(kind));
            }
        }

        if self.server_port != MQTT_TLS_PORT {
            log::warn!(
                "Broker port {} is not the MQTT over TLS port {}",
                self.server_port,
                MQTT_TLS_PORT
            );
        }
        if self.is_template() {
            log::warn!("Configuration still holds template Wi-Fi or broker values");
        }
        if psk_len == 0 {
            log::warn!("Empty Wi-Fi password, joining {:?} as an open network", self.wifi_ssid);
        }

        log::debug!(
            "Configuration for {} OK: broker {}:{}",
            self.device_id,
            self.server_host,
            self.server_port
        );
        Ok(())
    }
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    const LAB: Config = crate::device_config! {
        device_id: "esp32_device_001",
        wifi_ssid: "lab-network",
        wifi_password: "1234567891",
        server_host: "192.168.1.20",
        server_port: 8883,
        ota_check_interval_ms: 3_600_000,
        sensor_read_interval_ms: 30_000,
        deep_sleep_duration_secs: 60,
        debug: false,
    };

    #[test]
    fn template_values() {
        assert_eq!(TEMPLATE.device_id, "esp32_device_001");
        assert_eq!(TEMPLATE.server_port, 8883);
        assert_eq!(TEMPLATE.ota_check_interval_ms, 3_600_000);
        assert_eq!(TEMPLATE.sensor_read_interval_ms, 30_000);
        assert_eq!(TEMPLATE.deep_sleep_duration_secs, 60);
        assert!(TEMPLATE.debug);
        assert!(TEMPLATE.is_template());
    }

    #[test]
    fn macro_derives_topics() {
        assert_eq!(LAB.topics.telemetry, "devices/esp32_device_001/telemetry");
        assert_eq!(LAB.topics.commands, "devices/esp32_device_001/commands");
        assert_eq!(LAB.topics.ota, "devices/esp32_device_001/ota");
    }

    #[test]
    fn lab_config_is_valid() {
        assert_eq!(LAB.validate(), Ok(()));
        assert!(!LAB.is_template());
        assert_eq!(LAB.log_level(), LevelFilter::Info);
        assert_eq!(TEMPLATE.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn durations() {
        assert_eq!(LAB.ota_check_interval(), Duration::from_secs(3600));
        assert_eq!(LAB.sensor_read_interval(), Duration::from_secs(30));
        assert_eq!(LAB.deep_sleep_duration(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_bad_identity() {
        let cfg = Config { device_id: "", ..LAB };
        assert_eq!(cfg.validate(), Err(Error::EmptyDeviceId));

        let cfg = Config {
            device_id: "a_device_identifier_that_is_far_too_long",
            ..LAB
        };
        assert_eq!(cfg.validate(), Err(Error::DeviceIdTooLong));

        let cfg = Config { device_id: "dev#1", ..LAB };
        assert_eq!(cfg.validate(), Err(Error::InvalidDeviceId));
    }

    #[test]
    fn rejects_bad_network() {
        let cfg = Config { wifi_ssid: "", ..LAB };
        assert_eq!(cfg.validate(), Err(Error::InvalidSsid));

        let cfg = Config { wifi_password: "short", ..LAB };
        assert_eq!(cfg.validate(), Err(Error::InvalidWifiPassword));

        let cfg = Config { wifi_password: "", ..LAB };
        assert_eq!(cfg.validate(), Ok(()));

        let raw_psk = "0123456789abcdefABCDEF0123456789abcdef0123456789abcdef0123456789";
        assert_eq!(raw_psk.len(), WIFI_PSK_HEX_LEN);
        let cfg = Config { wifi_password: raw_psk, ..LAB };
        assert_eq!(cfg.validate(), Ok(()));

        let not_hex = "g123456789abcdefABCDEF0123456789abcdef0123456789abcdef0123456789";
        let cfg = Config { wifi_password: not_hex, ..LAB };
        assert_eq!(cfg.validate(), Err(Error::InvalidWifiPassword));

        let cfg = Config { server_host: "", ..LAB };
        assert_eq!(cfg.validate(), Err(Error::MissingServerHost));

        let cfg = Config { server_port: 0, ..LAB };
        assert_eq!(cfg.validate(), Err(Error::InvalidPort));
    }

    #[test]
    fn rejects_zero_intervals() {
        let cfg = Config { ota_check_interval_ms: 0, ..LAB };
        assert_eq!(cfg.validate(), Err(Error::ZeroInterval(Interval::OtaCheck)));

        let cfg = Config { sensor_read_interval_ms: 0, ..LAB };
        assert_eq!(cfg.validate(), Err(Error::ZeroInterval(Interval::SensorRead)));

        let cfg = Config { deep_sleep_duration_secs: 0, ..LAB };
        assert_eq!(cfg.validate(), Err(Error::ZeroInterval(Interval::DeepSleep)));
    }

    #[test]
    fn rejects_hand_built_topics() {
        let cfg = Config {
            device_id: "esp32_device_002",
            ..LAB
        };
        assert_eq!(cfg.validate(), Err(Error::TopicMismatch(TopicKind::Telemetry)));
    }
}
