/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// First topic level shared by every device topic
pub const TOPIC_PREFIX: &str = "devices";
/// Fleet-wide status channel
pub const STATUS_TOPIC: &str = "devices/status";
/// Upper bound for a fully built device topic
pub const TOPIC_MAX_LEN: usize = 64;

/// Conventional port for MQTT over TLS
pub const MQTT_TLS_PORT: u16 = 8883;

/// Device ID doubles as DHCP hostname, which is capped at 32 bytes
pub const DEVICE_ID_MAX_LEN: usize = 32;
/// 802.11 SSID limit
pub const WIFI_SSID_MAX_LEN: usize = 32;
/// WPA2 passphrase bounds (empty means open network)
pub const WIFI_PASSWORD_MIN_LEN: usize = 8;
pub const WIFI_PASSWORD_MAX_LEN: usize = 63;
/// Raw WPA2 PSK given as hex digits
pub const WIFI_PSK_HEX_LEN: usize = 64;

/// Size of the telemetry JSON payload buffer
pub const TELEMETRY_PAYLOAD_MAX: usize = 256;
/// Size of the status report JSON payload buffer
pub const STATUS_PAYLOAD_MAX: usize = 128;

/// Maximum size of a NUL-terminated PEM handed to a TLS stack
pub const TLS_BUFFER_MAX: usize = 4096;

/// Size of the heap in DRAM (internal memory)
pub const HEAP_SIZE: usize = 72 * 1024;

/// Size of the TCP socket receive buffer used by the broker probe
pub const RX_BUFFER_SIZE: usize = 1024;
/// Size of the TCP socket transmit buffer used by the broker probe
pub const TX_BUFFER_SIZE: usize = 1024;
/// TCP connect timeout for the broker probe
pub const SOCKET_TIMEOUT_SECS: u64 = 30;

/// Interval in seconds between broker reachability probes
pub const BROKER_PROBE_INTERVAL_SECS: u64 = 60;

pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const WIFI_RECONNECT_DELAY_MS: u64 = 5000;
