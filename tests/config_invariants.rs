//! Consistency checks over the constants compiled into the image.

use iot_device::config::{CONFIG, TEMPLATE};
use iot_device::constants::{MQTT_TLS_PORT, TOPIC_MAX_LEN};
use iot_device::credentials::{self, Slot};
use iot_device::pem::Label;
use iot_device::topic::{self, TopicKind};

#[test]
fn topics_follow_device_id() {
    for cfg in [CONFIG, TEMPLATE] {
        assert_eq!(
            cfg.topics.telemetry,
            format!("devices/{}/telemetry", cfg.device_id)
        );
        assert_eq!(
            cfg.topics.commands,
            format!("devices/{}/commands", cfg.device_id)
        );
        assert_eq!(cfg.topics.ota, format!("devices/{}/ota", cfg.device_id));
    }
}

#[test]
fn topics_route_back_to_device() {
    for kind in TopicKind::ALL {
        let parsed = topic::parse(CONFIG.topic(kind)).unwrap();
        assert_eq!(parsed.device_id, CONFIG.device_id);
        assert_eq!(parsed.kind, kind);

        let built: heapless::String<TOPIC_MAX_LEN> = topic::build(CONFIG.device_id, kind).unwrap();
        assert_eq!(built.as_str(), CONFIG.topic(kind));
    }
}

#[test]
fn template_uses_tls_port() {
    assert_eq!(TEMPLATE.server_port, MQTT_TLS_PORT);
    assert_eq!(MQTT_TLS_PORT, 8883);
}

#[test]
fn shipped_example_config_matches_template() {
    let example: toml::Table = include_str!("../cfg.toml.example").parse().unwrap();
    let text = |key: &str| example[key].as_str().unwrap();
    let int = |key: &str| example[key].as_integer().unwrap();

    assert_eq!(int("server_port"), 8883);
    for key in [
        "ota_check_interval_ms",
        "sensor_read_interval_ms",
        "deep_sleep_duration_secs",
    ] {
        assert!(int(key) > 0, "{} must be positive", key);
    }

    assert_eq!(text("wifi_ssid"), "your_wifi_ssid");
    assert_eq!(text("wifi_password"), "your_wifi_password");
    assert_eq!(text("server_host"), "your-server-address.com");

    assert_eq!(text("device_id"), TEMPLATE.device_id);
    assert_eq!(text("wifi_ssid"), TEMPLATE.wifi_ssid);
    assert_eq!(text("wifi_password"), TEMPLATE.wifi_password);
    assert_eq!(text("server_host"), TEMPLATE.server_host);
    assert_eq!(int("server_port"), i64::from(TEMPLATE.server_port));
    assert_eq!(
        int("ota_check_interval_ms"),
        i64::from(TEMPLATE.ota_check_interval_ms)
    );
    assert_eq!(
        int("sensor_read_interval_ms"),
        i64::from(TEMPLATE.sensor_read_interval_ms)
    );
    assert_eq!(
        int("deep_sleep_duration_secs"),
        i64::from(TEMPLATE.deep_sleep_duration_secs)
    );
    assert_eq!(example["debug"].as_bool(), Some(TEMPLATE.debug));
    assert!(TEMPLATE.is_template());
}

#[test]
fn intervals_are_positive() {
    for cfg in [CONFIG, TEMPLATE] {
        assert!(cfg.ota_check_interval_ms > 0);
        assert!(cfg.sensor_read_interval_ms > 0);
        assert!(cfg.deep_sleep_duration_secs > 0);
    }
}

#[test]
fn compiled_config_validates() {
    assert_eq!(CONFIG.validate(), Ok(()));
    assert_eq!(TEMPLATE.validate(), Ok(()));
}

#[test]
fn placeholder_bundle_holds_sentinels() {
    let bundle = credentials::PLACEHOLDER;
    assert_eq!(
        bundle.block(Slot::RootCa).unwrap().body,
        "REPLACE_WITH_YOUR_ROOT_CA_CERTIFICATE"
    );
    assert_eq!(
        bundle.block(Slot::DeviceCert).unwrap().body,
        "REPLACE_WITH_YOUR_DEVICE_CERTIFICATE"
    );
    assert_eq!(
        bundle.block(Slot::DeviceKey).unwrap().body,
        "REPLACE_WITH_YOUR_DEVICE_PRIVATE_KEY"
    );
    assert!(bundle.validate().is_err());
}

#[test]
fn example_bundle_is_pem() {
    let bundle = credentials::EXAMPLE;
    assert_eq!(bundle.block(Slot::RootCa).unwrap().label, Label::Certificate);
    assert_eq!(bundle.block(Slot::DeviceCert).unwrap().label, Label::Certificate);
    assert!(bundle.block(Slot::DeviceKey).unwrap().label.is_private_key());
    for slot in Slot::ALL {
        assert!(bundle.block(slot).unwrap().check().is_ok());
    }
}

#[test]
fn device_bundle_is_framed() {
    // Host builds may still carry placeholders; framing must hold either way.
    for slot in Slot::ALL {
        assert!(credentials::DEVICE.block(slot).is_ok());
    }
    if !credentials::DEVICE.is_placeholder() {
        assert_eq!(credentials::DEVICE.validate(), Ok(()));
    }
}
