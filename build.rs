use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

const CONFIG_FILE: &str = "cfg.toml";
const CONFIG_TEMPLATE: &str = "cfg.toml.example";
const PLACEHOLDER_MARKER: &str = "REPLACE_WITH_";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    device_id: String,
    wifi_ssid: String,
    wifi_password: String,
    server_host: String,
    server_port: u16,
    ota_check_interval_ms: u32,
    sensor_read_interval_ms: u32,
    deep_sleep_duration_secs: u32,
    debug: bool,
    tls_ca: String,
    tls_cert: String,
    tls_key: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if either toml changes
    println!("cargo:rerun-if-changed={CONFIG_FILE}");
    println!("cargo:rerun-if-changed={CONFIG_TEMPLATE}");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR")?;
    let manifest_dir = Path::new(&manifest_dir);

    let source = if manifest_dir.join(CONFIG_FILE).exists() {
        CONFIG_FILE
    } else {
        println!("cargo:warning={CONFIG_FILE} not found, building with {CONFIG_TEMPLATE}");
        CONFIG_TEMPLATE
    };

    // Read and parse
    let toml_str = fs::read_to_string(manifest_dir.join(source))?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    let firmware = env::var_os("CARGO_FEATURE_FIRMWARE").is_some();

    let mut pem_paths = Vec::with_capacity(3);
    for (name, relative) in [
        ("tls_ca", &raw.tls_ca),
        ("tls_cert", &raw.tls_cert),
        ("tls_key", &raw.tls_key),
    ] {
        let path = manifest_dir.join(relative);
        println!("cargo:rerun-if-changed={}", path.display());

        let pem = fs::read_to_string(&path)
            .map_err(|e| format!("{name}: cannot read {}: {e}", path.display()))?;

        // Placeholder material must never reach a flashed image
        if firmware && pem.contains(PLACEHOLDER_MARKER) {
            return Err(format!(
                "{name} ({}) still holds placeholder content, provision real credentials in {source}",
                path.display()
            )
            .into());
        }

        pem_paths.push(path.display().to_string());
    }

    if firmware && raw.wifi_ssid == "your_wifi_ssid" {
        println!("cargo:warning=wifi_ssid is still the template value");
    }

    // Generate Rust code
    let config = format!(
        r#"
        pub const CONFIG: Config = crate::device_config! {{
            device_id: {id:?},
            wifi_ssid: {ssid:?},
            wifi_password: {psk:?},
            server_host: {host:?},
            server_port: {port},
            ota_check_interval_ms: {ota},
            sensor_read_interval_ms: {sensor},
            deep_sleep_duration_secs: {sleep},
            debug: {debug},
        }};
    "#,
        id = raw.device_id,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_password,
        host = raw.server_host,
        port = raw.server_port,
        ota = raw.ota_check_interval_ms,
        sensor = raw.sensor_read_interval_ms,
        sleep = raw.deep_sleep_duration_secs,
        debug = raw.debug,
    );

    let credentials = format!(
        r#"
        pub const DEVICE: CredentialBundle = CredentialBundle {{
            root_ca: include_str!({ca:?}),
            device_cert: include_str!({cert:?}),
            device_key: include_str!({key:?}),
        }};
    "#,
        ca = pem_paths[0],
        cert = pem_paths[1],
        key = pem_paths[2],
    );

    let out_dir = env::var("OUT_DIR")?;
    fs::write(Path::new(&out_dir).join("config.rs"), config)?;
    fs::write(Path::new(&out_dir).join("credentials.rs"), credentials)?;
    Ok(())
}
