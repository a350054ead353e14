#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{rng::Rng, timer::timg::TimerGroup};
use esp_println::logger::init_logger;

use iot_device::config::CONFIG;
use iot_device::constants::*;
use iot_device::credentials;
use iot_device::probe::BrokerProbe;
use iot_device::status::{DeviceStatus, StatusReport};
use iot_device::topic::STATUS_TOPIC;
use iot_device::wifi::Wifi;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    init_logger(CONFIG.log_level());

    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let rng = Rng::new(peripherals.RNG);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timg1 = TimerGroup::new(peripherals.TIMG1);

    esp_hal_embassy::init(timg0.timer0);

    log::info!("{} firmware {}", CONFIG.device_id, VERSION);

    if let Err(e) = CONFIG.validate() {
        log::error!("Invalid configuration: {}", e);
        halt().await;
    }
    if let Err(e) = credentials::DEVICE.validate() {
        log::error!("Invalid credentials: {}", e);
        halt().await;
    }

    log::info!(
        "Topics: {}, {}, {}",
        CONFIG.topics.telemetry,
        CONFIG.topics.commands,
        CONFIG.topics.ota
    );
    log::debug!(
        "Intervals: ota={}ms sensor={}ms sleep={}s",
        CONFIG.ota_check_interval_ms,
        CONFIG.sensor_read_interval_ms,
        CONFIG.deep_sleep_duration_secs
    );

    let wifi = match Wifi::new(
        peripherals.WIFI,
        timg1.timer0,
        peripherals.RADIO_CLK,
        rng,
        spawner,
    )
    .await
    {
        Ok(wifi) => wifi,
        Err(e) => {
            log::error!("Wi-Fi init error: {:?}", e);
            halt().await
        }
    };

    if let Err(e) = wifi.connect().await {
        log::error!("Wi-Fi connect error: {:?}", e);
    }

    spawner.spawn(probe_task(BrokerProbe::new(wifi.stack))).ok();
}

#[embassy_executor::task]
async fn probe_task(mut probe: BrokerProbe) {
    loop {
        match probe.check(&CONFIG).await {
            Ok(elapsed) => {
                log::info!(
                    "Broker {}:{} reachable in {}ms",
                    CONFIG.server_host,
                    CONFIG.server_port,
                    elapsed.as_millis()
                );
                match StatusReport::new(CONFIG.device_id, DeviceStatus::Online).to_json() {
                    Ok(report) => log::debug!("{} <- {}", STATUS_TOPIC, report),
                    Err(e) => log::warn!("Status report error: {:?}", e),
                }
            }
            Err(e) => log::error!("Broker probe error: {:?}", e),
        }

        Timer::after(Duration::from_secs(BROKER_PROBE_INTERVAL_SECS)).await;
    }
}

async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
