//! Device status reports, published on [`STATUS_TOPIC`](crate::topic::STATUS_TOPIC).
//!
//! The broker side keys the report on `deviceId` and stores `status` as one
//! of `online`, `offline` or `maintenance`.

use core::fmt::Write;
use core::str::FromStr;
use heapless::String;

use crate::constants::{STATUS_PAYLOAD_MAX, VERSION};
use crate::telemetry::is_plain_json_str;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnknownStatus,
    InvalidField,
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
}

impl DeviceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(DeviceStatus::Online),
            "offline" => Ok(DeviceStatus::Offline),
            "maintenance" => Ok(DeviceStatus::Maintenance),
            _ => Err(Error::UnknownStatus),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport<'a> {
    pub device_id: &'a str,
    pub status: DeviceStatus,
    pub firmware: &'a str,
}

impl<'a> StatusReport<'a> {
    /// Report for the running firmware.
    pub fn new(device_id: &'a str, status: DeviceStatus) -> Self {
        Self {
            device_id,
            status,
            firmware: VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String<STATUS_PAYLOAD_MAX>, Error> {
        if !is_plain_json_str(self.device_id) || !is_plain_json_str(self.firmware) {
            return Err(Error::InvalidField);
        }

        let mut payload: String<STATUS_PAYLOAD_MAX> = String::new();
        write!(
            payload,
            "{{\"deviceId\":\"{}\",\"status\":\"{}\",\"firmware\":\"{}\"}}",
            self.device_id,
            self.status.as_str(),
            self.firmware
        )
        .map_err(|_| Error::Overflow)?;

        Ok(payload)
    }
}
