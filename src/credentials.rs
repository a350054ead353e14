//! TLS mutual-authentication material compiled into the image.
//!
//! Three variants exist: [`PLACEHOLDER`] (sentinels only, never usable),
//! [`EXAMPLE`] (a self-signed demo chain) and [`DEVICE`], generated from the
//! PEM files named in `cfg.toml`. Firmware builds refuse to compile while
//! `DEVICE` still holds a sentinel.

use alloc::vec::Vec;
use core::ffi::CStr;

use crate::cstr;
use crate::pem::{self, Block};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Placeholder(Slot),
    Pem(Slot, pem::Error),
    UnexpectedLabel(Slot),
    CStr(Slot, cstr::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Placeholder(slot) => write!(f, "{} is a placeholder", slot.name()),
            Error::Pem(slot, e) => write!(f, "{}: {}", slot.name(), e),
            Error::UnexpectedLabel(slot) => write!(f, "{}: wrong PEM label", slot.name()),
            Error::CStr(slot, e) => write!(f, "{}: {:?}", slot.name(), e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    RootCa,
    DeviceCert,
    DeviceKey,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::RootCa, Slot::DeviceCert, Slot::DeviceKey];

    pub const fn name(self) -> &'static str {
        match self {
            Slot::RootCa => "root CA",
            Slot::DeviceCert => "device certificate",
            Slot::DeviceKey => "device private key",
        }
    }

    /// Text the placeholder bundle carries in place of real material.
    pub const fn sentinel(self) -> &'static str {
        match self {
            Slot::RootCa => "REPLACE_WITH_YOUR_ROOT_CA_CERTIFICATE",
            Slot::DeviceCert => "REPLACE_WITH_YOUR_DEVICE_CERTIFICATE",
            Slot::DeviceKey => "REPLACE_WITH_YOUR_DEVICE_PRIVATE_KEY",
        }
    }

    fn accepts(self, label: pem::Label) -> bool {
        match self {
            Slot::RootCa | Slot::DeviceCert => label == pem::Label::Certificate,
            Slot::DeviceKey => label.is_private_key(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialBundle {
    // Root CA the broker certificate must chain to
    pub root_ca: &'static str,
    // Certificate presented to the broker
    pub device_cert: &'static str,
    // Private key matching `device_cert`
    pub device_key: &'static str,
}

pub const PLACEHOLDER: CredentialBundle = CredentialBundle {
    root_ca: include_str!("../certs/placeholder/root_ca.pem"),
    device_cert: include_str!("../certs/placeholder/device.crt"),
    device_key: include_str!("../certs/placeholder/device.key"),
};

pub const EXAMPLE: CredentialBundle = CredentialBundle {
    root_ca: include_str!("../certs/example/root_ca.pem"),
    device_cert: include_str!("../certs/example/device.crt"),
    device_key: include_str!("../certs/example/device.key"),
};

// device credentials are generated at compile time
include!(concat!(env!("OUT_DIR"), "/credentials.rs"));

impl CredentialBundle {
    pub const fn get(&self, slot: Slot) -> &'static str {
        match slot {
            Slot::RootCa => self.root_ca,
            Slot::DeviceCert => self.device_cert,
            Slot::DeviceKey => self.device_key,
        }
    }

    pub fn block(&self, slot: Slot) -> Result<Block<'static>, Error> {
        pem::parse(self.get(slot)).map_err(|e| Error::Pem(slot, e))
    }

    /// Slots that still carry their sentinel.
    pub fn placeholder_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        Slot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).contains(slot.sentinel()))
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder_slots().next().is_some()
    }

    /// Checks every slot for sentinels, PEM framing and the expected label.
    ///
    /// Whether the key matches the certificate, or the certificate chains to
    /// the root, is left to the TLS handshake.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(slot) = self.placeholder_slots().next() {
            return Err(Error::Placeholder(slot));
        }

        for slot in Slot::ALL {
            let block = self.block(slot)?;
            if !slot.accepts(block.label) {
                return Err(Error::UnexpectedLabel(slot));
            }
            block.check().map_err(|e| Error::Pem(slot, e))?;
            log::debug!("{}: {} OK", slot.name(), block.label.as_str());
        }

        Ok(())
    }

    /// DER bytes of `slot`.
    pub fn der(&self, slot: Slot) -> Result<Vec<u8>, Error> {
        self.block(slot)?
            .decode()
            .map_err(|e| Error::Pem(slot, e))
    }

    /// NUL-terminated copy of `slot`, for TLS stacks taking C strings.
    pub fn c_str<'buf>(&self, slot: Slot, buffer: &'buf mut [u8]) -> Result<&'buf CStr, Error> {
        cstr::write_trimmed_c_str(self.get(slot), buffer).map_err(|e| Error::CStr(slot, e))
    }
}
