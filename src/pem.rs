//! Minimal PEM reader for embedded certificate material.
//!
//! Only the framing is checked here (matching `BEGIN`/`END` markers, base64
//! payload, outer DER SEQUENCE). Nothing below looks inside the ASN.1.

use alloc::string::String;
use alloc::vec::Vec;
use base64::Engine;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// ASN.1 SEQUENCE tag, the outer element of every X.509 and PKCS structure.
const DER_SEQUENCE: u8 = 0x30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    MissingBeginMarker,
    UnterminatedMarker,
    UnsupportedLabel,
    MissingEndMarker,
    MismatchedLabel,
    EmptyBody,
    InvalidBase64,
    NotDer,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::MissingBeginMarker => "no BEGIN marker",
            Error::UnterminatedMarker => "marker line is not terminated",
            Error::UnsupportedLabel => "unsupported PEM label",
            Error::MissingEndMarker => "no END marker",
            Error::MismatchedLabel => "END label differs from BEGIN label",
            Error::EmptyBody => "empty PEM body",
            Error::InvalidBase64 => "PEM body is not base64",
            Error::NotDer => "PEM payload is not a DER sequence",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Certificate,
    /// PKCS#8
    PrivateKey,
    /// PKCS#1
    RsaPrivateKey,
    /// SEC1
    EcPrivateKey,
}

impl Label {
    pub const fn as_str(self) -> &'static str {
        match self {
            Label::Certificate => "CERTIFICATE",
            Label::PrivateKey => "PRIVATE KEY",
            Label::RsaPrivateKey => "RSA PRIVATE KEY",
            Label::EcPrivateKey => "EC PRIVATE KEY",
        }
    }

    pub const fn is_private_key(self) -> bool {
        !matches!(self, Label::Certificate)
    }

    fn from_marker(s: &str) -> Option<Self> {
        [
            Label::Certificate,
            Label::PrivateKey,
            Label::RsaPrivateKey,
            Label::EcPrivateKey,
        ]
        .into_iter()
        .find(|label| label.as_str() == s)
    }
}

/// One `BEGIN`/`END` delimited block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub label: Label,
    /// Text between the marker lines, surrounding whitespace trimmed
    pub body: &'a str,
}

impl Block<'_> {
    /// Decodes the base64 body into DER bytes.
    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        let compact: String = self
            .body
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|_| Error::InvalidBase64)
    }

    /// Checks that the block carries a non-empty DER structure.
    pub fn check(&self) -> Result<(), Error> {
        let der = self.decode()?;
        match der.first() {
            None => Err(Error::EmptyBody),
            Some(&DER_SEQUENCE) => Ok(()),
            Some(_) => Err(Error::NotDer),
        }
    }
}

/// Parses the first block of `text`.
pub fn parse(text: &str) -> Result<Block<'_>, Error> {
    next_block(text).map(|(block, _)| block)
}

/// Iterates over every block in `text`, e.g. a CA chain.
pub fn blocks(text: &str) -> Blocks<'_> {
    Blocks { rest: text }
}

pub struct Blocks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<Block<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.rest.contains(BEGIN) {
            return None;
        }

        match next_block(self.rest) {
            Ok((block, rest)) => {
                self.rest = rest;
                Some(Ok(block))
            }
            Err(e) => {
                // stop after the first malformed block
                self.rest = "";
                Some(Err(e))
            }
        }
    }
}

/// Reads `-----<keyword><label>-----`, returning the label and the text after the marker.
fn read_marker(text: &str) -> Result<(&str, &str), Error> {
    let label_end = text.find(DASHES).ok_or(Error::UnterminatedMarker)?;
    let label = &text[..label_end];
    if label.contains('\n') {
        return Err(Error::UnterminatedMarker);
    }
    Ok((label, &text[label_end + DASHES.len()..]))
}

fn next_block(text: &str) -> Result<(Block<'_>, &str), Error> {
    let start = text.find(BEGIN).ok_or(Error::MissingBeginMarker)?;
    let (label, after_begin) = read_marker(&text[start + BEGIN.len()..])?;
    let label = Label::from_marker(label).ok_or(Error::UnsupportedLabel)?;

    let end = after_begin.find(END).ok_or(Error::MissingEndMarker)?;
    let body = after_begin[..end].trim();

    let (end_label, rest) = read_marker(&after_begin[end + END.len()..])?;
    if end_label != label.as_str() {
        return Err(Error::MismatchedLabel);
    }
    if body.is_empty() {
        return Err(Error::EmptyBody);
    }

    Ok((Block { label, body }, rest))
}
