use core::ffi::CStr;
use heapless::Vec;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    BufferOverflow,
    InteriorNul,
}

// Writes a C-style string (null-terminated) to the provided buffer.
// The input string `s` is trimmed of newline characters before being written.
// Returns a `CStr` referencing the data in `buffer` or an `Error` if:
// - The buffer is too small to hold the trimmed string and the null terminator.
// - The trimmed string contains interior null bytes (which is invalid for `CStr`).
pub fn write_trimmed_c_str<'buf>(s: &str, buffer: &'buf mut [u8]) -> Result<&'buf CStr, Error> {
    let trimmed = s.trim_matches('\n');
    let bytes = trimmed.as_bytes();
    let len = bytes.len();

    if len + 1 > buffer.len() {
        return Err(Error::BufferOverflow);
    }

    buffer[..len].copy_from_slice(bytes);
    buffer[len] = 0;

    CStr::from_bytes_with_nul(&buffer[..=len]).map_err(|_| Error::InteriorNul)
}

// Same as `write_trimmed_c_str`, into an owned fixed-capacity vector whose
// length includes the terminator (mbedTLS expects `len = strlen + 1` for PEM).
pub fn to_c_vec<const N: usize>(s: &str) -> Result<Vec<u8, N>, Error> {
    let trimmed = s.trim_matches('\n');
    if trimmed.as_bytes().contains(&0) {
        return Err(Error::InteriorNul);
    }

    let mut buf: Vec<u8, N> = Vec::new();
    buf.extend_from_slice(trimmed.as_bytes())
        .map_err(|_| Error::BufferOverflow)?;
    buf.push(0).map_err(|_| Error::BufferOverflow)?;

    Ok(buf)
}
