//! Image container header decode: format sniffing plus dimensions only.

use std::io::Cursor;

use image::ImageReader;

use crate::types::Dimension;

use super::FetchError;

/// Read the pixel dimensions out of an in-memory image payload.
///
/// Sniffs the container format from magic bytes and decodes only as far as
/// the header; no pixel buffer is materialized. Unrecognized or truncated
/// containers are a [`FetchError::Decode`].
pub fn dimensions_from_bytes(body: &[u8]) -> Result<Dimension, FetchError> {
    let reader = ImageReader::new(Cursor::new(body))
        .with_guessed_format()
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    let (x, y) = reader
        .into_dimensions()
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(Dimension { x, y })
}
