extern crate alloc;

use alloc::vec::Vec;
use embedded_io::{Error as _, Read, ReadExactError, Seek, SeekFrom};
use thiserror::Error;

use crate::bmp::BmpDecoder;
use crate::format::{self, ImageFormat, PREFIX_LEN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("storage read failed")]
    Io,
    #[error("file ended before the expected data")]
    Truncated,
    #[error("unsupported image format")]
    Unsupported,
}

/// Source file identity plus its native size. Only lives for one conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHandle<'a> {
    pub path: &'a str,
    pub width: u16,
    pub height: u16,
}

/// Row-major 8-bit luma samples, one byte per source pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntensityGrid {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl IntensityGrid {
    /// Rejects empty dimensions and buffers that are not exactly
    /// `width * height` long.
    pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Unsupported);
        }
        if pixels.len() != width as usize * height as usize {
            return Err(ImageError::Truncated);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width as usize + x]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest `width * height` a decoder will allocate a grid for.
    pub max_pixels: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_pixels: 4 * 1024 * 1024,
        }
    }
}

pub trait Decoder {
    fn format(&self) -> ImageFormat;

    /// `reader` is positioned at offset 0 of a stream already classified as
    /// [`Decoder::format`].
    fn decode<R: Read + Seek>(
        &self,
        reader: &mut R,
        limits: &DecodeLimits,
    ) -> Result<IntensityGrid, ImageError>;
}

/// Sniff the stream prefix and hand it to the matching decoder.
pub fn decode_image<R: Read + Seek>(
    reader: &mut R,
    limits: &DecodeLimits,
) -> Result<IntensityGrid, ImageError> {
    let mut prefix = [0u8; PREFIX_LEN];
    read_exact(reader, &mut prefix)?;
    let format = format::detect(&prefix);
    log::debug!("Detected format {:?}", format);
    match format {
        ImageFormat::Bmp => {
            seek_to(reader, 0)?;
            BmpDecoder.decode(reader, limits)
        }
        ImageFormat::Unsupported => Err(ImageError::Unsupported),
    }
}

pub(crate) fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ImageError> {
    reader.read_exact(buf).map_err(|err| match err {
        ReadExactError::UnexpectedEof => ImageError::Truncated,
        ReadExactError::Other(err) => {
            log::warn!("Image read failed: {:?}", err.kind());
            ImageError::Io
        }
    })
}

pub(crate) fn seek_to<R: Seek>(reader: &mut R, offset: u64) -> Result<(), ImageError> {
    reader.seek(SeekFrom::Start(offset)).map_err(|err| {
        log::warn!("Image seek failed: {:?}", err.kind());
        ImageError::Io
    })?;
    Ok(())
}
