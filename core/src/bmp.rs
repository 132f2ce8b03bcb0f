//! Uncompressed Windows bitmap decoding into an [`IntensityGrid`].
//!
//! Handles BITMAPINFOHEADER and its V4/V5 extensions with 1, 4 or 8 bpp
//! palettes or 24/32 bpp BGR(A) pixels, bottom-up or top-down.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use embedded_io::{Read, Seek};

use crate::format::ImageFormat;
use crate::image::{read_exact, seek_to, DecodeLimits, Decoder, ImageError, IntensityGrid};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_MIN_LEN: u32 = 40;
const BI_RGB: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub pixel_offset: u32,
    pub info_size: u32,
    pub width: u16,
    pub height: u16,
    pub top_down: bool,
    pub bits_per_pixel: u16,
    pub colors_used: u32,
}

impl BmpHeader {
    /// Bytes per stored row, padded to a 4-byte boundary.
    pub fn stride(&self) -> usize {
        (self.width as usize * self.bits_per_pixel as usize).div_ceil(32) * 4
    }

    fn palette_len(&self) -> usize {
        if self.bits_per_pixel > 8 {
            return 0;
        }
        let max = 1usize << self.bits_per_pixel;
        match self.colors_used as usize {
            0 => max,
            n => n.min(max),
        }
    }
}

pub struct BmpDecoder;

impl Decoder for BmpDecoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Bmp
    }

    fn decode<R: Read + Seek>(
        &self,
        reader: &mut R,
        limits: &DecodeLimits,
    ) -> Result<IntensityGrid, ImageError> {
        let header = read_header(reader, limits)?;
        let palette = read_palette(reader, &header)?;
        log::debug!(
            "BMP {}x{} {}bpp top_down={}",
            header.width,
            header.height,
            header.bits_per_pixel,
            header.top_down
        );

        let width = header.width as usize;
        let height = header.height as usize;
        let mut pixels = vec![0u8; width * height];
        let mut row = vec![0u8; header.stride()];

        seek_to(reader, header.pixel_offset as u64)?;
        for file_row in 0..height {
            read_exact(reader, &mut row)?;
            let y = if header.top_down {
                file_row
            } else {
                height - 1 - file_row
            };
            let out = &mut pixels[y * width..(y + 1) * width];
            decode_row(&row, header.bits_per_pixel, &palette, out);
        }

        IntensityGrid::new(header.width, header.height, pixels)
    }
}

pub fn read_header<R: Read>(reader: &mut R, limits: &DecodeLimits) -> Result<BmpHeader, ImageError> {
    let mut file_header = [0u8; FILE_HEADER_LEN];
    read_exact(reader, &mut file_header)?;
    if &file_header[0..2] != b"BM" {
        return Err(ImageError::Unsupported);
    }
    let pixel_offset = le_u32(&file_header[10..14]);

    let mut info = [0u8; INFO_HEADER_MIN_LEN as usize];
    read_exact(reader, &mut info[..4])?;
    let info_size = le_u32(&info[0..4]);
    if info_size < INFO_HEADER_MIN_LEN {
        // BITMAPCOREHEADER and friends
        return Err(ImageError::Unsupported);
    }
    read_exact(reader, &mut info[4..])?;

    let width = le_u32(&info[4..8]) as i32;
    let height = le_u32(&info[8..12]) as i32;
    let bits_per_pixel = le_u16(&info[14..16]);
    let compression = le_u32(&info[16..20]);
    let colors_used = le_u32(&info[32..36]);

    if compression != BI_RGB {
        log::warn!("BMP compression {} not supported", compression);
        return Err(ImageError::Unsupported);
    }
    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        log::warn!("BMP depth {}bpp not supported", bits_per_pixel);
        return Err(ImageError::Unsupported);
    }
    if width <= 0 || height == 0 {
        return Err(ImageError::Unsupported);
    }
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height.unsigned_abs())) else {
        return Err(ImageError::Unsupported);
    };
    if w as usize * h as usize > limits.max_pixels {
        log::warn!("BMP {}x{} exceeds pixel limit {}", w, h, limits.max_pixels);
        return Err(ImageError::Unsupported);
    }

    Ok(BmpHeader {
        pixel_offset,
        info_size,
        width: w,
        height: h,
        top_down: height < 0,
        bits_per_pixel,
        colors_used,
    })
}

fn read_palette<R: Read + Seek>(reader: &mut R, header: &BmpHeader) -> Result<Vec<u8>, ImageError> {
    let len = header.palette_len();
    if len == 0 {
        return Ok(Vec::new());
    }
    seek_to(reader, FILE_HEADER_LEN as u64 + header.info_size as u64)?;
    let mut raw = vec![0u8; len * 4];
    read_exact(reader, &mut raw)?;
    Ok(raw
        .chunks_exact(4)
        .map(|bgra| luma(bgra[2], bgra[1], bgra[0]))
        .collect())
}

fn decode_row(row: &[u8], bits_per_pixel: u16, palette: &[u8], out: &mut [u8]) {
    let lookup = |index: u8| palette.get(index as usize).copied().unwrap_or(0);
    match bits_per_pixel {
        1 | 4 | 8 => {
            let bits = bits_per_pixel as usize;
            let mask = ((1u16 << bits) - 1) as u8;
            for (x, dst) in out.iter_mut().enumerate() {
                let bit = x * bits;
                let shift = 8 - bits - (bit % 8);
                *dst = lookup((row[bit / 8] >> shift) & mask);
            }
        }
        24 | 32 => {
            let step = bits_per_pixel as usize / 8;
            for (dst, px) in out.iter_mut().zip(row.chunks_exact(step)) {
                *dst = luma(px[2], px[1], px[0]);
            }
        }
        _ => {}
    }
}

/// Integer Rec.601 luma.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

fn le_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
