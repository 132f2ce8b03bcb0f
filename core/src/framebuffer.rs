use embedded_graphics::{Pixel, pixelcolor::BinaryColor, prelude::{DrawTarget, OriginDimensions, Size}};

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT / 8;

/// Packed 1bpp frame, row-major, most significant bit first. A set bit is a
/// bright pixel ([`BinaryColor::On`]).
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap128x64 {
    bits: [u8; BUFFER_SIZE],
}

impl Bitmap128x64 {
    pub fn new() -> Self {
        Self {
            bits: [0; BUFFER_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bits
    }

    pub fn clear(&mut self, on: bool) {
        self.bits.fill(if on { 0xFF } else { 0x00 });
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let (byte_index, bit_index) = bit_position(x, y);
        (self.bits[byte_index] >> bit_index) & 0x01 == 1
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let (byte_index, bit_index) = bit_position(x, y);
        if on {
            self.bits[byte_index] |= 1 << bit_index;
        } else {
            self.bits[byte_index] &= !(1 << bit_index);
        }
    }
}

impl Default for Bitmap128x64 {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Bitmap128x64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self.bits.iter().map(|b| b.count_ones()).sum::<u32>();
        f.debug_struct("Bitmap128x64").field("lit", &lit).finish()
    }
}

fn bit_position(x: usize, y: usize) -> (usize, usize) {
    let index = y * WIDTH + x;
    (index / 8, 7 - (index % 8))
}

impl OriginDimensions for Bitmap128x64 {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Bitmap128x64 {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set_pixel(coord.x as usize, coord.y as usize, color.is_on());
        }
        Ok(())
    }
}
