extern crate alloc;

use alloc::boxed::Box;

use crate::framebuffer::{Bitmap128x64, HEIGHT, WIDTH};
use crate::image::{decode_image, DecodeLimits, ImageError, ImageHandle, IntensityGrid};
use crate::Filesystem;

/// Samples strictly above this are lit.
pub const THRESHOLD: u8 = 128;

/// Nearest-neighbour scale to 128x64 followed by a fixed threshold.
pub fn resample(grid: &IntensityGrid) -> Bitmap128x64 {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let mut bitmap = Bitmap128x64::new();
    for y in 0..HEIGHT {
        let src_y = y * height / HEIGHT;
        for x in 0..WIDTH {
            let src_x = x * width / WIDTH;
            if grid.sample(src_x, src_y) > THRESHOLD {
                bitmap.set_pixel(x, y, true);
            }
        }
    }
    bitmap
}

/// Open `path`, decode it and reduce it to a bitmap. The intensity grid is
/// dropped before this returns.
pub fn convert_file<'p, F: Filesystem>(
    fs: &F,
    path: &'p str,
    limits: &DecodeLimits,
) -> Result<(ImageHandle<'p>, Box<Bitmap128x64>), ImageError> {
    let mut file = fs.open_file(path).map_err(|err| {
        log::warn!("Failed to open {}: {:?}", path, embedded_io::Error::kind(&err));
        ImageError::Io
    })?;
    let grid = decode_image(&mut file, limits)?;
    drop(file);
    let handle = ImageHandle {
        path,
        width: grid.width(),
        height: grid.height(),
    };
    let bitmap = Box::new(resample(&grid));
    Ok((handle, bitmap))
}
