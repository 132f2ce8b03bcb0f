extern crate alloc;

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use crate::convert::convert_file;
use crate::framebuffer::Bitmap128x64;
use crate::image::{DecodeLimits, ImageError};
use crate::input::{ButtonState, Buttons};
use crate::walker::ImageWalker;
use crate::Filesystem;

/// The file being shown and its converted frame.
///
/// `bitmap` is present only when the last [`ViewerState::select`] for
/// `path` converted successfully.
#[derive(Debug, Default)]
pub struct ViewerState {
    path: Option<String>,
    bitmap: Option<Box<Bitmap128x64>>,
    native_width: u16,
    native_height: u16,
    limits: DecodeLimits,
}

impl ViewerState {
    pub fn new(limits: DecodeLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn current_bitmap(&self) -> Option<&Bitmap128x64> {
        self.bitmap.as_deref()
    }

    pub fn native_size(&self) -> (u16, u16) {
        (self.native_width, self.native_height)
    }

    /// Make `path` current and convert it. On failure the path is kept and
    /// the bitmap cleared.
    pub fn select<F: Filesystem>(&mut self, fs: &F, path: &str) -> Result<(), ImageError> {
        self.path = Some(path.to_string());
        self.bitmap = None;
        match convert_file(fs, path, &self.limits) {
            Ok((handle, bitmap)) => {
                log::info!("Opened {} ({}x{})", path, handle.width, handle.height);
                self.native_width = handle.width;
                self.native_height = handle.height;
                self.bitmap = Some(bitmap);
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to convert {}: {}", path, err);
                self.native_width = 0;
                self.native_height = 0;
                Err(err)
            }
        }
    }

    /// Select the first image in `dir`. Returns false when it has none.
    pub fn open_first<F: Filesystem>(&mut self, fs: &F, dir: &str) -> bool {
        let Some(path) = ImageWalker::new(fs).first(dir) else {
            log::info!("No images in {}", dir);
            return false;
        };
        let _ = self.select(fs, &path);
        true
    }

    /// Move to the next image. Returns true if the selection changed.
    pub fn advance<F: Filesystem>(&mut self, fs: &F) -> bool {
        let next = self
            .path
            .as_deref()
            .and_then(|current| ImageWalker::new(fs).next(current));
        self.step(fs, next)
    }

    /// Move to the previous image. Returns true if the selection changed.
    pub fn retreat<F: Filesystem>(&mut self, fs: &F) -> bool {
        let prev = self
            .path
            .as_deref()
            .and_then(|current| ImageWalker::new(fs).prev(current));
        self.step(fs, prev)
    }

    /// Right advances, Left retreats. Returns true if a redraw is needed.
    pub fn update<F: Filesystem>(&mut self, fs: &F, buttons: &ButtonState) -> bool {
        if buttons.is_pressed(Buttons::Right) {
            self.advance(fs)
        } else if buttons.is_pressed(Buttons::Left) {
            self.retreat(fs)
        } else {
            false
        }
    }

    fn step<F: Filesystem>(&mut self, fs: &F, target: Option<String>) -> bool {
        match target {
            Some(path) => {
                let _ = self.select(fs, &path);
                true
            }
            None => false,
        }
    }
}
