//! Image discovery and neighbour lookup over a [`Filesystem`].
//!
//! Every query re-enumerates the directory from the start, so results follow
//! the storage's own entry order. Storage failures end the enumeration early
//! and are never returned to the caller.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

use embedded_io::Error as _;

use crate::format::is_image_name;
use crate::{DirEntry, Directory, Filesystem};

pub struct ImageWalker<'a, F: Filesystem> {
    fs: &'a F,
}

impl<'a, F: Filesystem> ImageWalker<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Lazily yields the names of image files in `dir`. Dropping the
    /// iterator closes the directory.
    pub fn images(&self, dir: &str) -> Images<'a, F> {
        Images {
            entries: self.entries(dir),
        }
    }

    /// Calls `visit` with each image name in `dir` and returns how many
    /// were visited.
    pub fn scan(&self, dir: &str, mut visit: impl FnMut(&str)) -> usize {
        let mut count = 0;
        for name in self.images(dir) {
            visit(&name);
            count += 1;
        }
        count
    }

    pub fn first(&self, dir: &str) -> Option<String> {
        self.images(dir).next().map(|name| join(dir, &name))
    }

    /// The first image listed after the entry named like `current`.
    pub fn next(&self, current: &str) -> Option<String> {
        let (dir, name) = split_path(current);
        let mut entries = self.entries(dir);
        entries.find(|entry| entry.name() == name)?;
        entries
            .find(is_image_entry)
            .map(|entry| join(dir, entry.name()))
    }

    /// The last image listed before the entry named like `current`.
    pub fn prev(&self, current: &str) -> Option<String> {
        let (dir, name) = split_path(current);
        let mut previous: Option<String> = None;
        for entry in self.entries(dir) {
            if entry.name() == name {
                return previous.map(|prev| join(dir, &prev));
            }
            if is_image_entry(&entry) {
                previous = Some(entry.name().to_string());
            }
        }
        None
    }

    fn entries(&self, dir: &str) -> Entries<'a, F> {
        let inner = match self.fs.open_directory(dir) {
            Ok(handle) => Some(handle.entries()),
            Err(err) => {
                log::warn!("Cannot open directory {}: {:?}", dir, err.kind());
                None
            }
        };
        Entries { inner }
    }
}

/// Directory entries up to the first storage error.
pub struct Entries<'a, F: Filesystem + 'a> {
    inner: Option<<F::Directory<'a> as Directory>::Entries>,
}

impl<'a, F: Filesystem + 'a> Iterator for Entries<'a, F> {
    type Item = <F::Directory<'a> as Directory>::Entry;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.as_mut()?.next() {
            Some(Ok(entry)) => Some(entry),
            Some(Err(err)) => {
                log::warn!("Directory listing aborted: {:?}", err.kind());
                self.inner = None;
                None
            }
            None => {
                self.inner = None;
                None
            }
        }
    }
}

pub struct Images<'a, F: Filesystem + 'a> {
    entries: Entries<'a, F>,
}

impl<'a, F: Filesystem + 'a> Iterator for Images<'a, F> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .find(is_image_entry)
            .map(|entry| entry.name().to_string())
    }
}

fn is_image_entry<E: DirEntry>(entry: &E) -> bool {
    !entry.is_directory() && is_image_name(entry.name())
}

/// Split at the last `/`. Bare names live in `.`, top-level names in `/`.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(0) => ("/", &path[1..]),
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (".", path),
    }
}

pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
