#![cfg_attr(not(test), no_std)]

pub mod bmp;
pub mod convert;
pub mod display;
pub mod format;
pub mod framebuffer;
pub mod image;
pub mod input;
pub mod viewer;
pub mod walker;
#[cfg(test)]
mod testing;
extern crate alloc;

use core::result::Result;

use alloc::vec::Vec;
use embedded_io::{ErrorType, Read, Seek};

/// Read-only view of the removable storage the viewer browses.
pub trait Filesystem: ErrorType {
    type File<'a>: File<Error = Self::Error>
    where
        Self: 'a;
    type Directory<'a>: Directory<Error = Self::Error>
    where
        Self: 'a;

    fn open_file(&self, path: &str) -> Result<Self::File<'_>, Self::Error>;
    fn open_directory(&self, path: &str) -> Result<Self::Directory<'_>, Self::Error>;
    fn exists(&self, path: &str) -> Result<bool, Self::Error>;
}

pub trait File: Read + Seek {
    fn size(&self) -> usize;
}

/// An open directory handle. Consuming it yields the entries in storage
/// order; the handle is released when the iterator is dropped.
pub trait Directory: ErrorType + Sized {
    type Entry: DirEntry;
    type Entries: Iterator<Item = Result<Self::Entry, Self::Error>>;

    fn entries(self) -> Self::Entries;

    fn list(self) -> Result<Vec<Self::Entry>, Self::Error> {
        self.entries().collect()
    }
}

pub trait DirEntry {
    fn name(&self) -> &str;
    fn is_directory(&self) -> bool;
    fn size(&self) -> usize;
}
