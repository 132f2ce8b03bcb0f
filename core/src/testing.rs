//! In-memory storage and BMP fixtures shared by the unit tests.

use std::cell::Cell;
use std::collections::BTreeMap;

use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};

use crate::{DirEntry, Directory, File, Filesystem};

pub struct MemFile {
    data: Vec<u8>,
    pos: usize,
}

impl MemFile {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ErrorType for MemFile {
    type Error = ErrorKind;
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.len().saturating_sub(self.pos);
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::End(n) => self.data.len() as i64 + n,
            SeekFrom::Current(n) => self.pos as i64 + n,
        };
        if target < 0 {
            return Err(ErrorKind::InvalidInput);
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

impl File for MemFile {
    fn size(&self) -> usize {
        self.data.len()
    }
}

/// Every operation fails with a storage error.
pub struct FailingReader;

impl ErrorType for FailingReader {
    type Error = ErrorKind;
}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::Other)
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, _pos: SeekFrom) -> Result<u64, Self::Error> {
        Err(ErrorKind::Other)
    }
}

#[derive(Clone, Debug)]
pub struct MemEntry {
    name: String,
    is_directory: bool,
    size: usize,
    broken: bool,
}

impl DirEntry for MemEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_directory(&self) -> bool {
        self.is_directory
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// Directories keep entries in insertion order, which is the storage order
/// the walker sees.
#[derive(Default)]
pub struct MemFs {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeMap<String, Vec<MemEntry>>,
    open_listings: Cell<usize>,
    opened_files: Cell<usize>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&mut self, path: &str) {
        self.dirs.entry(path.to_string()).or_default();
        if let Some((parent, name)) = path.rsplit_once('/') {
            if !parent.is_empty() {
                self.push_entry(parent, name, true, 0, false);
            }
        }
    }

    pub fn add_file(&mut self, path: &str, data: Vec<u8>) {
        let (parent, name) = path.rsplit_once('/').expect("absolute test path");
        self.push_entry(parent, name, false, data.len(), false);
        self.files.insert(path.to_string(), data);
    }

    /// An entry whose enumeration reports a storage error.
    pub fn add_broken_entry(&mut self, dir: &str) {
        self.push_entry(dir, "", false, 0, true);
    }

    pub fn open_listings(&self) -> usize {
        self.open_listings.get()
    }

    pub fn opened_files(&self) -> usize {
        self.opened_files.get()
    }

    fn push_entry(&mut self, dir: &str, name: &str, is_directory: bool, size: usize, broken: bool) {
        self.dirs.entry(dir.to_string()).or_default().push(MemEntry {
            name: name.to_string(),
            is_directory,
            size,
            broken,
        });
    }
}

impl ErrorType for MemFs {
    type Error = ErrorKind;
}

impl Filesystem for MemFs {
    type File<'a> = MemFile;
    type Directory<'a> = MemDir<'a>;

    fn open_file(&self, path: &str) -> Result<Self::File<'_>, Self::Error> {
        let data = self.files.get(path).ok_or(ErrorKind::NotFound)?;
        self.opened_files.set(self.opened_files.get() + 1);
        Ok(MemFile::new(data.clone()))
    }

    fn open_directory(&self, path: &str) -> Result<Self::Directory<'_>, Self::Error> {
        let entries = self.dirs.get(path).ok_or(ErrorKind::NotFound)?;
        Ok(MemDir {
            entries,
            open: &self.open_listings,
        })
    }

    fn exists(&self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.files.contains_key(path) || self.dirs.contains_key(path))
    }
}

pub struct MemDir<'a> {
    entries: &'a [MemEntry],
    open: &'a Cell<usize>,
}

impl ErrorType for MemDir<'_> {
    type Error = ErrorKind;
}

impl<'a> Directory for MemDir<'a> {
    type Entry = MemEntry;
    type Entries = MemEntries<'a>;

    fn entries(self) -> Self::Entries {
        self.open.set(self.open.get() + 1);
        MemEntries {
            entries: self.entries.iter(),
            open: self.open,
        }
    }
}

pub struct MemEntries<'a> {
    entries: std::slice::Iter<'a, MemEntry>,
    open: &'a Cell<usize>,
}

impl Iterator for MemEntries<'_> {
    type Item = Result<MemEntry, ErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        if entry.broken {
            Some(Err(ErrorKind::Other))
        } else {
            Some(Ok(entry.clone()))
        }
    }
}

impl Drop for MemEntries<'_> {
    fn drop(&mut self) {
        self.open.set(self.open.get() - 1);
    }
}

/// Builds a BMP with a 40-byte info header. `rows` are unpadded and in file
/// order; padding to the row stride is added here.
pub fn bmp_file(
    width: i32,
    height: i32,
    bits_per_pixel: u16,
    compression: u32,
    palette: &[[u8; 4]],
    rows: &[Vec<u8>],
) -> Vec<u8> {
    let stride = (width.unsigned_abs() as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let pixel_offset = 54 + palette.len() * 4;
    let mut data = Vec::new();
    data.extend_from_slice(b"BM");
    data.extend_from_slice(&((pixel_offset + stride * rows.len()) as u32).to_le_bytes());
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&(pixel_offset as u32).to_le_bytes());
    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&bits_per_pixel.to_le_bytes());
    data.extend_from_slice(&compression.to_le_bytes());
    data.extend_from_slice(&((stride * rows.len()) as u32).to_le_bytes());
    data.extend_from_slice(&2835u32.to_le_bytes());
    data.extend_from_slice(&2835u32.to_le_bytes());
    data.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    for entry in palette {
        data.extend_from_slice(entry);
    }
    for row in rows {
        let mut padded = row.clone();
        padded.resize(stride.max(row.len()), 0);
        data.extend_from_slice(&padded);
    }
    data
}

fn gray_palette() -> Vec<[u8; 4]> {
    (0..=255u8).map(|v| [v, v, v, 0]).collect()
}

/// Bottom-up 8-bit grayscale BMP. `pixels` are top-down row-major.
pub fn bmp_8bit(width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
    let rows: Vec<Vec<u8>> = pixels
        .chunks(width as usize)
        .rev()
        .map(|row| row.to_vec())
        .collect();
    bmp_file(width as i32, height as i32, 8, 0, &gray_palette(), &rows)
}

/// 24-bit BMP from top-down `(r, g, b)` pixels.
pub fn bmp_24bit(width: u16, height: u16, rgb: &[(u8, u8, u8)], top_down: bool) -> Vec<u8> {
    let mut rows: Vec<Vec<u8>> = rgb
        .chunks(width as usize)
        .map(|row| row.iter().flat_map(|&(r, g, b)| [b, g, r]).collect())
        .collect();
    let height = if top_down {
        -(height as i32)
    } else {
        rows.reverse();
        height as i32
    };
    bmp_file(width as i32, height, 24, 0, &[], &rows)
}

/// 1-bit BMP with a black/white palette; `true` is white.
pub fn bmp_1bit(width: u16, height: u16, bits: &[bool]) -> Vec<u8> {
    let rows: Vec<Vec<u8>> = bits
        .chunks(width as usize)
        .rev()
        .map(|row| {
            let mut packed = vec![0u8; row.len().div_ceil(8)];
            for (x, &on) in row.iter().enumerate() {
                if on {
                    packed[x / 8] |= 0x80 >> (x % 8);
                }
            }
            packed
        })
        .collect();
    let palette = [[0, 0, 0, 0], [255, 255, 255, 0]];
    bmp_file(width as i32, height as i32, 1, 0, &palette, &rows)
}
