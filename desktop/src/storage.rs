use std::fs;
use std::io::{self, Read as _, Seek as _};
use std::path::PathBuf;

use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};
use monoview_core::{DirEntry, Directory, File, Filesystem};

/// Host directory tree exposed through the core storage traits. Paths are
/// used as given; relative ones resolve against the working directory.
pub struct StdFilesystem;

fn map_err(err: io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
        io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
        io::ErrorKind::Interrupted => ErrorKind::Interrupted,
        _ => ErrorKind::Other,
    }
}

impl ErrorType for StdFilesystem {
    type Error = ErrorKind;
}

impl Filesystem for StdFilesystem {
    type File<'a> = StdFile;
    type Directory<'a> = StdDirectory;

    fn open_file(&self, path: &str) -> Result<Self::File<'_>, Self::Error> {
        let file = fs::File::open(path).map_err(map_err)?;
        let size = file.metadata().map_err(map_err)?.len() as usize;
        Ok(StdFile { file, size })
    }

    fn open_directory(&self, path: &str) -> Result<Self::Directory<'_>, Self::Error> {
        let read_dir = fs::read_dir(path).map_err(map_err)?;
        Ok(StdDirectory { read_dir })
    }

    fn exists(&self, path: &str) -> Result<bool, Self::Error> {
        fs::exists(path).map_err(map_err)
    }
}

pub struct StdFile {
    file: fs::File,
    size: usize,
}

impl ErrorType for StdFile {
    type Error = ErrorKind;
}

impl Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.file.read(buf).map_err(map_err)
    }
}

impl Seek for StdFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let pos = match pos {
            SeekFrom::Start(n) => io::SeekFrom::Start(n),
            SeekFrom::End(n) => io::SeekFrom::End(n),
            SeekFrom::Current(n) => io::SeekFrom::Current(n),
        };
        self.file.seek(pos).map_err(map_err)
    }
}

impl File for StdFile {
    fn size(&self) -> usize {
        self.size
    }
}

pub struct StdDirectory {
    read_dir: fs::ReadDir,
}

impl ErrorType for StdDirectory {
    type Error = ErrorKind;
}

impl Directory for StdDirectory {
    type Entry = StdEntry;
    type Entries = StdEntries;

    fn entries(self) -> Self::Entries {
        StdEntries {
            read_dir: self.read_dir,
        }
    }
}

pub struct StdEntries {
    read_dir: fs::ReadDir,
}

impl Iterator for StdEntries {
    type Item = Result<StdEntry, ErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.read_dir.next()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(map_err(err))),
        };
        let path: PathBuf = entry.path();
        Some(
            entry
                .metadata()
                .map(|meta| StdEntry {
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_directory: meta.is_dir(),
                    size: meta.len() as usize,
                })
                .map_err(|err| {
                    log::debug!("Cannot stat {}", path.display());
                    map_err(err)
                }),
        )
    }
}

#[derive(Clone, Debug)]
pub struct StdEntry {
    name: String,
    is_directory: bool,
    size: usize,
}

impl DirEntry for StdEntry {
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
