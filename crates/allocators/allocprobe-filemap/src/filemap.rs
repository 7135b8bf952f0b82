use std::ffi::OsStr;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr::null_mut;

use allocprobe_core::allocator::ProbeAllocator;
use allocprobe_core::memory::{Backing, Memory};
use allocprobe_core::util::Size;
use log::{debug, info};
use thiserror::Error;

/// File name template handed to `mkstemp`. The `X`s are replaced by random characters.
pub const TEMPLATE: &str = "alloc-mmap.XXXXXXXX";

/// Marker written at the end offset of the backing file. Fixes the file length
/// so the whole mapped range is backed by the file.
pub const TRAILER: &[u8] = b"trailer\0";

/// File-backed allocator. Maps a freshly created temporary file `MAP_SHARED`.
///
/// Every call to [`ProbeAllocator::alloc`] creates a new file in the
/// configured directory. Files are never removed.
#[derive(Debug, Clone)]
pub struct FileMapAllocator {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl FileMapAllocator {
    /// Constructor for the file-backed allocator
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory the backing files are created in
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileMapAllocator {
            dir: dir.into(),
            last_path: None,
        }
    }

    /// Path of the most recently created backing file.
    ///
    /// Also set when allocation failed after the file was created.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// Creates a uniquely named file from [`TEMPLATE`] and opens it read-write.
    fn create(&self) -> Result<(File, PathBuf), Error> {
        let template = self.dir.join(TEMPLATE);
        let mut buf = template.as_os_str().as_bytes().to_vec();
        if buf.contains(&0) {
            return Err(Error::Template(template));
        }
        buf.push(0);
        let fd = unsafe { libc::mkstemp(buf.as_mut_ptr() as *mut libc::c_char) };
        if fd < 0 {
            return Err(Error::Create(std::io::Error::last_os_error()));
        }
        buf.pop();
        let path = PathBuf::from(OsStr::from_bytes(&buf));
        let file = File::from(unsafe { OwnedFd::from_raw_fd(fd) });
        Ok((file, path))
    }
}

impl Default for FileMapAllocator {
    fn default() -> Self {
        FileMapAllocator::new(".")
    }
}

/// Errors that can happen during file-backed allocation
#[derive(Debug, Error)]
pub enum Error {
    /// The requested size does not fit into the address space or a file offset.
    #[error("{0} exceeds the addressable memory range")]
    SizeOverflow(Size),
    /// The directory cannot be turned into a `mkstemp` template.
    #[error("invalid file name template {0:?}")]
    Template(PathBuf),
    /// `mkstemp` failed.
    #[error("mkstemp() failed: {0}")]
    Create(std::io::Error),
    /// Seeking to the end offset failed.
    #[error("lseek() failed: {0}")]
    Seek(std::io::Error),
    /// Writing the trailer failed.
    #[error("write failed/short write: {0}")]
    Trailer(std::io::Error),
    /// `mmap` failed.
    #[error("mmap() failed: {0}")]
    Map(std::io::Error),
}

impl ProbeAllocator for FileMapAllocator {
    type Error = Error;

    fn name(&self) -> &'static str {
        "mmap"
    }

    fn alloc(&mut self, size: Size) -> Result<Memory, Self::Error> {
        let len = size.checked_bytes().ok_or(Error::SizeOverflow(size))?;
        let offset = i64::try_from(len).map_err(|_| Error::SizeOverflow(size))?;

        let (mut file, path) = self.create()?;
        info!("Created backing file {}", path.display());
        self.last_path = Some(path);

        file.seek(SeekFrom::Current(offset)).map_err(Error::Seek)?;
        file.write_all(TRAILER).map_err(Error::Trailer)?;
        debug!("Backing file extended to {}", Size::B(len + TRAILER.len()));

        if len == 0 {
            debug!("Zero-sized mapping request, nothing to map");
            return Ok(Memory::empty());
        }
        let p = unsafe {
            libc::mmap(
                null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        if p == libc::MAP_FAILED {
            return Err(Error::Map(std::io::Error::last_os_error()));
        }
        debug!("mmap({}) = {:p}", len, p);
        // the mapping outlives the descriptor
        drop(file);
        Ok(unsafe { Memory::from_raw_parts(p as *mut u8, len, Backing::Mapping) })
    }
}
