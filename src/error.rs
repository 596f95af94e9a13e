use std::io;
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the vectored IO calls and the buffered writer.
///
/// A short transfer is not an error: it shows up as a count smaller than the number of bytes
/// requested.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid write target: descriptor {fd}")]
    InvalidTarget { fd: RawFd },

    #[error("could not resolve a descriptor: {0}")]
    DescriptorResolution(#[source] io::Error),

    #[error("vectored io failed: {0}")]
    Io(#[from] Errno),

    #[error("invalid queue capacity {requested}, must be between 1 and {max}")]
    InvalidCapacity { requested: usize, max: usize },
}

impl Error {
    /// The raw OS error code, if the error came from the kernel.
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Error::Io(errno)                    => Some(*errno),
            Error::DescriptorResolution(err)    => err.raw_os_error().map(Errno::from_i32),
            _                                   => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(errno)                    => io::Error::from_raw_os_error(errno as i32),
            Error::DescriptorResolution(err)    => err,
            err                                 => io::Error::new(io::ErrorKind::InvalidInput, err),
        }
    }
}
