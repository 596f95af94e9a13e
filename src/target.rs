use std::fmt;
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use nix::fcntl::{fcntl, FcntlArg};

use crate::error::{Error, Result};

/// What a [`BufferedWriter`](crate::BufferedWriter) writes to.
///
/// Only the descriptor is looked up: the handle stays owned by the caller, and closing it while
/// a writer still refers to its descriptor is the caller's responsibility.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// A raw descriptor.
    Fd(RawFd),
    File(&'a File),
    Tcp(&'a TcpStream),
    Unix(&'a UnixStream),
    /// Any other handle backed by a descriptor, such as a pipe or stdout.
    Other(&'a dyn AsRawFd),
}

impl Target<'_> {
    /// Resolve this target to the raw descriptor it refers to.
    ///
    /// Negative descriptors are rejected with [`Error::InvalidTarget`]. Every other descriptor,
    /// raw `Fd` targets included, is checked with `fcntl(F_GETFD)`: one the OS does not know as
    /// open fails with [`Error::DescriptorResolution`].
    pub fn resolve(&self) -> Result<RawFd> {
        let fd = self.raw_fd();
        if fd < 0 {
            return Err(Error::InvalidTarget { fd });
        }

        match fcntl(fd, FcntlArg::F_GETFD) {
            Ok(_)       => Ok(fd),
            Err(errno)  => Err(Error::DescriptorResolution(io::Error::from_raw_os_error(errno as i32))),
        }
    }

    fn raw_fd(&self) -> RawFd {
        match *self {
            Target::Fd(fd)          => fd,
            Target::File(file)      => file.as_raw_fd(),
            Target::Tcp(stream)     => stream.as_raw_fd(),
            Target::Unix(stream)    => stream.as_raw_fd(),
            Target::Other(handle)   => handle.as_raw_fd(),
        }
    }
}

impl From<RawFd> for Target<'_> {
    fn from(fd: RawFd) -> Self {
        Target::Fd(fd)
    }
}

impl<'a> From<&'a File> for Target<'a> {
    fn from(file: &'a File) -> Self {
        Target::File(file)
    }
}

impl<'a> From<&'a TcpStream> for Target<'a> {
    fn from(stream: &'a TcpStream) -> Self {
        Target::Tcp(stream)
    }
}

impl<'a> From<&'a UnixStream> for Target<'a> {
    fn from(stream: &'a UnixStream) -> Self {
        Target::Unix(stream)
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match *self {
            Target::Fd(_)       => "Fd",
            Target::File(_)     => "File",
            Target::Tcp(_)      => "Tcp",
            Target::Unix(_)     => "Unix",
            Target::Other(_)    => "Other",
        };
        f.debug_tuple(kind).field(&self.raw_fd()).finish()
    }
}
