//! Thin wrappers over the `writev(2)` and `readv(2)` system calls.
//!
//! Every function issues at most one system call. Short transfers are returned as-is and
//! nothing is retried, not even after `EINTR`; callers that need a complete transfer compare the
//! returned count with the number of bytes they asked for.

use std::io::{IoSlice, IoSliceMut};
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::error::Result;

const FALLBACK_IOV_MAX: usize = 1024;

static IOV_MAX: Lazy<usize> = Lazy::new(|| {
    match unsafe { libc::sysconf(libc::_SC_IOV_MAX) } {
        n if n > 0  => n as usize,
        _           => FALLBACK_IOV_MAX,
    }
});

/// The largest number of buffers the kernel accepts in a single vectored call.
pub fn iov_max() -> usize {
    *IOV_MAX
}

/// Write every buffer in `bufs`, in order, to `fd` with a single `writev` call.
///
/// Returns the number of bytes the kernel reports as written, which may be less than the sum of
/// the buffer lengths. An empty `bufs` returns `Ok(0)` without entering the kernel.
pub fn writev(fd: RawFd, bufs: &[IoSlice<'_>]) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    let count = iovcnt(bufs.len())?;
    // Unsafe contract: IoSlice is guaranteed ABI compatible with libc::iovec on Unix.
    let ret = unsafe { libc::writev(fd, bufs.as_ptr() as *const libc::iovec, count) };
    let result = complete(ret);
    trace!(fd, buffers = bufs.len(), ret, "writev");
    result
}

/// Write a list of byte slices with a single `writev` call.
pub fn write_slices<B: AsRef<[u8]>>(fd: RawFd, bufs: &[B]) -> Result<usize> {
    let iovecs: Vec<IoSlice<'_>> = bufs.iter().map(|buf| IoSlice::new(buf.as_ref())).collect();
    writev(fd, &iovecs)
}

/// Fill every buffer in `bufs`, in order, from `fd` with a single `readv` call.
///
/// Returns the number of bytes read. A short read, including 0 at end of file, is not an error.
pub fn readv(fd: RawFd, bufs: &mut [IoSliceMut<'_>]) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    let count = iovcnt(bufs.len())?;
    // Unsafe contract: IoSliceMut is guaranteed ABI compatible with libc::iovec on Unix.
    let ret = unsafe { libc::readv(fd, bufs.as_ptr() as *const libc::iovec, count) };
    let result = complete(ret);
    trace!(fd, buffers = bufs.len(), ret, "readv");
    result
}

fn iovcnt(len: usize) -> Result<libc::c_int> {
    if len > libc::c_int::MAX as usize {
        return Err(Errno::EINVAL.into());
    }
    Ok(len as libc::c_int)
}

fn complete(ret: libc::ssize_t) -> Result<usize> {
    match ret {
        n if n >= 0 => Ok(n as usize),
        _           => Err(Errno::last().into()),
    }
}
