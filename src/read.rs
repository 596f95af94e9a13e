use std::io::IoSliceMut;
use std::mem;
use std::os::unix::io::RawFd;

use crate::error::Result;
use crate::sys;

/// One target buffer of a vectored read.
///
/// A slot always knows its length. An `Unallocated` slot gets exactly that many bytes allocated
/// when it is read into, so a caller can ask for "n bytes into slot i" without preparing a
/// buffer first.
#[derive(Debug)]
pub enum ReadSlot<'a> {
    /// Caller memory, filled in place.
    Borrowed(&'a mut [u8]),
    /// Storage owned by the slot.
    Owned(Box<[u8]>),
    /// Only a length; storage is allocated by the read.
    Unallocated(usize),
}

impl<'a> ReadSlot<'a> {
    /// A slot of `len` bytes with no storage yet. Nothing is allocated until it is read into.
    pub fn with_len(len: usize) -> ReadSlot<'a> {
        ReadSlot::Unallocated(len)
    }

    /// The number of bytes this slot asks for, whether or not it is allocated.
    pub fn len(&self) -> usize {
        match self {
            ReadSlot::Borrowed(buf)     => buf.len(),
            ReadSlot::Owned(buf)        => buf.len(),
            ReadSlot::Unallocated(len)  => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the slot has storage, borrowed or owned.
    pub fn is_allocated(&self) -> bool {
        !matches!(self, ReadSlot::Unallocated(_))
    }

    /// The slot's storage, or an empty slice if it was never allocated.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ReadSlot::Borrowed(buf)     => buf,
            ReadSlot::Owned(buf)        => buf,
            ReadSlot::Unallocated(_)    => &[],
        }
    }

    /// Take the storage of an owned slot, leaving it unallocated with the same length.
    pub fn take(&mut self) -> Option<Box<[u8]>> {
        let len = self.len();
        match mem::replace(self, ReadSlot::Unallocated(len)) {
            ReadSlot::Owned(buf)    => Some(buf),
            slot                    => {
                *self = slot;
                None
            }
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        if let ReadSlot::Unallocated(len) = *self {
            *self = ReadSlot::Owned(vec![0; len].into_boxed_slice());
        }
        match self {
            ReadSlot::Borrowed(buf)     => buf,
            ReadSlot::Owned(buf)        => buf,
            ReadSlot::Unallocated(_)    => &mut [],
        }
    }
}

impl<'a> From<&'a mut [u8]> for ReadSlot<'a> {
    fn from(buf: &'a mut [u8]) -> Self {
        ReadSlot::Borrowed(buf)
    }
}

impl From<Vec<u8>> for ReadSlot<'_> {
    fn from(buf: Vec<u8>) -> Self {
        ReadSlot::Owned(buf.into_boxed_slice())
    }
}

/// Fill `slots`, in order, from `fd` with a single `readv` call.
///
/// Unallocated slots are allocated first. Returns the number of bytes read, which may be less
/// than the total length of the slots.
pub fn read_slots(fd: RawFd, slots: &mut [ReadSlot<'_>]) -> Result<usize> {
    let mut iovecs: Vec<IoSliceMut<'_>> = slots.iter_mut()
        .map(|slot| IoSliceMut::new(slot.bytes_mut()))
        .collect();
    sys::readv(fd, &mut iovecs)
}

/// The first `n` bytes held by `slots`, concatenated in slot order.
///
/// After `read_slots` returned `n`, this is exactly the data that was read.
pub fn filled(slots: &[ReadSlot<'_>], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n);
    for slot in slots {
        let remaining = n - out.len();
        if remaining == 0 {
            break;
        }
        let bytes = slot.as_bytes();
        out.extend_from_slice(&bytes[..remaining.min(bytes.len())]);
    }
    out
}
