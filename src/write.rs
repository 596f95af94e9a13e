use std::io::IoSlice;
use std::mem;
use std::os::unix::io::RawFd;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sys;
use crate::target::Target;

/// A descriptor paired with a reusable queue of buffers, written with one `writev` call per
/// flush.
///
/// Buffers are queued through a [`Batch`], which borrows the writer. The writer only keeps the
/// descriptor, the capacity and the queue's allocation between batches. It never owns or closes
/// its descriptor.
///
/// Methods take `&mut self`, so a writer has a single user at a time. To share one between
/// threads, wrap it in a [`SharedWriter`](crate::SharedWriter).
///
/// ```no_run
/// use gatherv::BufferedWriter;
///
/// # fn main() -> gatherv::Result<()> {
/// let file = std::fs::File::create("greeting.txt").unwrap();
/// let mut writer = BufferedWriter::new(&file)?;
/// for name in ["world", "there"].iter() {
///     let line = format!("{}\n", name);
///     let mut batch = writer.batch();
///     batch.write_bytes(b"hello, ")?;
///     batch.write_bytes(line.as_bytes())?;
///     assert_eq!(batch.flush()?, 13);
/// }
/// # Ok(())
/// # }
/// ```
pub struct BufferedWriter {
    fd: RawFd,
    capacity: usize,
    spare: Vec<IoSlice<'static>>,
}

impl BufferedWriter {
    /// Construct a writer with the platform's maximum number of buffers per call as capacity.
    pub fn new<'t>(target: impl Into<Target<'t>>) -> Result<BufferedWriter> {
        BufferedWriter::with_capacity(target, sys::iov_max())
    }

    /// Construct a writer that flushes every `capacity` queued buffers.
    ///
    /// `capacity` must be between 1 and [`iov_max`](crate::sys::iov_max).
    pub fn with_capacity<'t>(target: impl Into<Target<'t>>, capacity: usize)
        -> Result<BufferedWriter>
    {
        let max = sys::iov_max();
        if capacity == 0 || capacity > max {
            return Err(Error::InvalidCapacity { requested: capacity, max });
        }
        let fd = target.into().resolve()?;
        Ok(BufferedWriter {
            spare: Vec::with_capacity(capacity),
            fd, capacity,
        })
    }

    /// The descriptor this writer writes to.
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// The number of queued buffers that triggers an automatic flush.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start queueing buffers that live at least as long as the returned batch.
    pub fn batch<'q>(&mut self) -> Batch<'_, 'q> {
        let mut queue = recycle(mem::take(&mut self.spare));
        queue.reserve(self.capacity);
        Batch { writer: self, queue }
    }
}

/// The pending write queue of a [`BufferedWriter`].
///
/// Writes are queued without copying. When the queue reaches the writer's capacity it is flushed
/// automatically; otherwise nothing reaches the descriptor until [`flush`](Self::flush) is called.
///
/// Every queued buffer is borrowed for `'q`, so the memory behind it stays valid and unmodified
/// while the batch is alive. Buffers still queued when the batch is dropped are discarded, not
/// written: call `flush` before dropping the batch.
pub struct Batch<'w, 'q> {
    writer: &'w mut BufferedWriter,
    queue: Vec<IoSlice<'q>>,
}

impl<'w, 'q> Batch<'w, 'q> {
    pub fn fd(&self) -> RawFd {
        self.writer.fd
    }

    pub fn capacity(&self) -> usize {
        self.writer.capacity
    }

    /// The number of buffers waiting for the next flush.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The total length of the queued buffers.
    ///
    /// Comparing this with the count returned by the next flush detects a short write.
    pub fn pending_bytes(&self) -> usize {
        self.queue.iter().map(|slice| slice.len()).sum()
    }

    /// Queue `buf` to be written.
    ///
    /// Returns 0 unless this write filled the queue, in which case the queue was flushed and the
    /// flush's result is returned. An empty `buf` is ignored.
    pub fn write_bytes(&mut self, buf: &'q [u8]) -> Result<usize> {
        self.write_slice(IoSlice::new(buf))
    }

    /// Queue an already constructed [`IoSlice`]; otherwise the same as
    /// [`write_bytes`](Self::write_bytes).
    pub fn write_slice(&mut self, slice: IoSlice<'q>) -> Result<usize> {
        if slice.is_empty() {
            return Ok(0);
        }

        self.queue.push(slice);

        if self.queue.len() == self.writer.capacity {
            self.flush()
        } else {
            Ok(0)
        }
    }

    /// Write every queued buffer with a single `writev` call and empty the queue.
    ///
    /// The queue is emptied even if the call fails: the bytes of a failed flush are lost to this
    /// writer. An empty queue returns `Ok(0)` without a system call.
    pub fn flush(&mut self) -> Result<usize> {
        if self.queue.is_empty() {
            return Ok(0);
        }

        let fd = self.writer.fd;
        let result = sys::writev(fd, &self.queue);
        let entries = self.queue.len();
        self.queue.clear();

        match &result {
            Ok(written) => debug!(fd, entries, written, "flushed write queue"),
            Err(err)    => warn!(fd, entries, error = %err, "flush failed, discarding queued buffers"),
        }

        result
    }
}

impl Drop for Batch<'_, '_> {
    fn drop(&mut self) {
        if !self.queue.is_empty() {
            warn!(fd = self.writer.fd, entries = self.queue.len(), bytes = self.pending_bytes(),
                  "write batch dropped without flushing");
        }
        self.writer.spare = recycle(mem::take(&mut self.queue));
    }
}

// Hands an emptied queue's allocation to a queue of another lifetime.
fn recycle<'x, 'y>(mut queue: Vec<IoSlice<'x>>) -> Vec<IoSlice<'y>> {
    queue.clear();
    queue.into_iter().map(|_| IoSlice::new(&[])).collect()
}
