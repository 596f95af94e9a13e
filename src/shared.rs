use std::os::unix::io::RawFd;

use parking_lot::Mutex;

use crate::error::Result;
use crate::write::{Batch, BufferedWriter};

/// A [`BufferedWriter`] that can be used from several threads.
///
/// Every method locks the writer for its own duration. A [`batch`](Self::batch) holds the lock
/// across a sequence of writes and flushes: no other thread's writes can land between them.
pub struct SharedWriter {
    writer: Mutex<BufferedWriter>,
}

impl SharedWriter {
    pub fn new(writer: BufferedWriter) -> SharedWriter {
        SharedWriter { writer: Mutex::new(writer) }
    }

    pub fn fd(&self) -> RawFd {
        self.writer.lock().fd()
    }

    pub fn capacity(&self) -> usize {
        self.writer.lock().capacity()
    }

    /// Run `f` on a batch of the locked writer.
    ///
    /// Buffers `f` leaves queued are discarded when it returns, like any dropped [`Batch`].
    ///
    /// ```no_run
    /// # use gatherv::{BufferedWriter, SharedWriter};
    /// # fn main() -> gatherv::Result<()> {
    /// let stdout = std::io::stdout();
    /// let writer = SharedWriter::new(BufferedWriter::new(gatherv::Target::Other(&stdout))?);
    /// let written = writer.batch(|batch| {
    ///     batch.write_bytes(b"header ")?;
    ///     batch.write_bytes(b"body\n")?;
    ///     batch.flush()
    /// })?;
    /// assert_eq!(written, 12);
    /// # Ok(())
    /// # }
    /// ```
    pub fn batch<'q, R>(&self, f: impl FnOnce(&mut Batch<'_, 'q>) -> R) -> R {
        let mut writer = self.writer.lock();
        let mut batch = writer.batch();
        f(&mut batch)
    }

    /// Queue every buffer in `bufs` and flush, holding the lock throughout.
    ///
    /// Returns the total count of every flush this caused, automatic ones included.
    pub fn write_slices<B: AsRef<[u8]>>(&self, bufs: &[B]) -> Result<usize> {
        self.batch(|batch| {
            let mut written = 0;
            for buf in bufs {
                written += batch.write_bytes(buf.as_ref())?;
            }
            Ok(written + batch.flush()?)
        })
    }

    pub fn into_inner(self) -> BufferedWriter {
        self.writer.into_inner()
    }
}

impl From<BufferedWriter> for SharedWriter {
    fn from(writer: BufferedWriter) -> Self {
        SharedWriter::new(writer)
    }
}
