//! Scatter/gather IO on Unix file descriptors.
//!
//! [`sys`] wraps the `writev` and `readv` system calls. [`BufferedWriter`] sits on top of
//! `writev`: each of its [`Batch`]es queues borrowed buffers and writes them all with one call
//! when the queue is full or when it is flushed.

pub mod sys;

mod error;
mod read;
mod shared;
mod target;
mod write;

pub use error::{Error, Result};
pub use read::{filled, read_slots, ReadSlot};
pub use shared::SharedWriter;
pub use sys::{iov_max, readv, write_slices, writev};
pub use target::Target;
pub use write::{Batch, BufferedWriter};
