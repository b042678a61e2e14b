//! Fixed-capacity byte buffer pool with an index-based free list.
//!
//! The pool owns an arena of slots, one boxed buffer each, and a lock-free
//! queue of free slot indices. An allocated buffer travels as a move-only
//! handle that returns itself to its slot on drop, so release is automatic
//! and O(1) without any linkage inside the buffer itself.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

use crossbeam::queue::ArrayQueue;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::buffer::{ByteBuffer, Payload, PayloadMut};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::metrics::{PoolMetrics, PoolStats};

/// Global pool for the byte buffer size class.
static BYTE_POOL: OnceLock<BufferPool> = OnceLock::new();

/// Get the global byte buffer pool, creating it with the default
/// configuration on first access.
pub fn buffer_pool() -> &'static BufferPool {
    BYTE_POOL.get_or_init(|| {
        BufferPool::new(PoolConfig::default()).expect("default pool config is valid")
    })
}

/// Initialize the global pool with an explicit configuration.
///
/// Must run before the first [`buffer_pool`] access; afterwards the pool's
/// size class is fixed and re-initialization is rejected.
pub fn init_buffer_pool(config: PoolConfig) -> Result<&'static BufferPool> {
    let pool = BufferPool::new(config)?;
    BYTE_POOL.set(pool).map_err(|_| Error::AlreadyInitialized)?;
    Ok(buffer_pool())
}

/// Shared state behind a pool and all handles allocated from it. Handles
/// hold an `Arc` so the arena outlives the pool front-end if needed.
struct PoolShared {
    /// Arena of buffer slots. A slot is `Some` exactly while its index sits
    /// in the free queue; the mutex is only ever touched by the one thread
    /// holding that popped index, so it is uncontended by construction.
    slots: Box<[Mutex<Option<Box<ByteBuffer>>>]>,

    /// Free slot indices. Index-based linkage keeps the buffers themselves
    /// free of any pool bookkeeping.
    free: ArrayQueue<usize>,

    metrics: PoolMetrics,
}

/// Pre-allocated pool of fixed-capacity byte buffers.
///
/// The pool is the one internally thread-safe component: `allocate` and
/// handle drops may run concurrently from many threads. The buffers it
/// hands out remain single-owner.
pub struct BufferPool {
    shared: Arc<PoolShared>,
}

impl BufferPool {
    /// Create a pool and pre-fill every slot.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let slots: Box<[Mutex<Option<Box<ByteBuffer>>>]> = (0..config.capacity)
            .map(|_| Mutex::new(Some(Box::new(ByteBuffer::new()))))
            .collect();

        let free = ArrayQueue::new(config.capacity);
        for index in 0..config.capacity {
            // Cannot fail: the queue is sized to hold every index.
            let _ = free.push(index);
        }

        debug!(capacity = config.capacity, "byte buffer pool created");

        Ok(Self {
            shared: Arc::new(PoolShared {
                slots,
                free,
                metrics: PoolMetrics::new(),
            }),
        })
    }

    /// Allocate a buffer, panicking when the pool is drained.
    ///
    /// This is the default path for call sites where exhaustion means the
    /// pool was sized wrong. Use [`BufferPool::try_allocate`] where
    /// exhaustion is expected and handled.
    pub fn allocate(&self) -> PooledBuffer {
        match self.try_allocate() {
            Ok(buf) => buf,
            Err(_) => panic!(
                "byte buffer pool exhausted: all {} buffers in use",
                self.capacity()
            ),
        }
    }

    /// Allocate a buffer, surfacing exhaustion as `Err(PoolExhausted)`.
    pub fn try_allocate(&self) -> Result<PooledBuffer> {
        let Some(index) = self.shared.free.pop() else {
            self.shared.metrics.allocation_failed();
            warn!(
                capacity = self.capacity(),
                "byte buffer pool exhausted"
            );
            return Err(Error::PoolExhausted);
        };

        let buf = self.shared.slots[index]
            .lock()
            .take()
            .expect("free-list index points at an occupied slot");

        self.shared.metrics.allocated(self.in_use());

        Ok(PooledBuffer {
            buf: Some(buf),
            index,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Total buffers the pool owns.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }

    /// Buffers currently available for allocation.
    #[inline]
    pub fn available(&self) -> usize {
        self.shared.free.len()
    }

    /// Buffers currently held by callers.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.capacity() - self.available()
    }

    /// Snapshot of the pool's counters and lifetime percentiles.
    pub fn stats(&self) -> PoolStats {
        self.shared.metrics.snapshot(self.capacity(), self.in_use())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("capacity", &self.capacity())
            .field("available", &self.available())
            .finish()
    }
}

/// Move-only owning handle to a pool-allocated [`ByteBuffer`].
///
/// Dereferences to the buffer for all payload operations. On drop the
/// buffer's lifetime is recorded, the buffer is cleared, and its slot is
/// returned to the pool; destruction never reaches the general allocator.
pub struct PooledBuffer {
    buf: Option<Box<ByteBuffer>>,
    index: usize,
    shared: Arc<PoolShared>,
}

impl Deref for PooledBuffer {
    type Target = ByteBuffer;

    fn deref(&self) -> &Self::Target {
        self.buf.as_ref().unwrap()
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf.as_mut().unwrap()
    }
}

impl Payload for PooledBuffer {
    #[inline]
    fn payload(&self) -> &[u8] {
        self.data()
    }
}

impl PayloadMut for PooledBuffer {
    #[inline]
    fn payload_mut(&mut self) -> &mut [u8] {
        self.data_mut()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            if buf.meta.latency.is_set() {
                self.shared.metrics.record_lifetime(buf.latency_us());
            }
            buf.clear();

            *self.shared.slots[self.index].lock() = Some(buf);
            // Cannot fail: every index is unique and the queue holds them all.
            let _ = self.shared.free.push(self.index);
            self.shared.metrics.released();
        }
    }
}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("slot", &self.index)
            .field("len", &self.len())
            .finish()
    }
}
