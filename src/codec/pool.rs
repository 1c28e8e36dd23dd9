//! Reusable encode buffers
//!
//! Encoding a config allocates one `String` per call. Callers encoding many
//! URLs can recycle those buffers through a pool. The pool has no effect on
//! output; dropping it or bypassing it gives identical results.

use std::sync::OnceLock;

use parking_lot::Mutex;

/// Buffers larger than this are dropped instead of being returned
const MAX_RETAINED_CAPACITY: usize = 4096;

/// Default number of idle buffers kept
const DEFAULT_MAX_IDLE: usize = 64;

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

/// A bounded pool of `String` buffers safe for concurrent checkout and return
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<String>>,
    max_idle: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

impl BufferPool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Process-wide pool used by `Config`'s `Display` implementation
    pub fn global() -> &'static BufferPool {
        GLOBAL_POOL.get_or_init(BufferPool::default)
    }

    /// Takes an empty buffer from the pool, allocating if none is idle
    pub fn get(&self) -> String {
        self.idle.lock().pop().unwrap_or_default()
    }

    /// Returns a buffer to the pool
    pub fn put(&self, mut buf: String) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    /// Runs `f` with a pooled buffer and returns an owned copy of the result
    pub fn with_buffer<F>(&self, f: F) -> String
    where
        F: FnOnce(&mut String),
    {
        let mut buf = self.get();
        f(&mut buf);
        let out = buf.as_str().to_owned();
        self.put(buf);
        out
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
