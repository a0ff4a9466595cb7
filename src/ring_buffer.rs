use parking_lot::Mutex;
use std::collections::VecDeque;

/// One device read worth of interleaved 16-bit samples.
///
/// Frames are immutable once produced; the capture loop allocates a fresh
/// one per read.
pub type Frame = Vec<i16>;

/// Fixed-capacity FIFO of audio frames backing the rolling window.
///
/// `push` and `snapshot` go through the same mutex so a snapshot always sees
/// the buffer at a single instant, never a torn mix of pre- and post-eviction
/// states. Both operations are short (one frame moved, or one pass over at
/// most `capacity` frames), so contention between the capture thread and a
/// dispatch task is negligible.
pub struct RingBuffer {
    frames: Mutex<VecDeque<Frame>>,
    capacity: usize,
}

impl RingBuffer {
    /// Creates a ring buffer holding at most `capacity` frames
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends a frame, evicting the oldest one when the buffer is full
    pub fn push(&self, frame: Frame) {
        let mut frames = self.frames.lock();
        if frames.len() == self.capacity {
            frames.pop_front();
        }
        frames.push_back(frame);
    }

    /// Returns a copy of the current contents in temporal order.
    ///
    /// Does not mutate the buffer; safe to call while the capture thread
    /// keeps pushing.
    pub fn snapshot(&self) -> Vec<Frame> {
        self.frames.lock().iter().cloned().collect()
    }

    /// Number of frames currently buffered
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
