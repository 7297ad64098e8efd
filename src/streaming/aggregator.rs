//! Fixed-size chunk aggregation
//!
//! Audio hosts deliver small render quanta (typically 128 samples). The
//! analyzer expects same-size chunks, so frames are collected here until a
//! chunk is full.

/// Collects frames into fixed-size chunks
#[derive(Debug)]
pub struct ChunkAggregator {
    /// Samples of the chunk being filled
    buffer: Vec<f32>,
    /// Samples per chunk
    chunk_size: usize,
}

impl ChunkAggregator {
    /// Create an aggregator producing chunks of `chunk_size` samples
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
        }
    }

    /// Samples per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Samples currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copy as many of `frames` as fit into the current chunk
    ///
    /// Returns the number of samples consumed.
    pub fn fill(&mut self, frames: &[f32]) -> usize {
        let room = self.chunk_size - self.buffer.len();
        let taken = room.min(frames.len());
        self.buffer.extend_from_slice(&frames[..taken]);
        taken
    }

    /// True once the current chunk holds `chunk_size` samples
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.chunk_size
    }

    /// Take the completed chunk, if any
    ///
    /// Hand the buffer back with `recycle` once processed so its allocation
    /// is reused.
    pub fn take_full(&mut self) -> Option<Vec<f32>> {
        if self.is_full() {
            Some(std::mem::take(&mut self.buffer))
        } else {
            None
        }
    }

    /// Return a buffer obtained from `take_full`
    pub fn recycle(&mut self, mut buffer: Vec<f32>) {
        buffer.clear();
        self.buffer = buffer;
    }

    /// Drop any partially filled chunk
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
