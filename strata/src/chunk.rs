//! Chunked append-only storage for strata time-series data.
//!
//! This module implements the storage arena underneath every pyramid level:
//! a sequence of fixed-capacity segments allocated on demand. Growth never
//! copies previously stored elements, so an element keeps its slot for the
//! buffer's whole lifetime and coarser levels can safely hold indices into
//! finer ones.
//!
//! # Layout
//!
//! ```text
//! segment 0: [e0, e1, ..., e1023]      <- full
//! segment 1: [e1024, ..., e2047]       <- full
//! segment 2: [e2048, e2049]            <- tail, filling up
//! ```
//!
//! An element index maps to `(index / capacity, index % capacity)`. Each
//! segment reserves its full capacity once, up front, so its backing storage
//! never reallocates; only the small table of segments grows.

use crate::error::{Result, StorageError};

/// Default number of elements per segment.
pub const DEFAULT_CHUNK_CAPACITY: usize = 1024;

/// An append-only buffer backed by fixed-capacity segments.
///
/// Provides amortized O(1) `push` and O(1) `get` without ever relocating
/// stored elements. Allocation of a new segment is the only fallible
/// operation; failure is surfaced immediately and nothing is appended.
#[derive(Debug, Clone)]
pub struct ChunkedBuffer<T> {
    /// Segments in append order. All but the last are full.
    segments: Vec<Vec<T>>,
    /// Capacity of every segment.
    chunk_capacity: usize,
    /// Total number of stored elements.
    len: usize,
}

impl<T> ChunkedBuffer<T> {
    /// Creates an empty buffer with the default segment capacity.
    pub fn new() -> Self {
        Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Creates an empty buffer with the given segment capacity.
    ///
    /// A `chunk_capacity` of zero is rounded up to one element.
    pub fn with_chunk_capacity(chunk_capacity: usize) -> Self {
        Self {
            segments: Vec::new(),
            chunk_capacity: chunk_capacity.max(1),
            len: 0,
        }
    }

    /// Returns the segment capacity.
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ensures the next `push` will not need to allocate.
    ///
    /// Opens a fresh segment if the tail segment is full (or no segment
    /// exists yet). Calling this ahead of a batch of appends makes those
    /// appends infallible up to one segment's worth of elements.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailed`] if a new segment is needed
    /// and cannot be allocated. The buffer is unchanged in that case.
    pub fn reserve_one(&mut self) -> Result<()> {
        let needs_segment = match self.segments.last() {
            Some(tail) => tail.len() == self.chunk_capacity,
            None => true,
        };

        if needs_segment {
            let mut segment: Vec<T> = Vec::new();
            segment
                .try_reserve_exact(self.chunk_capacity)
                .map_err(|source| StorageError::AllocationFailed {
                    bytes: self.chunk_capacity * size_of::<T>(),
                    source,
                })?;
            self.segments.push(segment);
        }
        Ok(())
    }

    /// Appends a value and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailed`] if a new segment is needed
    /// and cannot be allocated. The buffer is unchanged in that case.
    pub fn push(&mut self, value: T) -> Result<usize> {
        self.reserve_one()?;

        // The tail segment exists and has spare reserved capacity, so this
        // append cannot reallocate.
        let index = self.len;
        self.segments
            .last_mut()
            .expect("tail segment exists after reservation")
            .push(value);
        self.len += 1;
        Ok(index)
    }

    /// Returns a reference to the element at `index`, or `None` if out of
    /// bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let segment = index / self.chunk_capacity;
        let offset = index % self.chunk_capacity;
        self.segments.get(segment)?.get(offset)
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let segment = index / self.chunk_capacity;
        let offset = index % self.chunk_capacity;
        self.segments.get_mut(segment)?.get_mut(offset)
    }

    /// Returns a reference to the last stored element.
    pub fn last(&self) -> Option<&T> {
        self.segments.last()?.last()
    }

    /// Iterates over all stored elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.segments.iter().flatten()
    }
}

impl<T> Default for ChunkedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf: ChunkedBuffer<f64> = ChunkedBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.get(0), None);
        assert_eq!(buf.last(), None);
        assert_eq!(buf.chunk_capacity(), DEFAULT_CHUNK_CAPACITY);
    }

    #[test]
    fn test_push_returns_sequential_indices() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(4);
        for i in 0..10u64 {
            let index = buf.push(i).unwrap();
            assert_eq!(index as u64, i);
        }
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_get_across_segment_boundaries() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(3);
        for i in 0..8u64 {
            buf.push(i * 10).unwrap();
        }

        // Elements land in segments of 3: [0,10,20] [30,40,50] [60,70]
        assert_eq!(buf.get(0), Some(&0));
        assert_eq!(buf.get(2), Some(&20));
        assert_eq!(buf.get(3), Some(&30));
        assert_eq!(buf.get(7), Some(&70));
        assert_eq!(buf.get(8), None);
        assert_eq!(buf.last(), Some(&70));
    }

    #[test]
    fn test_segments_never_reallocate() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(16);
        buf.push(1.5f64).unwrap();
        let first = std::ptr::from_ref(buf.get(0).unwrap());

        // Fill several segments; the first element must keep its address.
        for i in 0..100 {
            buf.push(f64::from(i)).unwrap();
        }
        let first_after = std::ptr::from_ref(buf.get(0).unwrap());
        assert_eq!(first, first_after);
    }

    #[test]
    fn test_get_mut() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(2);
        buf.push(1).unwrap();
        buf.push(2).unwrap();
        buf.push(3).unwrap();

        *buf.get_mut(2).unwrap() = 30;
        assert_eq!(buf.get(2), Some(&30));
        assert_eq!(buf.get_mut(3), None);
    }

    #[test]
    fn test_iter_order() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(3);
        for i in 0..7 {
            buf.push(i).unwrap();
        }
        let collected: Vec<i32> = buf.iter().copied().collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let mut buf = ChunkedBuffer::with_chunk_capacity(0);
        assert_eq!(buf.chunk_capacity(), 1);
        buf.push(42).unwrap();
        assert_eq!(buf.get(0), Some(&42));
    }
}
