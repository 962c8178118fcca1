/// Consumed prefix size below which compaction is skipped.
const MIN_COMPACT: usize = 4096;

/// Append-only byte accumulator with a read cursor.
///
/// Bytes are appended with [`feed`](Self::feed) and released with
/// [`consume`](Self::consume). Reading never removes anything, so a record
/// that turns out to be incomplete can simply be retried after the next
/// `feed` with the same bytes in place.
///
/// Consumed bytes are reclaimed lazily: the vector is cleared once
/// everything has been read, and the unread tail is moved to the front once
/// the consumed prefix dominates the stored bytes.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk after the unread bytes.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All unread bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// The first `n` unread bytes, or `None` if fewer are buffered.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.as_slice().get(..n)
    }

    /// Drop the first `n` unread bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`len`](Self::len).
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "consume({n}) past {} buffered bytes", self.len());
        self.cursor += n;

        if self.cursor == self.data.len() {
            self.data.clear();
            self.cursor = 0;
        } else if self.cursor >= MIN_COMPACT && self.cursor * 2 >= self.data.len() {
            self.data.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    /// Consume and return every unread byte.
    pub fn take_all(&mut self) -> Vec<u8> {
        let rest = self.as_slice().to_vec();
        self.clear();
        rest
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }
}
