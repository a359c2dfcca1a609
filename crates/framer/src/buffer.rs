use bytes::Buf;

/// Bytes received but not yet consumed into messages.
///
/// This is an arena with a read cursor (`read`) and a write cursor (the end of `data`).  Appends go at the write
/// cursor, consumption only moves the read cursor, and the consumed prefix is reclaimed by sliding the unread tail to
/// the front.  We only slide when the prefix is at least as large as the tail or when the arena would otherwise have
/// to grow, so every byte is moved a bounded number of times no matter how small the incoming chunks are.
///
/// The unread region always starts at a frame boundary; only whole frames are ever consumed.
#[derive(Debug)]
pub(crate) struct AccumulationBuffer {
    data: Vec<u8>,
    read: usize,
    retained_capacity: usize,
}

impl AccumulationBuffer {
    /// `retained_capacity` is both the initial capacity and what the arena shrinks back to whenever it empties.
    pub(crate) fn new(retained_capacity: usize) -> AccumulationBuffer {
        AccumulationBuffer {
            data: Vec::with_capacity(retained_capacity),
            read: 0,
            retained_capacity,
        }
    }

    pub(crate) fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        self.make_room(chunk.len());
        self.data.extend_from_slice(chunk);
    }

    /// Append everything remaining in `source`, leaving it empty.
    pub(crate) fn append_buf(&mut self, source: &mut impl Buf) {
        self.make_room(source.remaining());
        while source.has_remaining() {
            let chunk = source.chunk();
            let n = chunk.len();
            self.data.extend_from_slice(chunk);
            source.advance(n);
        }
    }

    /// The bytes which have been appended but not consumed.
    pub(crate) fn unread(&self) -> &[u8] {
        &self.data[self.read..]
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len() - self.read
    }

    /// Move the read cursor forward by `n` bytes.
    ///
    /// Panics if fewer than `n` bytes are unread; the decoder only consumes frames it has already seen in full.
    pub(crate) fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "Consumed past the write cursor");
        self.read += n;

        if self.read == self.data.len() {
            self.reset();
        }
    }

    #[cfg(test)]
    pub(crate) fn read_cursor(&self) -> usize {
        self.read
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn reset(&mut self) {
        self.data.clear();
        self.read = 0;
        self.data.shrink_to(self.retained_capacity);
    }

    /// Make sure appending `incoming` bytes won't reallocate more than it has to.
    fn make_room(&mut self, incoming: usize) {
        if self.read == 0 {
            return;
        }

        let would_grow = self.data.len() + incoming > self.data.capacity();
        if would_grow || self.read >= self.len() {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let end = self.data.len();
        self.data.copy_within(self.read..end, 0);
        self.data.truncate(end - self.read);
        self.read = 0;
    }
}
