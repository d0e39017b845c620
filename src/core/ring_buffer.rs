//! Fixed-capacity circular buffer with overwrite-on-full semantics
//!
//! Storage holds `capacity + 1` slots: `head == tail` means empty and
//! `(tail + 1) % slots == head` means full, so no separate length is kept.

pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    overrun_count: u64,
}

impl<T> RingBuffer<T> {
    /// Create a buffer able to hold `capacity` items
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be greater than 0");
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.resize_with(capacity + 1, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            overrun_count: 0,
        }
    }

    /// Append an item, evicting the oldest one if the buffer is full
    ///
    /// Never fails. The evicted item, if any, is handed back so the caller
    /// decides where it gets dropped.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        let slots = self.slots.len();
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % slots;

        if self.tail == self.head {
            let evicted = self.slots[self.head].take();
            self.head = (self.head + 1) % slots;
            self.overrun_count += 1;
            evicted
        } else {
            None
        }
    }

    /// Oldest item in the buffer
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty; check [`RingBuffer::is_empty`] first.
    pub fn front(&self) -> &T {
        assert!(!self.is_empty(), "front() called on an empty RingBuffer");
        self.slots[self.head]
            .as_ref()
            .expect("occupied slot between head and tail")
    }

    /// Remove and return the oldest item
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty; check [`RingBuffer::is_empty`] first.
    pub fn pop_front(&mut self) -> T {
        assert!(!self.is_empty(), "pop_front() called on an empty RingBuffer");
        let item = self.slots[self.head]
            .take()
            .expect("occupied slot between head and tail");
        self.head = (self.head + 1) % self.slots.len();
        item
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        (self.tail + 1) % self.slots.len() == self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        let slots = self.slots.len();
        (self.tail + slots - self.head) % slots
    }

    /// Usable capacity (allocated slots minus the sentinel slot)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of items evicted by `push_back` on a full buffer
    #[inline]
    pub fn overrun_count(&self) -> u64 {
        self.overrun_count
    }
}
