//! Fixed-capacity undo/redo history

/// A ring buffer of snapshots with a cursor.
///
/// Holds at most `capacity` entries; pushing onto a full ring evicts the
/// oldest. Pushing after an undo drops the entries past the cursor. There is
/// always at least one entry, the current state.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    slots: Vec<Option<T>>,
    /// Physical index of the oldest entry
    head: usize,
    len: usize,
    /// Logical index of the current entry
    cursor: usize,
}

impl<T> HistoryRing<T> {
    /// Create a ring holding `initial` as its only entry. Capacity is at least 1.
    pub fn new(capacity: usize, initial: T) -> Self {
        let capacity = capacity.max(1);
        let mut slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        slots[0] = Some(initial);
        Self {
            slots,
            head: 0,
            len: 1,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of retrievable entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.slots.len()
    }

    /// Entry at a logical position, oldest first
    pub fn get(&self, logical: usize) -> Option<&T> {
        if logical >= self.len {
            return None;
        }
        self.slots[self.physical(logical)].as_ref()
    }

    pub fn current(&self) -> Option<&T> {
        self.get(self.cursor)
    }

    /// Record a new current entry
    pub fn push(&mut self, value: T) {
        for logical in self.cursor + 1..self.len {
            let idx = self.physical(logical);
            self.slots[idx] = None;
        }
        self.len = self.cursor + 1;

        if self.len == self.slots.len() {
            let oldest = self.head;
            self.slots[oldest] = None;
            self.head = (self.head + 1) % self.slots.len();
            self.len -= 1;
        }

        let idx = self.physical(self.len);
        self.slots[idx] = Some(value);
        self.len += 1;
        self.cursor = self.len - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.len
    }

    /// Move the cursor back; `None` at the oldest entry
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Move the cursor forward; `None` at the newest entry
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Drop every entry and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.slots[0] = Some(initial);
        self.len = 1;
        self.cursor = 0;
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_initial_entry() {
        let ring = HistoryRing::new(3, 0);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.current(), Some(&0));
        assert!(!ring.can_undo());
        assert!(!ring.can_redo());
    }

    #[test]
    fn evicts_oldest_first() {
        let mut ring = HistoryRing::new(10, 0);
        for i in 1..=15 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 10);
        assert_eq!(ring.cursor(), 9);
        let entries: Vec<i32> = ring.iter().copied().collect();
        assert_eq!(entries, (6..=15).collect::<Vec<_>>());
    }

    #[test]
    fn undo_and_redo_stop_at_boundaries() {
        let mut ring = HistoryRing::new(3, 'a');
        ring.push('b');
        assert_eq!(ring.undo(), Some(&'a'));
        assert_eq!(ring.undo(), None);
        assert_eq!(ring.redo(), Some(&'b'));
        assert_eq!(ring.redo(), None);
    }

    #[test]
    fn push_after_undo_drops_redo_branch() {
        let mut ring = HistoryRing::new(5, 0);
        ring.push(1);
        ring.push(2);
        ring.undo();
        ring.undo();
        ring.push(9);

        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [0, 9]);
        assert!(!ring.can_redo());
    }

    #[test]
    fn wraps_around_repeatedly() {
        let mut ring = HistoryRing::new(2, 0);
        for i in 1..=5 {
            ring.push(i);
        }
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [4, 5]);
        assert_eq!(ring.undo(), Some(&4));
        ring.push(7);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [4, 7]);
    }

    #[test]
    fn capacity_one_keeps_only_current() {
        let mut ring = HistoryRing::new(0, 0);
        ring.push(1);
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.current(), Some(&1));
    }

    #[test]
    fn reset_starts_over() {
        let mut ring = HistoryRing::new(3, 0);
        ring.push(1);
        ring.push(2);
        ring.reset(5);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [5]);
    }
}
