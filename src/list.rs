/// Which of the three list segments a combined index falls into, with the
/// offset local to that segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Front(usize),
    Main(usize),
    Back(usize),
}

/// Front matter, form items and back matter laid end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListComposition {
    pub front_len: usize,
    pub main_len: usize,
    pub back_len: usize,
}

impl ListComposition {
    pub fn new(front_len: usize, main_len: usize, back_len: usize) -> Self {
        Self {
            front_len,
            main_len,
            back_len,
        }
    }

    pub fn total(&self) -> usize {
        self.front_len + self.main_len + self.back_len
    }

    /// Map a combined index to its segment.
    ///
    /// Panics when `index >= total()`: the list is always built with
    /// exactly `total()` entries, so an index past the end means the
    /// composition and the list disagree.
    pub fn locate(&self, index: usize) -> Segment {
        if index < self.front_len {
            Segment::Front(index)
        } else if index < self.front_len + self.main_len {
            Segment::Main(index - self.front_len)
        } else if index < self.total() {
            Segment::Back(index - self.front_len - self.main_len)
        } else {
            panic!(
                "list index {} out of bounds (front {}, main {}, back {})",
                index, self.front_len, self.main_len, self.back_len
            );
        }
    }

    /// Combined index of a main-segment item.
    pub fn main_to_global(&self, main_index: usize) -> usize {
        self.front_len + main_index
    }

    pub fn global_to_main(&self, index: usize) -> Option<usize> {
        match self.locate_checked(index)? {
            Segment::Main(i) => Some(i),
            _ => None,
        }
    }

    pub fn locate_checked(&self, index: usize) -> Option<Segment> {
        if index < self.total() {
            Some(self.locate(index))
        } else {
            None
        }
    }
}
