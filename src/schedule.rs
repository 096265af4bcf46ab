use std::collections::VecDeque;

/// Work to run once the current render pass has finished.
///
/// The event loop drains this after every draw, which is the first point
/// where the list has been laid out and can accept scroll commands.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: VecDeque<T>,
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn schedule_post_frame(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// Take everything scheduled so far. Tasks scheduled while the
    /// returned batch runs wait for the next frame.
    pub fn take_ready(&mut self) -> Vec<T> {
        self.pending.drain(..).collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop pending tasks that `keep` rejects.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.pending.retain(keep);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
