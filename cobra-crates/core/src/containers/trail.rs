use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::cobra_assert_simple;

/// A stack of entries split into nested checkpoints.
///
/// This is the storage behind every constraint context: opening a context is
/// [`Trail::new_checkpoint`], closing it is [`Trail::synchronise`] to the previous checkpoint,
/// which hands back the entries that were pushed since (most recent first).
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint starts on the trail
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: Default::default(),
            trail_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        cobra_assert_simple!(
            new_checkpoint < self.current_checkpoint,
            "cannot synchronise to checkpoint {new_checkpoint}, the trail is at checkpoint {}",
            self.current_checkpoint
        );

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronising_removes_elements_beyond_checkpoint() {
        let mut trail = Trail::default();

        trail.new_checkpoint();
        trail.push(1);
        let _ = trail.synchronise(0);

        assert!(trail.is_empty());
        assert_eq!(trail.get_checkpoint(), 0);
    }

    #[test]
    fn synchronising_can_skip_several_checkpoints() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let popped = trail.synchronise(1).collect::<Vec<_>>();

        assert_eq!(vec![4, 3], popped);
        assert_eq!(&[1, 2], trail.deref());
    }

    #[test]
    #[should_panic]
    fn synchronising_without_checkpoint_fails() {
        let mut trail: Trail<u32> = Trail::default();
        let _ = trail.synchronise(0);
    }
}
