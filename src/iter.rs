//! Driving a [`Progress`] by iterating.

use crate::clock::Clock;
use crate::Progress;
use std::io::Write;
use std::iter::FusedIterator;

/// An iterator that counts each item it yields into a [`Progress`].
///
/// Made by [`Progress::wrap`] or [`ProgressIterator::progress_with`]. Nothing
/// is pulled from the inner iterator ahead of time.
pub struct Wrapped<'a, I, W: Write, C: Clock> {
    iter: I,
    progress: &'a mut Progress<W, C>,
}

impl<'a, I, W, C> Wrapped<'a, I, W, C>
where
    I: Iterator,
    W: Write,
    C: Clock,
{
    pub(crate) fn new(iter: I, progress: &'a mut Progress<W, C>) -> Self {
        // Only an exact hint tells us the total.
        if let (lower, Some(upper)) = iter.size_hint() {
            if lower == upper {
                progress.set_total(upper as u64);
            }
        }

        Wrapped { iter, progress }
    }

    /// The [`Progress`] being advanced.
    pub fn progress(&mut self) -> &mut Progress<W, C> {
        &mut *self.progress
    }
}

impl<I, W, C> Iterator for Wrapped<'_, I, W, C>
where
    I: Iterator,
    W: Write,
    C: Clock,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next()?;
        self.progress.inc(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, W, C> ExactSizeIterator for Wrapped<'_, I, W, C>
where
    I: ExactSizeIterator,
    W: Write,
    C: Clock,
{
}

impl<I, W, C> FusedIterator for Wrapped<'_, I, W, C>
where
    I: FusedIterator,
    W: Write,
    C: Clock,
{
}

/// Hang a [`Progress`] off of any iterator.
///
/// ```
/// use progline::{Progress, ProgressIterator};
///
/// let mut progress = Progress::new("Summing");
/// let sum: u32 = (1..=10).progress_with(&mut progress).sum();
///
/// assert_eq!(sum, 55);
/// assert_eq!(progress.done(), 10);
/// assert_eq!(progress.total(), 10);
/// ```
pub trait ProgressIterator: Iterator + Sized {
    fn progress_with<W: Write, C: Clock>(
        self,
        progress: &mut Progress<W, C>,
    ) -> Wrapped<'_, Self, W, C>;
}

impl<I: Iterator> ProgressIterator for I {
    fn progress_with<W: Write, C: Clock>(
        self,
        progress: &mut Progress<W, C>,
    ) -> Wrapped<'_, Self, W, C> {
        Wrapped::new(self, progress)
    }
}
