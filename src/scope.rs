//! Start/finish bookkeeping around a tracked task.

use crate::clock::Clock;
use crate::Progress;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

/// How a tracked task ended. Decides the summary line.
#[derive(Clone, Copy)]
pub enum Outcome<'a> {
    /// Finished normally.
    Done,
    /// The user called it off. No summary is printed.
    Cancelled,
    /// Something went wrong. Prints `ERROR` and then the error itself.
    Failed(&'a dyn fmt::Display),
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => write!(f, "Done"),
            Outcome::Cancelled => write!(f, "Cancelled"),
            Outcome::Failed(e) => write!(f, "Failed({})", e),
        }
    }
}

/// A task was cancelled by the user.
///
/// Return this (or wrap it in an [`anyhow::Error`]) from a
/// [`Progress::track`] closure to end quietly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl Error for Cancelled {}

/// Errors that can tell "the user stopped me" apart from a real failure.
pub trait Cancellation {
    fn is_cancellation(&self) -> bool;
}

impl Cancellation for Cancelled {
    fn is_cancellation(&self) -> bool {
        true
    }
}

impl Cancellation for io::Error {
    fn is_cancellation(&self) -> bool {
        self.kind() == io::ErrorKind::Interrupted
    }
}

impl Cancellation for anyhow::Error {
    fn is_cancellation(&self) -> bool {
        self.is::<Cancelled>()
            || self
                .downcast_ref::<io::Error>()
                .map_or(false, |e| e.is_cancellation())
    }
}

impl Cancellation for Box<dyn Error + Send + Sync> {
    fn is_cancellation(&self) -> bool {
        self.is::<Cancelled>()
            || self
                .downcast_ref::<io::Error>()
                .map_or(false, |e| e.is_cancellation())
    }
}

/// A [`Progress`] between its start and its summary line.
///
/// Made by [`Progress::start`]. Derefs to the `Progress`, so it is driven the
/// same way. Call [`Scope::finish`] to print the summary; if the guard is
/// dropped instead, it finishes as [`Outcome::Done`], or as
/// [`Outcome::Failed`] when dropped during a panic.
///
/// ```
/// use progline::{Outcome, Progress};
///
/// let mut progress = Progress::new("Copying").unit(" files");
/// let mut scope = progress.start();
///
/// for _file in scope.wrap(vec!["a", "b", "c"]) {
///     // ... copy it ...
/// }
///
/// scope.finish(Outcome::Done);
/// assert_eq!(progress.done(), 3);
/// ```
pub struct Scope<'a, W: Write, C: Clock> {
    progress: &'a mut Progress<W, C>,
    finished: bool,
}

impl<'a, W: Write, C: Clock> Scope<'a, W, C> {
    pub(crate) fn new(progress: &'a mut Progress<W, C>) -> Self {
        Scope {
            progress,
            finished: false,
        }
    }

    /// Print the summary line for `outcome` and end the scope.
    pub fn finish(mut self, outcome: Outcome<'_>) {
        self.finished = true;
        self.progress.finish(outcome);
    }
}

impl<W: Write, C: Clock> Deref for Scope<'_, W, C> {
    type Target = Progress<W, C>;

    fn deref(&self) -> &Self::Target {
        &*self.progress
    }
}

impl<W: Write, C: Clock> DerefMut for Scope<'_, W, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.progress
    }
}

impl<W: Write, C: Clock> Drop for Scope<'_, W, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        if std::thread::panicking() {
            self.progress.finish(Outcome::Failed(&"panicked"));
        } else {
            self.progress.finish(Outcome::Done);
        }
    }
}
