//! Terminal width probing.

use std::io::IsTerminal;
use std::sync::OnceLock;
use terminal_size::{terminal_size_of, Width};

/// The column count assumed when the real one can't be determined.
pub const DEFAULT_WIDTH: usize = 80;

/// Where a [`Progress`](crate::Progress) learns how wide its line may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Term {
    /// Ask the terminal behind `stderr` on every render.
    ///
    /// Falls back to [`DEFAULT_WIDTH`] when `stderr` is redirected or the
    /// platform query fails.
    #[default]
    Stderr,
    /// Act as if `stderr` were redirected, whatever it is attached to.
    ///
    /// The terminal is never asked, so the width is always [`DEFAULT_WIDTH`].
    Redirected,
    /// Always use the given width, whatever `stderr` is attached to.
    Fixed(usize),
}

impl Term {
    /// The current column count. Never fails.
    ///
    /// ```
    /// use progline::term::{Term, DEFAULT_WIDTH};
    ///
    /// assert_eq!(Term::Fixed(120).width(), 120);
    /// assert_eq!(Term::Redirected.width(), DEFAULT_WIDTH);
    /// ```
    pub fn width(&self) -> usize {
        match self {
            Term::Fixed(w) => *w,
            Term::Redirected => resolve(false, None),
            Term::Stderr => {
                let interactive = is_interactive();
                let queried = if interactive { stderr_width() } else { None };
                resolve(interactive, queried)
            }
        }
    }
}

/// Is `stderr` attached to a terminal? Checked once per process.
pub fn is_interactive() -> bool {
    static INTERACTIVE: OnceLock<bool> = OnceLock::new();

    *INTERACTIVE.get_or_init(|| {
        let tty = std::io::stderr().is_terminal();
        if !tty {
            log::debug!("stderr is not a terminal, assuming {} columns", DEFAULT_WIDTH);
        }
        tty
    })
}

/// The width to draw with, given what the terminal said (if it was asked).
fn resolve(interactive: bool, queried: Option<usize>) -> usize {
    if !interactive {
        return DEFAULT_WIDTH;
    }

    queried.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH)
}

fn stderr_width() -> Option<usize> {
    // `terminal_size` picks the ioctl or the console API for us.
    terminal_size_of(std::io::stderr()).map(|(Width(w), _)| w as usize)
}
