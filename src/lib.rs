//! A single, throttled, self-fitting progress line.
//!
//! # Features
//!
//! - One line, redrawn in place on `stderr`.
//! - A bar with an ETA when the total is known, a spinner with a rate when it isn't.
//! - Redraws are rate-limited, so reporting progress in a hot loop is cheap.
//! - The line always fits the terminal; the label gives way first.
//! - A summary line at the end that tells success, cancellation, and failure apart.
//!
//! # Usage
//!
//! A [`Progress`] tracks exactly one task. Tell it how much there is to do and
//! how much is done, and it decides when to redraw:
//!
//! ```
//! use progline::Progress;
//!
//! let mut progress = Progress::new("Downloading").unit("MB").scale(1_000_000);
//! progress.set_total(50_000_000);
//!
//! for chunk in 1..=50 {
//!     // ... Your logic ...
//!     progress.set_done(chunk * 1_000_000);
//! }
//! ```
//!
//! ## Scopes
//!
//! [`Progress::track`] resets the counters, runs a closure, and then prints a
//! summary depending on how the closure went:
//!
//! ```
//! use progline::{Cancelled, Progress};
//!
//! let mut progress = Progress::new("Indexing").unit(" docs");
//!
//! let indexed = progress.track(|p| {
//!     let mut n = 0;
//!     for _doc in p.wrap(0..100) {
//!         n += 1;
//!     }
//!     Ok::<_, Cancelled>(n)
//! });
//!
//! assert_eq!(indexed, Ok(100));
//! ```
//!
//! A closure that fails with an error for which
//! [`Cancellation::is_cancellation`] holds ends quietly. Any other error prints
//! `ERROR` and the error itself. Either way the error is handed back unchanged.
//!
//! For more control, [`Progress::start`] gives a [`Scope`] guard to
//! [`finish`](Scope::finish) with an explicit [`Outcome`].
//!
//! ## Iterators
//!
//! [`Progress::wrap`] (or [`ProgressIterator::progress_with`]) counts items as
//! they are pulled. An iterator that knows its exact length sets the total,
//! and so gets a bar; one that doesn't gets a spinner.
//!
//! # Caveats
//!
//! - One `Progress` per terminal line. Two at once will fight over it.
//! - Not [`Sync`]. Share it behind a lock if you must.
//! - The rate is the average since the start, not a recent rate.
//! - Widths are counted in `char`s, so wide glyphs in labels can overflow.

use std::fmt::Display;
use std::io::{Stderr, Write};
use std::time::{Duration, Instant};

pub mod clock;
pub mod eta;
pub mod iter;
pub mod scope;
pub mod term;

pub use clock::{Clock, ManualClock, SystemClock};
pub use iter::{ProgressIterator, Wrapped};
pub use scope::{Cancellation, Cancelled, Outcome, Scope};
pub use term::Term;

/// The phases of the spinner, in order.
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Replaces the tail of a label that doesn't fit.
const ELLIPSIS: &str = "... ";

/// Shown when a scope starts, before anything is known.
const PLACEHOLDER: &str = "[...]";

/// The progress of a single task, and the line that displays it.
pub struct Progress<W = Stderr, C = SystemClock> {
    label: String,
    unit: String,
    /// Raw counts are divided by this before display.
    scale: u64,
    bar_width: usize,
    /// Minimum time between two unforced draws.
    interval: Duration,

    count: u64,
    /// `None` means we're spinning.
    expected: Option<u64>,
    /// Items per second, averaged since `started`.
    tps: f64,

    started: Instant,
    last_shown: Option<Instant>,
    last_change: Instant,

    term: Term,
    out: W,
    clock: C,
}

impl Progress {
    /// A new progress line on `stderr`, timed by the wall clock.
    pub fn new<S: Into<String>>(label: S) -> Progress {
        Progress::with_output(label, std::io::stderr(), SystemClock)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Progress::new("")
    }
}

impl<W: Write, C: Clock> Progress<W, C> {
    /// Like [`Progress::new`], but drawing to `out` and timed by `clock`.
    ///
    /// ```
    /// use progline::{ManualClock, Progress, Term};
    ///
    /// let mut progress = Progress::with_output("Test", Vec::new(), ManualClock::new())
    ///     .term(Term::Fixed(40));
    /// progress.draw();
    ///
    /// let drawn = String::from_utf8(progress.into_inner()).unwrap();
    /// assert_eq!(drawn, format!("Test{}[|] 0 (0.00 /s)\r", " ".repeat(21)));
    /// ```
    pub fn with_output<S: Into<String>>(label: S, out: W, clock: C) -> Self {
        let now = clock.now();

        Progress {
            label: label.into(),
            unit: String::new(),
            scale: 1,
            bar_width: 10,
            interval: Duration::from_millis(400),
            count: 0,
            expected: None,
            tps: 0.0,
            started: now,
            last_shown: None,
            last_change: now,
            term: Term::default(),
            out,
            clock,
        }
    }

    /// The suffix shown after counts, like `"MB"` or `" files"`.
    pub fn unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.unit = unit.into();
        self
    }

    /// Divide raw counts by this before showing them. `0` is taken as `1`.
    pub fn scale(mut self, scale: u64) -> Self {
        self.scale = scale.max(1);
        self
    }

    /// How many cells the bar has. Defaults to 10.
    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// The least time between two redraws. Defaults to 400ms.
    ///
    /// This is also the period of one spinner phase.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Where the terminal width comes from. Defaults to [`Term::Stderr`].
    pub fn term(mut self, term: Term) -> Self {
        self.term = term;
        self
    }

    /// Forget all progress and restart the clock.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.count = 0;
        self.expected = None;
        self.tps = 0.0;
        self.started = now;
        self.last_change = now;
        self.last_shown = None;
    }

    /// Set the expected number of items, and redraw immediately.
    ///
    /// This switches the line from a spinner to a bar. The total is never put
    /// below what is already done.
    pub fn set_total(&mut self, total: u64) {
        self.expected = Some(total.max(self.count));
        self.show(true);
    }

    /// The expected number of items, or `0` if unknown.
    pub fn total(&self) -> u64 {
        self.expected.unwrap_or(0)
    }

    /// Set how many items are done, and redraw if enough time has passed.
    ///
    /// If this overtakes the total, the total is raised to match:
    ///
    /// ```
    /// use progline::Progress;
    ///
    /// let mut progress = Progress::new("Guessing");
    /// progress.set_total(5);
    /// progress.set_done(8);
    /// assert_eq!(progress.total(), 8);
    /// ```
    ///
    /// The count never goes backwards. A smaller value than the current one is
    /// ignored; use [`Progress::reset`] to start over.
    pub fn set_done(&mut self, done: u64) {
        if done < self.count {
            log::debug!(
                "ignoring attempt to move {:?} back from {} to {}",
                self.label,
                self.count,
                done
            );
        }

        self.count = done.max(self.count);
        self.last_change = self.clock.now();
        self.tps = eta::throughput(self.count, self.started, self.last_change);

        if let Some(expected) = self.expected {
            if self.count > expected {
                self.expected = Some(self.count);
            }
        }

        self.show(false);
    }

    /// How many items are done.
    pub fn done(&self) -> u64 {
        self.count
    }

    /// Mark `n` more items as done. See [`Progress::set_done`].
    pub fn inc(&mut self, n: u64) {
        self.set_done(self.count.saturating_add(n));
    }

    /// Raw items per second, averaged since the start.
    pub fn throughput(&self) -> f64 {
        self.tps
    }

    /// Redraw now, regardless of when the last draw was.
    pub fn draw(&mut self) {
        self.show(true);
    }

    /// Write a whole line of text above the progress line.
    ///
    /// The text is padded to the terminal width so no remains of the progress
    /// line show through. The next draw puts the progress line back.
    pub fn println<D: Display>(&mut self, line: D) {
        let line = line.to_string();
        let line = line.trim_end();
        let pad = self.term.width().saturating_sub(line.chars().count());
        let text = format!("{}{}\n", line, " ".repeat(pad));
        self.emit(&text);
        self.last_shown = None;
    }

    /// Count the items of `iter` as they are pulled through.
    ///
    /// If `iter` knows exactly how long it is, that becomes the total.
    ///
    /// ```
    /// use progline::Progress;
    ///
    /// let mut progress = Progress::new("Squaring");
    /// let squares: Vec<u32> = progress.wrap(vec![1, 2, 3]).map(|n| n * n).collect();
    ///
    /// assert_eq!(squares, vec![1, 4, 9]);
    /// assert_eq!(progress.done(), 3);
    /// ```
    pub fn wrap<I: IntoIterator>(&mut self, iter: I) -> Wrapped<'_, I::IntoIter, W, C> {
        Wrapped::new(iter.into_iter(), self)
    }

    /// Reset, show a placeholder line, and hand back a guard that prints the
    /// summary when finished.
    pub fn start(&mut self) -> Scope<'_, W, C> {
        self.reset();
        let now = self.clock.now();
        self.last_shown = Some(now);
        self.print_lr(PLACEHOLDER);
        Scope::new(self)
    }

    /// Run `work` between [`Progress::start`] and a summary line.
    ///
    /// The result of `work` is returned as-is. An error that is a cancellation
    /// ends the line quietly; any other error is printed below an `ERROR` line.
    pub fn track<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: Display + Cancellation,
    {
        let mut scope = self.start();
        let result = work(&mut *scope);

        match &result {
            Ok(_) => scope.finish(Outcome::Done),
            Err(e) if e.is_cancellation() => scope.finish(Outcome::Cancelled),
            Err(e) => scope.finish(Outcome::Failed(e)),
        }

        result
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw, unless we drew too recently and aren't forced to.
    fn show(&mut self, force: bool) {
        let now = self.clock.now();

        if !force {
            if let Some(shown) = self.last_shown {
                if now.saturating_duration_since(shown) < self.interval {
                    return;
                }
            }
        }

        self.last_shown = Some(now);
        let line = self.status(now);
        self.print_lr(&line);
    }

    /// The right-hand side of the line, without the label.
    fn status(&self, now: Instant) -> String {
        match self.expected {
            Some(expected) => {
                let eta = eta::remaining(self.count, expected, self.tps, self.last_change, now);
                let done = self.count / self.scale;
                let all = expected / self.scale;

                let filled = if all > 0 {
                    (done as u128 * self.bar_width as u128 / all as u128) as usize
                } else {
                    0
                }
                .min(self.bar_width);

                // Right-align `done` under the digits of `all`.
                let pad = magnitude(all).saturating_sub(magnitude(done));

                format!(
                    " [{}{}] {}{}/{}{} ETA {}",
                    "#".repeat(filled),
                    " ".repeat(self.bar_width - filled),
                    " ".repeat(pad),
                    done,
                    all,
                    self.unit,
                    eta
                )
            }
            None => {
                let elapsed = now.saturating_duration_since(self.started).as_nanos();
                let phase = match self.interval.as_nanos() {
                    0 => 0,
                    i => (elapsed / i) as usize,
                };

                format!(
                    "[{}] {}{} ({:.2} {}/s)",
                    SPINNER[phase % SPINNER.len()],
                    self.count / self.scale,
                    self.unit,
                    self.tps / self.scale as f64,
                    self.unit
                )
            }
        }
    }

    /// Print the final line for `outcome`, then end it with a newline.
    fn finish(&mut self, outcome: Outcome<'_>) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        log::trace!("{:?} finished after {:.2}s: {:?}", self.label, elapsed, outcome);

        let summary = match outcome {
            Outcome::Cancelled => None,
            Outcome::Failed(_) => Some("ERROR".to_string()),
            Outcome::Done if self.count > 0 => {
                let secs = elapsed.max(1.0);
                let unit = if self.unit.is_empty() { "#" } else { self.unit.as_str() };

                Some(format!(
                    "({}{} in {} - {:.2} {}/s) DONE",
                    self.count / self.scale,
                    self.unit,
                    eta::hms(secs),
                    self.count as f64 / self.scale as f64 / secs,
                    unit
                ))
            }
            Outcome::Done => Some("DONE".to_string()),
        };

        if let Some(summary) = summary {
            self.print_lr(&summary);
        }
        self.emit("\n");

        if let Outcome::Failed(e) = outcome {
            self.emit(&format!("  {}\n", e));
        }
    }

    /// Draw `line` right-aligned after the label, overwriting what was there.
    fn print_lr(&mut self, line: &str) {
        let text = fit(&self.label, line, self.term.width());
        self.emit(&text);
        self.emit("\r");
    }

    /// Write and flush. A broken `stderr` is no reason to fail the caller.
    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());

        if let Err(e) = result {
            log::debug!("failed to draw progress line: {}", e);
        }
    }
}

/// Join `label` and `line` into exactly `cols` characters.
///
/// Padding goes between them. If they don't fit, the label is cut short and
/// marked with an ellipsis. If even that isn't enough, the line overflows.
fn fit(label: &str, line: &str, cols: usize) -> String {
    let label_len = label.chars().count();
    let line_len = line.chars().count();
    let mut text = String::with_capacity(cols.max(label.len() + line.len()));

    match cols.checked_sub(label_len + line_len) {
        Some(pad) => {
            text.push_str(label);
            text.extend(std::iter::repeat(' ').take(pad));
        }
        None => {
            let over = label_len + line_len - cols;
            let keep = label_len.saturating_sub(over + ELLIPSIS.len());
            text.extend(label.chars().take(keep));
            text.push_str(ELLIPSIS);
        }
    }

    text.push_str(line);
    text
}

/// `floor(log10(n))`, with `0` for `0`.
fn magnitude(n: u64) -> usize {
    n.checked_ilog10().unwrap_or(0) as usize
}
