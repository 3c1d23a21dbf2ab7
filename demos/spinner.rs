//! When the total isn't known, a spinner and a rate are shown instead of a bar.

use progline::{Cancelled, Progress};
use std::time::Duration;

fn main() -> Result<(), Cancelled> {
    env_logger::init();

    let mut progress = Progress::new("Polling").unit(" events");

    // `from_fn` can't say how long it is, so no total is set.
    let mut left = 40;
    let events = std::iter::from_fn(move || {
        left -= 1;
        (left > 0).then_some(left)
    });

    progress.track(|p| {
        for event in p.wrap(events) {
            if event % 10 == 0 {
                log::info!("{} events to go", event);
            }
            std::thread::sleep(Duration::from_millis(75));
        }
        Ok(())
    })
}
