//! An example of a task that fails or is called off part way.
//!
//! A cancellation ends the line quietly. Any other error is printed below an
//! `ERROR` summary, and handed back either way.

use anyhow::bail;
use progline::{Cancelled, Progress};
use rand::Rng;
use std::time::Duration;

fn main() {
    env_logger::init();
    println!("Starting downloads...");

    for n in 0..5 {
        let mut progress = Progress::new(format!("Downloading #{}", n)).unit(" chunks");
        let mut rng = rand::thread_rng();
        let wait = rng.gen_range(25..100);

        let result = progress.track(|p| {
            p.set_total(50);

            for chunk in 1..=50 {
                // Simulate our "download" failing, or the user losing patience.
                match rng.gen_range(0..=99) {
                    0 => bail!("connection reset after chunk {}", chunk),
                    1 => return Err(Cancelled.into()),
                    _ => {}
                }

                p.set_done(chunk);
                std::thread::sleep(Duration::from_millis(wait));
            }

            Ok(())
        });

        if let Err(e) = result {
            log::info!("download #{} stopped: {}", n, e);
        }
    }

    println!("Complete!");
}
