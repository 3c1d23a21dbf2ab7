use progline::Progress;
use std::time::Duration;

fn main() {
    env_logger::init();
    println!("Starting bar...");

    // Counts are in bytes, but shown in megabytes.
    let mut progress = Progress::new("Downloading").unit("MB").scale(1_000_000);

    let mut scope = progress.start();
    scope.set_total(50_000_000);

    for n in 0..=50 {
        // Redraws happen at most every 400ms, no matter how often this is called.
        scope.set_done(n * 1_000_000);

        std::thread::sleep(Duration::from_millis(60));
    }

    // Dropping the scope prints the summary line.
    drop(scope);

    println!("Complete!");
}
