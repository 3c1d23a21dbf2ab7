use curl::easy::Easy;
use progline::Progress;

const DEFAULT_URL: &str =
    "https://static.rust-lang.org/dist/rust-1.80.0-x86_64-unknown-linux-gnu.tar.gz";

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("Starting tarball download...");

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    let mut progress = Progress::new("Downloading").unit("MB").scale(1_000_000);

    progress.track(|p| -> anyhow::Result<()> {
        let mut handle = Easy::new();
        handle.url(&url)?;
        handle.progress(true)?;

        // A `Transfer` lets the callbacks borrow `p` instead of owning it.
        let mut transfer = handle.transfer();

        // The bytes aren't written anywhere; we only want to watch them go by.
        transfer.write_function(|data| Ok(data.len()))?;

        transfer.progress_function(|total, downloaded, _, _| {
            // curl reports `0` until it has seen a `Content-Length`.
            let total = total as u64;
            if total > 0 && p.total() != total {
                p.set_total(total);
            }
            p.set_done(downloaded as u64);
            true
        })?;

        transfer.perform()?;
        Ok(())
    })?;

    println!("Complete!");
    Ok(())
}
