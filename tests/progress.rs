use progline::{Cancelled, ManualClock, Outcome, Progress, Term};
use std::io;
use std::time::Duration;

fn progress(label: &str, clock: &ManualClock) -> Progress<Vec<u8>, ManualClock> {
    Progress::with_output(label, Vec::new(), clock.clone()).term(Term::Fixed(80))
}

fn drawn(progress: &Progress<Vec<u8>, ManualClock>) -> String {
    String::from_utf8(progress.get_ref().clone()).unwrap()
}

/// The lines that were drawn in place, most recent last.
fn frames(progress: &Progress<Vec<u8>, ManualClock>) -> Vec<String> {
    drawn(progress)
        .split(|c| c == '\r' || c == '\n')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[test]
fn download_halfway() {
    let clock = ManualClock::new();
    let mut p = progress("download", &clock).unit("MB");

    p.set_total(100);
    clock.advance(Duration::from_secs(5));
    p.set_done(50);

    assert_eq!(p.throughput(), 10.0);

    let last = frames(&p).pop().unwrap();
    assert!(last.starts_with("download "));
    assert!(last.contains(" [#####     ] "), "{:?}", last);
    assert!(last.contains(" 50/100MB"), "{:?}", last);
    assert!(last.ends_with("ETA 00:00:05"), "{:?}", last);
    assert_eq!(last.chars().count(), 80);
}

#[test]
fn total_follows_an_overtaking_count() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    p.set_total(10);
    p.set_done(25);
    assert_eq!(p.total(), 25);

    p.set_done(26);
    assert_eq!(p.total(), 26);
}

#[test]
fn count_never_goes_back() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    p.set_done(10);
    p.set_done(3);
    assert_eq!(p.done(), 10);

    p.reset();
    assert_eq!(p.done(), 0);
    assert_eq!(p.total(), 0);
}

#[test]
fn draws_are_throttled() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);
    let draws = |p: &Progress<Vec<u8>, ManualClock>| drawn(p).matches('\r').count();

    p.set_total(100);
    assert_eq!(draws(&p), 1);

    p.set_done(1);
    clock.advance(Duration::from_millis(399));
    p.set_done(2);
    assert_eq!(draws(&p), 1);

    clock.advance(Duration::from_millis(1));
    p.set_done(3);
    assert_eq!(draws(&p), 2);

    // Forced draws ignore the interval.
    p.draw();
    p.set_total(200);
    assert_eq!(draws(&p), 4);
}

#[test]
fn spinner_turns_once_per_interval() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);
    let mut glyphs = String::new();

    for _ in 0..5 {
        p.draw();
        let frame = frames(&p).pop().unwrap();
        let open = frame.find('[').unwrap();
        glyphs.push(frame[open + 1..].chars().next().unwrap());
        clock.advance(Duration::from_millis(400));
    }

    assert_eq!(glyphs, "|/-\\|");
}

#[test]
fn spinner_shows_scaled_rate() {
    let clock = ManualClock::new();
    let mut p = progress("bytes", &clock).unit("KB").scale(1000);

    clock.advance(Duration::from_secs(2));
    p.set_done(5000);

    // Two seconds in, the spinner is on its sixth phase.
    let last = frames(&p).pop().unwrap();
    assert!(last.ends_with("[/] 5KB (2.50 KB/s)"), "{:?}", last);
}

#[test]
fn spinner_summary() {
    let clock = ManualClock::new();
    let mut p = progress("scan", &clock).unit("files");
    let ticker = clock.clone();

    // No exact length, so no total: the spinner is used.
    let result = p.track(|p| {
        for _ in p.wrap((1..).take_while(|n| *n <= 3)) {
            ticker.advance(Duration::from_millis(500));
        }
        ticker.advance(Duration::from_millis(500));
        Ok::<_, Cancelled>(())
    });

    assert_eq!(result, Ok(()));
    assert_eq!(p.total(), 0);

    let out = drawn(&p);
    assert!(out.ends_with("(3files in 00:00:02 - 1.50 files/s) DONE\r\n"), "{:?}", out);
}

#[test]
fn summary_without_unit() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    let mut scope = p.start();
    scope.set_done(3);
    clock.advance(Duration::from_millis(200));
    scope.finish(Outcome::Done);

    // Elapsed time counts as at least a second.
    let out = drawn(&p);
    assert!(out.ends_with("(3 in 00:00:01 - 3.00 #/s) DONE\r\n"), "{:?}", out);
}

#[test]
fn nothing_done() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    p.start().finish(Outcome::Done);

    let last = frames(&p).pop().unwrap();
    assert_eq!(last.trim(), "DONE");
    assert!(drawn(&p).starts_with(&format!("{}[...]\r", " ".repeat(75))));
}

#[test]
fn dropped_scope_finishes() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    {
        let _scope = p.start();
    }

    assert!(drawn(&p).ends_with("DONE\r\n"));
}

#[test]
fn failure_is_reported_and_returned() {
    let clock = ManualClock::new();
    let mut p = progress("copy", &clock);

    let result: Result<(), io::Error> = p.track(|p| {
        p.set_done(4);
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    });

    assert_eq!(result.unwrap_err().to_string(), "disk full");

    let out = drawn(&p);
    assert!(out.ends_with("ERROR\r\n  disk full\n"), "{:?}", out);
    assert!(!out.contains("DONE"));
}

#[test]
fn cancellation_is_quiet() {
    let clock = ManualClock::new();
    let mut p = progress("copy", &clock);

    let result: anyhow::Result<()> = p.track(|p| {
        p.set_done(4);
        Err(Cancelled.into())
    });

    assert!(result.unwrap_err().is::<Cancelled>());

    let out = drawn(&p);
    assert!(out.ends_with("\r\n"));
    assert!(!out.contains("DONE"));
    assert!(!out.contains("ERROR"));
}

#[test]
fn interrupted_io_is_a_cancellation() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    let result: Result<(), io::Error> = p.track(|_| Err(io::ErrorKind::Interrupted.into()));

    assert!(result.is_err());
    assert!(!drawn(&p).contains("ERROR"));
}

#[test]
fn long_labels_give_way() {
    let clock = ManualClock::new();
    let mut p = Progress::with_output("a very long label indeed", Vec::new(), clock.clone())
        .term(Term::Fixed(20));

    p.start().finish(Outcome::Cancelled);

    assert_eq!(drawn(&p), "a very long... [...]\r\n");
}

#[test]
fn redirected_output_draws_default_width() {
    let clock = ManualClock::new();
    let mut p = Progress::with_output("x", Vec::new(), clock.clone()).term(Term::Redirected);

    p.set_total(3);

    let last = frames(&p).pop().unwrap();
    assert_eq!(last.chars().count(), 80);
    assert!(last.ends_with("[          ] 0/3 ETA **:**:**"), "{:?}", last);
}

#[test]
fn lowering_the_total_below_the_count() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    p.set_done(8);
    p.set_total(5);
    assert_eq!(p.total(), 8);

    let last = frames(&p).pop().unwrap();
    assert!(last.contains("[##########] 8/8"), "{:?}", last);
}

#[test]
fn wrapping_a_sized_iterator() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    let mut wrapped = p.wrap(vec!['a', 'b', 'c']);
    assert_eq!(wrapped.len(), 3);
    assert_eq!(wrapped.next(), Some('a'));
    assert_eq!(wrapped.progress().done(), 1);
    assert_eq!(wrapped.count(), 2);

    assert_eq!(p.total(), 3);
    assert_eq!(p.done(), 3);
}

#[test]
fn wrapping_is_lazy() {
    let clock = ManualClock::new();
    let mut p = progress("", &clock);

    let firsts: Vec<u32> = p.wrap(0..).take(2).collect();

    assert_eq!(firsts, vec![0, 1]);
    assert_eq!(p.done(), 2);
    assert_eq!(p.total(), 0);
}

#[test]
fn println_pads_to_width() {
    let clock = ManualClock::new();
    let mut p = Progress::with_output("", Vec::new(), clock.clone()).term(Term::Fixed(10));

    p.println("hello  ");

    assert_eq!(drawn(&p), "hello     \n");
}
