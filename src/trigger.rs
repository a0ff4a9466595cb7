use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// External signals sampled once per capture iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerSignals {
    /// The user asked for the current window to be translated
    pub snapshot: bool,
    /// The user asked the application to exit
    pub quit: bool,
}

/// Where trigger signals come from.
///
/// Abstracted so the stdin-backed production source can be swapped for a
/// scripted one in tests, or an event-driven input later, without touching
/// the debounce logic.
pub trait TriggerSource: Send {
    fn poll(&mut self) -> TriggerSignals;
}

/// Trigger source backed by shared atomic flags.
///
/// The snapshot flag is consumed on poll so one key press reads as one
/// signal edge; the quit flag is sticky.
pub struct AtomicTriggerSource {
    snapshot: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
}

impl AtomicTriggerSource {
    pub fn new(snapshot: Arc<AtomicBool>, quit: Arc<AtomicBool>) -> Self {
        Self { snapshot, quit }
    }
}

impl TriggerSource for AtomicTriggerSource {
    fn poll(&mut self) -> TriggerSignals {
        TriggerSignals {
            snapshot: self.snapshot.swap(false, Ordering::Relaxed),
            quit: self.quit.load(Ordering::Relaxed),
        }
    }
}

/// Spawns a thread that turns stdin key presses into trigger flags.
///
/// Reads line-buffered input and flips the matching flag for every
/// occurrence of a bound key. The thread lives until stdin closes or the
/// process exits.
pub fn spawn_stdin_watcher(
    snapshot_flag: Arc<AtomicBool>,
    quit_flag: Arc<AtomicBool>,
    snapshot_key: char,
    quit_key: char,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("Failed to read stdin: {}", e);
                    break;
                }
            };
            for key in line.chars() {
                if key == snapshot_key {
                    snapshot_flag.store(true, Ordering::Relaxed);
                } else if key == quit_key {
                    quit_flag.store(true, Ordering::Relaxed);
                }
            }
            if quit_flag.load(Ordering::Relaxed) {
                break;
            }
        }
    })
}

/// Debounced view over a trigger source.
///
/// A snapshot signal fires at most once per debounce window so one physical
/// key press cannot trigger several uploads. Quit is never debounced and may
/// be observed on the same iteration as a snapshot.
pub struct TriggerDetector<S> {
    source: S,
    debounce: Duration,
    last_snapshot: Option<Instant>,
}

impl<S: TriggerSource> TriggerDetector<S> {
    pub fn new(source: S, debounce: Duration) -> Self {
        Self {
            source,
            debounce,
            last_snapshot: None,
        }
    }

    /// Samples the source once and applies the debounce rule.
    ///
    /// `now` is passed in so tests can drive the clock.
    pub fn check(&mut self, now: Instant) -> TriggerSignals {
        let raw = self.source.poll();
        let fire = raw.snapshot
            && self
                .last_snapshot
                .map_or(true, |last| now.duration_since(last) >= self.debounce);
        if fire {
            self.last_snapshot = Some(now);
        }
        TriggerSignals {
            snapshot: fire,
            quit: raw.quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedSource {
        script: VecDeque<TriggerSignals>,
    }

    impl ScriptedSource {
        fn new(script: Vec<TriggerSignals>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl TriggerSource for ScriptedSource {
        fn poll(&mut self) -> TriggerSignals {
            self.script.pop_front().unwrap_or_default()
        }
    }

    fn snapshot() -> TriggerSignals {
        TriggerSignals {
            snapshot: true,
            quit: false,
        }
    }

    #[test]
    fn two_signals_within_debounce_fire_once() {
        let source = ScriptedSource::new(vec![snapshot(), snapshot()]);
        let mut detector = TriggerDetector::new(source, Duration::from_secs(1));
        let start = Instant::now();

        let first = detector.check(start);
        let second = detector.check(start + Duration::from_millis(300));
        assert!(first.snapshot);
        assert!(!second.snapshot);
    }

    #[test]
    fn two_signals_past_debounce_fire_twice() {
        let source = ScriptedSource::new(vec![snapshot(), snapshot()]);
        let mut detector = TriggerDetector::new(source, Duration::from_secs(1));
        let start = Instant::now();

        let first = detector.check(start);
        let second = detector.check(start + Duration::from_millis(1500));
        assert!(first.snapshot);
        assert!(second.snapshot);
    }

    #[test]
    fn quit_is_not_debounced_and_coexists_with_snapshot() {
        let both = TriggerSignals {
            snapshot: true,
            quit: true,
        };
        let source = ScriptedSource::new(vec![both, both]);
        let mut detector = TriggerDetector::new(source, Duration::from_secs(1));
        let start = Instant::now();

        let first = detector.check(start);
        assert!(first.snapshot);
        assert!(first.quit);

        // snapshot is suppressed inside the window, quit still observed
        let second = detector.check(start + Duration::from_millis(10));
        assert!(!second.snapshot);
        assert!(second.quit);
    }

    #[test]
    fn atomic_source_consumes_snapshot_edge() {
        let snapshot_flag = Arc::new(AtomicBool::new(true));
        let quit_flag = Arc::new(AtomicBool::new(false));
        let mut source = AtomicTriggerSource::new(snapshot_flag.clone(), quit_flag);

        assert!(source.poll().snapshot);
        assert!(!source.poll().snapshot);
        assert!(!snapshot_flag.load(Ordering::Relaxed));
    }
}
