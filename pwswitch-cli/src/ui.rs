//! Terminal feedback on stderr.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Whether spinners may be drawn (set once at startup).
static FANCY: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_fancy(enabled: bool) {
    FANCY.store(enabled, Ordering::Relaxed);
}

fn use_fancy_output() -> bool {
    FANCY.load(Ordering::Relaxed) && console::colors_enabled_stderr()
}

/// Spinner shown while something blocks, or `None` when stderr is not a
/// terminal.
pub(crate) fn spinner(message: impl Into<String>) -> Option<ProgressBar> {
    if !use_fancy_output() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Run `f` under a spinner, clearing it afterwards.
pub(crate) fn with_spinner<T>(message: impl Into<String>, f: impl FnOnce() -> T) -> T {
    let pb = spinner(message);
    let result = f();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    result
}

/// Sleep for `pause`, with a spinner when interactive.
pub(crate) fn pause(pause: Duration) {
    if pause.is_zero() {
        return;
    }
    with_spinner(format!("Waiting {:.1}s", pause.as_secs_f64()), || {
        std::thread::sleep(pause);
    });
}
