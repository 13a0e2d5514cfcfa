//! Runs checks in order and tallies the results.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::checks::{self, Check};
use crate::transcript::{Transcript, FAIL, PASS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub title: String,
    pub passed: bool,
}

/// Ordered results of a [`Suite`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    outcomes: Vec<CheckOutcome>,
}

impl Summary {
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// `0` when every check passed, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn report(&self, out: &mut Transcript<'_>) {
        out.heading("Test Summary");
        out.plain(format_args!("Passed: {}/{}", self.passed(), self.total()));
        out.blank();
        if self.all_passed() {
            out.pass("All tests passed!");
        } else {
            out.fail("Some tests failed");
        }
    }
}

/// Where a check panicked, recorded by the panic hook.
struct PanicTrace {
    location: Option<String>,
    backtrace: Backtrace,
}

impl fmt::Display for PanicTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            writeln!(f, "panicked at {location}")?;
        }
        write!(f, "\nStack backtrace:\n{}", self.backtrace)
    }
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<PanicTrace>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Panics on a thread that is running a check are recorded in `LAST_PANIC`
/// instead of being printed. All other panics go to the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let trace = PanicTrace {
                    location: info.location().map(ToString::to_string),
                    backtrace: Backtrace::force_capture(),
                };
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
            } else {
                previous(info);
            }
        }));
    });
}

fn run_capturing<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    install_panic_hook();
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
    CAPTURING.with(|c| c.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|c| c.set(false));
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}

/// A fixed, ordered list of checks.
///
/// Every check runs regardless of earlier outcomes. An `Err` or a panic
/// escaping a check is printed and recorded as a failure.
pub struct Suite {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Suite {
    fn default() -> Self {
        Suite::new(checks::standard())
    }
}

impl Suite {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Suite { checks }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn run(&self, out: &mut Transcript<'_>) -> Summary {
        let mut outcomes = Vec::with_capacity(self.checks.len());

        for (index, check) in self.checks.iter().enumerate() {
            let title = check.title().to_string();
            out.heading(&format!("Test {}: {title}", index + 1));

            let result = run_capturing(|| check.run(&mut *out));
            let passed = match result {
                Ok(Ok(passed)) => passed,
                Ok(Err(e)) => {
                    out.blank();
                    out.fail_with_trace("Test failed with error", &e);
                    false
                }
                Err(payload) => {
                    out.blank();
                    out.fail(format_args!(
                        "Test panicked: {}",
                        panic_message(payload.as_ref())
                    ));
                    if let Some(trace) = LAST_PANIC.with(|slot| slot.borrow_mut().take()) {
                        out.trace(trace);
                    }
                    false
                }
            };

            log::info!("{} {title}", if passed { PASS } else { FAIL });
            outcomes.push(CheckOutcome { title, passed });
        }

        out.flush();
        Summary { outcomes }
    }
}
