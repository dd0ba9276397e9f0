use tracing::error;

use super::fold::RuntimeError;

/// Receives errors raised while walking a program. Reporting never stops the walk.
pub trait Reporter {
    fn report(&mut self, error: &RuntimeError);
}

/// Writes each error to stderr and remembers that one happened
#[derive(Debug, Default)]
pub struct StderrReporter {
    reported: usize,
}

impl StderrReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.reported > 0
    }

    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl Reporter for StderrReporter {
    fn report(&mut self, err: &RuntimeError) {
        self.reported += 1;
        error!(%err, "runtime error while printing");
        eprintln!("{err}");
    }
}

/// Collects the rendered error messages, in the order they were reported
impl Reporter for Vec<String> {
    fn report(&mut self, error: &RuntimeError) {
        self.push(error.to_string());
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, error: &RuntimeError) {
        (**self).report(error)
    }
}
