//! Human-readable progress lines
//!
//! The driver and the CSV sink report to the same destination so their lines
//! interleave in the order the pages are processed.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::infrastructure::replay_error::ReplayResult;

/// Shared line writer, silent when quiet
#[derive(Clone)]
pub struct ProgressReporter {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    quiet: bool,
}

impl ProgressReporter {
    pub fn new<W: Write + Send + 'static>(out: W, quiet: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            quiet,
        }
    }

    /// Lines go to stdout unless `quiet`
    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }

    pub fn silent() -> Self {
        Self::new(io::sink(), true)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn line(&self, args: fmt::Arguments<'_>) -> ReplayResult<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{args}")?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}
