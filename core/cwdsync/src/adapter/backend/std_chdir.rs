use crate::error::Error;
use crate::ports::outbound::backend::preference;
use crate::ports::outbound::{ChdirBackend, ChdirOutcome};
use std::path::Path;

/// `std::env::set_current_dir` に委譲する backend
#[derive(Debug, Clone, Default)]
pub struct StdBackend;

impl ChdirBackend for StdBackend {
    fn name(&self) -> &'static str {
        "std"
    }

    fn preference(&self) -> i32 {
        preference::STD
    }

    fn apply(&self, dir: &Path) -> Result<ChdirOutcome, Error> {
        Ok(match std::env::set_current_dir(dir) {
            Ok(()) => ChdirOutcome::Changed,
            Err(e) => ChdirOutcome::refused(e),
        })
    }
}
