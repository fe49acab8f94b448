use crate::error::Error;
use crate::ports::outbound::backend::preference;
use crate::ports::outbound::{ChdirBackend, ChdirOutcome};
use std::path::Path;

/// backend が一つも無い時の代替。OS には触れず常に失敗を報告する。
#[derive(Debug, Clone, Default)]
pub struct NoopBackend;

impl ChdirBackend for NoopBackend {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn preference(&self) -> i32 {
        preference::NOOP
    }

    fn apply(&self, _dir: &Path) -> Result<ChdirOutcome, Error> {
        Ok(ChdirOutcome::Refused(None))
    }
}
