use super::to_c_path;
use crate::error::Error;
use crate::ports::outbound::backend::preference;
use crate::ports::outbound::{ChdirBackend, ChdirOutcome};
use std::path::Path;

/// リンク時に解決済みの `libc::chdir` を直接呼ぶ backend（unix のみ）
#[derive(Debug, Clone, Default)]
pub struct LibcBackend;

impl ChdirBackend for LibcBackend {
    fn name(&self) -> &'static str {
        "libc"
    }

    fn preference(&self) -> i32 {
        preference::LIBC
    }

    fn apply(&self, dir: &Path) -> Result<ChdirOutcome, Error> {
        let c_path = to_c_path(self.name(), dir)?;
        // SAFETY: c_path は NUL 終端で、呼び出しの間生存している
        let rc = unsafe { libc::chdir(c_path.as_ptr()) };
        if rc == 0 {
            return Ok(ChdirOutcome::Changed);
        }
        Ok(ChdirOutcome::refused(std::io::Error::last_os_error()))
    }
}
