//! 実行時に C ランタイムから chdir を解決する backend
//!
//! unix では libc の `chdir`、Windows では msvcrt の `_chdir` を libloading で引く。
//! シンボル解決は選択時の `init` で一度だけ行い、失敗も含めて結果を保持する。

use super::to_c_path;
use crate::error::Error;
use crate::ports::outbound::backend::preference;
use crate::ports::outbound::{ChdirBackend, ChdirOutcome};
use libloading::{Library, Symbol};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::sync::OnceLock;

type ChdirFn = unsafe extern "C" fn(*const c_char) -> c_int;

#[cfg(target_os = "macos")]
const LIBRARY_CANDIDATES: &[&str] = &["/usr/lib/libSystem.B.dylib", "libc.dylib"];
#[cfg(all(unix, not(target_os = "macos")))]
const LIBRARY_CANDIDATES: &[&str] = &["libc.so.6", "libc.so", "libc.so.7"];
#[cfg(windows)]
const LIBRARY_CANDIDATES: &[&str] = &["msvcrt.dll", "msvcrt"];

#[cfg(windows)]
const CHDIR_SYMBOL: &[u8] = b"_chdir\0";
#[cfg(not(windows))]
const CHDIR_SYMBOL: &[u8] = b"chdir\0";

/// ロード済みライブラリと解決済み関数
struct LoadedChdir {
    _library: Library,
    chdir: ChdirFn,
}

impl LoadedChdir {
    fn load(candidates: &[&str], symbol: &[u8]) -> Result<Self, String> {
        let mut failures = Vec::new();
        for path in candidates {
            match Self::load_from_path(path, symbol) {
                Ok(loaded) => return Ok(loaded),
                Err(e) => failures.push(format!("{}: {}", path, e)),
            }
        }
        Err(format!(
            "no library exports {}: [{}]",
            String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol)),
            failures.join("; ")
        ))
    }

    fn load_from_path(path: &str, symbol: &[u8]) -> Result<Self, libloading::Error> {
        // SAFETY: C ランタイムは安定 ABI で、chdir のシグネチャは ChdirFn と一致する
        unsafe {
            let library = Library::new(path)?;
            let chdir: ChdirFn = {
                let sym: Symbol<ChdirFn> = library.get(symbol)?;
                *sym
            };
            Ok(Self {
                _library: library,
                chdir,
            })
        }
    }
}

/// libloading で chdir を解決して呼ぶ backend
pub struct DlopenBackend {
    candidates: &'static [&'static str],
    symbol: &'static [u8],
    loaded: OnceLock<Result<LoadedChdir, Error>>,
}

impl DlopenBackend {
    pub fn new() -> Self {
        Self::with_candidates(LIBRARY_CANDIDATES, CHDIR_SYMBOL)
    }

    /// ライブラリ候補とシンボル名（NUL 終端）を指定して作る
    pub fn with_candidates(candidates: &'static [&'static str], symbol: &'static [u8]) -> Self {
        Self {
            candidates,
            symbol,
            loaded: OnceLock::new(),
        }
    }

    fn loaded(&self) -> Result<&LoadedChdir, Error> {
        self.loaded
            .get_or_init(|| {
                LoadedChdir::load(self.candidates, self.symbol)
                    .map_err(|reason| Error::backend_init("dlopen", reason))
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl Default for DlopenBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ChdirBackend for DlopenBackend {
    fn name(&self) -> &'static str {
        "dlopen"
    }

    fn preference(&self) -> i32 {
        preference::DLOPEN
    }

    fn init(&self) -> Result<(), Error> {
        self.loaded().map(|_| ())
    }

    fn apply(&self, dir: &Path) -> Result<ChdirOutcome, Error> {
        let loaded = self
            .loaded()
            .map_err(|e| Error::backend_apply(self.name(), e.to_string()))?;
        let c_path = to_c_path(self.name(), dir)?;
        // SAFETY: c_path は NUL 終端で、呼び出しの間生存している
        let rc = unsafe { (loaded.chdir)(c_path.as_ptr()) };
        if rc == 0 {
            return Ok(ChdirOutcome::Changed);
        }
        // chdir / _chdir はどちらも errno を設定する
        Ok(ChdirOutcome::refused(std::io::Error::last_os_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_fails_when_no_library_resolves() {
        let b = DlopenBackend::with_candidates(&["/nonexistent/libnothing.so"], b"chdir\0");
        let err = b.init().unwrap_err();
        match err {
            Error::BackendInit { backend, reason } => {
                assert_eq!(backend, "dlopen");
                assert!(reason.contains("/nonexistent/libnothing.so"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // 失敗は保持され、apply も失敗する
        assert!(b.init().is_err());
        assert!(matches!(
            b.apply(Path::new("/")),
            Err(Error::BackendApply { .. })
        ));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_resolves_chdir_from_libc() {
        let b = DlopenBackend::new();
        assert!(b.init().is_ok());
    }
}
