//! 組み込み chdir backend
//!
//! どれが「発見可能」かは cargo feature で決まる。`builtin_backends` が有効な実装を列挙し、
//! `BackendRegistry` がその中から preference 最大のものを選ぶ。

mod noop;

#[cfg(feature = "backend-std")]
mod std_chdir;

#[cfg(feature = "backend-dlopen")]
mod dlopen;

#[cfg(all(unix, feature = "backend-libc"))]
mod libc_chdir;

pub use noop::NoopBackend;

#[cfg(feature = "backend-std")]
pub use std_chdir::StdBackend;

#[cfg(feature = "backend-dlopen")]
pub use dlopen::DlopenBackend;

#[cfg(all(unix, feature = "backend-libc"))]
pub use libc_chdir::LibcBackend;

use crate::ports::outbound::ChdirBackend;
use std::sync::Arc;

/// このビルドで利用可能な backend（NoopBackend は含まない）
pub fn builtin_backends() -> Vec<Arc<dyn ChdirBackend>> {
    #[allow(unused_mut)]
    let mut backends: Vec<Arc<dyn ChdirBackend>> = Vec::new();
    #[cfg(all(unix, feature = "backend-libc"))]
    backends.push(Arc::new(LibcBackend));
    #[cfg(feature = "backend-dlopen")]
    backends.push(Arc::new(DlopenBackend::new()));
    #[cfg(feature = "backend-std")]
    backends.push(Arc::new(StdBackend));
    backends
}

/// ネイティブ関数へ渡す NUL 終端文字列を作る
#[cfg(any(feature = "backend-dlopen", all(unix, feature = "backend-libc")))]
fn to_c_path(backend: &str, dir: &std::path::Path) -> Result<std::ffi::CString, crate::error::Error> {
    use crate::error::Error;
    let s = dir.to_str().ok_or_else(|| {
        Error::backend_apply(backend, format!("path is not valid UTF-8: {}", dir.display()))
    })?;
    std::ffi::CString::new(s).map_err(|e| {
        Error::backend_apply(backend, format!("path contains NUL byte: {}", e))
    })
}
