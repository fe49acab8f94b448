//! 実際に OS の CWD を変えるテスト
//!
//! OS の CWD はプロセスで一つなので、ここのテストは `PROCESS_CWD` で直列化し、
//! 終了時に元の CWD へ戻す。

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::adapter::backend::NoopBackend;
use crate::adapter::{shared_cwd, StdFileSystem};
use crate::backend_registry::BackendRegistry;
use crate::config::{ChdirConfig, ConfigLayer};
use crate::error::Error;
use crate::manager::{ChangeDir, ChangeDirDeps};
use crate::ports::outbound::log::testing::MemoryLog;
use crate::ports::outbound::{ChdirBackend, CwdMirror, LogLevel};

static PROCESS_CWD: Mutex<()> = Mutex::new(());

/// 直列化し、drop 時に元の CWD へ戻す
struct CwdRestore {
    original: PathBuf,
    _serial: MutexGuard<'static, ()>,
}

impl CwdRestore {
    fn acquire() -> Self {
        let serial = PROCESS_CWD.lock().unwrap_or_else(|p| p.into_inner());
        let original = std::env::current_dir().unwrap();
        Self {
            original,
            _serial: serial,
        }
    }
}

impl Drop for CwdRestore {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

fn os_cwd() -> PathBuf {
    std::fs::canonicalize(std::env::current_dir().unwrap()).unwrap()
}

fn manager_with(backend: Arc<dyn ChdirBackend>) -> ChangeDir {
    ChangeDir::new(
        &ChdirConfig::default(),
        ChangeDirDeps {
            fs: Arc::new(StdFileSystem),
            logger: Arc::new(MemoryLog::default()),
            backends: BackendRegistry::new(vec![backend]),
            mirrors: Vec::<Arc<dyn CwdMirror>>::new(),
        },
    )
    .unwrap()
}

fn assert_backend_moves_process(backend: Arc<dyn ChdirBackend>) {
    let _restore = CwdRestore::acquire();
    let tmp = tempfile::tempdir().unwrap();
    let target = std::fs::canonicalize(tmp.path()).unwrap();

    let manager = manager_with(backend);
    manager.change_dir_path(&target).unwrap();
    assert_eq!(manager.cwd_path(), target);
    assert_eq!(os_cwd(), target);
}

#[cfg(feature = "backend-std")]
#[test]
fn test_std_backend_changes_process_cwd() {
    assert_backend_moves_process(Arc::new(crate::adapter::backend::StdBackend));
}

#[cfg(all(unix, feature = "backend-libc"))]
#[test]
fn test_libc_backend_changes_process_cwd() {
    assert_backend_moves_process(Arc::new(crate::adapter::backend::LibcBackend));
}

#[cfg(all(target_os = "linux", feature = "backend-dlopen"))]
#[test]
fn test_dlopen_backend_changes_process_cwd() {
    assert_backend_moves_process(Arc::new(crate::adapter::backend::DlopenBackend::new()));
}

#[test]
fn test_noop_backend_leaves_process_cwd() {
    let _restore = CwdRestore::acquire();
    let before = os_cwd();
    let tmp = tempfile::tempdir().unwrap();
    let target = std::fs::canonicalize(tmp.path()).unwrap();

    let manager = manager_with(Arc::new(NoopBackend));
    manager.change_dir_path(&target).unwrap();
    // 管理値だけが動き、OS の CWD はそのまま
    assert_eq!(manager.cwd_path(), target);
    assert_eq!(os_cwd(), before);
}

#[test]
fn test_relative_path_follows_managed_cwd_not_process_cwd() {
    let _restore = CwdRestore::acquire();
    let tmp = tempfile::tempdir().unwrap();
    let root = std::fs::canonicalize(tmp.path()).unwrap();
    std::fs::create_dir_all(root.join("inner").join("deeper")).unwrap();

    let manager = manager_with(Arc::new(NoopBackend));
    manager.change_dir_path(&root.join("inner")).unwrap();
    manager.change_dir("deeper").unwrap();
    assert_eq!(manager.cwd_path(), root.join("inner").join("deeper"));
}

/// シングルトンは実環境の設定層（CWDSYNC_* 環境変数とユーザーの config.json）を読む。
/// 値は上書き層で固定するが、環境変数や config.json 自体が不正なら解決は失敗する。
#[test]
fn test_singleton_syncs_builtin_mirrors_and_process() {
    let _restore = CwdRestore::acquire();
    let tmp = tempfile::tempdir().unwrap();
    let target = std::fs::canonicalize(tmp.path()).unwrap();

    let pinned = ConfigLayer {
        log_level: Some(LogLevel::Debug),
        fair_lock: Some(false),
    };
    match crate::config::configure(pinned) {
        Ok(_) | Err(Error::AlreadyConfigured(_)) => {}
        Err(e) => panic!("host CWDSYNC_* variables or config.json are invalid: {}", e),
    }

    let manager = ChangeDir::instance().unwrap();
    assert!(std::ptr::eq(manager, ChangeDir::instance().unwrap()));

    manager.change_dir_path(&target).unwrap();
    let expected = target.to_str().unwrap();
    assert_eq!(manager.cwd(), expected);
    assert_eq!(shared_cwd().get().as_deref(), Some(expected));
    #[cfg(unix)]
    assert_eq!(std::env::var("PWD").unwrap(), expected);
    if manager.backend().unwrap().name() != "noop" {
        assert_eq!(os_cwd(), target);
    }

    // シングルトンは後続テストにも残るため、元の場所へ戻しておく
    let original: &Path = &_restore.original;
    manager.change_dir_path(original).unwrap();
}
