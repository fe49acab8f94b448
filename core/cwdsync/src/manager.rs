//! CWD マネージャ（ファサード）
//!
//! プロセスで唯一の「カレントディレクトリ」の値を持ち、変更要求を
//! 検証 → backend 選択 → ロック → 値の更新 → 全ミラー更新 → OS chdir → 解放 の順に扱う。
//!
//! ミラーの更新失敗は致命的（呼び出し元へ返す・ロールバックなし）。
//! OS レベルの chdir 失敗はログに残して処理を続ける。

use crate::backend_registry::BackendRegistry;
use crate::config::ChdirConfig;
use crate::domain::CurrentDir;
use crate::error::Error;
use crate::lock::{CwdLock, LockMode};
use crate::mirror_set::MirrorSet;
use crate::ports::outbound::{
    ChdirBackend, ChdirOutcome, CwdMirror, FileSystem, Log, LogLevel, LogRecord,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// ChangeDir を組み立てるためのポート群
pub struct ChangeDirDeps {
    pub fs: Arc<dyn FileSystem>,
    pub logger: Arc<dyn Log>,
    pub backends: BackendRegistry,
    /// 更新順に並べたミラー
    pub mirrors: Vec<Arc<dyn CwdMirror>>,
}

/// OS レベル同期の結果（ロック解放後にログへ回す）
enum NativeOutcome {
    Applied,
    Rejected(Option<String>),
    Failed(Error),
}

/// スレッドセーフなカレントディレクトリ管理
pub struct ChangeDir {
    current: CwdLock<CurrentDir>,
    log_level: LogLevel,
    logger: Arc<dyn Log>,
    fs: Arc<dyn FileSystem>,
    backends: BackendRegistry,
    mirrors: MirrorSet,
    backend_announced: AtomicBool,
}

impl ChangeDir {
    /// プロセスで唯一のインスタンス
    ///
    /// 初回呼び出しで `config::global()` と標準アダプタから構築する。構築失敗も保持し、再試行しない。
    pub fn instance() -> Result<&'static ChangeDir, Error> {
        static INSTANCE: OnceLock<Result<ChangeDir, Error>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                let config = crate::config::global()?;
                ChangeDir::new(&config, crate::wiring::std_deps())
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// OS が報告する初期 CWD から構築し、全ミラーをその値に揃える
    ///
    /// ミラーが一つでも見つからない・書けない場合は Construction。
    /// backend はここでは選ばない（最初の変更時に選ぶ）。
    pub fn new(config: &ChdirConfig, deps: ChangeDirDeps) -> Result<Self, Error> {
        let initial = deps
            .fs
            .current_dir()
            .map_err(|e| Error::construction(format!("cannot read initial directory: {}", e)))?;
        let initial = CurrentDir::from_canonical(&initial)
            .map_err(|e| Error::construction(e.to_string()))?;

        let mirrors = MirrorSet::locate(deps.mirrors)?;
        mirrors
            .update_all(&initial)
            .map_err(|e| Error::construction(format!("cannot synchronize mirrors: {}", e)))?;

        let manager = Self {
            current: CwdLock::new(initial, config.lock_mode()),
            log_level: config.log_level(),
            logger: deps.logger,
            fs: deps.fs,
            backends: deps.backends,
            mirrors,
            backend_announced: AtomicBool::new(false),
        };
        manager.emit(
            LogRecord::new(manager.log_level, "cwd manager initialized")
                .kind("lifecycle")
                .field("cwd", manager.cwd())
                .field("mirrors", manager.mirrors.names())
                .field("fair_lock", config.fair_lock()),
        );
        Ok(manager)
    }

    /// カレントディレクトリを変更する
    ///
    /// 相対パスは管理している CWD を基準に解決する。
    /// 存在しない・ディレクトリでない場合は InvalidTarget で、状態は変わらない。
    pub fn change_dir(&self, dir: &str) -> Result<(), Error> {
        self.change_dir_path(Path::new(dir))
    }

    /// `change_dir` の Path 版
    pub fn change_dir_path(&self, dir: &Path) -> Result<(), Error> {
        let target = self.resolve_target(dir)?;
        let backend = self.backend()?;

        let outcome = {
            let mut current = self.current.lock();
            *current = target.clone();
            self.mirrors.update_all(&target)?;
            match backend.apply(target.as_ref()) {
                Ok(ChdirOutcome::Changed) => NativeOutcome::Applied,
                Ok(ChdirOutcome::Refused(reason)) => NativeOutcome::Rejected(reason),
                Err(e) => NativeOutcome::Failed(e),
            }
        };

        match outcome {
            NativeOutcome::Applied => self.emit(
                LogRecord::new(self.log_level, "cwd changed")
                    .kind("change")
                    .field("cwd", target.as_str())
                    .field("backend", backend.name()),
            ),
            NativeOutcome::Rejected(reason) => {
                let mut record = LogRecord::new(self.log_level, "cannot change native directory")
                    .kind("degraded")
                    .field("cwd", target.as_str())
                    .field("backend", backend.name());
                if let Some(reason) = reason {
                    record = record.field("error", reason);
                }
                self.emit(record)
            }
            NativeOutcome::Failed(e) => self.emit(
                LogRecord::new(self.log_level, "cannot change native directory")
                    .kind("degraded")
                    .field("cwd", target.as_str())
                    .field("backend", backend.name())
                    .field("error", e.to_string()),
            ),
        }
        Ok(())
    }

    /// 現在の CWD（絶対・正規化済み）
    pub fn cwd(&self) -> String {
        self.current.lock().as_str().to_string()
    }

    /// `cwd` の PathBuf 版
    pub fn cwd_path(&self) -> PathBuf {
        self.current.lock().to_path_buf()
    }

    /// 有効な backend。未選択ならここで選ぶ。
    pub fn backend(&self) -> Result<Arc<dyn ChdirBackend>, Error> {
        let backend = self.backends.select()?;
        if !self.backend_announced.swap(true, Ordering::SeqCst) {
            self.emit(
                LogRecord::new(self.log_level, "native backend selected")
                    .kind("lifecycle")
                    .field("backend", backend.name())
                    .field("preference", backend.preference()),
            );
        }
        Ok(backend)
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    /// 登録順のミラー名
    pub fn mirror_names(&self) -> Vec<String> {
        self.mirrors.names()
    }

    pub fn lock_mode(&self) -> LockMode {
        self.current.mode()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// 絶対・正規化済みの既存ディレクトリへ解決する
    fn resolve_target(&self, dir: &Path) -> Result<CurrentDir, Error> {
        let absolute = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.cwd_path().join(dir)
        };
        let canonical = self.fs.canonicalize(&absolute).map_err(|_| {
            Error::invalid_target(
                dir.to_string_lossy(),
                "cannot set current working directory to a non existing folder",
            )
        })?;
        let meta = self.fs.metadata(&canonical).map_err(|e| {
            Error::invalid_target(dir.to_string_lossy(), format!("cannot use path: {}", e))
        })?;
        if !meta.is_dir() {
            return Err(Error::invalid_target(
                dir.to_string_lossy(),
                "cannot set current working directory to a regular file",
            ));
        }
        CurrentDir::from_canonical(&canonical)
    }

    fn emit(&self, record: LogRecord) {
        let _ = self.logger.log(&record.layer("manager"));
    }
}
