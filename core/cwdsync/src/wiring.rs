//! 配線: 標準アダプタで ChangeDir を組み立てる

use std::sync::Arc;

use crate::adapter::{
    default_mirrors, FileJsonLog, StdEnvResolver, StdFileSystem, StderrLog,
};
use crate::backend_registry::BackendRegistry;
use crate::manager::ChangeDirDeps;
use crate::ports::outbound::{EnvResolver, FileSystem, Log, LogLevel};
use crate::ports::outbound::env_resolver::ENV_STDERR_LEVEL;

/// 標準のログ出力先
///
/// CWDSYNC_LOG_FILE があれば JSONL ファイルへ、なければ stderr へ
/// （CWDSYNC_STDERR_LEVEL 以上のみ。既定は warn）。
pub fn std_logger(env: &dyn EnvResolver) -> Arc<dyn Log> {
    if let Some(path) = env.resolve_log_file_path() {
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        return Arc::new(FileJsonLog::new(fs, path));
    }
    let min_level = env
        .var(ENV_STDERR_LEVEL)
        .and_then(|s| s.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Warn);
    Arc::new(StderrLog::new(min_level))
}

/// 標準アダプタ一式（組み込み backend・プラットフォーム既定のミラー）
pub fn std_deps() -> ChangeDirDeps {
    let env = StdEnvResolver;
    ChangeDirDeps {
        fs: Arc::new(StdFileSystem),
        logger: std_logger(&env),
        backends: BackendRegistry::builtin(),
        mirrors: default_mirrors(),
    }
}
