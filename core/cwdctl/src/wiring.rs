//! 配線: 標準アダプタで App を組み立てる

use std::sync::Arc;

use cwdsync::adapter::{StdEnvResolver, StdFileSystem};
use cwdsync::config::{self, ChdirConfig, ConfigLayer};
use cwdsync::error::Error;
use cwdsync::ports::outbound::{EnvResolver, FileSystem, Log};
use cwdsync::ChangeDir;

use crate::adapter::StdChildRunner;
use crate::ports::outbound::ChildRunner;

/// 配線で組み立てたポート群（main の Command ディスパッチで利用）
pub struct App {
    pub manager: &'static ChangeDir,
    /// このプロセスで確定した設定
    pub config: ChdirConfig,
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub child_runner: Arc<dyn ChildRunner>,
    /// 構造化ログ（lifecycle / error）。CWD マネージャのログとは別インスタンス。
    pub logger: Arc<dyn Log>,
}

/// 配線: CLI フラグで設定を確定し、プロセスのシングルトンを取得する
pub fn wire_cwdctl(process_override: ConfigLayer) -> Result<App, Error> {
    let config = config::configure(process_override)?;
    let manager = ChangeDir::instance()?;
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = cwdsync::wiring::std_logger(env_resolver.as_ref());
    Ok(App {
        manager,
        config,
        fs: Arc::new(StdFileSystem),
        env_resolver,
        child_runner: Arc::new(StdChildRunner),
        logger,
    })
}
