//! 環境変数解決 Outbound ポート
//!
//! 設定ファイルの場所・環境変数による設定上書き・ログ出力先を解決する。
//! 設定解決はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 設定ホーム（最優先）
pub const ENV_HOME: &str = "CWDSYNC_HOME";
/// ログレベル上書き
pub const ENV_LOG_LEVEL: &str = "CWDSYNC_LOG_LEVEL";
/// ロック公平性上書き
pub const ENV_FAIR_LOCK: &str = "CWDSYNC_FAIR_LOCK";
/// JSONL ログの出力先
pub const ENV_LOG_FILE: &str = "CWDSYNC_LOG_FILE";
/// stderr ログの最低レベル
pub const ENV_STDERR_LEVEL: &str = "CWDSYNC_STDERR_LEVEL";

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `cwdsync::adapter::StdEnvResolver` やテスト用のマップ実装など。
/// 実装が必要なのは `var` のみで、解決規則はデフォルトメソッドに集約する。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を取得する。未設定・空文字列は None。
    fn var(&self, key: &str) -> Option<String>;

    /// 設定ホームディレクトリを解決する
    ///
    /// 優先順位:
    /// 1. CWDSYNC_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/cwdsync（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/cwdsync
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = self.var(ENV_HOME) {
            return Ok(HomeDir::new(home));
        }
        let config_base = self
            .var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| self.var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;
        Ok(HomeDir::new(config_base.join("cwdsync")))
    }

    /// ユーザー設定ファイルのパス
    fn resolve_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.config_file())
    }

    /// JSONL ログの出力先（CWDSYNC_LOG_FILE が無ければ None）
    fn resolve_log_file_path(&self) -> Option<PathBuf> {
        self.var(ENV_LOG_FILE).map(PathBuf::from)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::EnvResolver;
    use std::collections::HashMap;

    /// テスト用: HashMap で環境変数を与える EnvResolver
    #[derive(Debug, Default, Clone)]
    pub struct MapEnv(pub HashMap<String, String>);

    impl MapEnv {
        pub fn with(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl EnvResolver for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).filter(|v| !v.is_empty()).cloned()
        }
    }
}
