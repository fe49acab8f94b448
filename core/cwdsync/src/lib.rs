//! cwdsync: プロセスのカレントディレクトリ同期
//!
//! 変更可能な「カレントディレクトリ」を一つ持ち、変更のたびに
//! 登録済みミラー（PWD 環境変数・プロセス共有セル）と OS レベルの CWD を揃える。
//! OS レベルの chdir は cargo feature で有効にした backend のうち preference 最大のものが担う。

/// エラーハンドリング
pub mod error;

/// ドメイン型
pub mod domain;

/// Outbound ポート
pub mod ports;

/// 標準アダプタ
pub mod adapter;

/// 設定（既定値 < config.json < 環境変数 < プロセス内上書き）
pub mod config;

/// 公平・非公平を選べる排他ロック
pub mod lock;

/// backend の選択と保持
pub mod backend_registry;

/// 同期対象ミラーの集合
pub mod mirror_set;

/// CWD マネージャ
pub mod manager;

/// 標準アダプタでの組み立て
pub mod wiring;

#[cfg(test)]
mod tests;

pub use adapter::shared_cwd;
pub use config::{ChdirConfig, ConfigLayer};
pub use error::Error;
pub use lock::LockMode;
pub use manager::{ChangeDir, ChangeDirDeps};
