//! 子プロセス起動の Outbound ポート
//!
//! 子は OS レベルの CWD と環境変数（PWD を含む）をそのまま引き継ぐ。

use cwdsync::error::Error;

/// コマンドを起動し、終了を待つ
pub trait ChildRunner: Send + Sync {
    /// 終了コードを返す（シグナル終了は 128 + シグナル番号）
    fn run(&self, program: &str, args: &[String]) -> Result<i32, Error>;
}
