//! chdir backend Outbound ポート
//!
//! OS レベルのカレントディレクトリ変更を行う戦略。複数の実装が競合し、
//! preference が最大のものだけがプロセス内で有効になる。

use crate::error::Error;
use std::path::Path;

/// 組み込み backend の preference
///
/// 0 は backend なし（NoopBackend）専用。独自実装を足すなら組み込みより大きい値を使う。
pub mod preference {
    pub const NOOP: i32 = 0;
    pub const LIBC: i32 = 1;
    pub const DLOPEN: i32 = 4;
    pub const STD: i32 = 22;
}

/// OS レベル chdir の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChdirOutcome {
    /// OS が成功コードを返した
    Changed,
    /// OS が失敗コードを返した（理由は OS から取れた時だけ）
    Refused(Option<String>),
}

impl ChdirOutcome {
    pub fn refused(err: std::io::Error) -> Self {
        Self::Refused(Some(err.to_string()))
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// OS レベル chdir の抽象（Outbound ポート）
///
/// 実装は `cwdsync::adapter::backend` 配下。状態を持たない前提で、
/// 遅延初期化（シンボル解決など）だけは `init` に閉じ込める。
pub trait ChdirBackend: Send + Sync {
    /// 識別名（ログ・CLI 表示用）
    fn name(&self) -> &'static str;

    /// 選択時の優先度。大きいほど優先。副作用なし。
    fn preference(&self) -> i32;

    /// 選択された時に一度だけ呼ばれる初期化。失敗は BackendInit（致命的）。
    fn init(&self) -> Result<(), Error> {
        Ok(())
    }

    /// 絶対パス・存在するディレクトリへ OS のカレントディレクトリを変更する
    ///
    /// OS が成功コードを返したら `Ok(Changed)`、失敗コードなら `Ok(Refused)`。
    /// ネイティブ呼び出し自体ができない場合は `Err(BackendApply)`。
    fn apply(&self, dir: &Path) -> Result<ChdirOutcome, Error>;
}
