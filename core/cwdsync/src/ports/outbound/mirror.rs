//! CWD ミラー Outbound ポート
//!
//! プロセス内で「カレントディレクトリ」の写しを独自に保持している場所。
//! 他のコンポーネントは OS に問い合わせずにここを読むため、CWD マネージャが常に同期させる。

use crate::domain::{MirrorEncoding, MirrorValue};
use crate::error::Error;

/// CWD の写しを保持する場所の抽象（Outbound ポート）
///
/// 実装は `cwdsync::adapter::mirror` 配下（環境変数 PWD、SharedCwd セルなど）。
pub trait CwdMirror: Send + Sync {
    /// 識別名（ログ・エラー表示用）
    fn name(&self) -> String;

    /// 書き込む値の形式
    fn encoding(&self) -> MirrorEncoding;

    /// 構築時の存在・書き込み可否チェック。失敗はマネージャの構築失敗になる。
    fn probe(&self) -> Result<(), Error>;

    /// 値を書き込む。拒否された場合は MirrorUpdate。
    fn update(&self, value: &MirrorValue) -> Result<(), Error>;

    /// 現在保持している値を文字列として読み戻す
    fn read_back(&self) -> Result<String, Error>;
}
