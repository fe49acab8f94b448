//! 組み込み CWD ミラー
//!
//! Rust のプロセスには暗黙の CWD キャッシュが無いため、同期対象はこのモジュールが列挙する
//! 閉じた集合になる。どのミラーを持つか・どの形式で書くかはプラットフォームで変わる。

mod env_var;
mod shared_cell;

pub use env_var::EnvVarMirror;
pub use shared_cell::{shared_cwd, SharedCwd, SharedCwdMirror};

use crate::domain::MirrorEncoding;
use crate::ports::outbound::CwdMirror;
use std::sync::Arc;

/// プロセス共有セルの既定エンコーディング（unix はバイト列、Windows は文字列）
pub fn platform_encoding() -> MirrorEncoding {
    if cfg!(windows) {
        MirrorEncoding::Text
    } else {
        MirrorEncoding::Bytes
    }
}

/// このプラットフォームで同期すべきミラー（登録順に更新される）
pub fn default_mirrors() -> Vec<Arc<dyn CwdMirror>> {
    let mut mirrors: Vec<Arc<dyn CwdMirror>> = Vec::new();
    if cfg!(unix) {
        mirrors.push(Arc::new(EnvVarMirror::pwd()));
    }
    mirrors.push(Arc::new(SharedCwdMirror::process_wide(platform_encoding())));
    mirrors
}
