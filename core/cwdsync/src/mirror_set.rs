//! 同期対象ミラーの集合
//!
//! 構築時に全ミラーの存在・書き込み可否を確かめ、一つでも駄目なら構築失敗にする。
//! 更新は登録順に行い、途中で失敗したらそこで止める（更新済みのミラーは戻さない）。

use crate::domain::CurrentDir;
use crate::error::Error;
use crate::ports::outbound::CwdMirror;
use std::sync::Arc;

/// 登録済みミラーの集合
pub struct MirrorSet {
    entries: Vec<Arc<dyn CwdMirror>>,
}

impl MirrorSet {
    /// 全ミラーを probe してから集合を作る
    pub fn locate(entries: Vec<Arc<dyn CwdMirror>>) -> Result<Self, Error> {
        for m in &entries {
            m.probe().map_err(|e| match e {
                Error::Construction(msg) => {
                    Error::construction(format!("mirror '{}': {}", m.name(), msg))
                }
                other => Error::construction(format!("mirror '{}': {}", m.name(), other)),
            })?;
        }
        Ok(Self { entries })
    }

    /// 全ミラーを `dir` に更新する（各ミラーのエンコーディングで）
    pub fn update_all(&self, dir: &CurrentDir) -> Result<(), Error> {
        for m in &self.entries {
            let value = m.encoding().encode(dir);
            m.update(&value)?;
        }
        Ok(())
    }

    /// 各ミラーの名前と読み戻した値
    pub fn read_back_all(&self) -> Vec<(String, Result<String, Error>)> {
        self.entries
            .iter()
            .map(|m| (m.name(), m.read_back()))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
