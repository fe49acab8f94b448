//! プロセス共有の CWD セル
//!
//! OS に問い合わせずに CWD を知りたいコンポーネント向けの読み取り口。
//! 書き込むのは CWD マネージャ（SharedCwdMirror 経由）だけ。

use crate::domain::{MirrorEncoding, MirrorValue};
use crate::error::Error;
use crate::ports::outbound::CwdMirror;
use std::sync::{Arc, OnceLock, RwLock};

static PROCESS_SHARED_CWD: OnceLock<SharedCwd> = OnceLock::new();

/// プロセス全体で一つの SharedCwd。CWD マネージャが構築されるまでは空。
pub fn shared_cwd() -> &'static SharedCwd {
    PROCESS_SHARED_CWD.get_or_init(SharedCwd::new)
}

/// CWD の写しを保持する共有セル（clone は同じセルを指す）
#[derive(Debug, Clone, Default)]
pub struct SharedCwd(Arc<RwLock<Option<MirrorValue>>>);

impl SharedCwd {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持している生の値
    pub fn raw(&self) -> Option<MirrorValue> {
        self.0
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// 保持している CWD を文字列で返す（未設定・復号不能なら None）
    pub fn get(&self) -> Option<String> {
        self.raw().and_then(|v| v.decode().ok())
    }

    fn store(&self, value: MirrorValue) {
        *self
            .0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(value);
    }
}

/// SharedCwd へ書き込むミラー。エンコーディングが合わない値は拒否する。
#[derive(Debug, Clone)]
pub struct SharedCwdMirror {
    cell: SharedCwd,
    encoding: MirrorEncoding,
}

impl SharedCwdMirror {
    pub fn new(cell: SharedCwd, encoding: MirrorEncoding) -> Self {
        Self { cell, encoding }
    }

    /// プロセス共有セル（`shared_cwd()`）へ書き込むミラー
    pub fn process_wide(encoding: MirrorEncoding) -> Self {
        Self::new(shared_cwd().clone(), encoding)
    }

    pub fn cell(&self) -> &SharedCwd {
        &self.cell
    }
}

impl CwdMirror for SharedCwdMirror {
    fn name(&self) -> String {
        "shared-cwd".to_string()
    }

    fn encoding(&self) -> MirrorEncoding {
        self.encoding
    }

    fn probe(&self) -> Result<(), Error> {
        if self.cell.0.is_poisoned() {
            return Err(Error::construction("shared cwd cell is poisoned"));
        }
        Ok(())
    }

    fn update(&self, value: &MirrorValue) -> Result<(), Error> {
        if value.encoding() != self.encoding {
            return Err(Error::mirror_update(
                self.name(),
                format!(
                    "incompatible encoding: expected {}, got {}",
                    self.encoding.as_str(),
                    value.encoding().as_str()
                ),
            ));
        }
        self.cell.store(value.clone());
        Ok(())
    }

    fn read_back(&self) -> Result<String, Error> {
        match self.cell.raw() {
            None => Err(Error::mirror_update(self.name(), "no value stored yet")),
            Some(v) => v
                .decode()
                .map_err(|e| Error::mirror_update(self.name(), e.to_string())),
        }
    }
}
