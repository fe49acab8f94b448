//! ドメイン型（Newtype）
//!
//! String / PathBuf を直接運ばず、意味のある型に包んで境界を明確にする。

use std::path::{Path, PathBuf};

use crate::error::Error;

/// 検証済みのカレントディレクトリ（絶対・正規化済み・UTF-8）
///
/// 設定された瞬間に存在したディレクトリであることだけを保証する。
/// その後に削除されたかどうかは関知しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentDir(String);

impl CurrentDir {
    /// 正規化済みパスから生成する。UTF-8 でないパスは InvalidTarget。
    pub fn from_canonical(path: &Path) -> Result<Self, Error> {
        path.to_str()
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| {
                Error::invalid_target(path.to_string_lossy(), "path is not valid UTF-8")
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl AsRef<Path> for CurrentDir {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for CurrentDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 設定ホームディレクトリ（CWDSYNC_HOME / XDG 解決結果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// ユーザー設定ファイル（config.json）
    pub fn config_file(&self) -> PathBuf {
        self.0.join("config.json")
    }
}

impl std::ops::Deref for HomeDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

/// ミラーが値を保持する形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEncoding {
    /// パス文字列そのもの
    Text,
    /// UTF-8 でエンコードしたバイト列
    Bytes,
}

impl MirrorEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
        }
    }

    /// CurrentDir をこの形式の値に変換する
    pub fn encode(&self, dir: &CurrentDir) -> MirrorValue {
        match self {
            Self::Text => MirrorValue::Text(dir.as_str().to_string()),
            Self::Bytes => MirrorValue::Bytes(dir.as_str().as_bytes().to_vec()),
        }
    }
}

/// ミラーへ書き込む値（エンコード済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl MirrorValue {
    pub fn encoding(&self) -> MirrorEncoding {
        match self {
            Self::Text(_) => MirrorEncoding::Text,
            Self::Bytes(_) => MirrorEncoding::Bytes,
        }
    }

    /// 文字列として復号する。バイト列は UTF-8 として解釈する。
    pub fn decode(&self) -> Result<String, std::string::FromUtf8Error> {
        match self {
            Self::Text(s) => Ok(s.clone()),
            Self::Bytes(b) => String::from_utf8(b.clone()),
        }
    }
}
