//! ファイルシステム Outbound ポート
//!
//! CWD マネージャと設定解決はこの trait 経由でのみファイル I/O を行う。

use crate::error::Error;
use std::path::{Path, PathBuf};

/// ファイルメタデータ（存在・種別）
#[derive(Debug, Clone)]
pub struct FileMetadata {
    is_file: bool,
    is_dir: bool,
}

impl FileMetadata {
    pub fn new(is_file: bool, is_dir: bool) -> Self {
        Self { is_file, is_dir }
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// ファイルシステム抽象（Outbound ポート）
///
/// 実装は `cwdsync::adapter::StdFileSystem` やテスト用のモックなど。
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    /// シンボリックリンクを辿った上でのメタデータ
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    /// 絶対パス化し、`.` `..` とシンボリックリンクを解決する（存在しなければ Err）
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, Error>;
    /// OS が報告するプロセスのカレントディレクトリ
    fn current_dir(&self) -> Result<PathBuf, Error>;
    /// 追記用に開く（存在しなければ作成）。返した Writer を drop すると閉じる。
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error>;

    /// パスが存在するか（metadata が取れれば true）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}
