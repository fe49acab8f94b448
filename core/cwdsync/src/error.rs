//! エラーハンドリング
//!
//! 検証エラー・ミラー整合性エラーは呼び出し元へ必ず返す。
//! OS レベルの backend 失敗（BackendApply）は CWD マネージャがログに落として握りつぶす。

/// cwdsync 全体で使うエラー型
///
/// 選択済み backend やシングルトン構築の失敗をメモ化して全呼び出し元へ返すため `Clone`。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 指定パスが存在するディレクトリに解決できない
    #[error("Invalid target '{path}': {reason}")]
    InvalidTarget { path: String, reason: String },

    /// 登録済みミラーが更新を拒否した（致命的・ロールバックなし）
    #[error("Cannot update mirror '{mirror}': {reason}")]
    MirrorUpdate { mirror: String, reason: String },

    /// 選択された backend の初期化に失敗した（致命的・下位 backend への降格なし）
    #[error("Cannot initialize backend '{backend}': {reason}")]
    BackendInit { backend: String, reason: String },

    /// OS レベルの chdir 呼び出しが失敗した
    #[error("Backend '{backend}' failed: {reason}")]
    BackendApply { backend: String, reason: String },

    /// ミラーの特定に失敗し CWD マネージャを構築できない
    #[error("Cannot construct cwd manager: {0}")]
    Construction(String),

    /// 設定はプロセス内で一度しか確定できない
    #[error("Configuration already resolved: {0}")]
    AlreadyConfigured(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Environment error: {0}")]
    Env(String),
}

impl Error {
    pub fn invalid_target(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn mirror_update(mirror: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MirrorUpdate {
            mirror: mirror.into(),
            reason: reason.into(),
        }
    }

    pub fn backend_init(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::BackendInit {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn backend_apply(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::BackendApply {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn construction(msg: impl Into<String>) -> Self {
        Error::Construction(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// usage を表示すべきエラーか（CLI 境界で使う）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// プロセス終了コード（sysexits.h 準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::InvalidTarget { .. } => 66,
            Error::Io(_) => 74,
            Error::Json(_) | Error::Env(_) => 78,
            Error::MirrorUpdate { .. }
            | Error::BackendInit { .. }
            | Error::BackendApply { .. }
            | Error::Construction(_)
            | Error::AlreadyConfigured(_) => 70,
        }
    }
}
