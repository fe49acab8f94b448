//! Outbound ポート: CWD マネージャが外界（FS・環境変数・ログ・OS chdir・ミラー）を使うための trait

pub mod backend;
pub mod env_resolver;
pub mod fs;
pub mod log;
pub mod mirror;

pub use backend::{ChdirBackend, ChdirOutcome};
pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use mirror::CwdMirror;
