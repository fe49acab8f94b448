//! アダプター（外界の I/O を trait で抽象化）
//!
//! CWD マネージャはポートの trait 経由でのみファイル・環境変数・ログ・OS chdir・ミラーに触れる。
//! 実装は標準実装（Std*）やテスト用のモックを注入する。

pub mod backend;
pub mod file_json_log;
pub mod mirror;
pub mod std_env_resolver;
pub mod std_fs;
pub mod stderr_log;

pub use backend::{builtin_backends, NoopBackend};
pub use file_json_log::{FileJsonLog, NoopLog};
pub use mirror::{default_mirrors, shared_cwd, EnvVarMirror, SharedCwd, SharedCwdMirror};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use stderr_log::StderrLog;
