//! 標準の子プロセス起動（std::process::Command に委譲）

use crate::ports::outbound::ChildRunner;
use cwdsync::error::Error;

/// 標準ライブラリの Command を使う ChildRunner 実装
///
/// 作業ディレクトリは指定しない（OS レベルの CWD を引き継ぐ）。
#[derive(Debug, Clone, Default)]
pub struct StdChildRunner;

impl ChildRunner for StdChildRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<i32, Error> {
        let status = std::process::Command::new(program)
            .args(args)
            .status()
            .map_err(|e| Error::io_msg(format!("Failed to execute '{}': {}", program, e)))?;
        Ok(exit_code_of(status))
    }
}

#[cfg(unix)]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
