//! アダプター（子プロセス起動の標準実装）

pub(crate) mod std_child_runner;

pub(crate) use std_child_runner::StdChildRunner;
