//! Outbound ポート: アプリが外界（子プロセス起動）を使うための trait

pub mod child_runner;

pub use child_runner::ChildRunner;
