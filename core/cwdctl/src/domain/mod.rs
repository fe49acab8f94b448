//! ドメイン型（enum、ルール）

pub mod command;
pub use command::Command;
