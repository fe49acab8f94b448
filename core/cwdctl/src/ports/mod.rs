//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: 子プロセス起動の trait（FileSystem / EnvResolver / Log は cwdsync のものを利用）

pub mod inbound;
pub mod outbound;
