//! Ports & Adapters のポート定義
//!
//! - inbound: なし（cwdsync はライブラリのため公開 API は ChangeDir が担う）
//! - outbound: CWD マネージャが外界に依頼するための trait

pub mod outbound;
