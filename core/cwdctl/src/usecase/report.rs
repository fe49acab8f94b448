//! backends / mirrors コマンドの表示行

use cwdsync::error::Error;
use cwdsync::ChangeDir;
use std::sync::Arc;

/// 組み込み backend を preference の高い順に並べ、選択中のものに `*` を付ける
///
/// 選択がまだなら、ここで選択・初期化する。初期化失敗はそのまま返す。
pub fn backend_lines(manager: &ChangeDir) -> Result<Vec<String>, Error> {
    let selected = manager.backend()?;
    let mut candidates = manager.backends().candidates().to_vec();
    candidates.sort_by_key(|b| std::cmp::Reverse(b.preference()));

    let mut lines: Vec<String> = candidates
        .iter()
        .map(|b| {
            let marker = if Arc::ptr_eq(b, &selected) { "*" } else { " " };
            format!("{} {:<8} {}", marker, b.name(), b.preference())
        })
        .collect();
    if !candidates.iter().any(|b| Arc::ptr_eq(b, &selected)) {
        lines.push(format!("* {:<8} {}", selected.name(), selected.preference()));
    }
    Ok(lines)
}

/// 登録順にミラー名と読み戻した値
pub fn mirror_lines(manager: &ChangeDir) -> Vec<String> {
    manager
        .mirrors()
        .read_back_all()
        .into_iter()
        .map(|(name, value)| match value {
            Ok(v) => format!("{:<12} {}", name, v),
            Err(e) => format!("{:<12} <error: {}>", name, e),
        })
        .collect()
}
