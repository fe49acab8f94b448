//! 人間向けログ（stderr に 1 行で出力）
//!
//! fields の全量は出さず要点のみ（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};

const FIELDS_SUMMARY_MAX: usize = 400;

/// fields を短い文字列にする
fn fields_summary(rec: &LogRecord) -> String {
    let Some(fields) = rec.fields.as_ref().filter(|f| !f.is_empty()) else {
        return String::new();
    };
    let s = serde_json::Value::Object(fields.clone().into_iter().collect()).to_string();
    // 上限は文字数で数える
    match s.char_indices().nth(FIELDS_SUMMARY_MAX) {
        None => s,
        Some((cut, _)) => format!("{}... (len={})", &s[..cut], s.chars().count()),
    }
}

/// 1 レコードを stderr 用の 1 行に整形する
pub fn format_line(rec: &LogRecord) -> String {
    let mut line = format!("[cwdsync] {} {}", rec.level, rec.message);
    if let Some(kind) = rec.kind.as_deref() {
        line.push_str(&format!(" ({})", kind));
    }
    let summary = fields_summary(rec);
    if !summary.is_empty() {
        line.push(' ');
        line.push_str(&summary);
    }
    line
}

/// stderr へ出す Log 実装。`min_level` より詳細なレコードは捨てる。
#[derive(Debug, Clone)]
pub struct StderrLog {
    min_level: LogLevel,
}

impl StderrLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for StderrLog {
    fn default() -> Self {
        Self::new(LogLevel::Warn)
    }
}

impl Log for StderrLog {
    fn log(&self, rec: &LogRecord) -> Result<(), Error> {
        if rec.level.passes(self.min_level) {
            eprintln!("{}", format_line(rec));
        }
        Ok(())
    }
}
