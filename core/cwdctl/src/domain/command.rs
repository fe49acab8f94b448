//! cwdctl コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、match でディスパッチする。

/// cwdctl のサブコマンド
///
/// コマンドなし = pwd。それ以外は文字列から解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,

    /// 管理中の CWD を表示
    Pwd,

    /// CWD を変更し、指定があれば子プロセスを起動（cd <dir> [-- cmd args...]）
    Cd { dir: String, exec: Vec<String> },

    /// 組み込み backend 一覧と選択結果
    Backends,

    /// ミラー一覧と読み戻し値
    Mirrors,

    /// 確定済み設定の表示（config show）
    ConfigShow,
    /// 確定済み設定をユーザー設定ファイルへ保存（config save）
    ConfigSave,

    /// 未知のコマンド（エラー用）
    Unknown(String),
}

impl Command {
    /// コマンド名と引数から Command に解析する（cd / config は args を使用）
    pub fn parse_with_args(name: &str, args: &[String]) -> Self {
        match name {
            "pwd" => Command::Pwd,
            "backends" => Command::Backends,
            "mirrors" => Command::Mirrors,
            "help" => Command::Help,
            "cd" => match args.split_first() {
                Some((dir, exec)) => Command::Cd {
                    dir: dir.clone(),
                    exec: exec.to_vec(),
                },
                None => Command::Unknown("cd".to_string()),
            },
            "config" => match args.first().map(|s| s.as_str()) {
                Some("show") => Command::ConfigShow,
                Some("save") => Command::ConfigSave,
                _ => {
                    let sub = args.first().cloned().unwrap_or_default();
                    Command::Unknown(format!("config {}", sub).trim_end().to_string())
                }
            },
            other => Command::Unknown(other.to_string()),
        }
    }

    /// ログ用の短い名前
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Pwd => "pwd",
            Command::Cd { .. } => "cd",
            Command::Backends => "backends",
            Command::Mirrors => "mirrors",
            Command::ConfigShow => "config-show",
            Command::ConfigSave => "config-save",
            Command::Unknown(_) => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse_with_args("pwd", &[]), Command::Pwd);
        assert_eq!(Command::parse_with_args("backends", &[]), Command::Backends);
        assert_eq!(Command::parse_with_args("mirrors", &[]), Command::Mirrors);
    }

    #[test]
    fn test_parse_cd_without_command() {
        assert_eq!(
            Command::parse_with_args("cd", &args(&["/tmp"])),
            Command::Cd {
                dir: "/tmp".to_string(),
                exec: vec![],
            }
        );
    }

    #[test]
    fn test_parse_cd_with_command() {
        assert_eq!(
            Command::parse_with_args("cd", &args(&["..", "ls", "-la"])),
            Command::Cd {
                dir: "..".to_string(),
                exec: args(&["ls", "-la"]),
            }
        );
    }

    #[test]
    fn test_parse_cd_without_dir_is_unknown() {
        assert_eq!(
            Command::parse_with_args("cd", &[]),
            Command::Unknown("cd".to_string())
        );
    }

    #[test]
    fn test_parse_config_subcommands() {
        assert_eq!(
            Command::parse_with_args("config", &args(&["show"])),
            Command::ConfigShow
        );
        assert_eq!(
            Command::parse_with_args("config", &args(&["save"])),
            Command::ConfigSave
        );
        assert_eq!(
            Command::parse_with_args("config", &args(&["edit"])),
            Command::Unknown("config edit".to_string())
        );
        assert_eq!(
            Command::parse_with_args("config", &[]),
            Command::Unknown("config".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse_with_args("pushd", &[]),
            Command::Unknown("pushd".to_string())
        );
    }
}
