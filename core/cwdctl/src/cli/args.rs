use crate::domain::command::Command;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use cwdsync::config::ConfigLayer;
use cwdsync::error::Error;
use cwdsync::ports::outbound::LogLevel;
use std::ffi::OsString;

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    pub fair_lock: bool,
    pub log_level: Option<String>,
    /// コマンド名（None の場合は pwd）
    pub command_name: Option<String>,
    pub command_args: Vec<String>,
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .disable_help_subcommand(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("fair-lock")
                .long("fair-lock")
                .help("Serve directory changes in arrival order (overrides CWDSYNC_FAIR_LOCK)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("log-level")
                .long("log-level")
                .value_name("level")
                .help("Diagnostic log level: error, warn, info, debug, trace")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn build_config_subcommand() -> clap::Command {
    clap::Command::new("config")
        .about("Show or save the effective configuration")
        .subcommand_required(true)
        .subcommand(clap::Command::new("show").about("Print the effective configuration as JSON"))
        .subcommand(
            clap::Command::new("save").about("Write the effective configuration to config.json"),
        )
}

pub(crate) fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("cwdctl")
            .about("Synchronized current working directory control")
            .subcommand_required(false)
            .subcommand(clap::Command::new("pwd").about("Print the managed current directory (default)"))
            .subcommand(
                clap::Command::new("cd")
                    .about("Change directory, then optionally run a command there")
                    .arg(
                        clap::Arg::new("dir")
                            .value_name("dir")
                            .required(true)
                            .num_args(1),
                    )
                    .arg(
                        clap::Arg::new("command")
                            .value_name("command")
                            .num_args(1..)
                            .last(true),
                    ),
            )
            .subcommand(
                clap::Command::new("backends")
                    .about("List compiled-in chdir backends and the selected one"),
            )
            .subcommand(clap::Command::new("mirrors").about("List mirrors and their current values"))
            .subcommand(build_config_subcommand()),
    )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let help = matches.get_flag("help");
    let fair_lock = matches.get_flag("fair-lock");
    let log_level = matches.get_one::<String>("log-level").cloned();

    let (command_name, command_args) = match matches.subcommand() {
        None => (None, Vec::new()),
        Some(("cd", m)) => {
            let mut args: Vec<String> = m.get_one::<String>("dir").cloned().into_iter().collect();
            args.extend(
                m.get_many::<String>("command")
                    .map(|i| i.cloned().collect::<Vec<_>>())
                    .unwrap_or_default(),
            );
            (Some("cd".to_string()), args)
        }
        Some(("config", m)) => {
            let sub = m.subcommand_name().unwrap_or("").to_string();
            (Some("config".to_string()), vec![sub])
        }
        Some((name, _)) => (Some(name.to_string()), vec![]),
    };

    Config {
        help,
        fair_lock,
        log_level,
        command_name,
        command_args,
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 任意の引数列を解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// 補完スクリプトを標準出力に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "cwdctl", &mut std::io::stdout());
}

/// Config を Command に変換する
pub fn config_to_command(config: &Config) -> Command {
    if config.help {
        return Command::Help;
    }
    match &config.command_name {
        Some(name) => Command::parse_with_args(name, &config.command_args),
        None => Command::Pwd,
    }
}

/// CLI フラグをプロセス内上書きの設定層に変換する（未指定のフラグは下の層に任せる）
pub fn config_layer(config: &Config) -> Result<ConfigLayer, Error> {
    let log_level = config
        .log_level
        .as_deref()
        .map(str::parse::<LogLevel>)
        .transpose()?;
    Ok(ConfigLayer {
        log_level,
        fair_lock: config.fair_lock.then_some(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["cwdctl"];
        argv.extend_from_slice(args);
        match parse_args_from(argv).unwrap() {
            ParseOutcome::Config(c) => c,
            ParseOutcome::GenerateCompletion(_) => panic!("unexpected completion"),
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.help);
        assert!(!config.fair_lock);
        assert_eq!(config.log_level, None);
        assert_eq!(config.command_name, None);
        assert!(config.command_args.is_empty());
    }

    #[test]
    fn test_no_command_is_pwd() {
        assert_eq!(config_to_command(&parse(&[])), Command::Pwd);
    }

    #[test]
    fn test_help_flag() {
        assert_eq!(config_to_command(&parse(&["-h"])), Command::Help);
        assert_eq!(config_to_command(&parse(&["--help", "mirrors"])), Command::Help);
    }

    #[test]
    fn test_global_flags_before_and_after_subcommand() {
        let config = parse(&["--fair-lock", "--log-level", "info", "pwd"]);
        assert!(config.fair_lock);
        assert_eq!(config.log_level.as_deref(), Some("info"));

        let config = parse(&["backends", "--log-level", "trace"]);
        assert_eq!(config.log_level.as_deref(), Some("trace"));
        assert_eq!(config_to_command(&config), Command::Backends);
    }

    #[test]
    fn test_cd_with_trailing_command() {
        let config = parse(&["cd", "/srv", "--", "ls", "-la"]);
        assert_eq!(
            config_to_command(&config),
            Command::Cd {
                dir: "/srv".to_string(),
                exec: vec!["ls".to_string(), "-la".to_string()],
            }
        );
    }

    #[test]
    fn test_cd_requires_dir() {
        let err = parse_args_from(["cwdctl", "cd"]).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_config_subcommands() {
        assert_eq!(config_to_command(&parse(&["config", "show"])), Command::ConfigShow);
        assert_eq!(config_to_command(&parse(&["config", "save"])), Command::ConfigSave);
        assert!(parse_args_from(["cwdctl", "config"]).is_err());
    }

    #[test]
    fn test_generate_completion() {
        let outcome = parse_args_from(["cwdctl", "--generate", "bash"]).unwrap();
        assert!(matches!(outcome, ParseOutcome::GenerateCompletion(Shell::Bash)));
    }

    #[test]
    fn test_completion_script_mentions_subcommands() {
        let mut cmd = build_clap_command();
        let mut out = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "cwdctl", &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("backends"));
        assert!(script.contains("mirrors"));
    }

    #[test]
    fn test_config_layer_from_flags() {
        let layer = config_layer(&parse(&["--fair-lock", "--log-level", "WARNING"])).unwrap();
        assert_eq!(layer.fair_lock, Some(true));
        assert_eq!(layer.log_level, Some(LogLevel::Warn));

        let layer = config_layer(&parse(&[])).unwrap();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_config_layer_rejects_unknown_level() {
        let err = config_layer(&parse(&["--log-level", "loud"])).unwrap_err();
        assert!(err.is_usage());
    }
}
