mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

use std::process;
use cli::{config_layer, config_to_command, parse_args, print_completion, Config, ParseOutcome};
use cwdsync::error::Error;
use cwdsync::ports::outbound::{LogLevel, LogRecord};
use domain::Command;
use ports::inbound::RunCwdctl;
use usecase::{backend_lines, mirror_lines, CdUseCase};
use wiring::{wire_cwdctl, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl RunCwdctl for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config);
        let command_name = cmd.name();
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

impl Runner {
    fn dispatch(&self, cmd: Command) -> Result<i32, Error> {
        match cmd {
            Command::Help => {
                print_help();
                Ok(0)
            }
            Command::Pwd => {
                println!("{}", self.app.manager.cwd());
                Ok(0)
            }
            Command::Cd { dir, exec } => {
                CdUseCase::from_app(&self.app).run(&dir, &exec, |cwd| println!("{}", cwd))
            }
            Command::Backends => {
                for line in backend_lines(self.app.manager)? {
                    println!("{}", line);
                }
                Ok(0)
            }
            Command::Mirrors => {
                for line in mirror_lines(self.app.manager) {
                    println!("{}", line);
                }
                Ok(0)
            }
            Command::ConfigShow => {
                let json = serde_json::to_string_pretty(&self.app.config)
                    .map_err(|e| Error::json(e.to_string()))?;
                println!("{}", json);
                Ok(0)
            }
            Command::ConfigSave => {
                let path = self
                    .app
                    .config
                    .save_as_user_settings(self.app.fs.as_ref(), self.app.env_resolver.as_ref())?;
                println!("Saved configuration to {}", path.display());
                Ok(0)
            }
            Command::Unknown(name) => Err(Error::invalid_argument(format!(
                "Command '{}' is not implemented.",
                name
            ))),
        }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("cwdctl: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let outcome = parse_args()?;
    let config = match outcome {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_cwdctl(config_layer(&config)?)?;
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: cwdctl [-h] [--fair-lock] [--log-level level] [<command> [args...]]");
}

fn print_help() {
    println!("Usage: cwdctl [options] [<command> [args...]]");
    println!("Options:");
    println!("  -h, --help                Show this help message");
    println!("      --fair-lock           Serve directory changes in arrival order");
    println!("      --log-level <level>   Diagnostic log level (error, warn, info, debug, trace)");
    println!("      --generate <shell>    Generate shell completion script");
    println!("Commands:");
    println!("  pwd                       Print the managed current directory (default)");
    println!("  cd <dir> [-- cmd args]    Change directory, then optionally run a command there");
    println!("  backends                  List compiled-in chdir backends (* = selected)");
    println!("  mirrors                   List mirrors and their current values");
    println!("  config show               Print the effective configuration as JSON");
    println!("  config save               Write the effective configuration to config.json");
    println!("Environment:");
    println!("  CWDSYNC_HOME              Configuration directory (default: ~/.config/cwdsync)");
    println!("  CWDSYNC_LOG_LEVEL         Diagnostic log level");
    println!("  CWDSYNC_FAIR_LOCK         true/false");
    println!("  CWDSYNC_LOG_FILE          Write structured logs (JSONL) to this file");
    println!("  CWDSYNC_STDERR_LEVEL      Minimum level printed to stderr (default: warn)");
}
