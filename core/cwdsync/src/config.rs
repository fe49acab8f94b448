//! CWD マネージャの設定（ロック公平性・診断ログレベル）
//!
//! 弱い順に 既定値 → ユーザー設定ファイル → 環境変数 → プロセス内上書き を重ね、
//! フィールドごとに最も強い層の値を採用する。プロセス内で一度だけ確定し、以後は不変。

use crate::error::Error;
use crate::lock::LockMode;
use crate::ports::outbound::env_resolver::{ENV_FAIR_LOCK, ENV_LOG_LEVEL};
use crate::ports::outbound::{EnvResolver, FileSystem, Log, LogLevel, LogRecord};
use serde::{Deserialize, Serialize};
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Mutex;

/// 既定の診断ログレベル
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Debug;

/// 確定済みの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChdirConfig {
    log_level: LogLevel,
    fair_lock: bool,
}

impl Default for ChdirConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            fair_lock: false,
        }
    }
}

impl ChdirConfig {
    pub fn new(log_level: LogLevel, fair_lock: bool) -> Self {
        Self {
            log_level,
            fair_lock,
        }
    }

    /// CWD マネージャが診断ログを出すレベル
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// 公平ロックを使うか
    pub fn fair_lock(&self) -> bool {
        self.fair_lock
    }

    pub fn lock_mode(&self) -> LockMode {
        LockMode::from_fair(self.fair_lock)
    }

    /// 全層を重ねて設定を解決する
    ///
    /// - ユーザー設定ファイルが無い・場所が解決できない: その層を飛ばす
    /// - 読めない: ログに残して飛ばす
    /// - JSON が壊れている・値が不正: Err
    pub fn resolve(
        fs: &dyn FileSystem,
        env: &dyn EnvResolver,
        log: &dyn Log,
        process_override: &ConfigLayer,
    ) -> Result<Self, Error> {
        let mut config = Self::default();
        config = load_user_layer(fs, env, log)?.apply_to(config);
        config = env_layer(env)?.apply_to(config);
        config = process_override.apply_to(config);
        Ok(config)
    }

    /// 現在の設定をユーザー設定ファイルへ保存する。保存先パスを返す。
    pub fn save_as_user_settings(
        &self,
        fs: &dyn FileSystem,
        env: &dyn EnvResolver,
    ) -> Result<PathBuf, Error> {
        let path = env.resolve_config_path()?;
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self).map_err(|e| Error::json(e.to_string()))?;
        json.push('\n');
        fs.write(&path, &json)?;
        Ok(path)
    }
}

/// 設定の一層分（未指定のフィールドは下の層を残す）
///
/// プロセス内上書き（CLI フラグなど）もこの型で渡す。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub log_level: Option<LogLevel>,
    pub fair_lock: Option<bool>,
}

impl ConfigLayer {
    pub fn apply_to(&self, base: ChdirConfig) -> ChdirConfig {
        ChdirConfig {
            log_level: self.log_level.unwrap_or(base.log_level),
            fair_lock: self.fair_lock.unwrap_or(base.fair_lock),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.log_level.is_none() && self.fair_lock.is_none()
    }
}

/// config.json の中身。キーは camelCase / snake_case のどちらでもよい。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFileRaw {
    #[serde(alias = "log_level")]
    log_level: Option<String>,
    #[serde(alias = "fair_lock")]
    fair_lock: Option<bool>,
}

impl ConfigLayer {
    /// config.json の文字列からパース（ファイル読みは呼び出し側で行う）
    pub fn parse_file(json: &str) -> Result<Self, Error> {
        let raw: ConfigFileRaw =
            serde_json::from_str(json).map_err(|e| Error::json(e.to_string()))?;
        let log_level = raw
            .log_level
            .as_deref()
            .map(str::parse::<LogLevel>)
            .transpose()?;
        Ok(Self {
            log_level,
            fair_lock: raw.fair_lock,
        })
    }
}

fn load_user_layer(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
    log: &dyn Log,
) -> Result<ConfigLayer, Error> {
    let path = match env.resolve_config_path() {
        Ok(p) => p,
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Debug, "user config location unresolved, skipping")
                    .layer("config")
                    .kind("config")
                    .field("error", e.to_string()),
            );
            return Ok(ConfigLayer::default());
        }
    };
    if !fs.exists(&path) {
        return Ok(ConfigLayer::default());
    }
    let contents = match fs.read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Info, "cannot load config file")
                    .layer("config")
                    .kind("config")
                    .field("path", path.display().to_string())
                    .field("error", e.to_string()),
            );
            return Ok(ConfigLayer::default());
        }
    };
    ConfigLayer::parse_file(&contents).map_err(|e| match e {
        Error::Json(msg) => Error::json(format!("{}: {}", path.display(), msg)),
        other => Error::invalid_argument(format!("{}: {}", path.display(), other)),
    })
}

fn env_layer(env: &dyn EnvResolver) -> Result<ConfigLayer, Error> {
    let log_level = env
        .var(ENV_LOG_LEVEL)
        .map(|v| {
            v.parse::<LogLevel>()
                .map_err(|e| Error::invalid_argument(format!("{}: {}", ENV_LOG_LEVEL, e)))
        })
        .transpose()?;
    let fair_lock = env
        .var(ENV_FAIR_LOCK)
        .map(|v| {
            parse_bool(&v).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "{}: expected true or false, got '{}'",
                    ENV_FAIR_LOCK, v
                ))
            })
        })
        .transpose()?;
    Ok(ConfigLayer {
        log_level,
        fair_lock,
    })
}

/// true/false/1/0/yes/no（大文字小文字を区別しない）
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// 一度だけ確定する設定の置き場所
///
/// 明示的な上書き付きの確定は、まだ誰も確定していない時だけ許す。
#[derive(Debug, Default)]
pub struct ConfigCell {
    state: Mutex<Option<(ChdirConfig, &'static Location<'static>)>>,
}

impl ConfigCell {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// 確定済みならそれを返し、未確定なら `resolve` で確定する
    #[track_caller]
    pub fn get_or_resolve(
        &self,
        resolve: impl FnOnce() -> Result<ChdirConfig, Error>,
    ) -> Result<ChdirConfig, Error> {
        let caller = Location::caller();
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some((config, _)) = *state {
            return Ok(config);
        }
        let config = resolve()?;
        *state = Some((config, caller));
        Ok(config)
    }

    /// 上書き付きで確定する。既に確定済みなら AlreadyConfigured（最初に確定した呼び出し位置を含む）。
    #[track_caller]
    pub fn configure(
        &self,
        resolve: impl FnOnce() -> Result<ChdirConfig, Error>,
    ) -> Result<ChdirConfig, Error> {
        let caller = Location::caller();
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some((_, first)) = *state {
            return Err(Error::AlreadyConfigured(format!(
                "first resolved at {}",
                first
            )));
        }
        let config = resolve()?;
        *state = Some((config, caller));
        Ok(config)
    }

    pub fn get(&self) -> Option<ChdirConfig> {
        let state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.as_ref().map(|(c, _)| *c)
    }
}

static GLOBAL: ConfigCell = ConfigCell::new();

/// プロセスの設定を上書き付きで確定する（CLI フラグなど）
#[track_caller]
pub fn configure(process_override: ConfigLayer) -> Result<ChdirConfig, Error> {
    GLOBAL.configure(|| resolve_with_std(&process_override))
}

/// プロセスの設定。未確定なら上書きなしで確定する。
#[track_caller]
pub fn global() -> Result<ChdirConfig, Error> {
    GLOBAL.get_or_resolve(|| resolve_with_std(&ConfigLayer::default()))
}

fn resolve_with_std(process_override: &ConfigLayer) -> Result<ChdirConfig, Error> {
    let fs = crate::adapter::StdFileSystem;
    let env = crate::adapter::StdEnvResolver;
    let log = crate::wiring::std_logger(&env);
    ChdirConfig::resolve(&fs, &env, log.as_ref(), process_override)
}
