//! cd コマンドのユースケース

use crate::ports::outbound::ChildRunner;
use crate::wiring::App;
use cwdsync::error::Error;
use cwdsync::ChangeDir;
use std::sync::Arc;

/// CWD を変更し、指定があればその場所で子プロセスを起動する
pub struct CdUseCase {
    manager: &'static ChangeDir,
    child_runner: Arc<dyn ChildRunner>,
}

impl CdUseCase {
    pub fn new(manager: &'static ChangeDir, child_runner: Arc<dyn ChildRunner>) -> Self {
        Self {
            manager,
            child_runner,
        }
    }

    /// App から CdUseCase を作成する
    pub fn from_app(app: &App) -> Self {
        Self::new(app.manager, Arc::clone(&app.child_runner))
    }

    /// `on_changed` には変更後の CWD が渡る（子プロセス起動より前）
    ///
    /// exec が空なら 0、そうでなければ子プロセスの終了コードを返す。
    pub fn run(
        &self,
        dir: &str,
        exec: &[String],
        on_changed: impl FnOnce(&str),
    ) -> Result<i32, Error> {
        self.manager.change_dir(dir)?;
        on_changed(&self.manager.cwd());
        match exec.split_first() {
            None => Ok(0),
            Some((program, args)) => self.child_runner.run(program, args),
        }
    }
}
