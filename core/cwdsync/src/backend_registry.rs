//! backend の選択
//!
//! 登録された候補から preference 最大のものを一つ選び、初期化して保持する。
//! 選択と初期化は最初の `select` で一度だけ走り、失敗も含めて結果を保持する（再試行なし）。

use crate::adapter::backend::{builtin_backends, NoopBackend};
use crate::error::Error;
use crate::ports::outbound::ChdirBackend;
use std::sync::{Arc, OnceLock};

/// 候補 backend の一覧と、選択結果のメモ
pub struct BackendRegistry {
    candidates: Vec<Arc<dyn ChdirBackend>>,
    selected: OnceLock<Result<Arc<dyn ChdirBackend>, Error>>,
}

impl BackendRegistry {
    pub fn new(candidates: Vec<Arc<dyn ChdirBackend>>) -> Self {
        Self {
            candidates,
            selected: OnceLock::new(),
        }
    }

    /// cargo feature で有効になった組み込み backend から作る
    pub fn builtin() -> Self {
        Self::new(builtin_backends())
    }

    pub fn candidates(&self) -> &[Arc<dyn ChdirBackend>] {
        &self.candidates
    }

    /// 有効な backend を返す。初回呼び出しで選択・初期化する。
    ///
    /// 同時に初回呼び出しが来ても選択を行うのは一スレッドだけで、他は結果を待って同じものを受け取る。
    /// 勝者の初期化失敗は BackendInit として返し、次点へは降格しない。
    pub fn select(&self) -> Result<Arc<dyn ChdirBackend>, Error> {
        self.selected
            .get_or_init(|| pick_and_init(&self.candidates))
            .clone()
    }

    /// 既に選択済みならその結果
    pub fn selected(&self) -> Option<Result<Arc<dyn ChdirBackend>, Error>> {
        self.selected.get().cloned()
    }
}

/// preference 最大の候補（同点ならどれか一つ）。候補が空なら NoopBackend。
fn pick_and_init(candidates: &[Arc<dyn ChdirBackend>]) -> Result<Arc<dyn ChdirBackend>, Error> {
    let winner = candidates
        .iter()
        .max_by_key(|b| b.preference())
        .cloned()
        .unwrap_or_else(|| Arc::new(NoopBackend) as Arc<dyn ChdirBackend>);
    winner.init()?;
    Ok(winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::ChdirOutcome;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        name: &'static str,
        preference: i32,
        init_calls: AtomicUsize,
        fail_init: bool,
    }

    impl FakeBackend {
        fn new(name: &'static str, preference: i32) -> Arc<Self> {
            Arc::new(Self {
                name,
                preference,
                init_calls: AtomicUsize::new(0),
                fail_init: false,
            })
        }

        fn failing(name: &'static str, preference: i32) -> Arc<Self> {
            Arc::new(Self {
                name,
                preference,
                init_calls: AtomicUsize::new(0),
                fail_init: true,
            })
        }
    }

    impl ChdirBackend for FakeBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn preference(&self) -> i32 {
            self.preference
        }

        fn init(&self) -> Result<(), Error> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            // 同時初回呼び出しが重なる窓を広げる
            std::thread::sleep(std::time::Duration::from_millis(10));
            if self.fail_init {
                return Err(Error::backend_init(self.name, "symbol not found"));
            }
            Ok(())
        }

        fn apply(&self, _dir: &Path) -> Result<ChdirOutcome, Error> {
            Ok(ChdirOutcome::Changed)
        }
    }

    fn registry(backends: &[Arc<FakeBackend>]) -> BackendRegistry {
        BackendRegistry::new(
            backends
                .iter()
                .map(|b| Arc::clone(b) as Arc<dyn ChdirBackend>)
                .collect(),
        )
    }

    #[test]
    fn test_selects_highest_preference() {
        let r = registry(&[
            FakeBackend::new("jni-like", 1),
            FakeBackend::new("ffm-like", 22),
            FakeBackend::new("jna-like", 4),
        ]);
        assert_eq!(r.select().unwrap().preference(), 22);

        let r = registry(&[FakeBackend::new("a", 1), FakeBackend::new("b", 4)]);
        assert_eq!(r.select().unwrap().preference(), 4);
    }

    #[test]
    fn test_empty_registry_falls_back_to_noop() {
        let r = BackendRegistry::new(Vec::new());
        let b = r.select().unwrap();
        assert_eq!(b.name(), "noop");
        assert_eq!(b.preference(), 0);
        assert_eq!(b.apply(Path::new("/")), Ok(ChdirOutcome::Refused(None)));
    }

    #[test]
    fn test_selection_is_idempotent() {
        let r = registry(&[FakeBackend::new("a", 1), FakeBackend::new("b", 4)]);
        assert!(r.selected().is_none());
        let first = r.select().unwrap();
        let second = r.select().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(r.selected().is_some());
    }

    #[test]
    fn test_concurrent_first_select_initializes_once() {
        let winner = FakeBackend::new("winner", 9);
        let loser = FakeBackend::new("loser", 2);
        let r = Arc::new(registry(&[Arc::clone(&loser), Arc::clone(&winner)]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || r.select().unwrap())
            })
            .collect();
        let selected: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(winner.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(loser.init_calls.load(Ordering::SeqCst), 0);
        for b in &selected {
            assert!(Arc::ptr_eq(b, &selected[0]));
            assert_eq!(b.name(), "winner");
        }
    }

    #[test]
    fn test_init_failure_is_fatal_and_not_retried() {
        let broken = FakeBackend::failing("broken", 22);
        let fallback = FakeBackend::new("fallback", 4);
        let r = registry(&[Arc::clone(&broken), Arc::clone(&fallback)]);

        let err = r.select().err().unwrap();
        assert!(matches!(err, Error::BackendInit { .. }));
        assert!(r.select().is_err());
        assert_eq!(broken.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.init_calls.load(Ordering::SeqCst), 0);
    }
}
