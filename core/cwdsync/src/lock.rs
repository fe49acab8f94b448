//! 公平／非公平を選べる排他ロック
//!
//! 非公平モードは `std::sync::Mutex` そのもの。公平モードはチケット順（FIFO）で
//! ロックを渡し、その後ろで同じ Mutex を取る。モードは生成時に固定。

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// ロックの公平性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// 待っている順に獲得する
    Fair,
    /// 獲得順は不定
    Unfair,
}

impl LockMode {
    pub fn from_fair(fair: bool) -> Self {
        if fair {
            LockMode::Fair
        } else {
            LockMode::Unfair
        }
    }
}

#[derive(Debug, Default)]
struct Tickets {
    next: u64,
    serving: u64,
}

#[derive(Debug, Default)]
struct TicketQueue {
    tickets: Mutex<Tickets>,
    turn: Condvar,
}

impl TicketQueue {
    fn wait_turn(&self) {
        let mut t = self.tickets.lock().unwrap_or_else(PoisonError::into_inner);
        let mine = t.next;
        t.next += 1;
        while t.serving != mine {
            t = self.turn.wait(t).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn pass_turn(&self) {
        let mut t = self.tickets.lock().unwrap_or_else(PoisonError::into_inner);
        t.serving += 1;
        drop(t);
        self.turn.notify_all();
    }
}

/// モード付きの排他ロック
#[derive(Debug)]
pub struct CwdLock<T> {
    mode: LockMode,
    queue: TicketQueue,
    data: Mutex<T>,
}

impl<T> CwdLock<T> {
    pub fn new(value: T, mode: LockMode) -> Self {
        Self {
            mode,
            queue: TicketQueue::default(),
            data: Mutex::new(value),
        }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// ブロックして獲得する。ガードの drop で解放される。
    ///
    /// 保持中のスレッドが panic しても中身は使い続ける（更新は全てガード内で完結させる）。
    pub fn lock(&self) -> CwdLockGuard<'_, T> {
        let turn = match self.mode {
            LockMode::Fair => {
                self.queue.wait_turn();
                Some(Turn(&self.queue))
            }
            LockMode::Unfair => None,
        };
        let guard = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        CwdLockGuard { guard, _turn: turn }
    }
}

/// 公平モードの順番。drop で次のチケットへ回す。
struct Turn<'a>(&'a TicketQueue);

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        self.0.pass_turn();
    }
}

/// `CwdLock::lock` のガード
///
/// フィールドは宣言順に drop される。中身の Mutex を解放してから順番を回す。
pub struct CwdLockGuard<'a, T> {
    guard: MutexGuard<'a, T>,
    _turn: Option<Turn<'a>>,
}

impl<T> Deref for CwdLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for CwdLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn hammer(mode: LockMode) -> u64 {
        let lock = Arc::new(CwdLock::new(0u64, mode));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = Arc::clone(&lock);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let mut g = lock.lock();
                        let v = *g;
                        std::thread::yield_now();
                        *g = v + 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let total = *lock.lock();
        total
    }

    #[test]
    fn test_mutual_exclusion_unfair() {
        assert_eq!(hammer(LockMode::Unfair), 4000);
    }

    #[test]
    fn test_mutual_exclusion_fair() {
        assert_eq!(hammer(LockMode::Fair), 4000);
    }

    #[test]
    fn test_fair_lock_grants_in_arrival_order() {
        let lock = Arc::new(CwdLock::new(Vec::<usize>::new(), LockMode::Fair));
        let held = lock.lock();
        let mut handles = Vec::new();
        for i in 0..5 {
            let waiter = Arc::clone(&lock);
            handles.push(std::thread::spawn(move || {
                waiter.lock().push(i);
            }));
            // 前のスレッドがチケットを取るまで待つ
            while lock.queue.tickets.lock().unwrap().next < (i as u64) + 2 {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        drop(held);
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mode_from_fair() {
        assert_eq!(LockMode::from_fair(true), LockMode::Fair);
        assert_eq!(LockMode::from_fair(false), LockMode::Unfair);
        assert_eq!(CwdLock::new((), LockMode::Fair).mode(), LockMode::Fair);
    }
}
