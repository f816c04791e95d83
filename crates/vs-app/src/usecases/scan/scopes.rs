//! Scope bookkeeping for tasks and subscriptions started by scan actions.
//!
//! Every asynchronous result is posted back together with the token of the
//! scope that produced it. Closing a scope aborts its tasks and invalidates
//! the token, so results that arrive after the owning state was left are
//! dropped instead of reaching the machine.

use std::collections::HashMap;

use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AirplaneQuery,
    LocationStatus,
    PermissionCheck,
    SettleTimer,
    DeviceInfo,
    Connect,
    Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeToken {
    kind: TaskKind,
    generation: u64,
}

impl ScopeToken {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

#[derive(Debug)]
struct ScopeEntry {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

#[derive(Debug, Default)]
pub struct Scopes {
    next_generation: u64,
    live: HashMap<TaskKind, ScopeEntry>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh scope of `kind`, closing the previous one first.
    pub fn open(&mut self, kind: TaskKind) -> ScopeToken {
        self.close(kind);
        self.next_generation += 1;
        let generation = self.next_generation;
        self.live.insert(
            kind,
            ScopeEntry {
                generation,
                tasks: Vec::new(),
            },
        );
        ScopeToken { kind, generation }
    }

    /// Binds a spawned task to the scope `token` belongs to.
    ///
    /// A task attached to a scope that is no longer live is aborted at once.
    pub fn attach(&mut self, token: ScopeToken, task: AbortHandle) {
        match self.live.get_mut(&token.kind) {
            Some(entry) if entry.generation == token.generation => entry.tasks.push(task),
            _ => task.abort(),
        }
    }

    /// Closes the scope of `kind`. Idempotent.
    pub fn close(&mut self, kind: TaskKind) -> bool {
        match self.live.remove(&kind) {
            Some(entry) => {
                for task in entry.tasks {
                    task.abort();
                }
                true
            }
            None => false,
        }
    }

    pub fn close_all(&mut self) {
        for (_, entry) in self.live.drain() {
            for task in entry.tasks {
                task.abort();
            }
        }
    }

    pub fn is_live(&self, token: ScopeToken) -> bool {
        self.live
            .get(&token.kind)
            .is_some_and(|entry| entry.generation == token.generation)
    }
}
