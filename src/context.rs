//! Task-scoped holder for the current data source key.
//!
//! Each logical unit of work (one request, one job) carries its own stack of
//! active keys in task-local storage. Concurrent tasks never observe each
//! other's keys; there is no process-wide current key. The stack is
//! established by [`DataSourceContext::scope`] (or implicitly by
//! [`crate::binding::bound`]) and is bounded by call nesting depth.

use std::cell::RefCell;
use std::future::Future;

use tracing::error;

use crate::errors::ContextError;
use crate::key::DataSourceKey;

tokio::task_local! {
    static DATA_SOURCE_STACK: RefCell<Vec<DataSourceKey>>;
}

/// Accessor for the calling task's data source key stack.
///
/// All operations act on the stack of the current context scope. Outside a
/// scope, reads report an unset context and writes are rejected with an
/// error log; collaborators are expected to wrap each unit of work in
/// [`DataSourceContext::scope`] or enter one through a bound call.
pub struct DataSourceContext;

impl DataSourceContext {
    /// Runs `fut` with a fresh, empty key stack as the ambient context.
    ///
    /// One scope per logical unit of work. A nested scope shadows the outer
    /// one for the duration of `fut`.
    pub async fn scope<F: Future>(fut: F) -> F::Output {
        DATA_SOURCE_STACK.scope(RefCell::new(Vec::new()), fut).await
    }

    /// Runs `fut` inside a scope pre-seeded with `keys`.
    pub(crate) async fn scope_with<F: Future>(keys: Vec<DataSourceKey>, fut: F) -> F::Output {
        DATA_SOURCE_STACK.scope(RefCell::new(keys), fut).await
    }

    /// True when the calling task is inside a context scope.
    pub fn in_scope() -> bool {
        DATA_SOURCE_STACK.try_with(|_| ()).is_ok()
    }

    fn with_stack<R>(f: impl FnOnce(&mut Vec<DataSourceKey>) -> R) -> Option<R> {
        DATA_SOURCE_STACK
            .try_with(|stack| f(&mut stack.borrow_mut()))
            .ok()
    }

    /// Makes `key` the current data source until the matching [`pop`].
    ///
    /// [`pop`]: DataSourceContext::pop
    pub fn push(key: DataSourceKey) {
        if Self::with_stack(|stack| stack.push(key)).is_none() {
            error!("data source key pushed outside a context scope; ignored");
        }
    }

    /// Removes and returns the current key, restoring the previous one.
    ///
    /// Popping more than was pushed is an interceptor bug and yields
    /// [`ContextError::EmptyStack`]; a stale or default key is never
    /// returned in its place.
    pub fn pop() -> Result<DataSourceKey, ContextError> {
        Self::with_stack(|stack| stack.pop())
            .flatten()
            .ok_or(ContextError::EmptyStack)
    }

    /// The current key, or `None` when the context is unset.
    pub fn current() -> Option<DataSourceKey> {
        Self::with_stack(|stack| stack.last().cloned()).flatten()
    }

    /// True if `key` is active anywhere in the stack, not just on top.
    ///
    /// Lets call sites detect a re-entrant override without losing the
    /// outer key.
    pub fn contains(key: &DataSourceKey) -> bool {
        Self::with_stack(|stack| stack.iter().any(|k| k == key)).unwrap_or(false)
    }

    /// Imperative escape hatch: replaces the current key in place (or pushes
    /// it onto an empty stack).
    ///
    /// Unlike a bound call, nothing restores the previous key; the switch
    /// persists until the next `set_current` or until the enclosing bound
    /// scope pops its own entry. Call sites that read from several sources
    /// within one method switch repeatedly and accept that the last key
    /// leaks into the rest of the unit of work.
    pub fn set_current(key: DataSourceKey) {
        let applied = Self::with_stack(|stack| match stack.last_mut() {
            Some(top) => *top = key,
            None => stack.push(key),
        });
        if applied.is_none() {
            error!("data source key set outside a context scope; ignored");
        }
    }

    /// Number of active keys; equals the nesting depth of bound calls.
    pub fn depth() -> usize {
        Self::with_stack(|stack| stack.len()).unwrap_or(0)
    }
}

/// Pops one key when dropped.
///
/// The interceptor holds one of these across the wrapped call so the pop
/// runs on normal return, early return, and unwind alike.
pub(crate) struct KeyGuard {
    _private: (),
}

impl KeyGuard {
    pub(crate) fn push(key: DataSourceKey) -> Self {
        DataSourceContext::push(key);
        KeyGuard { _private: () }
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        if DataSourceContext::pop().is_err() {
            error!("data source context stack was empty on guard drop");
        }
    }
}
