//! # Component Scope
//!
//! Lifecycle of the UI component that owns a hook.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ComponentScope (owner handles)        ScopeToken (held by tasks)      │
//! │        │                                      │                        │
//! │        │  unmount() / last handle dropped     │                        │
//! │        └──────────────► mounted = false ◄─────┘ is_mounted()?          │
//! │                                                                         │
//! │  A request in flight keeps running; its result is dropped.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

#[derive(Debug)]
struct ScopeState {
    name: String,
    mounted: AtomicBool,
}

impl ScopeState {
    fn unmount(&self) {
        if self.mounted.swap(false, Ordering::AcqRel) {
            debug!(scope = %self.name, "Component scope unmounted");
        }
    }
}

/// Flips the scope to unmounted when the last owner handle goes away.
#[derive(Debug)]
struct UnmountOnDrop(Arc<ScopeState>);

impl Drop for UnmountOnDrop {
    fn drop(&mut self) {
        self.0.unmount();
    }
}

/// Owner handle of a mounted component. Clones share the same lifecycle.
#[derive(Debug, Clone)]
pub struct ComponentScope {
    state: Arc<ScopeState>,
    _owner: Arc<UnmountOnDrop>,
}

impl ComponentScope {
    pub fn new(name: impl Into<String>) -> Self {
        let state = Arc::new(ScopeState {
            name: name.into(),
            mounted: AtomicBool::new(true),
        });
        ComponentScope {
            _owner: Arc::new(UnmountOnDrop(state.clone())),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn is_mounted(&self) -> bool {
        self.state.mounted.load(Ordering::Acquire)
    }

    /// Marks the component as gone. Idempotent.
    pub fn unmount(&self) {
        self.state.unmount();
    }

    /// Observer for spawned work. Holding a token does not keep the scope
    /// mounted.
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            state: self.state.clone(),
        }
    }
}

/// Non-owning view of a [`ComponentScope`].
#[derive(Debug, Clone)]
pub struct ScopeToken {
    state: Arc<ScopeState>,
}

impl ScopeToken {
    pub fn is_mounted(&self) -> bool {
        self.state.mounted.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmount_is_visible_to_tokens() {
        let scope = ComponentScope::new("menu-page");
        let token = scope.token();
        assert!(token.is_mounted());

        scope.unmount();
        assert!(!scope.is_mounted());
        assert!(!token.is_mounted());

        scope.unmount();
        assert!(!token.is_mounted());
    }

    #[test]
    fn test_dropping_last_handle_unmounts() {
        let scope = ComponentScope::new("checkout");
        let clone = scope.clone();
        let token = scope.token();

        drop(scope);
        assert!(token.is_mounted());

        drop(clone);
        assert!(!token.is_mounted());
        assert_eq!(token.name(), "checkout");
    }
}
