//! Declarative key binding and call interception.
//!
//! The interception point for collaborators. A [`BindingDirective`] is the
//! declarative marker tying a callable (or a whole service type, via
//! [`DataSourceBound`]) to a target key; [`bound`] and [`intercept`] wrap the
//! call and apply the push/invoke/restore protocol around it. There is no
//! proxy dispatch: binding is explicit decorator composition at the call
//! boundary.

use std::future::Future;

use crate::context::{DataSourceContext, KeyGuard};
use crate::key::DataSourceKey;

/// Read-only metadata tying a callable or type to a target data source key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDirective {
    target: DataSourceKey,
}

impl BindingDirective {
    pub const fn new(target: DataSourceKey) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &DataSourceKey {
        &self.target
    }
}

/// Type-level binding, the analogue of annotating a whole service type.
///
/// A method-level directive passed to [`intercept`] overrides this; with
/// neither present the call inherits the caller's current key.
pub trait DataSourceBound {
    fn binding() -> Option<BindingDirective> {
        None
    }
}

/// Directive precedence: method-level over type-level over inherited context.
pub fn resolve_directive(
    method: Option<BindingDirective>,
    type_level: Option<BindingDirective>,
) -> Option<BindingDirective> {
    method.or(type_level)
}

/// Runs `fut` with `directive`'s key as the current data source.
///
/// The key is pushed before the body runs and popped when it finishes,
/// however it finishes: normal return, early `?` return, or unwind. Stack
/// depth after the call equals depth before it, so nested bound calls
/// restore the outer key and unbound callers see their context untouched.
/// Called outside any context scope, `bound` establishes one for the
/// duration of the call.
pub async fn bound<F: Future>(directive: &BindingDirective, fut: F) -> F::Output {
    apply(Some(directive.clone()), fut).await
}

/// Interceptor entry point with full directive resolution.
///
/// Resolves the effective directive from a method-level and a type-level
/// candidate; with neither present the body runs unwrapped and inherits the
/// caller's current key.
pub async fn intercept<F: Future>(
    method: Option<BindingDirective>,
    type_level: Option<BindingDirective>,
    fut: F,
) -> F::Output {
    apply(resolve_directive(method, type_level), fut).await
}

async fn apply<F: Future>(directive: Option<BindingDirective>, fut: F) -> F::Output {
    match directive {
        None => fut.await,
        Some(directive) if DataSourceContext::in_scope() => {
            let _guard = KeyGuard::push(directive.target);
            fut.await
        }
        // Outside any scope: the bound call is itself the unit of work.
        Some(directive) => DataSourceContext::scope_with(vec![directive.target], fut).await,
    }
}
