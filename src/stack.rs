//! Stack growth for recursion over nested source
//!
//! Parsing, rendering and evaluating recurse once per level of nesting in the
//! program, and that depth is chosen by whoever wrote the input. Each
//! recursive entry point runs through [`ensure_sufficient_stack`], which moves
//! onto a freshly allocated stack segment when the current one runs low.

/// Stack space that must remain before recursing further (100KB)
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, growing the stack first if less than the red zone remains
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call directly
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
