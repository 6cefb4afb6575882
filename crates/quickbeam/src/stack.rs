//! Stack growth for deep evaluation.
//!
//! Interpreted calls and nested expressions recurse on the host stack. The
//! call-depth limit bounds script recursion, but a debug build can exhaust a
//! 2 MiB thread well before that limit. Every recursive evaluation entry
//! point goes through [`ensure_sufficient_stack`], which moves onto a fresh
//! heap-allocated segment when the current one runs low.

/// Minimum stack space to keep available (128KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
