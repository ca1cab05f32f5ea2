//! Stack headroom for recursive message sends.
//!
//! A method body may send further messages before returning, and attribute
//! lookup recurses through parent chains, so deeply nested games can grow
//! the native stack past its default size. `stacker` moves execution to a
//! fresh segment when the red zone is reached; on WASM the runtime manages
//! its own stack and the shim is a direct call.

/// Guarantee stack headroom before running `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Remaining-stack threshold that triggers growth (100KB).
    const RED_ZONE: usize = 100 * 1024;

    /// Size of each newly allocated segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
