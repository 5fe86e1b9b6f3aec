/// Injectable logging for core components.
///
/// Components never reach for a process-wide logger. Each constructor takes
/// an optional [`Logger`]; when none is given the component logs into a
/// no-op dispatch and stays silent.
use tracing::dispatcher::{self, DefaultGuard};
use tracing::Dispatch;

/// A `tracing` dispatch handed to a component at construction time.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// A logger that discards everything.
    pub fn none() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Capture whatever dispatch is the default on the calling thread.
    ///
    /// The binary calls this right after installing its subscriber.
    pub fn current() -> Self {
        Self {
            dispatch: dispatcher::get_default(|d| d.clone()),
        }
    }

    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Run `f` with this logger as the thread-local default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Install this logger as the thread default until the guard drops.
    ///
    /// Used by worker threads that log for their whole lifetime.
    pub fn enter(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
