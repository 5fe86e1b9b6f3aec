/// Collaborators the batch sequencer drives but does not implement.
///
/// - The **owner thread** is the only thread allowed to touch live model and
///   view state. Work reaches it through [`OwnerDispatch`].
/// - The **model host** is that owner-side state; loading happens on it.
/// - The **capture service** renders screenshots asynchronously and is safe
///   to call from any thread.
use crate::error::LoadError;
use std::path::Path;

/// An action to run on the owner thread against its state.
pub type OwnerAction<H> = Box<dyn FnOnce(&mut H) + Send>;

/// Queues work onto the owner thread.
///
/// Fire-and-forget from the dispatcher's side: callers that need a result
/// send it back through their own channel from inside the action.
pub trait OwnerDispatch<H>: Send + Sync {
    fn run_on_owner(&self, action: OwnerAction<H>);
}

/// Owner-side state that can switch the active model.
pub trait ModelHost {
    fn load_model(&mut self, path: &Path) -> Result<(), LoadError>;
}

/// Reads a model file into whatever handle the renderer uses.
///
/// Only ever invoked on the owner thread, through [`ModelHost`].
pub trait ModelLoader {
    type Model;

    fn load(&self, path: &Path) -> Result<Self::Model, LoadError>;

    /// Whether `path` looks loadable at all, without reading it.
    fn can_load(&self, path: &Path) -> bool;
}

/// Opaque identifier handed out by the capture service on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureRequestId(pub u64);

/// Outcome record for one capture request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureResult {
    /// Empty on success.
    pub error_message: String,
}

impl CaptureResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_message.is_empty()
    }
}

/// Asynchronous screenshot service of the viewer window.
pub trait CaptureService: Send + Sync {
    /// Queue a screenshot of view `view_index` to be written to `output`.
    fn request_capture(&self, view_index: usize, output: &Path)
        -> Result<CaptureRequestId, String>;

    /// `None` until the request has finished.
    fn fetch_result(&self, id: CaptureRequestId) -> Option<CaptureResult>;
}
