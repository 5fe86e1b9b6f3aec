/// Screenshot batch sequencer.
///
/// Takes a list of model files and, for each one in order: loads it on the
/// owner thread, asks the capture service for a screenshot, and polls until
/// the screenshot is saved, fails, or times out. Every outcome is reported
/// and the batch always moves on to the next file.
///
/// # Single flight
///
/// At most one batch runs at a time. [`BatchSequencer::start`] returns
/// `false` while a batch is active; the request is dropped, never queued.
/// A started batch cannot be cancelled.
///
/// # Threads
///
/// ```text
/// caller ──start()──▶ worker thread ──run_on_owner(load)──▶ owner thread
///                         │  ◀──────── bounded(1) done ───────┘
///                         ├── request_capture() ──▶ capture service
///                         └── fetch_result() every poll_interval until timeout
/// ```
pub mod capture_path;
pub mod service;

pub use capture_path::capture_output_path;
pub use service::{
    CaptureRequestId, CaptureResult, CaptureService, ModelHost, ModelLoader, OwnerAction,
    OwnerDispatch,
};

use crate::error::{JobError, LoadError};
use crate::logging::Logger;
use crate::paths::unique_paths;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How often a pending screenshot is polled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long a single screenshot may take before the job fails.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
    /// Viewer window the screenshots are taken from.
    pub view_index: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_CAPTURE_TIMEOUT,
            view_index: 0,
        }
    }
}

/// Progress of a batch, delivered to the caller's [`BatchReporter`].
#[derive(Debug)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    JobSucceeded {
        path: PathBuf,
        output: PathBuf,
    },
    JobFailed {
        path: PathBuf,
        error: JobError,
    },
    /// Sent after the single-flight guard has been released, so a new batch
    /// may already be started from inside this callback.
    Finished {
        succeeded: usize,
        failed: usize,
    },
}

/// Receives batch progress. Called from the worker thread.
pub trait BatchReporter: Send + Sync {
    fn report(&self, event: BatchEvent);
}

impl<F> BatchReporter for F
where
    F: Fn(BatchEvent) + Send + Sync,
{
    fn report(&self, event: BatchEvent) {
        self(event)
    }
}

/// Clears the running flag when dropped, whichever way the run ends.
struct RunGuard(Arc<Mutex<bool>>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        *self.0.lock() = false;
    }
}

/// Starts screenshot batches, one at a time.
pub struct BatchSequencer<H: 'static> {
    jobs: Arc<JobRunner<H>>,
    running: Arc<Mutex<bool>>,
    logger: Logger,
}

impl<H: ModelHost + 'static> BatchSequencer<H> {
    pub fn new(
        dispatcher: Arc<dyn OwnerDispatch<H>>,
        capture: Arc<dyn CaptureService>,
        reporter: Arc<dyn BatchReporter>,
        config: BatchConfig,
        logger: Option<Logger>,
    ) -> Self {
        Self {
            jobs: Arc::new(JobRunner {
                dispatcher,
                capture,
                reporter,
                config,
            }),
            running: Arc::new(Mutex::new(false)),
            logger: logger.unwrap_or_default(),
        }
    }

    /// Start a batch over `paths` on a background worker.
    ///
    /// Paths are trimmed and de-duplicated ignoring case, keeping the first
    /// occurrence and the caller's order. Returns `false` without doing
    /// anything if no usable path remains or a batch is already running.
    pub fn start<P: AsRef<Path>>(&self, paths: &[P]) -> bool {
        let _log = self.logger.enter();

        let targets = unique_paths(paths);
        if targets.is_empty() {
            debug!("Screenshot batch ignored: no target paths");
            return false;
        }

        {
            let mut running = self.running.lock();
            if *running {
                warn!("Screenshot batch already running, new request ignored");
                return false;
            }
            *running = true;
        }

        let run = BatchRun {
            targets,
            jobs: Arc::clone(&self.jobs),
            guard: RunGuard(Arc::clone(&self.running)),
            logger: self.logger.clone(),
        };

        // On spawn failure the closure, and with it the guard, is dropped.
        match thread::Builder::new()
            .name("modeltree-batch".into())
            .spawn(move || run.execute())
        {
            Ok(_) => true,
            Err(err) => {
                error!("Failed to spawn screenshot worker: {err}");
                false
            }
        }
    }

    /// `true` while a batch holds the single-flight guard.
    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }

    pub fn config(&self) -> BatchConfig {
        self.jobs.config
    }
}

/// Collaborators shared by every run of one sequencer.
struct JobRunner<H> {
    dispatcher: Arc<dyn OwnerDispatch<H>>,
    capture: Arc<dyn CaptureService>,
    reporter: Arc<dyn BatchReporter>,
    config: BatchConfig,
}

impl<H: ModelHost + 'static> JobRunner<H> {
    /// Load, request, and await one screenshot.
    fn run_job(&self, model_path: &Path) -> Result<PathBuf, JobError> {
        self.load_on_owner(model_path)?;

        let now = chrono::Local::now().naive_local();
        let output = capture_output_path(model_path, now)
            .ok_or_else(|| JobError::OutputPath(model_path.to_path_buf()))?;

        let request_id = self
            .capture
            .request_capture(self.config.view_index, &output)
            .map_err(JobError::Submit)?;
        debug!("Screenshot {request_id:?} requested for {}", output.display());

        self.await_capture(request_id)?;
        Ok(output)
    }

    /// [`Self::run_job`] with a panic turned into [`JobError::Panicked`],
    /// so one faulting job cannot end the batch.
    fn run_job_caught(&self, model_path: &Path) -> Result<PathBuf, JobError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.run_job(model_path))).unwrap_or_else(
            |payload| {
                let message = panic_message(payload.as_ref());
                error!("Screenshot job for {} panicked: {message}", model_path.display());
                Err(JobError::Panicked(message))
            },
        )
    }

    /// Run the load on the owner thread and block until it reports back.
    fn load_on_owner(&self, model_path: &Path) -> Result<(), JobError> {
        let (done_tx, done_rx) = crossbeam_channel::bounded::<Result<(), LoadError>>(1);
        let path = model_path.to_path_buf();
        self.dispatcher.run_on_owner(Box::new(move |host: &mut H| {
            let _ = done_tx.send(host.load_model(&path));
        }));

        match done_rx.recv() {
            Ok(result) => result.map_err(JobError::Load),
            // Action dropped unrun: the owner queue is gone.
            Err(_) => Err(JobError::OwnerUnavailable),
        }
    }

    fn await_capture(&self, request_id: CaptureRequestId) -> Result<(), JobError> {
        let deadline = Instant::now() + self.config.timeout;
        while Instant::now() < deadline {
            if let Some(result) = self.capture.fetch_result(request_id) {
                if result.is_ok() {
                    return Ok(());
                }
                return Err(JobError::Service(result.error_message));
            }
            thread::sleep(self.config.poll_interval);
        }
        Err(JobError::Timeout(self.config.timeout))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One invocation of the sequencer: its own snapshot of targets plus the
/// guard it must release.
struct BatchRun<H: 'static> {
    targets: Vec<PathBuf>,
    jobs: Arc<JobRunner<H>>,
    guard: RunGuard,
    logger: Logger,
}

impl<H: ModelHost + 'static> BatchRun<H> {
    fn execute(self) {
        let BatchRun {
            targets,
            jobs,
            guard,
            logger,
        } = self;
        let _log = logger.enter();

        let start = Instant::now();
        info!("Screenshot batch started: {} models", targets.len());
        jobs.reporter.report(BatchEvent::Started {
            total: targets.len(),
        });

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        for path in &targets {
            match jobs.run_job_caught(path) {
                Ok(output) => {
                    succeeded += 1;
                    info!("Screenshot saved: {}", output.display());
                    jobs.reporter.report(BatchEvent::JobSucceeded {
                        path: path.clone(),
                        output,
                    });
                }
                Err(error) => {
                    failed += 1;
                    warn!("Screenshot failed for {}: {error}", path.display());
                    jobs.reporter.report(BatchEvent::JobFailed {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        drop(guard);
        info!(
            "Screenshot batch finished: {succeeded} saved, {failed} failed in {:?}",
            start.elapsed()
        );
        jobs.reporter.report(BatchEvent::Finished { succeeded, failed });
    }
}
