//! Async driver for a [`Session`].

use crate::engine::TransformService;
use crate::error::Result;
use crate::session::{Intent, Session, SessionState};
use crate::view::{render, Screen};
use std::sync::{Arc, Mutex, MutexGuard};

/// Owns one session and the transform service that drives it.
///
/// Cloning gives another handle to the same session. The lock is never held
/// across an `.await`: a transform runs unlocked, so reads and `Reset` stay
/// available while it is in flight.
#[derive(Clone)]
pub struct Coordinator {
    session: Arc<Mutex<Session>>,
    service: Arc<TransformService>,
}

impl Coordinator {
    pub fn new(service: TransformService) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            service: Arc::new(service),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // A panic mid-transition cannot leave a half-written field behind.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies an intent.
    ///
    /// For `StartProcess` this awaits the transform and returns its error, if
    /// any, after recording it in the session. A `StartProcess` that finds
    /// nothing to do, or a transform already in flight, is a no-op. That
    /// includes a transform abandoned by `Reset` that has not returned yet.
    pub async fn dispatch(&self, intent: Intent) -> Result<()> {
        let job = self.lock().apply(intent)?;
        let Some(job) = job else {
            return Ok(());
        };

        log::debug!("Dispatching {} transform for {}", job.mode, job.file.name());
        match self.service.run(job.mode, &job.file, job.target).await {
            Ok(result) => {
                self.lock().complete_process(job.ticket, result);
                Ok(())
            }
            Err(e) => {
                let settled = self.lock().fail_process(job.ticket, &e);
                if settled {
                    Err(e)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Read access without copying.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.lock())
    }

    pub fn render(&self) -> Screen {
        render(&self.lock())
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(TransformService::default())
    }
}
