//! Session state machine
//!
//! One selected file, its mode, the target size, at most one transform in
//! flight, and the latest result or error.

use crate::constants::PROCESSING_FAILED_PREFIX;
use crate::error::{ProcessingError, Result};
use crate::file::{ResultFile, SourceFile, TargetSize};
use crate::formats::ProcessMode;

/// Where the session is in the intake → process → result cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Ready,
    Processing,
}

/// A user action forwarded by the presentation layer
#[derive(Debug, Clone)]
pub enum Intent {
    SelectFile(SourceFile),
    ChangeTargetSize(u32),
    StartProcess,
    Reset,
}

/// Everything a dispatched transform needs, plus the ticket that settles it.
#[derive(Debug, Clone)]
pub struct TransformJob {
    pub ticket: u64,
    pub mode: ProcessMode,
    pub file: SourceFile,
    pub target: TargetSize,
}

/// Single source of truth for one session.
///
/// All mutation goes through the named transitions below. A job's ticket must
/// match the current generation to settle; `reset` advances the generation so
/// a transform still running when the user starts over cannot write into the
/// fresh session.
///
/// A job abandoned by `reset` is still remembered until its outcome arrives,
/// and no new job starts before that.
#[derive(Debug, Clone, Default)]
pub struct Session {
    source: Option<SourceFile>,
    mode: Option<ProcessMode>,
    target: TargetSize,
    processing: bool,
    result: Option<ResultFile>,
    error: Option<String>,
    generation: u64,
    abandoned: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.processing {
            SessionState::Processing
        } else if self.source.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    pub fn mode(&self) -> Option<ProcessMode> {
        self.mode
    }

    pub fn target_size(&self) -> TargetSize {
        self.target
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn result(&self) -> Option<&ResultFile> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a transform dropped by `reset` has not returned yet.
    pub fn is_draining(&self) -> bool {
        self.abandoned.is_some()
    }

    /// Replaces the current file if its type is supported.
    ///
    /// An unsupported file only sets the error message; the current file,
    /// mode and result stay as they were.
    pub fn select_file(&mut self, file: SourceFile) -> Result<ProcessMode> {
        if self.processing {
            return Err(ProcessingError::SessionBusy);
        }

        let Some(mode) = file.kind().mode() else {
            let err = ProcessingError::UnsupportedFileType;
            self.error = Some(err.to_string());
            return Err(err);
        };

        self.source = Some(file);
        self.mode = Some(mode);
        self.result = None;
        self.error = None;
        Ok(mode)
    }

    pub fn change_target_size(&mut self, kb: u32) -> Result<()> {
        if self.processing {
            return Err(ProcessingError::SessionBusy);
        }
        if self.mode != Some(ProcessMode::Image) {
            return Err(ProcessingError::TargetSizeNotApplicable);
        }
        self.target = TargetSize::new(kb)?;
        Ok(())
    }

    /// Moves to `Processing` and hands out the job to run.
    ///
    /// Returns `None` without touching anything when there is no file or a
    /// transform is already in flight, including one abandoned by `reset`.
    pub fn begin_process(&mut self) -> Option<TransformJob> {
        if self.processing {
            log::debug!("Ignoring process request: a transform is in flight");
            return None;
        }
        if let Some(ticket) = self.abandoned {
            log::debug!("Ignoring process request: job {} has not returned", ticket);
            return None;
        }
        let (Some(file), Some(mode)) = (self.source.clone(), self.mode) else {
            return None;
        };

        self.error = None;
        self.result = None;
        self.processing = true;
        self.generation += 1;

        Some(TransformJob {
            ticket: self.generation,
            mode,
            file,
            target: self.target,
        })
    }

    /// Settles the in-flight job. Returns `false` for a stale ticket, in which
    /// case the outcome is dropped.
    pub fn finish_process(&mut self, ticket: u64, outcome: Result<ResultFile>) -> bool {
        match outcome {
            Ok(result) => self.complete_process(ticket, result),
            Err(e) => self.fail_process(ticket, &e),
        }
    }

    pub fn complete_process(&mut self, ticket: u64, result: ResultFile) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.result = Some(result);
        self.error = None;
        true
    }

    pub fn fail_process(&mut self, ticket: u64, err: &ProcessingError) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.result = None;
        self.error = Some(format!("{} {}", PROCESSING_FAILED_PREFIX, err));
        true
    }

    fn settle(&mut self, ticket: u64) -> bool {
        if self.abandoned == Some(ticket) {
            self.abandoned = None;
            log::debug!("Dropping outcome of job {} abandoned by reset", ticket);
            return false;
        }
        if !self.processing || ticket != self.generation {
            log::debug!("Dropping outcome of stale job {}", ticket);
            return false;
        }
        self.processing = false;
        true
    }

    pub fn reset(&mut self) {
        if self.processing {
            self.abandoned = Some(self.generation);
        }
        self.source = None;
        self.mode = None;
        self.target = TargetSize::default();
        self.processing = false;
        self.result = None;
        self.error = None;
        self.generation += 1;
    }

    /// Routes an intent to its transition. For `StartProcess` this only begins
    /// the job; running it is up to the caller.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<TransformJob>> {
        match intent {
            Intent::SelectFile(file) => self.select_file(file).map(|_| None),
            Intent::ChangeTargetSize(kb) => self.change_target_size(kb).map(|_| None),
            Intent::StartProcess => Ok(self.begin_process()),
            Intent::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }
}

/// Two sessions are equal when everything a user can observe matches.
/// Job bookkeeping is left out.
impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.source.as_ref().map(|f| (f.name(), f.content_type(), f.bytes()))
            == other.source.as_ref().map(|f| (f.name(), f.content_type(), f.bytes()))
            && self.mode == other.mode
            && self.target == other.target
            && self.processing == other.processing
            && self.result == other.result
            && self.error == other.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> SourceFile {
        SourceFile::new(name, "image/png", vec![1u8; 32])
    }

    fn pdf() -> SourceFile {
        SourceFile::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec())
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.target_size().kilobytes(), 100);
        assert!(session.mode().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_select_supported_file() {
        let mut session = Session::new();
        assert_eq!(session.select_file(pdf()).unwrap(), ProcessMode::Pdf);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.mode(), Some(ProcessMode::Pdf));
    }

    #[test]
    fn test_unsupported_file_keeps_state() {
        let mut session = Session::new();
        session.select_file(image("photo.png")).unwrap();

        let err = session
            .select_file(SourceFile::new("notes.txt", "text/plain", vec![]))
            .unwrap_err();

        assert!(matches!(err, ProcessingError::UnsupportedFileType));
        assert_eq!(session.source().unwrap().name(), "photo.png");
        assert_eq!(session.mode(), Some(ProcessMode::Image));
        assert_eq!(
            session.error(),
            Some("Unsupported file type. Please upload an image or PDF.")
        );
    }

    #[test]
    fn test_selecting_clears_error_and_result() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let job = session.begin_process().unwrap();
        session.finish_process(job.ticket, Ok(ResultFile::new("image/png", vec![1u8])));
        let _ = session.select_file(SourceFile::new("x.doc", "application/msword", vec![]));
        assert!(session.error().is_some());
        assert!(session.result().is_some());

        session.select_file(image("b.png")).unwrap();
        assert!(session.error().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_target_size_rules() {
        let mut session = Session::new();
        assert!(matches!(
            session.change_target_size(200),
            Err(ProcessingError::TargetSizeNotApplicable)
        ));

        session.select_file(image("a.png")).unwrap();
        session.change_target_size(200).unwrap();
        assert_eq!(session.target_size().kilobytes(), 200);

        assert!(matches!(
            session.change_target_size(1001),
            Err(ProcessingError::InvalidTargetSize(1001))
        ));
        assert_eq!(session.target_size().kilobytes(), 200);

        session.select_file(pdf()).unwrap();
        assert!(matches!(
            session.change_target_size(300),
            Err(ProcessingError::TargetSizeNotApplicable)
        ));
        assert_eq!(session.target_size().kilobytes(), 200);
    }

    #[test]
    fn test_begin_process_requires_file() {
        let mut session = Session::new();
        assert!(session.begin_process().is_none());
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_begin_process_only_once() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        session.change_target_size(250).unwrap();

        let job = session.begin_process().unwrap();
        assert_eq!(job.mode, ProcessMode::Image);
        assert_eq!(job.target.kilobytes(), 250);
        assert_eq!(session.state(), SessionState::Processing);

        assert!(session.begin_process().is_none());
        assert!(matches!(
            session.select_file(pdf()),
            Err(ProcessingError::SessionBusy)
        ));
        assert!(matches!(
            session.change_target_size(5),
            Err(ProcessingError::SessionBusy)
        ));
    }

    #[test]
    fn test_finish_with_success() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let job = session.begin_process().unwrap();

        assert!(session.finish_process(job.ticket, Ok(ResultFile::new("image/png", vec![7u8]))));
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.result().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_finish_with_failure() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let job = session.begin_process().unwrap();

        let failure = ProcessingError::ImageResizeFailed("engine gave up".to_string());
        assert!(session.finish_process(job.ticket, Err(failure)));
        assert!(!session.is_processing());
        assert!(session.result().is_none());
        assert_eq!(session.error(), Some("Processing failed: engine gave up"));
    }

    #[test]
    fn test_stale_job_after_reset_is_dropped() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let job = session.begin_process().unwrap();

        session.reset();
        session.select_file(image("b.png")).unwrap();

        assert!(!session.finish_process(job.ticket, Ok(ResultFile::new("image/png", vec![1u8]))));
        assert!(session.result().is_none());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_restart_clears_previous_outcome() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let first = session.begin_process().unwrap();
        session.complete_process(first.ticket, ResultFile::new("image/png", vec![3u8]));
        assert!(session.result().is_some());

        let second = session.begin_process().unwrap();
        assert!(session.result().is_none());
        assert!(session.error().is_none());

        session.fail_process(second.ticket, &ProcessingError::ImageResizeFailed("x".into()));
        assert!(session.error().is_some());

        session.begin_process().unwrap();
        assert!(session.error().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_no_new_job_until_abandoned_job_returns() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        let abandoned = session.begin_process().unwrap();

        session.reset();
        assert!(!session.is_processing());
        assert!(session.is_draining());

        session.select_file(image("b.png")).unwrap();
        assert!(session.begin_process().is_none());
        assert_eq!(session.state(), SessionState::Ready);

        let stale = ResultFile::new("image/png", vec![1u8]);
        assert!(!session.complete_process(abandoned.ticket, stale));
        assert!(!session.is_draining());
        assert!(session.result().is_none());

        let job = session.begin_process().unwrap();
        assert_eq!(job.file.name(), "b.png");
        assert!(session.complete_process(job.ticket, ResultFile::new("image/png", vec![2u8])));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = Session::new();
        session.select_file(image("a.png")).unwrap();
        session.change_target_size(750).unwrap();
        session.begin_process().unwrap();

        session.reset();
        assert_eq!(session, Session::new());
        assert_eq!(session.state(), SessionState::Empty);

        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_apply_routes_intents() {
        let mut session = Session::new();
        assert!(session.apply(Intent::SelectFile(image("a.png"))).unwrap().is_none());
        assert!(session.apply(Intent::ChangeTargetSize(50)).unwrap().is_none());
        let job = session.apply(Intent::StartProcess).unwrap().unwrap();
        assert_eq!(job.target.kilobytes(), 50);
        session.apply(Intent::Reset).unwrap();
        assert_eq!(session.state(), SessionState::Empty);
    }
}
