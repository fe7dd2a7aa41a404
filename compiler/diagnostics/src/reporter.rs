//! The diagnostic reporter.

use super::UntaggedDiag;
use span::SourceMap;
use std::{
    collections::BTreeSet,
    mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, RwLock, RwLockReadGuard,
    },
};
use utility::pluralize;

/// A diagnostic reporter.
pub struct Reporter {
    kind: ReporterKind,
    map: Option<Arc<RwLock<SourceMap>>>,
}

impl Reporter {
    fn new(kind: ReporterKind) -> Self {
        Self { kind, map: None }
    }

    pub fn silent() -> Self {
        Self::new(ReporterKind::Silent)
    }

    pub fn buffer(diagnostics: Buffer) -> Self {
        Self::new(ReporterKind::Buffer(diagnostics))
    }

    pub fn stderr() -> Self {
        Self::new(ReporterKind::Stderr)
    }

    pub fn buffered_stderr(reported_any_errors: Arc<AtomicBool>) -> Self {
        Self::new(ReporterKind::BufferedStderr(StderrBuffer {
            errors: Mutex::new(BTreeSet::new()),
            warnings: Mutex::new(BTreeSet::new()),
            reported_any_errors,
        }))
    }

    #[must_use]
    pub fn with_map(mut self, map: Arc<RwLock<SourceMap>>) -> Self {
        self.map = Some(map);
        self
    }

    fn map(&self) -> Option<RwLockReadGuard<'_, SourceMap>> {
        self.map.as_ref().map(|map| map.read().unwrap())
    }

    pub(super) fn report(&self, diagnostic: UntaggedDiag) {
        match &self.kind {
            ReporterKind::Silent => {}
            ReporterKind::Buffer(diagnostics) => {
                diagnostics.lock().unwrap().insert(diagnostic);
            }
            ReporterKind::Stderr => stderr_print(&diagnostic.format(self.map().as_deref())),
            ReporterKind::BufferedStderr(buffer) => {
                if diagnostic.severity.is_fatal() {
                    buffer.errors.lock().unwrap().insert(diagnostic);
                } else {
                    buffer.warnings.lock().unwrap().insert(diagnostic);
                }
            }
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if let ReporterKind::BufferedStderr(buffer) = &self.kind {
            buffer.flush(self.map().as_deref());
        }
    }
}

enum ReporterKind {
    Silent,
    Buffer(Buffer),
    Stderr,
    BufferedStderr(StderrBuffer),
}

pub type Buffer = Arc<Mutex<BTreeSet<UntaggedDiag>>>;

struct StderrBuffer {
    errors: Mutex<BTreeSet<UntaggedDiag>>,
    warnings: Mutex<BTreeSet<UntaggedDiag>>,
    reported_any_errors: Arc<AtomicBool>,
}

impl StderrBuffer {
    fn flush(&self, map: Option<&SourceMap>) {
        let warnings = mem::take(&mut *self.warnings.lock().unwrap());

        for warning in &warnings {
            stderr_print(&warning.format(map));
        }

        if !warnings.is_empty() {
            Self::report_warning_summary(&warnings, map);
        }

        let errors = mem::take(&mut *self.errors.lock().unwrap());

        for error in &errors {
            stderr_print(&error.format(map));
        }

        if !errors.is_empty() {
            self.reported_any_errors.store(true, Ordering::SeqCst);
            Self::report_error_summary(errors.len(), map);
        }
    }

    fn report_error_summary(amount: usize, map: Option<&SourceMap>) {
        let summary = super::Diag::error()
            .message(pluralize!(
                amount,
                "aborting due to previous error",
                format!("aborting due to {amount} previous errors"),
            ))
            .0
            .format(map);

        stderr_print(&summary);
    }

    fn report_warning_summary(warnings: &BTreeSet<UntaggedDiag>, map: Option<&SourceMap>) {
        let summary = super::Diag::warning()
            .message(format!(
                "emitted {} {}",
                warnings.len(),
                pluralize!(warnings.len(), "warning")
            ))
            .0
            .format(map);

        stderr_print(&summary);
    }
}

fn stderr_print(message: &impl std::fmt::Display) {
    eprintln!("{message}");
    eprintln!();
}

/// A witness to / token for a [reported](super::Diag::report) error.
///
/// A value of this type is a proof that an error was reported (neglecting
/// buffering). Using this as an error type instead of let's say `()` makes
/// it a bit harder to accidentally return an error without reporting
/// anything since such a witness is only constructed by
/// [`super::Diag::report`] or by [`Self::new_unchecked`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErasedReportedError(());

impl ErasedReportedError {
    pub const fn new_unchecked() -> Self {
        Self(())
    }
}

#[cfg(test)]
mod test {
    use super::{Buffer, Reporter};
    use crate::Diag;
    use span::span;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use utility::default;

    #[test]
    fn buffered_diagnostics_are_ordered_by_source_location() {
        let buffer: Buffer = default();
        let rep = Reporter::buffer(buffer.clone());

        let _ = Diag::error()
            .message("later")
            .primary_span(span(10, 12))
            .report(&rep);
        let _ = Diag::error()
            .message("earlier")
            .primary_span(span(1, 3))
            .report(&rep);
        Diag::warning().message("unlocated").emit(&rep);

        let messages: Vec<_> = buffer
            .lock()
            .unwrap()
            .iter()
            .map(|diagnostic| diagnostic.message.clone().unwrap())
            .collect();
        assert_eq!(messages, ["unlocated", "earlier", "later"]);
    }

    #[test]
    fn flushing_records_reported_errors() {
        let reported_any_errors: Arc<AtomicBool> = default();
        let rep = Reporter::buffered_stderr(reported_any_errors.clone());

        let _ = Diag::error().message("boom").report(&rep);
        assert!(!reported_any_errors.load(Ordering::SeqCst));

        drop(rep);
        assert!(reported_any_errors.load(Ordering::SeqCst));
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let reported_any_errors: Arc<AtomicBool> = default();
        let rep = Reporter::buffered_stderr(reported_any_errors.clone());

        Diag::warning().message("just saying").emit(&rep);
        drop(rep);

        assert!(!reported_any_errors.load(Ordering::SeqCst));
    }
}
