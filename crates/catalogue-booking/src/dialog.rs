//! The booking dialog: open, edit, confirm, and close one booking.
//!
//! ```text
//! Closed -> Open(Idle) -> Open(Submitting) -> Closed            (success)
//!                                          -> Open(Failed) -> Open(Idle) on edit
//! ```
//!
//! The controller owns the form for exactly one dialog session. Closing it
//! discards the form. A submission result that arrives after the session it
//! belongs to has ended is dropped, using a generation counter bumped on
//! every open and close.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;

use catalogue_client::BookingConfirmation;
use catalogue_core::logging::dialog_span;
use catalogue_core::{FieldError, SubmissionError};
use catalogue_forms::presets::{booking, booking_schema};
use catalogue_forms::{BoundForm, DateOrderCheck, ValidationSchema};
use catalogue_signals::{Booked, BookingSignals};

use crate::request::{BookingRequest, SubjectRef};
use crate::submitter::BookingSubmitter;

/// Where an open dialog is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Waiting for the user to edit or confirm.
    Idle,
    /// A request is in flight; edits, close, and confirm are refused.
    Submitting,
    /// The booking went through. The dialog closes straight after.
    Succeeded,
    /// The last attempt failed. Values are kept for a retry.
    Failed(String),
}

/// Whether the dialog is showing, and if so its submission state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// Not showing; no form exists.
    Closed,
    /// Showing a form for one subject.
    Open(SubmissionState),
}

/// An operation the dialog refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The dialog is closed.
    #[error("The booking dialog is not open")]
    NotOpen,

    /// A submission is in flight.
    #[error("A booking is already being submitted")]
    SubmissionInFlight,

    /// The form failed validation. Errors are keyed by field name.
    #[error("The booking form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, FieldError>),

    /// The named field is not part of the booking form.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// What [`BookingDialogController::confirm`] or
/// [`BookingDialogController::complete`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Validation failed; nothing was sent.
    Invalid(BTreeMap<String, FieldError>),
    /// The booking succeeded and the dialog closed.
    Booked(BookingConfirmation),
    /// The submission failed and the dialog stays open.
    Failed(SubmissionError),
    /// The result belonged to a dialog session that has since ended.
    Discarded,
}

/// A submission handed out by [`BookingDialogController::begin_confirm`].
///
/// Run it with [`send`](Self::send), on any task, and hand the result back
/// through [`BookingDialogController::complete`].
#[derive(Debug)]
pub struct PendingBooking {
    generation: u64,
    request: BookingRequest,
    submitter: BookingSubmitter,
    span: tracing::Span,
}

impl PendingBooking {
    /// The request that will be sent.
    pub const fn request(&self) -> &BookingRequest {
        &self.request
    }

    /// Performs the single backend call for this booking.
    pub async fn send(&self) -> Result<BookingConfirmation, SubmissionError> {
        self.submitter
            .submit_request(&self.request)
            .instrument(self.span.clone())
            .await
    }
}

/// Composes the booking form, the submitter, and the `booked` notification
/// into one dialog workflow.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use catalogue_booking::{BookingDialogController, BookingSubmitter, SubjectRef};
/// use catalogue_client::ApiClient;
/// use catalogue_core::SubjectKind;
/// use catalogue_signals::BookingSignals;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Arc::new(ApiClient::new("http://localhost:3000")?);
///     let signals = Arc::new(BookingSignals::new());
///     let mut dialog = BookingDialogController::new(BookingSubmitter::new(client), signals);
///
///     dialog.open(SubjectRef::new(7, "Dune", SubjectKind::Movie));
///     dialog.set_field("name", "Jane")?;
///     dialog.set_field("phone", "0700000000")?;
///     dialog.set_field("from", "2024-01-01")?;
///     dialog.set_field("to", "2024-01-05")?;
///     let outcome = dialog.confirm().await?;
///     println!("{outcome:?}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BookingDialogController {
    submitter: BookingSubmitter,
    signals: Arc<BookingSignals>,
    schema: Arc<ValidationSchema>,
    subject: Option<SubjectRef>,
    form: Option<BoundForm>,
    state: DialogState,
    generation: u64,
    span: tracing::Span,
}

impl BookingDialogController {
    /// Creates a closed dialog that books through `submitter` and announces
    /// bookings on `signals`.
    pub fn new(submitter: BookingSubmitter, signals: Arc<BookingSignals>) -> Self {
        Self {
            submitter,
            signals,
            schema: Arc::new(booking_schema()),
            subject: None,
            form: None,
            state: DialogState::Closed,
            generation: 0,
            span: tracing::Span::none(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The current dialog state.
    pub const fn state(&self) -> &DialogState {
        &self.state
    }

    /// Whether the dialog is showing.
    pub const fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    /// The subject of the open dialog.
    pub const fn subject(&self) -> Option<&SubjectRef> {
        self.subject.as_ref()
    }

    /// The booking form of the open dialog.
    pub const fn form(&self) -> Option<&BoundForm> {
        self.form.as_ref()
    }

    /// A field's current value, or `None` when closed.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.form.as_ref()?.value(name)
    }

    /// The message for a field's current error.
    pub fn message(&self, name: &str) -> Option<String> {
        self.form.as_ref()?.message(name)
    }

    /// Current per-field errors.
    pub fn errors(&self) -> BTreeMap<String, FieldError> {
        self.form.as_ref().map(BoundForm::errors).unwrap_or_default()
    }

    /// The reason the last submission failed, while the dialog shows it.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open(SubmissionState::Failed(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Bumped on every open and close.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Opens the dialog for `subject` with an empty form.
    ///
    /// Does nothing, and returns `false`, if the subject is already booked
    /// or a dialog session is already open.
    pub fn open(&mut self, subject: SubjectRef) -> bool {
        if subject.is_booked {
            tracing::debug!(subject_id = subject.id, "Refusing to open dialog for booked subject");
            return false;
        }
        if self.is_open() {
            tracing::debug!(subject_id = subject.id, "Dialog already open");
            return false;
        }

        self.generation += 1;
        self.span = dialog_span(subject.id);
        let _enter = self.span.enter();
        tracing::info!(subject = %subject.name, kind = %subject.kind, "Booking dialog opened");

        let form = BoundForm::new(Arc::clone(&self.schema))
            .with_cleaner(Arc::new(DateOrderCheck::new(booking::FROM, booking::TO)));
        self.form = Some(form);
        self.subject = Some(subject);
        self.state = DialogState::Open(SubmissionState::Idle);
        true
    }

    /// Closes the dialog and discards the form.
    ///
    /// Refused while a submission is in flight. Closing a closed dialog is
    /// a no-op.
    pub fn close(&mut self) -> Result<(), DialogError> {
        match self.state {
            DialogState::Closed => Ok(()),
            DialogState::Open(SubmissionState::Submitting) => Err(DialogError::SubmissionInFlight),
            DialogState::Open(_) => {
                self.end_session("closed");
                Ok(())
            }
        }
    }

    /// Tears the dialog down unconditionally, e.g. when the view that owns
    /// it goes away. An in-flight submission still runs to completion, but
    /// its result will be [`Discarded`](ConfirmOutcome::Discarded).
    pub fn dismiss(&mut self) {
        if self.is_open() {
            self.end_session("dismissed");
        }
    }

    /// Edits one field and re-validates it.
    ///
    /// Returns whether the new value is valid. An edit after a failed
    /// submission returns the dialog to `Idle`.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<bool, DialogError> {
        match self.state {
            DialogState::Closed => return Err(DialogError::NotOpen),
            DialogState::Open(SubmissionState::Submitting) => {
                return Err(DialogError::SubmissionInFlight)
            }
            DialogState::Open(_) => {}
        }
        let form = self.form.as_mut().ok_or(DialogError::NotOpen)?;
        let valid = form.set(name, value)?;
        if matches!(self.state, DialogState::Open(SubmissionState::Failed(_))) {
            self.state = DialogState::Open(SubmissionState::Idle);
        }
        Ok(valid)
    }

    /// Validates the whole form and, if it passes, moves to `Submitting`.
    ///
    /// On invalid input the dialog stays `Open(Idle)` and the per-field
    /// errors are returned in [`DialogError::Invalid`]. No request is made.
    pub fn begin_confirm(&mut self) -> Result<PendingBooking, DialogError> {
        match self.state {
            DialogState::Closed => return Err(DialogError::NotOpen),
            DialogState::Open(SubmissionState::Submitting) => {
                return Err(DialogError::SubmissionInFlight)
            }
            DialogState::Open(_) => {}
        }
        let _enter = self.span.enter();
        let (Some(form), Some(subject)) = (self.form.as_mut(), self.subject.as_ref()) else {
            return Err(DialogError::NotOpen);
        };

        if !form.validate_all() {
            let errors = form.errors();
            tracing::debug!(invalid = errors.len(), "Booking form invalid");
            self.state = DialogState::Open(SubmissionState::Idle);
            return Err(DialogError::Invalid(errors));
        }

        let request = match BookingRequest::from_form(subject.clone(), form.state()) {
            Ok(request) => request,
            Err(e) => {
                let flagged = form.add_error(&e.field, e.error.clone());
                debug_assert!(flagged.is_ok(), "booking form has no `{}` field", e.field);
                self.state = DialogState::Open(SubmissionState::Idle);
                return Err(DialogError::Invalid(BTreeMap::from([(e.field, e.error)])));
            }
        };

        self.state = DialogState::Open(SubmissionState::Submitting);
        Ok(PendingBooking {
            generation: self.generation,
            request,
            submitter: self.submitter.clone(),
            span: self.span.clone(),
        })
    }

    /// Applies the result of a [`PendingBooking`].
    ///
    /// On success the dialog closes and `booked` is sent. On failure it
    /// moves to `Open(Failed)` with the form intact. A result from an
    /// earlier session changes nothing.
    pub fn complete(
        &mut self,
        pending: PendingBooking,
        result: Result<BookingConfirmation, SubmissionError>,
    ) -> ConfirmOutcome {
        if pending.generation != self.generation
            || self.state != DialogState::Open(SubmissionState::Submitting)
        {
            tracing::debug!(
                subject_id = pending.request.subject.id,
                "Discarding result for a dialog that has since closed"
            );
            return ConfirmOutcome::Discarded;
        }
        let span = self.span.clone();
        let _enter = span.enter();

        match result {
            Ok(confirmation) => {
                self.state = DialogState::Open(SubmissionState::Succeeded);
                let subject = &pending.request.subject;
                let event = Booked {
                    subject_id: subject.id,
                    kind: subject.kind,
                };
                self.end_session("booked");
                let notified = self.signals.booked.send(&event);
                tracing::info!(subject_id = event.subject_id, notified, "Subject booked");
                ConfirmOutcome::Booked(confirmation)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Booking submission failed");
                self.state = DialogState::Open(SubmissionState::Failed(e.to_string()));
                ConfirmOutcome::Failed(e)
            }
        }
    }

    /// Validates, submits, and applies the result in one step.
    pub async fn confirm(&mut self) -> Result<ConfirmOutcome, DialogError> {
        let pending = match self.begin_confirm() {
            Ok(pending) => pending,
            Err(DialogError::Invalid(errors)) => return Ok(ConfirmOutcome::Invalid(errors)),
            Err(e) => return Err(e),
        };
        let result = pending.send().await;
        Ok(self.complete(pending, result))
    }

    fn end_session(&mut self, reason: &str) {
        {
            let _enter = self.span.enter();
            tracing::info!(reason, "Booking dialog closed");
        }
        self.form = None;
        self.subject = None;
        self.state = DialogState::Closed;
        self.generation += 1;
        self.span = tracing::Span::none();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalogue_client::BookingPayload;
    use catalogue_core::SubjectKind;

    use crate::submitter::BookingBackend;

    struct AlwaysOk;

    #[async_trait]
    impl BookingBackend for AlwaysOk {
        async fn book(
            &self,
            _payload: &BookingPayload,
        ) -> Result<BookingConfirmation, SubmissionError> {
            Ok(BookingConfirmation(serde_json::json!({"ok": true})))
        }
    }

    fn dialog() -> BookingDialogController {
        BookingDialogController::new(
            BookingSubmitter::new(Arc::new(AlwaysOk)),
            Arc::new(BookingSignals::new()),
        )
    }

    fn fill(d: &mut BookingDialogController) {
        d.set_field(booking::NAME, "Jane").unwrap();
        d.set_field(booking::PHONE, "0700000000").unwrap();
        d.set_field(booking::FROM, "2024-01-01").unwrap();
        d.set_field(booking::TO, "2024-01-05").unwrap();
    }

    #[test]
    fn test_closed_dialog_refuses_edits() {
        let mut d = dialog();
        assert_eq!(d.set_field("name", "Jane"), Err(DialogError::NotOpen));
        assert_eq!(d.begin_confirm().unwrap_err(), DialogError::NotOpen);
        assert!(d.close().is_ok());
    }

    #[test]
    fn test_open_twice_is_noop() {
        let mut d = dialog();
        assert!(d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie)));
        d.set_field(booking::NAME, "Jane").unwrap();
        let generation = d.generation();
        assert!(!d.open(SubjectRef::new(2, "Alien", SubjectKind::Movie)));
        assert_eq!(d.subject().unwrap().id, 1);
        assert_eq!(d.value(booking::NAME), Some("Jane"));
        assert_eq!(d.generation(), generation);
    }

    #[test]
    fn test_open_resets_form() {
        let mut d = dialog();
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        fill(&mut d);
        d.close().unwrap();
        assert!(d.form().is_none());
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        assert_eq!(d.value(booking::NAME), Some(""));
        assert_eq!(d.value(booking::PHONE), Some(""));
    }

    #[test]
    fn test_unknown_field() {
        let mut d = dialog();
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        assert_eq!(
            d.set_field("email", "x"),
            Err(DialogError::Field(FieldError::UnknownField("email".into())))
        );
    }

    #[test]
    fn test_submitting_blocks_everything() {
        let mut d = dialog();
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        fill(&mut d);
        let _pending = d.begin_confirm().unwrap();
        assert_eq!(d.state(), &DialogState::Open(SubmissionState::Submitting));
        assert_eq!(d.close(), Err(DialogError::SubmissionInFlight));
        assert_eq!(
            d.set_field(booking::NAME, "Joe"),
            Err(DialogError::SubmissionInFlight)
        );
        assert_eq!(
            d.begin_confirm().unwrap_err(),
            DialogError::SubmissionInFlight
        );
    }

    #[test]
    fn test_reversed_dates_are_invalid() {
        let mut d = dialog();
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        fill(&mut d);
        d.set_field(booking::FROM, "2024-02-01").unwrap();
        let Err(DialogError::Invalid(errors)) = d.begin_confirm() else {
            panic!("expected invalid form");
        };
        assert_eq!(errors.get(booking::TO), Some(&FieldError::InvalidDateRange));
        assert_eq!(
            d.errors().get(booking::TO),
            Some(&FieldError::InvalidDateRange)
        );
        assert!(d.message(booking::TO).is_some());
        assert_eq!(d.state(), &DialogState::Open(SubmissionState::Idle));
    }

    #[tokio::test]
    async fn test_confirm_success_closes() {
        let mut d = dialog();
        d.open(SubjectRef::new(1, "Dune", SubjectKind::Movie));
        fill(&mut d);
        let outcome = d.confirm().await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Booked(_)));
        assert_eq!(d.state(), &DialogState::Closed);
        assert!(d.subject().is_none());
    }
}
