//! Booking submission: one validated request, one backend call.

use std::sync::Arc;

use async_trait::async_trait;

use catalogue_client::{ApiClient, BookingConfirmation, BookingPayload};
use catalogue_core::SubmissionError;
use catalogue_forms::FormState;

use crate::request::{BookingRequest, SubjectRef};

/// Where bookings are sent.
///
/// [`ApiClient`] is the production backend. Tests substitute a scripted one.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Issues exactly one booking request.
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, SubmissionError>;
}

#[async_trait]
impl BookingBackend for ApiClient {
    async fn book(&self, payload: &BookingPayload) -> Result<BookingConfirmation, SubmissionError> {
        Self::book(self, payload).await
    }
}

/// Turns booking form state into a request and sends it.
///
/// Failures are never retried: the backend has no idempotency key, so a
/// second attempt could book the subject twice.
#[derive(Clone)]
pub struct BookingSubmitter {
    backend: Arc<dyn BookingBackend>,
}

impl std::fmt::Debug for BookingSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSubmitter").finish_non_exhaustive()
    }
}

impl BookingSubmitter {
    /// A submitter that sends through `backend`.
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self { backend }
    }

    /// Builds a [`BookingRequest`] from `state` and submits it.
    ///
    /// The caller must have run whole-form validation first. State that
    /// still breaks a request invariant is reported as a `DecodeError`
    /// without contacting the backend.
    pub async fn submit(
        &self,
        subject: &SubjectRef,
        state: &FormState,
    ) -> Result<BookingConfirmation, SubmissionError> {
        let request = BookingRequest::from_form(subject.clone(), state)?;
        self.submit_request(&request).await
    }

    /// Submits an already-built request.
    pub async fn submit_request(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, SubmissionError> {
        let payload = request.to_payload();
        tracing::info!(
            subject_id = request.subject.id,
            kind = %request.subject.kind,
            from = %request.from,
            to = %request.to,
            "Submitting booking"
        );

        let result = self.backend.book(&payload).await;
        match &result {
            Ok(_) => tracing::info!(subject_id = request.subject.id, "Booking confirmed"),
            Err(e) => tracing::warn!(subject_id = request.subject.id, error = %e, "Booking failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use catalogue_core::SubjectKind;
    use catalogue_forms::presets::{booking, booking_schema};

    struct Scripted {
        calls: AtomicUsize,
        reply: Result<BookingConfirmation, SubmissionError>,
    }

    #[async_trait]
    impl BookingBackend for Scripted {
        async fn book(
            &self,
            _payload: &BookingPayload,
        ) -> Result<BookingConfirmation, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn state(phone: &str) -> FormState {
        FormState::with_defaults(
            &booking_schema(),
            [
                (booking::NAME, "Jane"),
                (booking::PHONE, phone),
                (booking::FROM, "2024-01-01"),
                (booking::TO, "2024-01-05"),
            ],
        )
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let backend = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            reply: Err(SubmissionError::NetworkError("connection reset".into())),
        });
        let submitter = BookingSubmitter::new(backend.clone());
        let subject = SubjectRef::new(7, "Dune", SubjectKind::Movie);

        let err = submitter.submit(&subject, &state("0700000000")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::NetworkError(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_state_never_reaches_backend() {
        let backend = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            reply: Ok(BookingConfirmation(serde_json::json!({}))),
        });
        let submitter = BookingSubmitter::new(backend.clone());
        let subject = SubjectRef::new(7, "Dune", SubjectKind::Movie);

        let err = submitter.submit(&subject, &state("123")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::DecodeError(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
