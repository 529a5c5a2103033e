//! # catalogue-booking
//!
//! The booking workflow of the catalogue front end, plus the list and
//! add/edit views that surround it.
//!
//! ## Modules
//!
//! - [`request`] - [`SubjectRef`] and the typed [`BookingRequest`]
//! - [`submitter`] - [`BookingBackend`] and [`BookingSubmitter`]
//! - [`dialog`] - [`BookingDialogController`], the dialog state machine
//! - [`listing`] - [`SubjectList`], which reacts to `booked` notifications
//! - [`editor`] - [`SubjectEditor`] for the add-book, add-movie, and
//!   edit-movie forms

pub mod dialog;
pub mod editor;
pub mod listing;
pub mod request;
pub mod submitter;

pub use dialog::{
    BookingDialogController, ConfirmOutcome, DialogError, DialogState, PendingBooking,
    SubmissionState,
};
pub use editor::{EditorError, EditorMode, SubjectEditor};
pub use listing::{SharedSubjectList, Subject, SubjectList};
pub use request::{BookingRequest, RequestError, SubjectRef};
pub use submitter::{BookingBackend, BookingSubmitter};
