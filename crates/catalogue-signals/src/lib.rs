//! # catalogue-signals
//!
//! A typed signal dispatcher. Booking dialogs use it to tell the list that
//! owns a subject that the subject was booked, without either side holding a
//! reference to the other.
//!
//! Signals are plain values handed to the components that send or listen on
//! them; there is no global registry.
//!
//! ## Usage
//!
//! ```
//! use catalogue_core::SubjectKind;
//! use catalogue_signals::{Booked, Signal};
//! use std::sync::Arc;
//!
//! let booked: Signal<Booked> = Signal::new();
//!
//! booked.connect("list", Arc::new(|event: &Booked| {
//!     println!("subject {} booked", event.subject_id);
//! }));
//!
//! let notified = booked.send(&Booked { subject_id: 7, kind: SubjectKind::Movie });
//! assert_eq!(notified, 1);
//! ```

use std::sync::{Arc, RwLock};

use catalogue_core::SubjectKind;

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that a signal can be shared between the
/// task running a dialog and the task owning the list.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Receivers are called in the order they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_count())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same ID is already connected, it is replaced.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// The receiver list is snapshotted first, so a receiver may connect or
    /// disconnect others without deadlocking. Returns how many receivers ran.
    pub fn send(&self, payload: &T) -> usize {
        let receivers: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in &receivers {
            callback(payload);
        }
        receivers.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }
}

// ── Booking signal payloads ──────────────────────────────────────────

/// Sent when a booking for a subject succeeds.
///
/// The list owning the subject marks it booked without re-fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booked {
    /// The booked subject's ID.
    pub subject_id: i64,
    /// Whether the subject is a book or a movie.
    pub kind: SubjectKind,
}

/// The signals a booking workflow emits.
///
/// Create one per list view and hand an `Arc` of it to every dialog the view
/// opens.
#[derive(Debug, Default)]
pub struct BookingSignals {
    /// Fired after a booking succeeds.
    pub booked: Signal<Booked>,
}

impl BookingSignals {
    /// Creates a set of signals with no receivers.
    pub fn new() -> Self {
        Self::default()
    }
}
