//! The list of subjects a view shows, and its reaction to bookings.
//!
//! Fetch failures never propagate out of [`SubjectList::load`]: the list
//! degrades to empty and the failure is logged.

use std::sync::{Arc, RwLock};

use catalogue_client::{ApiClient, CatalogueItem, Movie};
use catalogue_core::{SubjectKind, SubmissionError};
use catalogue_signals::{Booked, BookingSignals};

use crate::request::SubjectRef;

/// One book or movie as the list holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    /// The record's server-side ID.
    pub id: i64,
    /// Title of the book or movie.
    pub name: String,
    /// The author of a book or the director of a movie.
    pub creator: Option<String>,
    /// Cover or poster URL.
    pub image: Option<String>,
    /// Booking fee for books, rental fee for movies.
    pub fee: Option<f64>,
    /// Booked books and rented movies cannot be booked again.
    pub is_booked: bool,
    /// Whether this is a book or a movie.
    pub kind: SubjectKind,
}

impl Subject {
    /// The reference a booking dialog is opened with.
    pub fn to_ref(&self) -> SubjectRef {
        SubjectRef {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            fee: self.fee,
            is_booked: self.is_booked,
        }
    }
}

impl From<Movie> for Subject {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            name: movie.name,
            creator: movie.director,
            image: movie.image,
            fee: movie.rental_fee,
            is_booked: movie.is_rented,
            kind: SubjectKind::Movie,
        }
    }
}

impl From<CatalogueItem> for Subject {
    fn from(item: CatalogueItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            creator: item.author,
            image: item.image,
            fee: item.booking_fee,
            is_booked: item.is_booked,
            kind: SubjectKind::Catalogue,
        }
    }
}

/// A list shared between its view and the `booked` receiver.
pub type SharedSubjectList = Arc<RwLock<SubjectList>>;

/// The subjects of one kind, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectList {
    kind: SubjectKind,
    subjects: Vec<Subject>,
}

impl SubjectList {
    /// A list holding `subjects`, which must all be of `kind`.
    pub const fn new(kind: SubjectKind, subjects: Vec<Subject>) -> Self {
        Self { kind, subjects }
    }

    /// A list with nothing in it, as shown after a failed load.
    pub const fn empty(kind: SubjectKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Fetches `GET /movies` or `GET /catalogue`.
    ///
    /// Any failure yields an empty list.
    pub async fn load(client: &ApiClient, kind: SubjectKind) -> Self {
        match Self::fetch(client, kind).await {
            Ok(subjects) => {
                tracing::debug!(%kind, count = subjects.len(), "Loaded subjects");
                Self::new(kind, subjects)
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Failed to load subjects, showing none");
                Self::empty(kind)
            }
        }
    }

    async fn fetch(client: &ApiClient, kind: SubjectKind) -> Result<Vec<Subject>, SubmissionError> {
        Ok(match kind {
            SubjectKind::Movie => client.movies().await?.into_iter().map(Subject::from).collect(),
            SubjectKind::Catalogue => client
                .catalogue()
                .await?
                .into_iter()
                .map(Subject::from)
                .collect(),
        })
    }

    /// The kind of subject this list holds.
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// All subjects, in server order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Looks a subject up by ID.
    pub fn get(&self, id: i64) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Number of subjects shown.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the list shows nothing.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Subjects whose name contains `term`, ignoring case.
    pub fn matching<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Subject> + 'a {
        let term = term.to_lowercase();
        self.subjects
            .iter()
            .filter(move |s| s.name.to_lowercase().contains(&term))
    }

    /// Flags a subject as booked. Returns `false` if it is not in the list.
    pub fn mark_booked(&mut self, id: i64) -> bool {
        match self.subjects.iter_mut().find(|s| s.id == id) {
            Some(subject) => {
                subject.is_booked = true;
                true
            }
            None => false,
        }
    }

    /// Drops a subject from the list. Returns `false` if it was not there.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id != id);
        self.subjects.len() < before
    }

    /// Shares the list and connects it to `signals.booked`, so that a
    /// successful booking of one of its subjects flags it without a
    /// re-fetch. Bookings of the other kind are ignored.
    ///
    /// Connecting a second list of the same kind replaces the first.
    pub fn connect_booked(self, signals: &BookingSignals) -> SharedSubjectList {
        let kind = self.kind;
        let shared = Arc::new(RwLock::new(self));
        let weak = Arc::downgrade(&shared);
        signals.booked.connect(
            format!("subject_list:{kind}"),
            Arc::new(move |event: &Booked| {
                if event.kind != kind {
                    return;
                }
                if let Some(list) = weak.upgrade() {
                    list.write()
                        .expect("subject list lock poisoned")
                        .mark_booked(event.subject_id);
                }
            }),
        );
        shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, name: &str) -> Subject {
        Subject {
            id,
            name: name.to_string(),
            creator: None,
            image: None,
            fee: Some(500.0),
            is_booked: false,
            kind: SubjectKind::Movie,
        }
    }

    fn movies() -> SubjectList {
        SubjectList::new(
            SubjectKind::Movie,
            vec![movie(7, "Dune"), movie(8, "Dune: Part Two"), movie(9, "Alien")],
        )
    }

    #[test]
    fn test_mark_booked_and_remove() {
        let mut list = movies();
        assert!(list.mark_booked(7));
        assert!(list.get(7).unwrap().is_booked);
        assert!(!list.get(8).unwrap().is_booked);
        assert!(!list.mark_booked(99));

        assert!(list.remove(9));
        assert!(!list.remove(9));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_matching() {
        let list = movies();
        let names: Vec<_> = list.matching("dUNE").map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Dune", "Dune: Part Two"]);
        assert_eq!(list.matching("").count(), 3);
    }

    #[test]
    fn test_to_ref_carries_booking_flag() {
        let mut list = movies();
        list.mark_booked(7);
        let r = list.get(7).unwrap().to_ref();
        assert!(r.is_booked);
        assert_eq!(r.fee, Some(500.0));
    }

    #[test]
    fn test_connect_booked_filters_kind() {
        let signals = BookingSignals::new();
        let shared = movies().connect_booked(&signals);

        signals.booked.send(&Booked {
            subject_id: 8,
            kind: SubjectKind::Catalogue,
        });
        assert!(!shared.read().unwrap().get(8).unwrap().is_booked);

        signals.booked.send(&Booked {
            subject_id: 8,
            kind: SubjectKind::Movie,
        });
        assert!(shared.read().unwrap().get(8).unwrap().is_booked);
    }

    #[test]
    fn test_dropped_list_ignores_events() {
        let signals = BookingSignals::new();
        drop(movies().connect_booked(&signals));
        assert_eq!(
            signals.booked.send(&Booked {
                subject_id: 7,
                kind: SubjectKind::Movie,
            }),
            1
        );
    }

    #[test]
    fn test_movie_record_conversion() {
        let subject = Subject::from(Movie {
            id: 3,
            name: "Alien".into(),
            description: None,
            image: Some("https://img.example.com/alien.png".into()),
            director: Some("Scott".into()),
            genre_id: Some(1),
            release_date: None,
            rental_fee: Some(250.0),
            is_rented: true,
        });
        assert_eq!(subject.creator.as_deref(), Some("Scott"));
        assert!(subject.is_booked);
        assert_eq!(subject.kind, SubjectKind::Movie);
    }
}
