//! Stateful wrappers over [`HiringBackend`](crate::client::HiringBackend), one per collection.
//!
//! Every action flips `loading`, clears the previous error, runs the call and folds the response
//! into the local list. Failures are logged, kept as the display string in `error`, and handed
//! back to the caller.

mod applications;
mod interviews;
mod offers;
mod onboarding;
mod positions;
mod templates;
mod users;

pub use applications::ApplicationsStore;
pub use interviews::InterviewsStore;
pub use offers::OffersStore;
pub use onboarding::OnboardingStore;
pub use positions::PositionsStore;
pub use templates::OfferTemplatesStore;
pub use users::UsersStore;

use crate::client::{ApiError, ListResponse};
use crate::hiring::applications::{Application, Pagination};
use crate::hiring::interviews::Interview;
use crate::hiring::offers::{Offer, OfferTemplate};
use crate::hiring::positions::Position;
use crate::onboarding::OnboardingCandidate;

/// Records a store can replace or remove by identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! keyed {
    ($($ty:ty),*) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

keyed!(Application, Position, Interview, Offer, OfferTemplate, OnboardingCandidate);

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Option<Pagination>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: None,
        }
    }
}

impl<T> StoreState<T> {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Ends the action started by [`Self::begin`], recording a failure if there was one.
    pub(crate) fn finish<R>(
        &mut self,
        action: &str,
        result: Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        self.loading = false;
        if let Err(error) = &result {
            tracing::error!(action, error = %error, "hiring api call failed");
            self.error = Some(error.to_string());
        }
        result
    }

    /// A failed fetch leaves an empty list behind.
    pub(crate) fn load(
        &mut self,
        action: &str,
        result: Result<ListResponse<T>, ApiError>,
    ) -> Result<(), ApiError> {
        match self.finish(action, result) {
            Ok(response) => {
                let (items, pagination) = response.into_parts();
                self.items = items;
                self.pagination = pagination;
                Ok(())
            }
            Err(error) => {
                self.items.clear();
                self.pagination = None;
                Err(error)
            }
        }
    }

    pub(crate) fn replace_items(
        &mut self,
        action: &str,
        result: Result<Vec<T>, ApiError>,
    ) -> Result<(), ApiError> {
        self.load(action, result.map(ListResponse::Items))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Keyed + Clone> StoreState<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    pub(crate) fn append(&mut self, item: &T) {
        self.items.push(item.clone());
    }

    /// Swaps in the server's copy; unknown ids are appended.
    pub(crate) fn upsert(&mut self, item: &T) {
        match self.items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => *existing = item.clone(),
            None => self.items.push(item.clone()),
        }
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.key() != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: &'static str,
    }

    keyed!(Row);

    fn row(id: &str, label: &'static str) -> Row {
        Row {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn upsert_replaces_by_id_and_appends_unknown() {
        let mut state = StoreState::default();
        state.append(&row("a", "first"));
        state.upsert(&row("a", "second"));
        state.upsert(&row("b", "third"));
        assert_eq!(state.items, vec![row("a", "second"), row("b", "third")]);
        state.remove("a");
        assert_eq!(state.get("b").map(|row| row.label), Some("third"));
        assert!(state.get("a").is_none());
    }

    #[test]
    fn failed_load_clears_items_and_records_message() {
        let mut state = StoreState::default();
        state.append(&row("a", "stale"));
        state.begin();
        assert!(state.loading);
        let result = state.load(
            "fetch rows",
            Err(ApiError::from_response(500, r#"{"detail":"Server exploded"}"#)),
        );
        assert!(result.is_err());
        assert!(!state.loading);
        assert!(state.is_empty());
        assert_eq!(state.error.as_deref(), Some("Server exploded"));
    }

    #[test]
    fn begin_clears_the_previous_error() {
        let mut state: StoreState<Row> = StoreState {
            error: Some("old".to_string()),
            ..StoreState::default()
        };
        state.begin();
        assert_eq!(state.error, None);
    }
}
