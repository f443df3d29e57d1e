//! UI state for the medicines front end.
//!
//! All state that a page would otherwise keep in globals lives in [`Presentation`]: the cached
//! list and aggregate, which card is expanded, which modal is open and the status line. Cards
//! and modal targets are referred to by the record's normalised name key.

use api_shared::{AveragePriceRes, Medicine};
use med_types::name_key;

/// The action modal. Only one modal exists and it is either closed or bound to one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Edit {
        target: String,
    },
    DeleteConfirm {
        target: String,
    },
}

impl ModalState {
    pub fn target(&self) -> Option<&str> {
        match self {
            ModalState::Closed => None,
            ModalState::Edit { target } | ModalState::DeleteConfirm { target } => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A request is in flight
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Medicine),
    NotFound,
    EmptyQuery,
}

#[derive(Debug, Clone, Default)]
pub struct Presentation {
    records: Vec<Medicine>,
    aggregate: Option<AveragePriceRes>,
    selection: Option<String>,
    modal: ModalState,
    status: Option<StatusMessage>,
}

fn record_key(record: &Medicine) -> String {
    record.name.as_deref().map(name_key).unwrap_or_default()
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Medicine] {
        &self.records
    }

    pub fn aggregate(&self) -> Option<&AveragePriceRes> {
        self.aggregate.as_ref()
    }

    /// Key of the expanded card, if any.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Finds a cached record by case-insensitive name.
    pub fn find(&self, name: &str) -> Option<&Medicine> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        self.records.iter().find(|r| record_key(r) == key)
    }

    /// Replaces the cached list and aggregate with fresh server state.
    ///
    /// An expanded card or open modal whose record no longer exists is dropped.
    pub fn replace(&mut self, records: Vec<Medicine>, aggregate: AveragePriceRes) {
        self.records = records;
        self.aggregate = Some(aggregate);

        if let Some(key) = self.selection.clone() {
            if self.find(&key).is_none() {
                self.selection = None;
            }
        }
        if let Some(target) = self.modal.target().map(str::to_owned) {
            if self.find(&target).is_none() {
                self.modal = ModalState::Closed;
            }
        }
    }

    /// Expands the card for `name`, collapsing any other expanded card.
    ///
    /// Opening the card that is already expanded collapses it. Returns whether the card is
    /// expanded afterwards. Unknown names leave the state unchanged.
    pub fn toggle_card(&mut self, name: &str) -> bool {
        if self.find(name).is_none() {
            return false;
        }
        let key = name_key(name);
        if self.selection.as_deref() == Some(key.as_str()) {
            self.selection = None;
            false
        } else {
            self.selection = Some(key);
            true
        }
    }

    pub fn is_expanded(&self, record: &Medicine) -> bool {
        self.selection.as_deref() == Some(record_key(record).as_str())
    }

    /// The "Update" control of a card. Returns `false` if `name` is not in the list.
    pub fn open_edit(&mut self, name: &str) -> bool {
        self.open_modal(name, |target| ModalState::Edit { target })
    }

    /// The "Delete" control of a card. Returns `false` if `name` is not in the list.
    pub fn open_delete(&mut self, name: &str) -> bool {
        self.open_modal(name, |target| ModalState::DeleteConfirm { target })
    }

    /// Cancel button, backdrop click, or a successful submit.
    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Case-insensitive prefix search over the cached list. No request is made.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let prefix = name_key(query);
        if prefix.is_empty() {
            return SearchOutcome::EmptyQuery;
        }
        self.records
            .iter()
            .find(|r| record_key(r).starts_with(&prefix))
            .cloned()
            .map(SearchOutcome::Found)
            .unwrap_or(SearchOutcome::NotFound)
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    fn open_modal(&mut self, name: &str, state: impl FnOnce(String) -> ModalState) -> bool {
        let Some(record) = self.find(name) else {
            return false;
        };
        let target = record.name.clone().unwrap_or_default();
        self.modal = state(target);
        true
    }
}
