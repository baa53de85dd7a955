use domain::{AnalysisResult, ListId, ListItem, ShoppingList};

use crate::use_cases::SuggestionOutcome;
use crate::ApplicationError;

/// Everything a view renders, published as one value on every change
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Lists of the signed-in user, oldest first
    pub lists: Vec<ShoppingList>,
    pub active_list: Option<ListId>,
    /// Items of the active list, replaced by every snapshot
    pub items: Vec<ListItem>,
    /// Suggestions dropped by the last batch because the list had them
    pub ignored_duplicates: Vec<String>,
    /// Last preview from [`super::ListSession::suggest`]
    pub suggestion_preview: Option<SuggestionOutcome>,
    pub analysis: Option<AnalysisResult>,
    pub assistant_busy: bool,
    pub last_error: Option<ApplicationError>,
}

impl SessionState {
    pub fn active(&self) -> Option<&ShoppingList> {
        let id = self.active_list.as_ref()?;
        self.lists.iter().find(|list| list.id() == id)
    }

    pub fn item(&self, id: &domain::ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_done()).count()
    }

    /// Reset everything tied to the active list
    pub(crate) fn clear_list_view(&mut self) {
        self.items.clear();
        self.ignored_duplicates.clear();
        self.suggestion_preview = None;
        self.analysis = None;
    }
}
