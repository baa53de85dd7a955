//! Shopping list orchestration
//!
//! Combines the item and assistant use cases with the pure domain rules:
//! uniqueness of normalized names, append-at-end ordering and filtering of
//! assistant output against what the list already holds.

use domain::services::{
    clean_tips, dedup_batch, is_duplicate, move_item, next_order, partition_suggestions,
};
use domain::{
    AnalysisRequest, AnalysisResult, DomainError, ItemId, ListId, ListItem, ShoppingList,
    SuggestionRequest,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{AssistantUseCase, ItemUseCase};
use crate::ApplicationResult;

/// Tips kept from one analysis
pub const MAX_ANALYSIS_TIPS: usize = 5;

/// Assistant candidates split against the current items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionOutcome {
    pub subject: Option<String>,
    /// New names, in assistant order
    pub accepted: Vec<String>,
    /// Names dropped because the list already has them
    pub ignored: Vec<String>,
}

/// Items created from a batch plus the names that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedSuggestions {
    pub created: Vec<ListItem>,
    pub ignored: Vec<String>,
}

pub struct ShoppingListUseCase {
    items: Arc<ItemUseCase>,
    assistant: Arc<AssistantUseCase>,
}

impl ShoppingListUseCase {
    pub fn new(items: Arc<ItemUseCase>, assistant: Arc<AssistantUseCase>) -> Self {
        Self { items, assistant }
    }

    /// Validate, assign the next order key and persist a manual item
    #[instrument(skip(self, existing))]
    pub async fn add_item(
        &self,
        list_id: &ListId,
        name: &str,
        existing: &[ListItem],
    ) -> ApplicationResult<ListItem> {
        let item = ListItem::new(list_id.clone(), name, next_order(existing)?)?;
        self.insert(item, existing).await
    }

    /// Same as [`Self::add_item`] for a name that came from the assistant
    pub async fn add_suggested_item(
        &self,
        list_id: &ListId,
        name: &str,
        subject: Option<&str>,
        existing: &[ListItem],
    ) -> ApplicationResult<ListItem> {
        let item = ListItem::suggested(
            list_id.clone(),
            name,
            next_order(existing)?,
            subject.map(str::to_string),
        )?;
        self.insert(item, existing).await
    }

    async fn insert(&self, item: ListItem, existing: &[ListItem]) -> ApplicationResult<ListItem> {
        if is_duplicate(item.name(), existing, None) {
            return Err(DomainError::duplicate(item.name()).into());
        }
        self.items.add(&item).await?;
        debug!("Added item {} with order {}", item.name(), item.order());
        Ok(item)
    }

    /// Rename an item; it never collides with itself
    pub async fn edit_item(
        &self,
        item: &ListItem,
        new_name: &str,
        existing: &[ListItem],
    ) -> ApplicationResult<ListItem> {
        let mut updated = item.clone();
        updated.rename(new_name)?;
        if is_duplicate(updated.name(), existing, Some(item.id())) {
            return Err(DomainError::duplicate(updated.name()).into());
        }
        self.items.update(&updated).await?;
        Ok(updated)
    }

    /// Flip the done flag and persist it
    pub async fn toggle_done(&self, item: &ListItem) -> ApplicationResult<ListItem> {
        let mut updated = item.clone();
        updated.toggle_done();
        self.items.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete_item(&self, list_id: &ListId, item_id: &ItemId) -> ApplicationResult<()> {
        self.items.delete(list_id, item_id).await
    }

    /// Move one item and persist the rewritten order keys `0..n`
    #[instrument(skip(self, items))]
    pub async fn reorder_items(
        &self,
        items: &[ListItem],
        from: usize,
        to: usize,
    ) -> ApplicationResult<Vec<ListItem>> {
        let mut reordered = items.to_vec();
        move_item(&mut reordered, from, to)?;
        self.items.update_orders(&reordered).await?;
        Ok(reordered)
    }

    /// Ask the assistant for items about `subject`, minus the ones already listed
    #[instrument(skip(self, list, existing, recent))]
    pub async fn fetch_unique_suggestions(
        &self,
        subject: &str,
        list: &ShoppingList,
        existing: &[ListItem],
        recent: &[String],
    ) -> ApplicationResult<SuggestionOutcome> {
        let request = SuggestionRequest {
            subject: subject.trim().to_string(),
            context: list.context(),
            list_name: list.name().to_string(),
            recently_suggested: recent.to_vec(),
        };
        let batch = self.assistant.suggest_items(&request).await?;

        let candidates = dedup_batch(&batch.names);
        let (accepted, ignored) = partition_suggestions(&candidates, existing);
        debug!(
            "Assistant returned {} names: {} new, {} already listed",
            batch.len(),
            accepted.len(),
            ignored.len()
        );

        Ok(SuggestionOutcome {
            subject: batch.subject.or(Some(request.subject)),
            accepted,
            ignored,
        })
    }

    /// Fetch suggestions and add every new one.
    ///
    /// Each add is checked against the items created so far in this batch.
    pub async fn add_suggestions(
        &self,
        subject: &str,
        list: &ShoppingList,
        existing: &[ListItem],
        recent: &[String],
    ) -> ApplicationResult<AddedSuggestions> {
        let outcome = self
            .fetch_unique_suggestions(subject, list, existing, recent)
            .await?;
        let mut added = self
            .add_selected_suggestions(
                list.id(),
                &outcome.accepted,
                outcome.subject.as_deref(),
                existing,
            )
            .await?;

        let mut ignored = outcome.ignored;
        ignored.append(&mut added.ignored);
        added.ignored = ignored;

        info!(
            "Added {} suggested items to list {}",
            added.created.len(),
            list.id()
        );
        Ok(added)
    }

    /// Add the names the user picked from a suggestion preview
    pub async fn add_selected_suggestions(
        &self,
        list_id: &ListId,
        names: &[String],
        subject: Option<&str>,
        existing: &[ListItem],
    ) -> ApplicationResult<AddedSuggestions> {
        let mut current = existing.to_vec();
        let mut added = AddedSuggestions::default();

        for name in names {
            match self.add_suggested_item(list_id, name, subject, &current).await {
                Ok(item) => {
                    current.push(item.clone());
                    added.created.push(item);
                }
                Err(e) if e.is_validation() => added.ignored.push(name.clone()),
                Err(e) => return Err(e),
            }
        }

        Ok(added)
    }

    /// Whole-list review: missing items and short tips
    #[instrument(skip(self, list, items, recent))]
    pub async fn analyze_list(
        &self,
        list: &ShoppingList,
        items: &[ListItem],
        recent: &[String],
    ) -> ApplicationResult<AnalysisResult> {
        let (done, pending): (Vec<&ListItem>, Vec<&ListItem>) =
            items.iter().partition(|item| item.is_done());

        let request = AnalysisRequest {
            list_name: list.name().to_string(),
            context: list.context(),
            pending: pending.iter().map(|item| item.name().to_string()).collect(),
            done: done.iter().map(|item| item.name().to_string()).collect(),
            recently_suggested: recent.to_vec(),
        };
        let result = self.assistant.analyze_list(&request).await?;

        let (suggestions, _) = partition_suggestions(&dedup_batch(&result.suggestions), items);
        Ok(AnalysisResult {
            suggestions,
            tips: clean_tips(result.tips, MAX_ANALYSIS_TIPS),
        })
    }
}
