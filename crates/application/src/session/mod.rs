//! List session - the view model behind a list screen
//!
//! A session owns at most one active list. It mirrors the user's lists and
//! the active list's items from the realtime streams and runs every user
//! command against the use cases. State lives behind one mutex and each
//! change is published as a whole [`SessionState`] on a `watch` channel.
//!
//! Switching lists bumps a generation counter and aborts the previous item
//! subscription, so snapshots that were in flight for the old list are
//! dropped instead of overwriting the new list's items.

mod history;
mod state;

pub use history::SuggestionHistory;
pub use state::SessionState;

use domain::config::{SessionConfig, WriteFailurePolicy};
use domain::{
    AnalysisResult, ItemId, ListContext, ListId, ListItem, MembershipChange, ShoppingList,
};
use futures::StreamExt;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::use_cases::{
    AddedSuggestions, ItemUseCase, ListUseCase, ShoppingListUseCase, SuggestionOutcome,
};
use crate::{ApplicationError, ApplicationResult};

pub struct ListSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    lists: Arc<ListUseCase>,
    items: Arc<ItemUseCase>,
    shopping: Arc<ShoppingListUseCase>,
    config: SessionConfig,
    shared: Mutex<Shared>,
    state_tx: watch::Sender<SessionState>,
}

struct Shared {
    view: SessionState,
    /// Bumped on every activation; item snapshots carry the value they were
    /// subscribed under
    item_generation: u64,
    items_task: Option<JoinHandle<()>>,
    lists_task: Option<JoinHandle<()>>,
    history: SuggestionHistory,
    /// Assistant calls in flight; `assistant_busy` mirrors `> 0`
    assistant_calls: usize,
}

impl ListSession {
    pub fn new(
        lists: Arc<ListUseCase>,
        items: Arc<ItemUseCase>,
        shopping: Arc<ShoppingListUseCase>,
        config: SessionConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        let history = SuggestionHistory::new(config.suggestion_history_limit);

        Self {
            inner: Arc::new(SessionInner {
                lists,
                items,
                shopping,
                config,
                shared: Mutex::new(Shared {
                    view: SessionState::default(),
                    item_generation: 0,
                    items_task: None,
                    lists_task: None,
                    history,
                    assistant_calls: 0,
                }),
                state_tx,
            }),
        }
    }

    /// Subscribe to the current user's lists.
    ///
    /// The first list of the first snapshot becomes active.
    #[instrument(skip(self))]
    pub async fn start(&self) -> ApplicationResult<()> {
        let mut stream = self
            .inner
            .track(self.inner.lists.lists_stream().await)?;
        let weak = Arc::downgrade(&self.inner);

        let task = tokio::spawn(async move {
            while let Some(next) = stream.next().await {
                let Some(inner) = weak.upgrade() else { break };
                match next {
                    Ok(lists) => {
                        if let Some(target) = inner.apply_lists(lists) {
                            // failures are already in last_error
                            let _ = inner.activate(target).await;
                        }
                    }
                    Err(e) => {
                        warn!("Lists subscription error: {}", e);
                        inner.record_error(e.into());
                    }
                }
            }
            debug!("Lists subscription ended");
        });

        if let Some(previous) = self.inner.shared.lock().lists_task.replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Cancel both subscriptions; the last published state stays readable
    pub fn stop(&self) {
        let mut shared = self.inner.shared.lock();
        shared.item_generation += 1;
        for task in [shared.items_task.take(), shared.lists_task.take()].into_iter().flatten() {
            task.abort();
        }
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.shared.lock().view.clone()
    }

    pub fn clear_error(&self) {
        self.inner.update(|view| view.last_error = None);
    }

    pub fn recent_suggestions(&self, list_id: &ListId) -> Vec<String> {
        self.inner.shared.lock().history.recent(list_id)
    }

    // ---- lists ----

    pub async fn select_list(&self, id: &ListId) -> ApplicationResult<()> {
        let known = self.inner.shared.lock().view.lists.iter().any(|list| list.id() == id);
        if !known {
            return self
                .inner
                .track(Err(ApplicationError::not_found("list", id.as_str())));
        }
        self.inner.activate(Some(id.clone())).await
    }

    /// Create a list; it becomes active when no other list is
    pub async fn create_list(
        &self,
        name: &str,
        context: Option<ListContext>,
    ) -> ApplicationResult<ShoppingList> {
        let list = self.inner.track(self.inner.lists.create_list(name, context).await)?;

        let activate = {
            let mut shared = self.inner.shared.lock();
            if !shared.view.lists.iter().any(|known| known.id() == list.id()) {
                shared.view.lists.push(list.clone());
            }
            let activate = shared.view.active_list.is_none();
            self.inner.publish(&shared);
            activate
        };
        if activate {
            self.inner.activate(Some(list.id().clone())).await?;
        }
        Ok(list)
    }

    /// Leave or delete a list, moving to the first remaining one if it was active
    pub async fn delete_list(&self, id: &ListId) -> ApplicationResult<MembershipChange> {
        let change = self.inner.track(self.inner.lists.delete_list(id).await)?;

        let next = {
            let mut shared = self.inner.shared.lock();
            shared.view.lists.retain(|list| list.id() != id);
            shared.history.forget(id);
            let was_active = shared.view.active_list.as_ref() == Some(id);
            self.inner.publish(&shared);
            was_active.then(|| shared.view.lists.first().map(|list| list.id().clone()))
        };
        if let Some(next) = next {
            self.inner.activate(next).await?;
        }
        Ok(change)
    }

    pub async fn share_active_list(&self, email: &str) -> ApplicationResult<bool> {
        let (list, _) = self.inner.active()?;
        self.inner
            .track(self.inner.lists.share_list(list.id(), email).await)
    }

    // ---- items ----

    pub async fn add_item(&self, name: &str) -> ApplicationResult<ListItem> {
        let (list, items) = self.inner.active()?;
        let item = self
            .inner
            .track(self.inner.shopping.add_item(list.id(), name, &items).await)?;
        self.inner.merge_local(list.id(), std::slice::from_ref(&item));
        Ok(item)
    }

    pub async fn edit_item(&self, item_id: &ItemId, name: &str) -> ApplicationResult<ListItem> {
        let (list, items) = self.inner.active()?;
        let item = self.inner.find_item(&items, item_id)?;
        let updated = self
            .inner
            .track(self.inner.shopping.edit_item(&item, name, &items).await)?;
        self.inner.merge_local(list.id(), std::slice::from_ref(&updated));
        Ok(updated)
    }

    /// Flip the done flag locally, then write it.
    ///
    /// A failed write is reported in `last_error`; the local flag is kept or
    /// restored according to [`WriteFailurePolicy`].
    #[instrument(skip(self))]
    pub async fn toggle_done(&self, item_id: &ItemId) -> ApplicationResult<ListItem> {
        let prepared = {
            let mut shared = self.inner.shared.lock();
            let generation = shared.item_generation;
            let toggled = match shared.view.active_list.clone() {
                None => Err(ApplicationError::NoActiveList),
                Some(list_id) => {
                    match shared.view.items.iter_mut().find(|item| item.id() == item_id) {
                        Some(item) => {
                            let original = item.clone();
                            item.toggle_done();
                            Ok((list_id, generation, original))
                        }
                        None => Err(ApplicationError::not_found("item", item_id.as_str())),
                    }
                }
            };
            if toggled.is_ok() {
                self.inner.publish(&shared);
            }
            toggled
        };
        let (list, generation, original) = self.inner.track(prepared)?;

        let updated = match self.inner.shopping.toggle_done(&original).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Failed to persist done flag of {}: {}", original.id(), e);
                let revert = self.inner.config.write_failure_policy == WriteFailurePolicy::Revert;
                let mut shared = self.inner.shared.lock();
                if revert && shared.item_generation == generation {
                    if let Some(item) =
                        shared.view.items.iter_mut().find(|item| item.id() == item_id)
                    {
                        item.set_done(original.is_done());
                    }
                }
                shared.view.last_error = Some(e.clone());
                self.inner.publish(&shared);
                return Err(e);
            }
        };

        debug!("Item {} in list {} is now done={}", updated.id(), list, updated.is_done());
        Ok(updated)
    }

    pub async fn delete_item(&self, item_id: &ItemId) -> ApplicationResult<()> {
        let (list, _) = self.inner.active()?;
        self.inner
            .track(self.inner.shopping.delete_item(list.id(), item_id).await)?;

        let mut shared = self.inner.shared.lock();
        if shared.view.active_list.as_ref() == Some(list.id()) {
            shared.view.items.retain(|item| item.id() != item_id);
            self.inner.publish(&shared);
        }
        Ok(())
    }

    /// Move an item within the visible order
    pub async fn move_item(&self, from: usize, to: usize) -> ApplicationResult<()> {
        let (list, items) = self.inner.active()?;
        let reordered = self
            .inner
            .track(self.inner.shopping.reorder_items(&items, from, to).await)?;

        let mut shared = self.inner.shared.lock();
        if shared.view.active_list.as_ref() == Some(list.id()) {
            shared.view.items = reordered;
            self.inner.publish(&shared);
        }
        Ok(())
    }

    // ---- assistant ----

    /// Preview suggestions for `subject` without adding them
    pub async fn suggest(&self, subject: &str) -> ApplicationResult<SuggestionOutcome> {
        let (list, items) = self.inner.active()?;
        let recent = self.recent_suggestions(list.id());

        let outcome = self
            .inner
            .with_assistant(
                "suggest_items",
                self.inner
                    .shopping
                    .fetch_unique_suggestions(subject, &list, &items, &recent),
            )
            .await?;

        let mut shared = self.inner.shared.lock();
        shared.history.record(list.id(), &outcome.accepted);
        if shared.view.active_list.as_ref() == Some(list.id()) {
            shared.view.suggestion_preview = Some(outcome.clone());
            shared.view.ignored_duplicates = outcome.ignored.clone();
            self.inner.publish(&shared);
        }
        Ok(outcome)
    }

    /// Fetch suggestions for `subject` and add every new one
    pub async fn add_suggestions(&self, subject: &str) -> ApplicationResult<AddedSuggestions> {
        let (list, items) = self.inner.active()?;
        let recent = self.recent_suggestions(list.id());

        let added = self
            .inner
            .with_assistant(
                "add_suggestions",
                self.inner
                    .shopping
                    .add_suggestions(subject, &list, &items, &recent),
            )
            .await?;

        self.inner.after_batch(&list, &added);
        info!(
            "{} suggestions added, {} ignored",
            added.created.len(),
            added.ignored.len()
        );
        Ok(added)
    }

    /// Add the names picked from the last preview
    pub async fn add_selected_suggestions(
        &self,
        names: &[String],
        subject: Option<&str>,
    ) -> ApplicationResult<AddedSuggestions> {
        let (list, items) = self.inner.active()?;
        let added = self.inner.track(
            self.inner
                .shopping
                .add_selected_suggestions(list.id(), names, subject, &items)
                .await,
        )?;
        self.inner.after_batch(&list, &added);
        Ok(added)
    }

    pub async fn analyze_active_list(&self) -> ApplicationResult<AnalysisResult> {
        let (list, items) = self.inner.active()?;
        let recent = self.recent_suggestions(list.id());

        let analysis = self
            .inner
            .with_assistant(
                "analyze_list",
                self.inner.shopping.analyze_list(&list, &items, &recent),
            )
            .await?;

        let mut shared = self.inner.shared.lock();
        shared.history.record(list.id(), &analysis.suggestions);
        if shared.view.active_list.as_ref() == Some(list.id()) {
            shared.view.analysis = Some(analysis.clone());
            self.inner.publish(&shared);
        }
        Ok(analysis)
    }
}

impl SessionInner {
    fn publish(&self, shared: &Shared) {
        self.state_tx.send_replace(shared.view.clone());
    }

    fn update(&self, change: impl FnOnce(&mut SessionState)) {
        let mut shared = self.shared.lock();
        change(&mut shared.view);
        self.publish(&shared);
    }

    fn record_error(&self, error: ApplicationError) {
        self.update(|view| view.last_error = Some(error));
    }

    /// Store the error of a failed command in `last_error` and pass it on
    fn track<T>(&self, result: ApplicationResult<T>) -> ApplicationResult<T> {
        if let Err(e) = &result {
            debug!("Command failed ({}): {}", e.category(), e);
            self.record_error(e.clone());
        }
        result
    }

    /// Active list and a copy of its items
    fn active(&self) -> ApplicationResult<(ShoppingList, Vec<ListItem>)> {
        let result = {
            let shared = self.shared.lock();
            shared
                .view
                .active()
                .cloned()
                .map(|list| (list, shared.view.items.clone()))
                .ok_or(ApplicationError::NoActiveList)
        };
        self.track(result)
    }

    fn find_item(&self, items: &[ListItem], id: &ItemId) -> ApplicationResult<ListItem> {
        self.track(
            items
                .iter()
                .find(|item| item.id() == id)
                .cloned()
                .ok_or_else(|| ApplicationError::not_found("item", id.as_str())),
        )
    }

    /// Replace the stored list set; returns the list to activate when the
    /// active one disappeared or none was active yet
    fn apply_lists(&self, lists: Vec<ShoppingList>) -> Option<Option<ListId>> {
        let mut shared = self.shared.lock();
        shared.view.lists = lists;

        let still_present = shared
            .view
            .active_list
            .as_ref()
            .is_some_and(|id| shared.view.lists.iter().any(|list| list.id() == id));
        self.publish(&shared);

        if still_present {
            return None;
        }
        let first = shared.view.lists.first().map(|list| list.id().clone());
        (first != shared.view.active_list).then_some(first)
    }

    /// Make `list_id` the active list and subscribe to its items
    async fn activate(self: &Arc<Self>, list_id: Option<ListId>) -> ApplicationResult<()> {
        let generation = {
            let mut shared = self.shared.lock();
            shared.item_generation += 1;
            if let Some(task) = shared.items_task.take() {
                task.abort();
            }
            shared.view.active_list = list_id.clone();
            shared.view.clear_list_view();
            self.publish(&shared);
            shared.item_generation
        };

        let Some(list_id) = list_id else {
            return Ok(());
        };
        info!("Activating list {}", list_id);

        let mut stream = self.track(self.items.items_stream(&list_id).await)?;
        let weak: Weak<SessionInner> = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while let Some(next) = stream.next().await {
                let Some(inner) = weak.upgrade() else { break };
                let current = match next {
                    Ok(items) => inner.apply_items(generation, items),
                    Err(e) => inner.apply_item_error(generation, e.into()),
                };
                if !current {
                    break;
                }
            }
        });

        let mut shared = self.shared.lock();
        if shared.item_generation == generation {
            shared.items_task = Some(task);
        } else {
            task.abort();
        }
        Ok(())
    }

    /// Replace the local items with a snapshot; false when the snapshot
    /// belongs to a list that is no longer active
    fn apply_items(&self, generation: u64, items: Vec<ListItem>) -> bool {
        let mut shared = self.shared.lock();
        if shared.item_generation != generation {
            debug!("Dropping stale item snapshot (generation {})", generation);
            return false;
        }
        shared.view.items = items;
        self.publish(&shared);
        true
    }

    fn apply_item_error(&self, generation: u64, error: ApplicationError) -> bool {
        let mut shared = self.shared.lock();
        if shared.item_generation != generation {
            return false;
        }
        warn!("Items subscription error: {}", error);
        shared.view.last_error = Some(error);
        self.publish(&shared);
        true
    }

    /// Put items the session itself wrote into the local view ahead of the
    /// next snapshot
    fn merge_local(&self, list_id: &ListId, written: &[ListItem]) {
        let mut shared = self.shared.lock();
        if shared.view.active_list.as_ref() != Some(list_id) {
            return;
        }
        for item in written {
            match shared.view.items.iter_mut().find(|known| known.id() == item.id()) {
                Some(known) => *known = item.clone(),
                None => shared.view.items.push(item.clone()),
            }
        }
        self.publish(&shared);
    }

    fn after_batch(&self, list: &ShoppingList, added: &AddedSuggestions) {
        let names: Vec<&str> = added.created.iter().map(ListItem::name).collect();
        self.shared.lock().history.record(list.id(), &names);
        self.merge_local(list.id(), &added.created);
        self.update(|view| {
            if view.active_list.as_ref() == Some(list.id()) {
                view.ignored_duplicates = added.ignored.clone();
            }
        });
    }

    /// Run an assistant call under the session timeout with the busy flag set
    async fn with_assistant<T>(
        &self,
        operation: &str,
        call: impl Future<Output = ApplicationResult<T>>,
    ) -> ApplicationResult<T> {
        let in_flight = AssistantCall::begin(self);

        let result = match tokio::time::timeout(self.config.assistant_timeout(), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Assistant call {} exceeded {:?}",
                    operation,
                    self.config.assistant_timeout()
                );
                Err(ApplicationError::timeout(operation))
            }
        };

        drop(in_flight);
        self.track(result)
    }
}

/// One assistant call in flight. Dropping it, also on cancellation, clears
/// `assistant_busy` once no other call is running.
struct AssistantCall<'a> {
    inner: &'a SessionInner,
}

impl<'a> AssistantCall<'a> {
    fn begin(inner: &'a SessionInner) -> Self {
        let mut shared = inner.shared.lock();
        shared.assistant_calls += 1;
        shared.view.assistant_busy = true;
        inner.publish(&shared);
        Self { inner }
    }
}

impl Drop for AssistantCall<'_> {
    fn drop(&mut self) {
        let mut shared = self.inner.shared.lock();
        shared.assistant_calls = shared.assistant_calls.saturating_sub(1);
        shared.view.assistant_busy = shared.assistant_calls > 0;
        self.inner.publish(&shared);
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        let shared = self.shared.get_mut();
        for task in [shared.items_task.take(), shared.lists_task.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::AssistantUseCase;
    use async_trait::async_trait;
    use domain::{
        AnalysisRequest, AssistantRepository, AuthRepository, DomainError, DomainResult, Email,
        ItemRepository, ItemStream, ListRepository, ListStream, SuggestionBatch,
        SuggestionRequest, UserAccount,
    };
    use mockall::mock;

    mock! {
        Items {}

        #[async_trait]
        impl ItemRepository for Items {
            async fn items_stream(&self, list_id: &ListId) -> DomainResult<ItemStream>;
            async fn add_item(&self, item: &ListItem) -> DomainResult<()>;
            async fn update_item(&self, item: &ListItem) -> DomainResult<()>;
            async fn delete_item(&self, list_id: &ListId, item_id: &ItemId) -> DomainResult<()>;
            async fn update_orders(&self, items: &[ListItem]) -> DomainResult<()>;
        }
    }

    mock! {
        Lists {}

        #[async_trait]
        impl ListRepository for Lists {
            async fn lists_stream(&self, member: &Email) -> DomainResult<ListStream>;
            async fn get_list(&self, id: &ListId) -> DomainResult<ShoppingList>;
            async fn create_list(&self, list: &ShoppingList) -> DomainResult<()>;
            async fn update_members(&self, list: &ShoppingList) -> DomainResult<()>;
            async fn delete_list(&self, id: &ListId) -> DomainResult<()>;
        }
    }

    mock! {
        Auth {}

        #[async_trait]
        impl AuthRepository for Auth {
            async fn sign_in(&self, email: &Email, password: &str) -> DomainResult<UserAccount>;
            async fn sign_up(&self, email: &Email, password: &str) -> DomainResult<UserAccount>;
            async fn sign_out(&self) -> DomainResult<()>;
            fn current_user(&self) -> Option<UserAccount>;
            async fn send_password_reset(&self, email: &Email) -> DomainResult<()>;
            async fn send_verification_email(&self) -> DomainResult<()>;
            async fn delete_account(&self) -> DomainResult<()>;
        }
    }

    mock! {
        Assistant {}

        #[async_trait]
        impl AssistantRepository for Assistant {
            async fn suggest_items(
                &self,
                request: &SuggestionRequest,
            ) -> DomainResult<SuggestionBatch>;
            async fn analyze_list(
                &self,
                request: &AnalysisRequest,
            ) -> DomainResult<AnalysisResult>;
        }
    }

    /// Session whose item subscriptions stay open and never deliver
    fn quiet_session() -> ListSession {
        let mut items = MockItems::new();
        items
            .expect_items_stream()
            .returning(|_| Ok(futures::stream::pending().boxed()));
        let items = Arc::new(ItemUseCase::new(Arc::new(items)));

        let lists = Arc::new(ListUseCase::new(
            Arc::new(MockLists::new()),
            Arc::new(MockAuth::new()),
        ));
        let assistant = Arc::new(AssistantUseCase::new(Arc::new(MockAssistant::new())));
        let shopping = Arc::new(ShoppingListUseCase::new(items.clone(), assistant));

        ListSession::new(lists, items, shopping, SessionConfig::default())
    }

    #[tokio::test]
    async fn test_snapshot_under_old_generation_is_ignored() {
        let session = quiet_session();
        let a = ListId::from("a");
        let b = ListId::from("b");

        session.inner.activate(Some(a.clone())).await.unwrap();
        let old = session.inner.shared.lock().item_generation;
        session.inner.activate(Some(b.clone())).await.unwrap();
        let current = session.inner.shared.lock().item_generation;
        assert_ne!(old, current);

        let late = vec![ListItem::new(a.clone(), "Pan", 0).unwrap()];
        assert!(!session.inner.apply_items(old, late));
        assert!(!session
            .inner
            .apply_item_error(old, DomainError::transport("gone").into()));

        let state = session.state();
        assert_eq!(state.active_list, Some(b.clone()));
        assert!(state.items.is_empty());
        assert!(state.last_error.is_none());

        let fresh = vec![ListItem::new(b.clone(), "Crema solar", 0).unwrap()];
        assert!(session.inner.apply_items(current, fresh));
        assert_eq!(session.state().items[0].name(), "Crema solar");
    }

    #[tokio::test]
    async fn test_stop_invalidates_running_subscription() {
        let session = quiet_session();
        session.inner.activate(Some(ListId::from("a"))).await.unwrap();
        let generation = session.inner.shared.lock().item_generation;

        session.stop();

        let late = vec![ListItem::new(ListId::from("a"), "Pan", 0).unwrap()];
        assert!(!session.inner.apply_items(generation, late));
        assert!(session.state().items.is_empty());
    }
}
