//! ListSession behaviour against channel-backed repositories
//!
//! Every subscription is an unbounded channel the test drives by hand, so
//! snapshots can be delivered late or out of order on purpose.

use application::{AppServices, ApplicationError, ListSession, SessionState};
use async_trait::async_trait;
use domain::config::{SessionConfig, WriteFailurePolicy};
use domain::{
    AnalysisRequest, AnalysisResult, AssistantRepository, AuthRepository, DomainError,
    DomainResult, Email, ItemId, ItemRepository, ItemStream, ListContext, ListId, ListItem,
    ListRepository, ListStream, MembershipChange, ShoppingList, SuggestionBatch,
    SuggestionRequest, UserAccount, UserId,
};
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

type Snapshot<T> = DomainResult<Vec<T>>;

struct SignedIn(UserAccount);

#[async_trait]
impl AuthRepository for SignedIn {
    async fn sign_in(&self, _email: &Email, _password: &str) -> DomainResult<UserAccount> {
        Ok(self.0.clone())
    }
    async fn sign_up(&self, _email: &Email, _password: &str) -> DomainResult<UserAccount> {
        Ok(self.0.clone())
    }
    async fn sign_out(&self) -> DomainResult<()> {
        Ok(())
    }
    fn current_user(&self) -> Option<UserAccount> {
        Some(self.0.clone())
    }
    async fn send_password_reset(&self, _email: &Email) -> DomainResult<()> {
        Ok(())
    }
    async fn send_verification_email(&self) -> DomainResult<()> {
        Ok(())
    }
    async fn delete_account(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct ChannelLists {
    sender: Mutex<Option<UnboundedSender<Snapshot<ShoppingList>>>>,
    known: Mutex<Vec<ShoppingList>>,
    deleted: Mutex<Vec<ListId>>,
}

#[async_trait]
impl ListRepository for ChannelLists {
    async fn lists_stream(&self, _member: &Email) -> DomainResult<ListStream> {
        let (tx, rx) = unbounded_channel();
        *self.sender.lock() = Some(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
    async fn get_list(&self, id: &ListId) -> DomainResult<ShoppingList> {
        self.known
            .lock()
            .iter()
            .find(|list| list.id() == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("list", id.as_str()))
    }
    async fn create_list(&self, _list: &ShoppingList) -> DomainResult<()> {
        Ok(())
    }
    async fn update_members(&self, _list: &ShoppingList) -> DomainResult<()> {
        Ok(())
    }
    async fn delete_list(&self, id: &ListId) -> DomainResult<()> {
        self.deleted.lock().push(id.clone());
        Ok(())
    }
}

#[derive(Default)]
struct ChannelItems {
    senders: Mutex<HashMap<ListId, UnboundedSender<Snapshot<ListItem>>>>,
    fail_updates: AtomicBool,
    added: Mutex<Vec<ListItem>>,
}

impl ChannelItems {
    async fn sender(&self, list_id: &ListId) -> UnboundedSender<Snapshot<ListItem>> {
        for _ in 0..200 {
            if let Some(tx) = self.senders.lock().get(list_id) {
                return tx.clone();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("list {list_id} was never subscribed");
    }
}

#[async_trait]
impl ItemRepository for ChannelItems {
    async fn items_stream(&self, list_id: &ListId) -> DomainResult<ItemStream> {
        let (tx, rx) = unbounded_channel();
        self.senders.lock().insert(list_id.clone(), tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
    async fn add_item(&self, item: &ListItem) -> DomainResult<()> {
        self.added.lock().push(item.clone());
        Ok(())
    }
    async fn update_item(&self, _item: &ListItem) -> DomainResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::transport("store offline"));
        }
        Ok(())
    }
    async fn delete_item(&self, _list_id: &ListId, _item_id: &ItemId) -> DomainResult<()> {
        Ok(())
    }
    async fn update_orders(&self, _items: &[ListItem]) -> DomainResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedAssistant {
    names: Vec<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<SuggestionRequest>>,
}

#[async_trait]
impl AssistantRepository for ScriptedAssistant {
    async fn suggest_items(&self, request: &SuggestionRequest) -> DomainResult<SuggestionBatch> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(SuggestionBatch::new(None, self.names.clone()))
    }
    async fn analyze_list(&self, _request: &AnalysisRequest) -> DomainResult<AnalysisResult> {
        Ok(AnalysisResult {
            suggestions: self.names.clone(),
            tips: vec!["Revisa la despensa".to_string()],
        })
    }
}

struct Harness {
    session: ListSession,
    lists: Arc<ChannelLists>,
    items: Arc<ChannelItems>,
    assistant: Arc<ScriptedAssistant>,
    owner: Email,
}

impl Harness {
    fn new(policy: WriteFailurePolicy, assistant: ScriptedAssistant) -> Self {
        let owner = Email::parse("ana@example.com").unwrap();
        let account = UserAccount::new(UserId::from("u1"), owner.clone(), true);
        let lists = Arc::new(ChannelLists::default());
        let items = Arc::new(ChannelItems::default());
        let assistant = Arc::new(assistant);

        let config = SessionConfig {
            write_failure_policy: policy,
            ..SessionConfig::default()
        };
        let services = AppServices::new(
            lists.clone(),
            items.clone(),
            Arc::new(SignedIn(account)),
            assistant.clone(),
            config,
        );

        Self {
            session: services.session(),
            lists,
            items,
            assistant,
            owner,
        }
    }

    fn list(&self, name: &str) -> ShoppingList {
        ShoppingList::new(name, ListContext::Purchase, self.owner.clone()).unwrap()
    }

    fn push_lists(&self, lists: &[ShoppingList]) {
        *self.lists.known.lock() = lists.to_vec();
        let sender = self.lists.sender.lock().clone().expect("session not started");
        sender.send(Ok(lists.to_vec())).unwrap();
    }

    async fn wait_for(&self, what: impl Fn(&SessionState) -> bool) -> SessionState {
        let mut rx = self.session.watch();
        let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|state| what(state)))
            .await
            .expect("state never reached")
            .expect("session dropped")
            .clone();
        state
    }
}

fn names(state: &SessionState) -> Vec<String> {
    state.items.iter().map(|item| item.name().to_string()).collect()
}

#[tokio::test]
async fn test_first_list_becomes_active() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    harness.session.start().await.unwrap();

    let a = harness.list("Compra semanal");
    let b = harness.list("Cumpleaños");
    harness.push_lists(&[a.clone(), b.clone()]);

    let state = harness.wait_for(|s| s.active_list.is_some()).await;
    assert_eq!(state.active_list.as_ref(), Some(a.id()));
    assert_eq!(state.lists.len(), 2);
}

#[tokio::test]
async fn test_snapshot_from_previous_list_is_dropped() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    harness.session.start().await.unwrap();

    let a = harness.list("Compra semanal");
    let b = harness.list("Viaje");
    harness.push_lists(&[a.clone(), b.clone()]);
    harness.wait_for(|s| s.active_list.as_ref() == Some(a.id())).await;

    let tx_a = harness.items.sender(a.id()).await;
    tx_a.send(Ok(vec![ListItem::new(a.id().clone(), "Leche", 0).unwrap()]))
        .unwrap();
    harness.wait_for(|s| s.items.len() == 1).await;

    harness.session.select_list(b.id()).await.unwrap();
    assert!(harness.session.state().items.is_empty());

    // late delivery for A after the switch
    let _ = tx_a.send(Ok(vec![
        ListItem::new(a.id().clone(), "Pan", 0).unwrap(),
        ListItem::new(a.id().clone(), "Huevos", 1).unwrap(),
    ]));
    let tx_b = harness.items.sender(b.id()).await;
    tx_b.send(Ok(vec![ListItem::new(b.id().clone(), "Crema solar", 0).unwrap()]))
        .unwrap();

    harness.wait_for(|s| names(s) == ["Crema solar"]).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let state = harness.session.state();
    assert_eq!(state.active_list.as_ref(), Some(b.id()));
    assert_eq!(names(&state), ["Crema solar"]);
}

#[tokio::test]
async fn test_removed_active_list_moves_to_first() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    harness.session.start().await.unwrap();

    let a = harness.list("Compra");
    let b = harness.list("Proyecto");
    harness.push_lists(&[a.clone(), b.clone()]);
    harness.wait_for(|s| s.active_list.as_ref() == Some(a.id())).await;

    harness.push_lists(&[b.clone()]);
    let state = harness.wait_for(|s| s.active_list.as_ref() == Some(b.id())).await;
    assert_eq!(state.lists.len(), 1);

    harness.push_lists(&[]);
    let state = harness.wait_for(|s| s.lists.is_empty() && s.active_list.is_none()).await;
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn test_commands_without_active_list() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());

    let error = harness.session.add_item("Leche").await.unwrap_err();
    assert_eq!(error, ApplicationError::NoActiveList);
    assert_eq!(
        harness.session.state().last_error,
        Some(ApplicationError::NoActiveList)
    );

    harness.session.clear_error();
    assert!(harness.session.state().last_error.is_none());
}

async fn started_with_item(harness: &Harness) -> (ShoppingList, ListItem) {
    harness.session.start().await.unwrap();
    let list = harness.list("Compra");
    harness.push_lists(&[list.clone()]);
    harness.wait_for(|s| s.active_list.is_some()).await;

    let item = ListItem::new(list.id().clone(), "Leche", 0).unwrap();
    harness
        .items
        .sender(list.id())
        .await
        .send(Ok(vec![item.clone()]))
        .unwrap();
    harness.wait_for(|s| s.items.len() == 1).await;
    (list, item)
}

#[tokio::test]
async fn test_failed_toggle_keeps_local_change_by_default() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    let (_, item) = started_with_item(&harness).await;
    harness.items.fail_updates.store(true, Ordering::SeqCst);

    let error = harness.session.toggle_done(item.id()).await.unwrap_err();
    assert!(error.is_retryable());

    let state = harness.session.state();
    assert!(state.item(item.id()).unwrap().is_done());
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn test_failed_toggle_reverts_with_revert_policy() {
    let harness = Harness::new(WriteFailurePolicy::Revert, ScriptedAssistant::default());
    let (_, item) = started_with_item(&harness).await;
    harness.items.fail_updates.store(true, Ordering::SeqCst);

    harness.session.toggle_done(item.id()).await.unwrap_err();

    let state = harness.session.state();
    assert!(!state.item(item.id()).unwrap().is_done());
    assert_eq!(
        state.last_error,
        Some(DomainError::transport("store offline").into())
    );
}

#[tokio::test]
async fn test_successful_toggle_is_visible_immediately() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    let (_, item) = started_with_item(&harness).await;

    let updated = harness.session.toggle_done(item.id()).await.unwrap();
    assert!(updated.is_done());
    assert_eq!(harness.session.state().pending_count(), 0);
}

#[tokio::test]
async fn test_duplicate_add_is_rejected_locally() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    started_with_item(&harness).await;

    let error = harness.session.add_item("  leche").await.unwrap_err();
    assert!(error.is_validation());
    assert!(harness.items.added.lock().is_empty());

    let created = harness.session.add_item("Pan").await.unwrap();
    assert_eq!(created.order(), 1);
    assert_eq!(names(&harness.session.state()), ["Leche", "Pan"]);
}

#[tokio::test]
async fn test_suggestions_are_remembered_per_list() {
    let assistant = ScriptedAssistant {
        names: vec!["Leche".into(), "Harina".into(), "Azúcar".into()],
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    let (list, _) = started_with_item(&harness).await;

    let outcome = harness.session.suggest("bizcocho").await.unwrap();
    assert_eq!(outcome.accepted, vec!["Harina", "Azúcar"]);
    assert_eq!(outcome.ignored, vec!["Leche"]);
    assert_eq!(harness.session.state().ignored_duplicates, vec!["Leche"]);

    harness.session.suggest("bizcocho").await.unwrap();
    let requests = harness.assistant.requests.lock();
    assert!(requests[0].recently_suggested.is_empty());
    assert_eq!(requests[1].recently_suggested, vec!["Harina", "Azúcar"]);
    assert_eq!(
        harness.session.recent_suggestions(list.id()),
        vec!["Harina", "Azúcar"]
    );
}

#[tokio::test]
async fn test_add_suggestions_reports_ignored_duplicates() {
    let assistant = ScriptedAssistant {
        names: vec!["Leche".into(), "Harina".into()],
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    started_with_item(&harness).await;

    let added = harness.session.add_suggestions("crepes").await.unwrap();
    assert_eq!(added.created.len(), 1);
    assert!(added.created[0].added_by_ai());

    let state = harness.session.state();
    assert_eq!(state.ignored_duplicates, vec!["Leche"]);
    assert_eq!(names(&state), ["Leche", "Harina"]);
    assert!(!state.assistant_busy);
}

#[tokio::test]
async fn test_analysis_is_published() {
    let assistant = ScriptedAssistant {
        names: vec!["Leche".into(), "Café".into()],
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    started_with_item(&harness).await;

    let analysis = harness.session.analyze_active_list().await.unwrap();
    assert_eq!(analysis.suggestions, vec!["Café"]);
    assert_eq!(harness.session.state().analysis, Some(analysis));
}

#[tokio::test(start_paused = true)]
async fn test_slow_assistant_times_out() {
    let assistant = ScriptedAssistant {
        names: vec!["Harina".into()],
        delay: Some(Duration::from_secs(120)),
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    started_with_item(&harness).await;

    let error = harness.session.suggest("bizcocho").await.unwrap_err();
    assert_eq!(error, ApplicationError::timeout("suggest_items"));

    let state = harness.session.state();
    assert!(!state.assistant_busy);
    assert_eq!(state.last_error, Some(error));
}

#[tokio::test(start_paused = true)]
async fn test_busy_flag_stays_set_while_another_call_runs() {
    let assistant = ScriptedAssistant {
        names: vec!["Harina".into()],
        delay: Some(Duration::from_secs(10)),
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    started_with_item(&harness).await;

    let (suggested, busy_after_analysis) = tokio::join!(
        harness.session.suggest("bizcocho"),
        async {
            harness.session.analyze_active_list().await.unwrap();
            harness.session.state().assistant_busy
        }
    );

    assert!(busy_after_analysis);
    assert_eq!(suggested.unwrap().accepted, vec!["Harina"]);
    assert!(!harness.session.state().assistant_busy);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_assistant_call_clears_busy_flag() {
    let assistant = ScriptedAssistant {
        names: vec!["Harina".into()],
        delay: Some(Duration::from_secs(10)),
        ..ScriptedAssistant::default()
    };
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, assistant);
    started_with_item(&harness).await;

    let abandoned =
        tokio::time::timeout(Duration::from_secs(1), harness.session.suggest("bizcocho")).await;
    assert!(abandoned.is_err());
    assert!(!harness.session.state().assistant_busy);
}

#[tokio::test]
async fn test_deleting_active_list_activates_next() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    harness.session.start().await.unwrap();

    let a = harness.list("Compra");
    let b = harness.list("Ideas de regalo");
    harness.push_lists(&[a.clone(), b.clone()]);
    harness.wait_for(|s| s.active_list.as_ref() == Some(a.id())).await;

    let change = harness.session.delete_list(a.id()).await.unwrap();
    assert_eq!(change, MembershipChange::Deleted);
    assert_eq!(*harness.lists.deleted.lock(), vec![a.id().clone()]);

    let state = harness.session.state();
    assert_eq!(state.active_list.as_ref(), Some(b.id()));
    assert_eq!(state.lists.len(), 1);
}

#[tokio::test]
async fn test_selecting_unknown_list_fails() {
    let harness = Harness::new(WriteFailurePolicy::KeepLocal, ScriptedAssistant::default());
    harness.session.start().await.unwrap();
    harness.push_lists(&[harness.list("Compra")]);
    harness.wait_for(|s| s.active_list.is_some()).await;

    let error = harness
        .session
        .select_list(&ListId::from("missing"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ApplicationError::Domain(DomainError::NotFound { .. })
    ));
}
