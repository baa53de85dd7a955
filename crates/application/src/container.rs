//! Service wiring
//!
//! Builds every use case once from the four repository abstractions and
//! hands out sessions that share them.

use domain::config::SessionConfig;
use domain::{AssistantRepository, AuthRepository, ItemRepository, ListRepository};
use std::sync::Arc;

use crate::session::ListSession;
use crate::use_cases::{
    AssistantUseCase, AuthUseCase, ItemUseCase, ListUseCase, ShoppingListUseCase,
};

#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthUseCase>,
    pub lists: Arc<ListUseCase>,
    pub items: Arc<ItemUseCase>,
    pub assistant: Arc<AssistantUseCase>,
    pub shopping: Arc<ShoppingListUseCase>,
    session_config: SessionConfig,
}

impl AppServices {
    pub fn new(
        lists: Arc<dyn ListRepository>,
        items: Arc<dyn ItemRepository>,
        auth: Arc<dyn AuthRepository>,
        assistant: Arc<dyn AssistantRepository>,
        session_config: SessionConfig,
    ) -> Self {
        let item_use_case = Arc::new(ItemUseCase::new(items));
        let assistant_use_case = Arc::new(AssistantUseCase::new(assistant));
        let shopping = Arc::new(ShoppingListUseCase::new(
            item_use_case.clone(),
            assistant_use_case.clone(),
        ));

        Self {
            auth: Arc::new(AuthUseCase::new(auth.clone())),
            lists: Arc::new(ListUseCase::new(lists, auth)),
            items: item_use_case,
            assistant: assistant_use_case,
            shopping,
            session_config,
        }
    }

    /// New session for the signed-in user; call [`ListSession::start`] on it
    pub fn session(&self) -> ListSession {
        ListSession::new(
            self.lists.clone(),
            self.items.clone(),
            self.shopping.clone(),
            self.session_config.clone(),
        )
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }
}
