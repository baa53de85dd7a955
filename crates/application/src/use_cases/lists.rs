use domain::{
    AuthRepository, DomainError, Email, ListContext, ListId, ListRepository, ListStream,
    MembershipChange, ShoppingList,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ApplicationResult;

/// Use Case: lists of the signed-in user and their membership
pub struct ListUseCase {
    lists: Arc<dyn ListRepository>,
    auth: Arc<dyn AuthRepository>,
}

impl ListUseCase {
    pub fn new(lists: Arc<dyn ListRepository>, auth: Arc<dyn AuthRepository>) -> Self {
        Self { lists, auth }
    }

    fn current_email(&self) -> ApplicationResult<Email> {
        self.auth
            .current_user()
            .map(|account| account.email)
            .ok_or_else(|| DomainError::Unauthenticated.into())
    }

    /// Realtime lists the current user is a member of
    pub async fn lists_stream(&self) -> ApplicationResult<ListStream> {
        let email = self.current_email()?;
        Ok(self.lists.lists_stream(&email).await?)
    }

    pub async fn get_list(&self, id: &ListId) -> ApplicationResult<ShoppingList> {
        Ok(self.lists.get_list(id).await?)
    }

    /// Create a list owned by the current user.
    ///
    /// Without an explicit context the name is used to guess one.
    #[instrument(skip(self))]
    pub async fn create_list(
        &self,
        name: &str,
        context: Option<ListContext>,
    ) -> ApplicationResult<ShoppingList> {
        let email = self.current_email()?;
        let context = context
            .or_else(|| ListContext::infer_from_text(name))
            .unwrap_or_default();

        let list = ShoppingList::new(name, context, email)?;
        self.lists.create_list(&list).await?;
        info!("Created list {} ({})", list.id(), list.context());
        Ok(list)
    }

    /// The current user leaves the list; the last member leaving deletes it
    #[instrument(skip(self))]
    pub async fn delete_list(&self, id: &ListId) -> ApplicationResult<MembershipChange> {
        let email = self.current_email()?;
        let mut list = self.lists.get_list(id).await?;

        let change = list.remove_member(&email);
        match change {
            MembershipChange::Deleted => {
                self.lists.delete_list(id).await?;
                info!("Deleted list {} after its last member left", id);
            }
            MembershipChange::Left => {
                self.lists.update_members(&list).await?;
                info!("Left shared list {}", id);
            }
            MembershipChange::NotAMember => {}
        }
        Ok(change)
    }

    /// Give another account access; returns false when it already had it
    #[instrument(skip(self))]
    pub async fn share_list(&self, id: &ListId, email: &str) -> ApplicationResult<bool> {
        self.current_email()?;
        let email = Email::parse(email)?;
        let mut list = self.lists.get_list(id).await?;

        if !list.share_with(email) {
            return Ok(false);
        }
        self.lists.update_members(&list).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use async_trait::async_trait;
    use domain::{DomainResult, UserAccount, UserId};
    use mockall::mock;

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

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    fn signed_in(raw: &'static str) -> MockAuth {
        let mut auth = MockAuth::new();
        auth.expect_current_user()
            .returning(move || Some(UserAccount::new(UserId::from("u1"), email(raw), true)));
        auth
    }

    fn use_case(lists: MockLists, auth: MockAuth) -> ListUseCase {
        ListUseCase::new(Arc::new(lists), Arc::new(auth))
    }

    #[tokio::test]
    async fn test_create_list_context_selection() {
        let mut lists = MockLists::new();
        lists.expect_create_list().times(3).returning(|_| Ok(()));
        let use_case = use_case(lists, signed_in("ana@example.com"));

        let inferred = use_case.create_list("Receta de paella", None).await.unwrap();
        assert_eq!(inferred.context(), ListContext::Recipe);
        assert!(inferred.is_member(&email("ana@example.com")));

        let fallback = use_case.create_list("Cosas varias", None).await.unwrap();
        assert_eq!(fallback.context(), ListContext::Purchase);

        let explicit = use_case
            .create_list("Receta de paella", Some(ListContext::Trip))
            .await
            .unwrap();
        assert_eq!(explicit.context(), ListContext::Trip);
    }

    #[tokio::test]
    async fn test_create_list_rejects_blank_name() {
        let use_case = use_case(MockLists::new(), signed_in("ana@example.com"));
        assert_eq!(
            use_case.create_list("   ", None).await,
            Err(ApplicationError::from(DomainError::EmptyName))
        );
    }

    #[tokio::test]
    async fn test_leaving_a_shared_list_updates_members() {
        let mut list =
            ShoppingList::new("Viaje", ListContext::Trip, email("ana@example.com")).unwrap();
        list.share_with(email("luis@example.com"));
        let id = list.id().clone();

        let mut lists = MockLists::new();
        lists.expect_get_list().returning(move |_| Ok(list.clone()));
        lists
            .expect_update_members()
            .withf(|list| list.shared_with().len() == 1)
            .times(1)
            .returning(|_| Ok(()));
        lists.expect_delete_list().never();

        let use_case = use_case(lists, signed_in("ana@example.com"));
        assert_eq!(use_case.delete_list(&id).await, Ok(MembershipChange::Left));
    }

    #[tokio::test]
    async fn test_last_member_deletes_the_list() {
        let list =
            ShoppingList::new("Cena", ListContext::Recipe, email("ana@example.com")).unwrap();
        let id = list.id().clone();

        let mut lists = MockLists::new();
        lists.expect_get_list().returning(move |_| Ok(list.clone()));
        lists.expect_delete_list().times(1).returning(|_| Ok(()));
        lists.expect_update_members().never();

        let use_case = use_case(lists, signed_in("ana@example.com"));
        assert_eq!(use_case.delete_list(&id).await, Ok(MembershipChange::Deleted));
    }

    #[tokio::test]
    async fn test_sharing_with_a_member_is_a_no_op() {
        let list =
            ShoppingList::new("Cena", ListContext::Recipe, email("ana@example.com")).unwrap();
        let id = list.id().clone();

        let mut lists = MockLists::new();
        lists.expect_get_list().returning(move |_| Ok(list.clone()));
        lists.expect_update_members().never();

        let use_case = use_case(lists, signed_in("ana@example.com"));
        assert_eq!(use_case.share_list(&id, "ANA@example.com").await, Ok(false));
        assert!(matches!(
            use_case.share_list(&id, "sin arroba").await,
            Err(ApplicationError::Domain(DomainError::InvalidEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_lists_stream_requires_a_user() {
        let mut auth = MockAuth::new();
        auth.expect_current_user().returning(|| None);

        let use_case = use_case(MockLists::new(), auth);
        assert!(matches!(
            use_case.lists_stream().await,
            Err(ApplicationError::Domain(DomainError::Unauthenticated))
        ));
    }
}
