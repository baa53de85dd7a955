//! ListItem - a single entry of a list (product, task or ingredient)

use serde::{Deserialize, Serialize};

use super::{ItemId, ListId};
use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{is_blank, normalize_name};

/// Item owned by the remote store and cached locally through snapshots.
///
/// The normalized name is unique within a list, but that rule needs the
/// sibling items and is enforced by the orchestration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    id: ItemId,
    list_id: ListId,
    name: String,
    is_done: bool,
    /// Manual ordering key, ascending
    order: i64,
    added_by_ai: bool,
    /// Dish or request the assistant batch came from
    source_dish: Option<String>,
}

impl ListItem {
    /// Create a manually entered item
    pub fn new(list_id: ListId, name: &str, order: i64) -> DomainResult<Self> {
        if is_blank(name) {
            return Err(DomainError::EmptyName);
        }

        Ok(Self {
            id: ItemId::generate(),
            list_id,
            name: name.trim().to_string(),
            is_done: false,
            order,
            added_by_ai: false,
            source_dish: None,
        })
    }

    /// Create an item that came from an assistant suggestion batch
    pub fn suggested(
        list_id: ListId,
        name: &str,
        order: i64,
        source_dish: Option<String>,
    ) -> DomainResult<Self> {
        let mut item = Self::new(list_id, name, order)?;
        item.added_by_ai = true;
        item.source_dish = source_dish
            .map(|dish| dish.trim().to_string())
            .filter(|dish| !dish.is_empty());
        Ok(item)
    }

    /// Reconstruct an item read back from storage
    pub fn restore(
        id: ItemId,
        list_id: ListId,
        name: String,
        is_done: bool,
        order: i64,
        added_by_ai: bool,
        source_dish: Option<String>,
    ) -> Self {
        Self {
            id,
            list_id,
            name,
            is_done,
            order,
            added_by_ai,
            source_dish,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn list_id(&self) -> &ListId {
        &self.list_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn added_by_ai(&self) -> bool {
        self.added_by_ai
    }

    pub fn source_dish(&self) -> Option<&str> {
        self.source_dish.as_deref()
    }

    pub fn toggle_done(&mut self) {
        self.is_done = !self.is_done;
    }

    pub fn set_done(&mut self, done: bool) {
        self.is_done = done;
    }

    /// Replace the name; the duplicate check is the caller's job
    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        if is_blank(name) {
            return Err(DomainError::EmptyName);
        }
        self.name = name.trim().to_string();
        Ok(())
    }

    pub fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_trims_and_validates() {
        let item = ListItem::new(ListId::from("l1"), "  Leche ", 3).unwrap();
        assert_eq!(item.name(), "Leche");
        assert_eq!(item.order(), 3);
        assert!(!item.is_done());
        assert!(!item.added_by_ai());

        assert_eq!(
            ListItem::new(ListId::from("l1"), "   ", 0),
            Err(DomainError::EmptyName)
        );
    }

    #[test]
    fn test_suggested_item_keeps_provenance() {
        let item =
            ListItem::suggested(ListId::from("l1"), "Harina", 0, Some(" Bizcocho ".into()))
                .unwrap();
        assert!(item.added_by_ai());
        assert_eq!(item.source_dish(), Some("Bizcocho"));

        let item = ListItem::suggested(ListId::from("l1"), "Harina", 0, Some("  ".into())).unwrap();
        assert_eq!(item.source_dish(), None);
    }

    #[test]
    fn test_toggle_and_rename() {
        let mut item = ListItem::new(ListId::from("l1"), "Pan", 0).unwrap();
        item.toggle_done();
        assert!(item.is_done());
        item.toggle_done();
        assert!(!item.is_done());

        item.rename(" Pan integral ").unwrap();
        assert_eq!(item.name(), "Pan integral");
        assert_eq!(item.rename(""), Err(DomainError::EmptyName));
        assert_eq!(item.name(), "Pan integral");
    }
}
