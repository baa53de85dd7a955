//! Item ordering - append-at-end keys and explicit reorders

use crate::entities::ListItem;
use crate::errors::{DomainError, DomainResult};

/// Order key for an item appended at the end: `max + 1`, or 0 when empty.
///
/// Keys are not contiguous after deletions; only [`move_item`] rewrites them.
/// Keys come from the store, so `i64::MAX` is possible and yields
/// `OrderOverflow` instead of a key that would sort first.
pub fn next_order(existing: &[ListItem]) -> DomainResult<i64> {
    match existing.iter().map(ListItem::order).max() {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or(DomainError::OrderOverflow { max }),
    }
}

/// Move the item at `from` to position `to` and rewrite every order key to
/// its index.
pub fn move_item(items: &mut Vec<ListItem>, from: usize, to: usize) -> DomainResult<()> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(DomainError::InvalidMove { from, to, len });
    }

    let item = items.remove(from);
    items.insert(to, item);
    reassign_orders(items);
    Ok(())
}

/// Rewrite order keys to `0..n` following the current slice order
pub fn reassign_orders(items: &mut [ListItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as i64);
    }
}

/// Sort items by order key, ties broken by name for a stable display
pub fn sort_by_order(items: &mut [ListItem]) {
    items.sort_by(|a, b| {
        a.order()
            .cmp(&b.order())
            .then_with(|| a.normalized_name().cmp(&b.normalized_name()))
    });
}
