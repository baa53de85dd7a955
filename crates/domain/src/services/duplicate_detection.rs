//! Duplicate detection - the uniqueness rule for item names within a list
//!
//! Items reach a list from manual entry, assistant batches and realtime
//! pushes. All three paths go through these functions so that names stay
//! unique after trimming and lowercasing.

use std::collections::HashSet;

use crate::entities::{ItemId, ListItem};
use crate::value_objects::normalize_name;

/// True when `candidate` matches an existing item's normalized name.
///
/// `excluding` skips the item with that id so an item being edited does not
/// collide with itself. Exact match only, O(n).
pub fn is_duplicate(candidate: &str, existing: &[ListItem], excluding: Option<&ItemId>) -> bool {
    let normalized = normalize_name(candidate);
    existing
        .iter()
        .filter(|item| excluding != Some(item.id()))
        .any(|item| item.normalized_name() == normalized)
}

/// Keep the candidates that do not collide with an existing item.
///
/// Stable filter: surviving candidates keep their relative order and
/// candidates are not de-duplicated against each other.
pub fn filter_new_suggestions<S: AsRef<str>>(
    candidates: &[S],
    existing: &[ListItem],
) -> Vec<String> {
    partition_suggestions(candidates, existing).0
}

/// Split candidates into `(new, colliding)`, both in input order
pub fn partition_suggestions<S: AsRef<str>>(
    candidates: &[S],
    existing: &[ListItem],
) -> (Vec<String>, Vec<String>) {
    let taken: HashSet<String> = existing.iter().map(ListItem::normalized_name).collect();

    candidates
        .iter()
        .map(|candidate| candidate.as_ref().to_string())
        .partition(|candidate| !taken.contains(&normalize_name(candidate)))
}

/// Remove candidates that repeat an earlier one, keeping first-seen order
pub fn dedup_batch<S: AsRef<str>>(candidates: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .filter(|candidate| seen.insert(normalize_name(candidate)))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ListId;

    fn items(names: &[&str]) -> Vec<ListItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ListItem::new(ListId::from("list"), name, i as i64).unwrap())
            .collect()
    }

    #[test]
    fn test_is_duplicate_normalizes() {
        let existing = items(&["Tomate", "Aceite de oliva"]);
        assert!(is_duplicate("  tomate ", &existing, None));
        assert!(is_duplicate("ACEITE DE OLIVA", &existing, None));
        assert!(!is_duplicate("Tomates", &existing, None));
        assert!(!is_duplicate("Tomate", &[], None));
    }

    #[test]
    fn test_is_duplicate_skips_excluded_item() {
        let existing = items(&["Tomate", "Cebolla"]);
        let tomato_id = existing[0].id().clone();
        assert!(!is_duplicate("tomate", &existing, Some(&tomato_id)));
        assert!(is_duplicate("cebolla", &existing, Some(&tomato_id)));
    }

    #[test]
    fn test_filter_new_suggestions_against_existing() {
        let existing = items(&["Tomate"]);
        let filtered = filter_new_suggestions(&["Tomate", "tomate", "Cebolla"], &existing);
        assert_eq!(filtered, vec!["Cebolla".to_string()]);
    }

    #[test]
    fn test_filter_keeps_candidate_duplicates_and_order() {
        let filtered = filter_new_suggestions(&["Sal", "Ajo", "sal"], &[]);
        assert_eq!(filtered, vec!["Sal", "Ajo", "sal"]);
    }

    #[test]
    fn test_partition_reports_ignored() {
        let existing = items(&["Leche", "Pan"]);
        let (new, ignored) = partition_suggestions(&["pan", "Huevos", "LECHE"], &existing);
        assert_eq!(new, vec!["Huevos"]);
        assert_eq!(ignored, vec!["pan", "LECHE"]);
    }

    #[test]
    fn test_dedup_batch_keeps_first_seen() {
        assert_eq!(
            dedup_batch(&["Tomate", "tomate ", "Cebolla", "TOMATE"]),
            vec!["Tomate", "Cebolla"]
        );
    }
}
