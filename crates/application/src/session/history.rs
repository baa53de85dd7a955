use domain::services::dedup_batch;
use domain::value_objects::normalize_name;
use domain::ListId;
use std::collections::{HashMap, VecDeque};

/// Names the assistant produced recently, per list, oldest evicted first.
///
/// Sent back with every request so the assistant avoids repeating itself.
#[derive(Debug, Clone)]
pub struct SuggestionHistory {
    limit: usize,
    per_list: HashMap<ListId, VecDeque<String>>,
}

impl SuggestionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            per_list: HashMap::new(),
        }
    }

    /// Remember `names` for `list_id`; re-recording a name refreshes it
    pub fn record<S: AsRef<str>>(&mut self, list_id: &ListId, names: &[S]) {
        if self.limit == 0 || names.is_empty() {
            return;
        }

        let entries = self.per_list.entry(list_id.clone()).or_default();
        for name in dedup_batch(names) {
            let normalized = normalize_name(&name);
            entries.retain(|existing| normalize_name(existing) != normalized);
            entries.push_back(name);
        }
        while entries.len() > self.limit {
            entries.pop_front();
        }
    }

    /// Recent names for `list_id`, oldest first
    pub fn recent(&self, list_id: &ListId) -> Vec<String> {
        self.per_list
            .get(list_id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn forget(&mut self, list_id: &ListId) {
        self.per_list.remove(list_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded_per_list() {
        let mut history = SuggestionHistory::new(3);
        let a = ListId::from("a");
        let b = ListId::from("b");

        history.record(&a, &["Leche", "Pan"]);
        history.record(&a, &["Huevos", "Sal"]);
        history.record(&b, &["Tienda"]);

        assert_eq!(history.recent(&a), vec!["Pan", "Huevos", "Sal"]);
        assert_eq!(history.recent(&b), vec!["Tienda"]);
    }

    #[test]
    fn test_rerecording_moves_name_to_the_end() {
        let mut history = SuggestionHistory::new(5);
        let list = ListId::from("a");

        history.record(&list, &["Leche", "Pan"]);
        history.record(&list, &["leche"]);

        assert_eq!(history.recent(&list), vec!["Pan", "leche"]);
    }

    #[test]
    fn test_zero_limit_records_nothing() {
        let mut history = SuggestionHistory::new(0);
        let list = ListId::from("a");
        history.record(&list, &["Leche"]);
        assert!(history.recent(&list).is_empty());

        history.forget(&list);
        assert!(history.recent(&list).is_empty());
    }
}
