use serde_json::Value;
use std::cmp::Ordering;

use super::{CollectionPath, Document};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Array field holds `value`
    ArrayContains { field: String, value: Value },
    Equals { field: String, value: Value },
}

impl Filter {
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::ArrayContains { field, value } => document
                .fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|values| values.contains(value)),
            Filter::Equals { field, value } => document.fields.get(field) == Some(value),
        }
    }
}

/// Documents of one collection, filtered and ordered ascending by one field
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: CollectionPath,
    pub filters: Vec<Filter>,
    pub order_by: Option<String>,
}

impl Query {
    pub fn collection(collection: CollectionPath) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
        }
    }

    pub fn array_contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::ArrayContains {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn equals(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equals {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by = Some(field.to_string());
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.path.collection() == self.collection
            && self.filters.iter().all(|filter| filter.matches(document))
    }

    /// Sort by the order field; documents missing it go last, ties by id
    pub fn sort(&self, documents: &mut [Document]) {
        let Some(field) = &self.order_by else {
            return;
        };
        documents.sort_by(|a, b| {
            compare_values(a.fields.get(field), b.fields.get(field))
                .then_with(|| a.id().cmp(b.id()))
        });
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
