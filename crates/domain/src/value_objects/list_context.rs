//! ListContext - closed category describing what a list is for
//!
//! The context selects the assistant prompt behaviour. Inference from free
//! text is a keyword heuristic kept apart from prompt construction.

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListContext {
    /// Ingredients for a dish
    Recipe,
    /// Birthday, party, wedding
    Event,
    /// Plain shopping
    #[default]
    Purchase,
    /// Materials and tasks for a project
    Project,
    /// Packing list
    Trip,
    /// Brainstorm
    Ideas,
    /// Recurring chores
    Routine,
}

/// Keyword table for [`ListContext::infer_from_text`], checked in order.
const CONTEXT_KEYWORDS: &[(ListContext, &[&str])] = &[
    (
        ListContext::Recipe,
        &[
            "receta", "cocinar", "cena", "comida", "almuerzo", "desayuno", "postre", "tarta",
            "paella",
        ],
    ),
    (
        ListContext::Event,
        &[
            "cumpleaños", "fiesta", "boda", "evento", "celebración", "navidad", "aniversario",
            "barbacoa",
        ],
    ),
    (
        ListContext::Trip,
        &["viaje", "vacaciones", "maleta", "equipaje", "excursión", "camping", "playa"],
    ),
    (
        ListContext::Project,
        &["proyecto", "reforma", "mudanza", "obra", "bricolaje"],
    ),
    (
        ListContext::Routine,
        &["rutina", "diario", "diaria", "semanal", "mensual", "hábitos", "tareas"],
    ),
    (ListContext::Ideas, &["ideas", "idea", "lluvia de ideas", "inspiración"]),
    (
        ListContext::Purchase,
        &["compra", "supermercado", "mercado", "súper", "tienda"],
    ),
];

impl ListContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListContext::Recipe => "recipe",
            ListContext::Event => "event",
            ListContext::Purchase => "purchase",
            ListContext::Project => "project",
            ListContext::Trip => "trip",
            ListContext::Ideas => "ideas",
            ListContext::Routine => "routine",
        }
    }

    /// Human-readable description used in prompts and UI pickers
    pub fn description(&self) -> &'static str {
        match self {
            ListContext::Recipe => "ingredientes para preparar un plato",
            ListContext::Event => "cosas necesarias para organizar un evento",
            ListContext::Purchase => "productos para una compra",
            ListContext::Project => "materiales y tareas de un proyecto",
            ListContext::Trip => "cosas para llevar en un viaje",
            ListContext::Ideas => "ideas relacionadas con un tema",
            ListContext::Routine => "tareas de una rutina",
        }
    }

    pub fn all() -> [ListContext; 7] {
        [
            ListContext::Recipe,
            ListContext::Event,
            ListContext::Purchase,
            ListContext::Project,
            ListContext::Trip,
            ListContext::Ideas,
            ListContext::Routine,
        ]
    }

    /// Guess the context from a list name or request text.
    ///
    /// Pure keyword heuristic: lowercases the text and returns the first
    /// context whose keyword appears as a word prefix. Prone to false
    /// positives, so callers only use it when no explicit context was given.
    pub fn infer_from_text(text: &str) -> Option<ListContext> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        CONTEXT_KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                keywords.iter().any(|keyword| {
                    if keyword.contains(' ') {
                        lowered.contains(keyword)
                    } else {
                        words.iter().any(|word| word.starts_with(keyword))
                    }
                })
            })
            .map(|(context, _)| *context)
    }
}

impl fmt::Display for ListContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListContext {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListContext::all()
            .into_iter()
            .find(|context| context.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::not_found("list context", s))
    }
}
