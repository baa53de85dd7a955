//! Prompt templates per list context
//!
//! Prompts are Spanish, matching the verb stoplist applied to the answers.
//! Suggestion answers are plain text, one item per line. Analysis answers
//! are a JSON object.

use domain::services::clean_suggestion_lines;
use domain::{
    AnalysisRequest, AnalysisResult, DomainError, DomainResult, ListContext, SuggestionRequest,
};
use serde::Deserialize;

/// Rendered `(system, user)` prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

const LINE_FORMAT_RULES: &str = "Responde solo con una lista de texto plano, \
un elemento por línea. No incluyas explicaciones, cantidades, numeración ni títulos.";

fn system_prompt(context: ListContext) -> String {
    let role = match context {
        ListContext::Recipe => {
            "Eres un asistente de cocina que conoce los ingredientes de cualquier plato."
        }
        ListContext::Event => "Eres un organizador de eventos práctico y detallista.",
        ListContext::Purchase => "Eres un asistente de compras que ayuda a no olvidar productos.",
        ListContext::Project => {
            "Eres un jefe de proyecto que sabe qué materiales y tareas hacen falta."
        }
        ListContext::Trip => "Eres un viajero experto que sabe qué meter en la maleta.",
        ListContext::Ideas => "Eres un asistente creativo que propone ideas concretas.",
        ListContext::Routine => {
            "Eres un asistente que ayuda a organizar rutinas y tareas recurrentes."
        }
    };
    format!("{role} La lista contiene {}.", context.description())
}

fn subject_instruction(context: ListContext, subject: &str) -> String {
    match context {
        ListContext::Recipe => format!(
            "Dame solo los ingredientes necesarios para preparar el plato \"{subject}\". \
             Solo los nombres de los ingredientes."
        ),
        ListContext::Event => format!("Dame las cosas necesarias para organizar \"{subject}\"."),
        ListContext::Purchase => {
            format!("Dame los productos que suelen comprarse para \"{subject}\".")
        }
        ListContext::Project => {
            format!("Dame los materiales y tareas necesarios para \"{subject}\".")
        }
        ListContext::Trip => format!("Dame las cosas que hay que llevar para \"{subject}\"."),
        ListContext::Ideas => format!("Dame ideas breves relacionadas con \"{subject}\"."),
        ListContext::Routine => format!("Dame las tareas de una rutina para \"{subject}\"."),
    }
}

fn avoid_clause(recent: &[String]) -> Option<String> {
    (!recent.is_empty()).then(|| format!("No repitas estos elementos: {}.", recent.join(", ")))
}

pub fn suggestion_prompt(request: &SuggestionRequest) -> PromptPair {
    let mut user = vec![
        subject_instruction(request.context, request.subject.trim()),
        format!("La lista se llama \"{}\".", request.list_name),
    ];
    user.extend(avoid_clause(&request.recently_suggested));
    user.push(LINE_FORMAT_RULES.to_string());

    PromptPair {
        system: system_prompt(request.context),
        user: user.join("\n"),
    }
}

pub fn analysis_prompt(request: &AnalysisRequest) -> PromptPair {
    let listed = |names: &[String]| {
        if names.is_empty() {
            "(ninguno)".to_string()
        } else {
            names.join(", ")
        }
    };

    let mut user = vec![
        format!("Analiza la lista \"{}\".", request.list_name),
        format!("Pendientes: {}.", listed(&request.pending)),
        format!("Completados: {}.", listed(&request.done)),
        "Indica qué elementos faltan y da consejos breves.".to_string(),
    ];
    user.extend(avoid_clause(&request.recently_suggested));
    user.push(
        "Responde solo con un objeto JSON con la forma \
{\"suggestions\": [\"elemento\"], \"tips\": [\"consejo\"]} y nada más."
            .to_string(),
    );

    PromptPair {
        system: system_prompt(request.context),
        user: user.join("\n"),
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    tips: Vec<String>,
}

/// Decode an analysis answer, tolerating code fences and text around the
/// JSON object. Suggestions go through the usual line cleaning.
pub fn parse_analysis(content: &str) -> DomainResult<AnalysisResult> {
    let body = strip_code_fences(content);
    let json = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => {
            return Err(DomainError::MalformedResponse(
                "analysis answer contains no JSON object".to_string(),
            ))
        }
    };

    let raw: RawAnalysis = serde_json::from_str(json)
        .map_err(|e| DomainError::MalformedResponse(format!("analysis answer: {e}")))?;

    Ok(AnalysisResult {
        suggestions: clean_suggestion_lines(raw.suggestions),
        tips: raw.tips,
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the language tag line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
