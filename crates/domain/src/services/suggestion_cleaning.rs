//! Suggestion cleaning - turns free completion text into candidate names
//!
//! Runs before the duplicate filter. Each line is stripped of bullets and a
//! leading imperative verb, meta-commentary is rejected, and the survivors
//! are title-cased and de-duplicated within the batch.

use super::duplicate_detection::dedup_batch;

/// Imperative verbs the assistant likes to prefix items with
const VERB_STOPLIST: &[&str] = &[
    "comprar ",
    "preparar ",
    "cortar ",
    "organizar ",
    "armar ",
    "recordar ",
    "felicitar ",
    "hacer ",
];

/// Characters that mark a sentence or a heading rather than an item
const FORBIDDEN_CHARS: &[char] = &[':', '¡', '!', '?', '¿'];

/// Words that mark meta-commentary about the list itself
const META_WORDS: &[&str] = &["lista", "recuerda"];

/// Lines with this many tokens or more are prose, not item names
const MAX_TOKENS: usize = 6;

const BULLETS: &[char] = &['-', '•'];

/// Clean a raw completion text into an ordered list of item names
pub fn clean_suggestion_text(raw: &str) -> Vec<String> {
    clean_suggestion_lines(raw.lines())
}

/// Clean already-split lines, e.g. a JSON array returned by the assistant
pub fn clean_suggestion_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let accepted: Vec<String> = lines
        .into_iter()
        .filter_map(|line| clean_line(line.as_ref()))
        .collect();
    dedup_batch(&accepted)
}

/// Clean one line; `None` when the line is rejected
pub fn clean_line(line: &str) -> Option<String> {
    let mut text = line.trim();

    if let Some(rest) = text.strip_prefix(BULLETS) {
        text = rest.trim_start();
    }
    let text = strip_leading_verb(text).trim();

    if text.is_empty()
        || text.split_whitespace().count() >= MAX_TOKENS
        || text.contains(FORBIDDEN_CHARS)
        || mentions_meta_word(text)
    {
        return None;
    }

    Some(title_case(text))
}

/// Keep advisory tips readable: trimmed, bullet-free, non-empty, capped
pub fn clean_tips<I, S>(tips: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tips.into_iter()
        .map(|tip| {
            let tip = tip.as_ref().trim();
            tip.strip_prefix(BULLETS).unwrap_or(tip).trim().to_string()
        })
        .filter(|tip| !tip.is_empty())
        .take(limit)
        .collect()
}

/// Uppercase the first letter of every word and lowercase the rest
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn strip_leading_verb(text: &str) -> &str {
    VERB_STOPLIST
        .iter()
        .find(|verb| {
            text.get(..verb.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(verb))
        })
        .map_or(text, |verb| &text[verb.len()..])
}

fn mentions_meta_word(text: &str) -> bool {
    let lowered = text.to_lowercase();
    META_WORDS.iter().any(|word| lowered.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        assert_eq!(
            clean_suggestion_text("- Comprar Leche\n¿Vale?\nHarina"),
            vec!["Leche", "Harina"]
        );
    }

    #[test]
    fn test_strips_bullets_and_verbs() {
        assert_eq!(clean_line("• preparar masa"), Some("Masa".to_string()));
        assert_eq!(clean_line("-HACER reserva"), Some("Reserva".to_string()));
        assert_eq!(clean_line("  - aceite de OLIVA  "), Some("Aceite De Oliva".to_string()));
        // only one verb is stripped
        assert_eq!(clean_line("comprar comprar pan"), Some("Comprar Pan".to_string()));
        // verb without a following word is kept as the item itself
        assert_eq!(clean_line("Hacer"), Some("Hacer".to_string()));
    }

    #[test]
    fn test_rejects_prose_and_meta_commentary() {
        assert_eq!(clean_line("Ingredientes:"), None);
        assert_eq!(clean_line("¡Buen provecho!"), None);
        assert_eq!(clean_line("Aquí tienes tu lista"), None);
        assert_eq!(clean_line("Recuerda lavar las verduras"), None);
        assert_eq!(clean_line("uno dos tres cuatro cinco seis"), None);
        assert_eq!(
            clean_line("uno dos tres cuatro cinco"),
            Some("Uno Dos Tres Cuatro Cinco".to_string())
        );
        assert_eq!(clean_line("   "), None);
        assert_eq!(clean_line("-"), None);
    }

    #[test]
    fn test_dedups_within_batch() {
        let raw = "Tomate\n- tomate\nCebolla\nComprar TOMATE\n\nAjo";
        assert_eq!(clean_suggestion_text(raw), vec!["Tomate", "Cebolla", "Ajo"]);
    }

    #[test]
    fn test_clean_lines_from_array() {
        let lines = vec!["- Sal".to_string(), "Pimienta".to_string()];
        assert_eq!(clean_suggestion_lines(lines), vec!["Sal", "Pimienta"]);
    }

    #[test]
    fn test_clean_tips() {
        let tips = ["  - Revisa la despensa ", "", "Compra fruta de temporada", "Tercero"];
        assert_eq!(
            clean_tips(tips, 2),
            vec!["Revisa la despensa", "Compra fruta de temporada"]
        );
    }

    #[test]
    fn test_title_case_handles_unicode() {
        assert_eq!(title_case("ñame   ÁCIDO"), "Ñame Ácido");
    }
}
