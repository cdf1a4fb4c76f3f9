//! Response orchestration: validate the prompt, assemble the full prompt,
//! invoke the generation backend, then extract, truncate, and re-validate
//! the model output.
//!
//! Generation failures never surface as HTTP errors; they degrade to a fixed
//! apology string in a normal 200 response.

use crate::guardrails;
use crate::services::generation::GenerationService;

pub const FALLBACK_MESSAGE: &str =
    "Desculpe, não consegui gerar uma resposta no momento. Por favor, tente novamente mais tarde.";

/// Produce the user-facing reply for a validated-or-not incoming message.
pub async fn respond(
    generation: &GenerationService,
    max_response_chars: usize,
    message: &str,
    language: Option<&str>,
) -> String {
    let validation = guardrails::validate_prompt(message);
    if !validation.accepted {
        tracing::info!("Prompt rejected by guardrails");
        return validation.message;
    }

    let full_prompt = build_full_prompt(guardrails::system_prompt(), message, language);

    let output = match generation.generate(&full_prompt).await {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(error = %err, "Generation failed");
            return FALLBACK_MESSAGE.to_string();
        }
    };

    let Some(raw) = output.first_text() else {
        tracing::warn!("Generation returned no candidates");
        return FALLBACK_MESSAGE.to_string();
    };

    let extracted = extract_response(raw, &full_prompt);
    let truncated = truncate_response(&extracted, max_response_chars);

    // On rejection this substitutes the generic message; on acceptance it
    // carries the payload through.
    guardrails::validate_response(&truncated).message
}

/// System prompt + conversational framing + user prompt, as sent to the
/// generation backend. The language directive is concatenated here, not in
/// the system prompt provider.
pub fn build_full_prompt(system_prompt: &str, user_prompt: &str, language: Option<&str>) -> String {
    let mut system = system_prompt.to_string();
    if let Some(directive) = language_directive(language) {
        system.push_str("\n\n");
        system.push_str(directive);
    }
    format!("{system}\n\nUser: {user_prompt}\nAssistant:")
}

fn language_directive(language: Option<&str>) -> Option<&'static str> {
    match language.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("pt" | "pt-br" | "pt_br") => Some("Sempre responda em português."),
        Some("en") => Some("Always respond in English."),
        Some("es") => Some("Siempre responda en español."),
        _ => None,
    }
}

/// Strip the echoed prompt from raw model output.
///
/// Tried in order: exact prefix strip, the remainder after the first
/// `"Assistant:"` marker, removal of an interior prompt occurrence, then the
/// raw output verbatim.
pub fn extract_response(raw: &str, full_prompt: &str) -> String {
    if let Some(stripped) = raw.strip_prefix(full_prompt) {
        return stripped.trim().to_string();
    }

    if let Some((_, rest)) = raw.split_once("Assistant:") {
        if !rest.trim().is_empty() {
            return rest.trim().to_string();
        }
    }

    if raw.contains(full_prompt) {
        return raw.replacen(full_prompt, "", 1).trim().to_string();
    }

    raw.trim().to_string()
}

/// Cap the response at `max_chars` characters, snapping back to the last
/// period in the window to avoid mid-sentence cuts when one is present.
pub fn truncate_response(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind('.') {
        Some(idx) => format!("{}.", &cut[..idx]),
        None => cut,
    }
}
