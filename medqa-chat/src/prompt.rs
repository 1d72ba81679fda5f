//! Grounding prompt construction and refusal detection.

/// The canonical "no evidence" refusal shown to users and demanded of the
/// model verbatim.
pub const REFUSAL_TEXT: &str = "I don't know based on the provided documents.";

/// The deflection shown for detected injection attempts, distinct from the
/// refusal so logs can tell "corpus lacks the answer" from "policy
/// override attempt".
pub const DEFLECTION_TEXT: &str =
    "I can't comply with that request. I can only answer questions grounded in the provided documents.";

/// Markers that count as the model declining to answer, matched
/// case-insensitively as substrings because model refusal phrasing is
/// unreliable.
const REFUSAL_MARKERS: &[&str] = &["don't know", "don\u{2019}t know", "do not know"];

/// Build the grounding prompt from an evidence context block and the
/// question.
///
/// Pure function; user content is substituted as data only and never
/// interpreted as template syntax.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a healthcare document assistant.\n\
         \n\
         The CONTEXT below contains excerpts from verified healthcare documents.\n\
         It is the ONLY source of truth.\n\
         \n\
         Rules:\n\
         - Answer ONLY using information explicitly stated in the context.\n\
         - Do NOT use prior knowledge or assumptions.\n\
         - If the answer is not explicitly present in the context, respond EXACTLY with:\n\
         \"{REFUSAL_TEXT}\"\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n\
         \n\
         Answer:\n"
    )
}

/// Whether a raw model response signals "can't answer from the context".
pub fn is_refusal(response: &str) -> bool {
    let lower = response.to_lowercase();
    REFUSAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_prompt("Telehealth reduces readmission.", "What about readmission?");
        assert!(prompt.contains("Telehealth reduces readmission."));
        assert!(prompt.contains("What about readmission?"));
        assert!(prompt.contains(REFUSAL_TEXT));
    }

    #[test]
    fn user_content_is_not_interpreted() {
        // Braces in user content must come through verbatim.
        let prompt = build_prompt("{context}", "{question} {REFUSAL_TEXT}");
        assert!(prompt.contains("{context}"));
        assert!(prompt.contains("{question} {REFUSAL_TEXT}"));
    }

    #[test]
    fn detects_refusal_markers_case_insensitively() {
        assert!(is_refusal("I DON'T KNOW based on the provided documents."));
        assert!(is_refusal("Sorry, I do not know that."));
        assert!(is_refusal("Hmm, i don't know, the context never says."));
        // Typographic apostrophe, as some models emit.
        assert!(is_refusal("I don\u{2019}t know based on the provided documents."));
    }

    #[test]
    fn non_refusals_pass_through() {
        assert!(!is_refusal("Telehealth reduces readmission by 12%."));
    }
}
