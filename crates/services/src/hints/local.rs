use async_trait::async_trait;

use super::{HintProvider, HintRequest};
use crate::error::HintError;

/// Characters kept when the explanation has no sentence break.
const FALLBACK_CHAR_LIMIT: usize = 200;

/// First sentence of `explanation`: the text before the first `". "` plus its period,
/// or the first 200 characters when there is no such break.
#[must_use]
pub fn first_sentence(explanation: &str) -> String {
    match explanation.split_once(". ") {
        Some((first, _)) => format!("{first}."),
        None => explanation.chars().take(FALLBACK_CHAR_LIMIT).collect(),
    }
}

/// Deterministic hint built from the explanation alone.
#[must_use]
pub fn fallback_hint(explanation: &str) -> String {
    format!(
        "💡 Hint: {} Think carefully about this information.",
        first_sentence(explanation)
    )
}

/// Provider that never leaves the process.
///
/// Used when no live provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHintProvider;

#[async_trait]
impl HintProvider for LocalHintProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn hint(&self, request: &HintRequest<'_>) -> Result<String, HintError> {
        Ok(fallback_hint(request.explanation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_sentence() {
        let hint = fallback_hint("Paris is the capital of France. It is large.");
        assert!(hint.contains("Paris is the capital of France."));
        assert!(!hint.contains("It is large"));
        assert_eq!(
            hint,
            "💡 Hint: Paris is the capital of France. Think carefully about this information."
        );
    }

    #[test]
    fn truncates_without_sentence_break() {
        let long = "x".repeat(500);
        assert_eq!(first_sentence(&long).len(), 200);
        assert_eq!(first_sentence("No break here"), "No break here");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let accented = "é".repeat(300);
        assert_eq!(first_sentence(&accented).chars().count(), 200);
    }

    #[tokio::test]
    async fn local_provider_uses_fallback_text() {
        let options = ["a", "b", "c", "d"].map(String::from);
        let request = HintRequest {
            question: "Q?",
            options: &options,
            explanation: "Water boils at 100 C at sea level. Less at altitude.",
        };
        let hint = LocalHintProvider.hint(&request).await.unwrap();
        assert_eq!(hint, fallback_hint(request.explanation));
    }
}
