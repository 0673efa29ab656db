use serde::Serialize;

use quiz_core::model::{Lifeline, OPTION_COUNT, OptionPosition};

/// Which lifelines are still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Supports {
    pub fifty_fifty: bool,
    pub change_question: bool,
    pub ai_support: bool,
}

impl Supports {
    #[must_use]
    pub fn is_available(&self, lifeline: Lifeline) -> bool {
        match lifeline {
            Lifeline::FiftyFifty => self.fifty_fifty,
            Lifeline::ChangeQuestion => self.change_question,
            Lifeline::AiSupport => self.ai_support,
        }
    }

    /// Available lifelines in menu order.
    #[must_use]
    pub fn available(&self) -> Vec<Lifeline> {
        Lifeline::ALL
            .into_iter()
            .filter(|l| self.is_available(*l))
            .collect()
    }
}

/// What a player may see of a session in progress.
///
/// Never carries the correct position or the explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicState {
    pub level: u32,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub removed_options: Vec<OptionPosition>,
    pub supports: Supports,
}

impl PublicState {
    #[must_use]
    pub fn is_removed(&self, position: OptionPosition) -> bool {
        self.removed_options.contains(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_lists_only_unused() {
        let supports = Supports {
            fifty_fifty: false,
            change_question: true,
            ai_support: true,
        };
        assert_eq!(
            supports.available(),
            vec![Lifeline::ChangeQuestion, Lifeline::AiSupport]
        );
    }

    #[test]
    fn serialized_view_has_no_answer_fields() {
        let state = PublicState {
            level: 1,
            question: "Q?".into(),
            options: ["a", "b", "c", "d"].map(String::from),
            removed_options: vec![OptionPosition::B, OptionPosition::D],
            supports: Supports {
                fifty_fifty: false,
                change_question: true,
                ai_support: true,
            },
        };
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("correct").is_none());
        assert!(json.get("explanation").is_none());
        assert_eq!(json["removed_options"], serde_json::json!([2, 4]));
    }
}
