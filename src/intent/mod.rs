//! Keyword-driven chat intent classification.

pub mod action;
pub mod rules;
pub mod vocabulary;

pub use action::{
    ActionKind, ChatAction, ChatReply, FieldFilter, GroupBy, Intent, MetadataRequest, Mode,
    ViewKind,
};
pub use rules::{Message, Rule, RULES};
pub use vocabulary::{PropertyRule, Vocabulary};

use tracing::debug;

const ISOLATE_REPLY: &str = "요청하신 벽체만 추출하여 화면에 표시했습니다.";
const STATS_REPLY: &str = "벽체 두께와 체적을 계산해 표로 정리합니다.";
const METADATA_REPLY: &str = "모델 정보를 확인하고 있습니다...";
const EMPTY_REPLY: &str = "무엇을 도와드릴까요?";

/// Classifies chat messages against a vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    vocabulary: Vocabulary,
}

impl Classifier {
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Runs the rule cascade over the trimmed message.
    ///
    /// # Example
    ///
    /// ```
    /// use bim_assistant::intent::{Classifier, Intent};
    ///
    /// let classifier = Classifier::default();
    /// assert!(matches!(classifier.classify("벽 두께 체적 표"), Intent::WallStats { .. }));
    /// assert_eq!(classifier.classify("날씨 어때?"), Intent::None);
    /// ```
    #[must_use]
    pub fn classify(&self, message: &str) -> Intent {
        let message = Message::new(message.trim());
        if message.raw.is_empty() {
            return Intent::None;
        }

        for rule in RULES {
            if let Some(intent) = (rule.detect)(&self.vocabulary, &message) {
                debug!(rule = rule.name, "intent rule fired");
                return intent;
            }
        }
        debug!("no intent rule fired");
        Intent::None
    }

    /// Reply text and action for a chat message.
    #[must_use]
    pub fn respond(&self, message: &str) -> ChatReply {
        let intent = self.classify(message);
        ChatReply {
            reply: reply_text(&intent, message.trim()),
            action: intent.to_action(),
        }
    }
}

/// Canned reply for an intent. Unrecognised messages are echoed back.
#[must_use]
pub fn reply_text(intent: &Intent, message: &str) -> String {
    match intent {
        Intent::FilterIsolate { .. } => ISOLATE_REPLY.to_string(),
        Intent::WallStats { .. } => STATS_REPLY.to_string(),
        Intent::MetadataRequest(_) => METADATA_REPLY.to_string(),
        Intent::None if message.is_empty() => EMPTY_REPLY.to_string(),
        Intent::None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stats_rule_outranks_isolate_rule() {
        let classifier = Classifier::default();
        let intent = classifier.classify("벽 두께 체적 표만 보여줘");
        assert_eq!(
            intent,
            Intent::WallStats {
                category: "Revit 벽".to_string()
            }
        );
    }

    #[test]
    fn no_wall_keyword_means_no_intent() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("날씨 어때?"), Intent::None);
        assert_eq!(classifier.classify("   "), Intent::None);
    }

    #[test]
    fn respond_uses_canned_replies() {
        let classifier = Classifier::default();

        let isolate = classifier.respond("벽만 보여줘");
        assert_eq!(isolate.reply, ISOLATE_REPLY);
        assert_eq!(isolate.action.map(|a| a.action), Some(ActionKind::Filter));

        let echo = classifier.respond("  안녕하세요 ");
        assert_eq!(echo.reply, "안녕하세요");
        assert_eq!(echo.action, None);

        assert_eq!(classifier.respond("").reply, EMPTY_REPLY);
    }

    #[test]
    fn custom_vocabulary_changes_category_label() {
        let classifier = Classifier::new(Vocabulary {
            wall_category: "Walls".to_string(),
            ..Vocabulary::default()
        });
        assert_eq!(classifier.classify("wall volume count").category(), Some("Walls"));
    }
}
