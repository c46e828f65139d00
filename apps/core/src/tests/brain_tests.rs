//! Brain Module Tests
//!
//! Rule ordering and table behavior of the crisis, intent, category and style
//! classifiers on realistic student messages.

use crate::brain::{
    CannedReplies, CategoryClassifier, CrisisDetector, Intent, IntentClassifier, IntentTables,
    LanguageStyleDetector, RandomPicker, Style,
};

#[cfg(test)]
mod crisis_tests {
    use super::*;

    #[test]
    fn test_detects_self_harm_phrases_any_case() {
        let detector = CrisisDetector::new();

        let messages = vec![
            "I want to kill myself",
            "sometimes I think about SUICIDE",
            "i just want to end it all",
            "I've been thinking about self-harm again",
            "I keep wanting to hurt myself",
        ];

        for message in messages {
            assert!(detector.detect(message), "Expected crisis for '{}'", message);
        }
    }

    #[test]
    fn test_ordinary_distress_is_not_crisis() {
        let detector = CrisisDetector::new();

        assert!(!detector.detect("exam stress is killing me"));
        assert!(!detector.detect("I'm dying to finish this semester"));
    }

    #[test]
    fn test_custom_phrase_table() {
        let detector = CrisisDetector::with_phrases(["jump off"]).unwrap();
        assert!(detector.detect("I want to jump off the roof"));
        assert!(!detector.detect("I want to kill myself"));
    }
}

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    #[test]
    fn test_greetings() {
        let classifier = IntentClassifier::new();

        for greeting in ["hi", "Hello!", "hey", "Good morning.", "namaste", "ok", "??"] {
            assert_eq!(
                classifier.classify(greeting),
                Intent::Greeting,
                "Expected Greeting for '{}'",
                greeting
            );
        }
    }

    #[test]
    fn test_greeting_must_match_whole_text() {
        let classifier = IntentClassifier::new();
        // Starts with a greeting but carries real content
        assert_eq!(
            classifier.classify("hello I failed my exam and feel terrible"),
            Intent::Emotional
        );
    }

    #[test]
    fn test_rule_order_confusion_before_abuse() {
        let classifier = IntentClassifier::new();
        assert_eq!(
            classifier.classify("what do you mean, this is shit"),
            Intent::Confusion
        );
    }

    #[test]
    fn test_low_info_and_emotional() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("not good"), Intent::LowInfo);
        assert_eq!(classifier.classify("I can't focus on anything lately"), Intent::Emotional);
    }

    #[test]
    fn test_detailed_result_reports_match() {
        let classifier = IntentClassifier::new();
        let result = classifier.classify_detailed("huh? that made no sense");

        assert_eq!(result.intent, Intent::Confusion);
        assert!(result.matched.is_some());
    }

    #[test]
    fn test_custom_tables() {
        let tables = IntentTables::new(&["salaam"], &["???"], &["idiot"]).unwrap();
        let classifier = IntentClassifier::with_tables(tables);

        assert_eq!(classifier.classify("salaam"), Intent::Greeting);
        assert_eq!(classifier.classify("you are an idiot honestly"), Intent::Abuse);
        assert_eq!(classifier.classify("hello"), Intent::LowInfo);
    }

    #[test]
    fn test_every_canned_intent_has_replies() {
        let replies = CannedReplies::default();
        let picker = RandomPicker::seeded(3);

        for intent in [Intent::Greeting, Intent::Confusion, Intent::Abuse, Intent::LowInfo] {
            assert!(intent.is_canned());
            let reply = replies.pick(intent, &picker);
            assert!(replies.pool(intent).iter().any(|r| r == reply));
        }
        assert!(!Intent::Emotional.is_canned());
    }
}

#[cfg(test)]
mod category_and_style_tests {
    use super::*;

    #[test]
    fn test_categories_on_realistic_text() {
        let classifier = CategoryClassifier::new();

        let cases = vec![
            ("my DEADLINE is tonight and nothing works", "stress_academic"),
            ("I'm worried my parents will be disappointed", "anxiety_worry"),
            ("everything feels hopeless this week", "sadness_depression"),
            ("I honestly hate myself for this", "self_esteem"),
            ("my roommate keeps ignoring me", "general_support"),
        ];

        for (text, expected) in cases {
            assert_eq!(classifier.classify(text).as_str(), expected, "text: '{}'", text);
        }
    }

    #[test]
    fn test_style_is_independent_of_category() {
        let styles = LanguageStyleDetector::new();
        let categories = CategoryClassifier::new();
        let text = "yaar mujhe exam se bahut dar lag raha hai";

        assert_eq!(styles.detect(text), Style::CodeMixed);
        assert_eq!(categories.classify(text).as_str(), "stress_academic");
    }

    #[test]
    fn test_custom_style_markers() {
        let styles = LanguageStyleDetector::with_markers(["pas de"]).unwrap();
        assert_eq!(styles.detect("pas de souci"), Style::CodeMixed);
        assert_eq!(styles.detect("yaar"), Style::Primary);
    }
}
