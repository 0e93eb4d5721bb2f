//! Keyword classifier for feeling statements.
//!
//! Both checks lower-case the text and match raw substrings; nothing is
//! tokenized, so "không muốn sống" matches anywhere inside a sentence.

use crate::triage::models::IssueCategory;

/// Phrases that signal self-harm risk.
const CRISIS_KEYWORDS: &[&str] = &[
    "muốn chết",
    "tự tử",
    "chán sống",
    "không muốn sống",
    "kết thúc",
    "không chịu được nữa",
    "tự làm hại",
];

/// Study/career context words. Any of these cancels a crisis match.
///
/// NOTE: this also cancels genuine crisis statements that mention school or
/// work in passing. The suicidal flag on the form is not affected.
const CRISIS_EXCLUSIONS: &[&str] = &["học", "tương lai", "định hướng", "nghề", "trường"];

/// Issue rules, checked top to bottom. First match wins.
const ISSUE_RULES: &[(IssueCategory, &[&str])] = &[
    (IssueCategory::Stress, &["căng thẳng", "stress"]),
    (IssueCategory::Sadness, &["buồn", "mất động lực"]),
    (IssueCategory::Anxiety, &["lo lắng", "sợ"]),
    (IssueCategory::Burnout, &["mệt", "kiệt sức"]),
];

/// Returns true when the text contains a crisis phrase and no exclusion word.
pub fn is_crisis(feeling: &str) -> bool {
    let text = feeling.to_lowercase();
    contains_any(&text, CRISIS_KEYWORDS) && !contains_any(&text, CRISIS_EXCLUSIONS)
}

/// Returns the first issue whose keywords appear in the text, else `General`.
pub fn detect_issue(feeling: &str) -> IssueCategory {
    let text = feeling.to_lowercase();
    ISSUE_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(issue, _)| *issue)
        .unwrap_or(IssueCategory::General)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_phrase_without_exclusion_is_crisis() {
        assert!(is_crisis("mình không muốn sống nữa"));
        assert!(is_crisis("Tôi MUỐN CHẾT"));
        assert!(is_crisis("hay là kết thúc mọi thứ"));
    }

    #[test]
    fn test_exclusion_word_overrides_crisis_phrase() {
        assert!(!is_crisis("mình không muốn sống, chỉ là chuyện học"));
        assert!(!is_crisis("muốn kết thúc năm học cho xong"));
        assert!(!is_crisis("không chịu được nữa với cái nghề này"));
    }

    #[test]
    fn test_text_without_crisis_phrase_is_not_crisis() {
        assert!(!is_crisis("hôm nay trời đẹp"));
        assert!(!is_crisis(""));
    }

    #[test]
    fn test_stress_wins_over_sadness() {
        assert_eq!(detect_issue("căng thẳng và buồn"), IssueCategory::Stress);
        assert_eq!(detect_issue("buồn và căng thẳng"), IssueCategory::Stress);
    }

    #[test]
    fn test_each_issue_rule_matches() {
        assert_eq!(detect_issue("Công việc quá STRESS"), IssueCategory::Stress);
        assert_eq!(detect_issue("mình mất động lực"), IssueCategory::Sadness);
        assert_eq!(detect_issue("mình lo lắng về kỳ thi"), IssueCategory::Anxiety);
        assert_eq!(detect_issue("mình kiệt sức rồi"), IssueCategory::Burnout);
    }

    #[test]
    fn test_sadness_wins_over_anxiety_and_burnout() {
        assert_eq!(detect_issue("buồn, sợ và mệt"), IssueCategory::Sadness);
        assert_eq!(detect_issue("sợ và mệt"), IssueCategory::Anxiety);
    }

    #[test]
    fn test_no_keyword_is_general() {
        assert_eq!(detect_issue("hôm nay trời đẹp"), IssueCategory::General);
        assert_eq!(detect_issue(""), IssueCategory::General);
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let text = "mình lo lắng và không muốn sống";
        assert_eq!(is_crisis(text), is_crisis(text));
        assert_eq!(detect_issue(text), detect_issue(text));
    }
}
