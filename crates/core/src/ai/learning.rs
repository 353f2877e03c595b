use super::ai_model::AiLearningRule;
use crate::utils::text::normalize_merchant;

/// Returns the rule with the longest pattern contained in the normalised `text`.
pub fn find_matching_rule<'a>(rules: &'a [AiLearningRule], text: &str) -> Option<&'a AiLearningRule> {
    let normalized = normalize_merchant(text);
    if normalized.is_empty() {
        return None;
    }
    rules
        .iter()
        .filter(|rule| !rule.pattern.is_empty() && normalized.contains(rule.pattern.as_str()))
        .max_by(|a, b| {
            a.pattern
                .len()
                .cmp(&b.pattern.len())
                .then(a.usage_count.cmp(&b.usage_count))
        })
}
