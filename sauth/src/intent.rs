//! Account-intent detection over a fixed keyword vocabulary.
//!
//! Detection is a lower-cased containment test against a curated
//! allow-list, not intent classification. False positives only prompt a
//! re-authorization; false negatives would silently bypass the gate, so
//! the vocabulary errs on the broad side.

/// Phrases that mark a message as touching account, order, or identity
/// data.
pub const ACCOUNT_INTENT_KEYWORDS: &[&str] = &[
    "my account",
    "my order",
    "my orders",
    "my purchase",
    "my subscription",
    "order status",
    "order history",
    "track my",
    "tracking",
    "where is my",
    "refund",
    "return my",
    "cancel my",
    "sign in",
    "log in",
    "login",
    "my email",
    "my address",
    "my profile",
    "payment method",
];

pub fn requires_authorization(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ACCOUNT_INTENT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_phrases_trigger_the_gate() {
        assert!(requires_authorization("Track my order please"));
        assert!(requires_authorization("WHERE IS MY package?"));
        assert!(requires_authorization("I want a refund"));
        assert!(requires_authorization("how do I sign in"));
    }

    #[test]
    fn storefront_questions_pass_through() {
        assert!(!requires_authorization("Do you carry hiking boots?"));
        assert!(!requires_authorization("What sizes does this come in?"));
        assert!(!requires_authorization(""));
    }
}
