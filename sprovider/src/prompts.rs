//! System prompt catalog keyed by prompt-type.

use std::collections::HashMap;

pub const DEFAULT_PROMPT_KEY: &str = "standard_assistant";

const DEFAULT_PROMPT: &str = "You are a helpful storefront assistant. Answer questions about \
products, availability, and orders using the tools provided. Keep answers short and concrete, \
and never invent product details the tools did not return.";

/// Resolves a prompt-type key to a system prompt, falling back to the
/// default prompt for unrecognized keys.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    prompts: HashMap<String, String>,
    default_prompt: String,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        let mut prompts = HashMap::new();
        prompts.insert(DEFAULT_PROMPT_KEY.to_string(), DEFAULT_PROMPT.to_string());

        Self {
            prompts,
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl PromptCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_prompt = prompt.into();
        self
    }

    pub fn with_prompt(mut self, key: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.prompts.insert(key.into(), prompt.into());
        self
    }

    pub fn resolve(&self, key: Option<&str>) -> &str {
        key.and_then(|key| self.prompts.get(key))
            .map(String::as_str)
            .unwrap_or(&self.default_prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_default_prompt() {
        let catalog = PromptCatalog::new();
        assert_eq!(catalog.resolve(None), catalog.resolve(Some("no-such-key")));
    }

    #[test]
    fn registered_prompts_resolve_by_key() {
        let catalog = PromptCatalog::new().with_prompt("terse", "Answer in one sentence.");
        assert_eq!(catalog.resolve(Some("terse")), "Answer in one sentence.");
        assert_ne!(catalog.resolve(None), "Answer in one sentence.");
    }
}
