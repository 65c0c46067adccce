//! Input model: the prompt and the raw context text the user edits, and their transformation
//! into a [`RuleRequest`].

use crate::protocol::RuleRequest;

/// Example prompts offered by every front end, in display order.
pub const EXAMPLES: [&str; 3] = [
    "Approve if bureau score > 700 and business vintage at least 3 years and applicant age between 25 and 60.",
    "Flag as high risk if wilful default is true OR overdue amount > 50000 OR bureau.dpd >= 90.",
    "Prefer applicants with tag ‘veteran’ OR with monthly_income > 100000.",
];

/// Context text a fresh session starts with (one snippet per line).
pub const DEFAULT_CONTEXT: &str =
    "Credit Policy v1.0 – minimum bureau score 600...\nRisk guidelines – suit filed = high risk...";

/// Splits raw context text into snippets: one per line, trimmed, blank lines dropped.
///
/// Order is kept. Splitting the `\n`-joined output again yields the same snippets.
pub fn split_context_docs(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputModel {
    prompt: String,
    context: String,
}

impl Default for InputModel {
    /// First example as the prompt, [`DEFAULT_CONTEXT`] as the context.
    fn default() -> Self {
        Self {
            prompt: EXAMPLES[0].to_string(),
            context: DEFAULT_CONTEXT.to_string(),
        }
    }
}

impl InputModel {
    pub fn new(prompt: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: context.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn set_context(&mut self, text: impl Into<String>) {
        self.context = text.into();
    }

    /// Mutable access for editors that work on the buffer in place.
    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    pub fn context_mut(&mut self) -> &mut String {
        &mut self.context
    }

    /// Replaces the prompt with `EXAMPLES[index]`. Out of range is a no-op returning `false`.
    pub fn apply_example(&mut self, index: usize) -> bool {
        match EXAMPLES.get(index) {
            Some(example) => {
                self.prompt = (*example).to_string();
                true
            }
            None => false,
        }
    }

    pub fn to_request_payload(&self) -> RuleRequest {
        RuleRequest {
            prompt: self.prompt.clone(),
            context_docs: split_context_docs(&self.context),
        }
    }
}
