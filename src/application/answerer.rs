use std::sync::Arc;

use log::{info, warn};

use crate::domain::LanguageModel;
use crate::error::Result;

/// Wraps a question and its supporting documents into a prompt and asks the model.
pub struct Answerer {
    model: Arc<dyn LanguageModel>,
    max_context_chars: usize,
}

impl Answerer {
    pub fn new(model: Arc<dyn LanguageModel>, max_context_chars: usize) -> Self {
        Self {
            model,
            max_context_chars,
        }
    }

    /// Returns the model's response verbatim.
    pub async fn answer(&self, question: &str, documents: &[String]) -> Result<String> {
        let prompt = build_prompt(question, documents, self.max_context_chars);
        info!("Asking the model ({} context documents, {} prompt chars)", documents.len(), prompt.chars().count());
        Ok(self.model.complete(&prompt).await?)
    }
}

/// Builds the prompt sent to the model.
///
/// Documents are joined by newlines and capped at `max_context_chars`
/// characters. When nothing was retrieved the prompt says so instead of
/// presenting an empty document list.
pub fn build_prompt(question: &str, documents: &[String], max_context_chars: usize) -> String {
    let context = join_context(documents, max_context_chars);
    if context.trim().is_empty() {
        return format!(
            "You are a helpful assistant. No documents in the knowledge base matched the question \"{}\". \
             Say that no supporting notes were found, then answer as best you can.",
            question
        );
    }
    format!(
        "You are a helpful assistant. Answer the question \"{}\" using information \
         contained in the following documents: {}.",
        question, context
    )
}

// Keeps documents in rank order; the first one that overflows is cut, the rest dropped.
fn join_context(documents: &[String], max_chars: usize) -> String {
    let mut context = String::new();
    let mut used = 0;

    for (i, document) in documents.iter().enumerate() {
        let separator = usize::from(i > 0);
        let len = document.chars().count();
        if used + separator + len <= max_chars {
            if i > 0 {
                context.push('\n');
            }
            context.push_str(document);
            used += separator + len;
            continue;
        }

        let room = max_chars.saturating_sub(used + separator);
        if room > 0 {
            if i > 0 {
                context.push('\n');
            }
            context.extend(document.chars().take(room));
        }
        warn!(
            "Context truncated to {} chars: {} of {} documents kept (last one partially)",
            max_chars,
            i + usize::from(room > 0),
            documents.len()
        );
        break;
    }
    context
}
