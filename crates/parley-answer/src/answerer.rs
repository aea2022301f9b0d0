use std::sync::Arc;

use parley_context::{build_context, Prompt};
use parley_llm::{ChatRequest, ProviderType};
use parley_source::MemberMessage;

use crate::chain::{ProviderChain, ProviderSlot};
use crate::local::answer_locally;

pub const NO_DATA_ANSWER: &str =
    "I couldn't find any messages to analyze. The data source may be empty.";

/// Result of asking one provider, success or failure as a plain value
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Answered {
        provider: ProviderType,
        model: String,
        text: String,
    },
    Failed {
        provider: ProviderType,
        reason: String,
    },
}

/// Answers questions by walking the provider chain.
///
/// Always returns text: provider errors fall through to the next provider,
/// exhausting the chain yields an error sentence naming the last provider,
/// and an empty chain answers with local keyword search.
#[derive(Clone)]
pub struct Answerer {
    chain: Arc<ProviderChain>,
}

impl Answerer {
    pub fn new(chain: Arc<ProviderChain>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn answer(&self, question: &str, messages: &[MemberMessage]) -> String {
        let slots = self.chain.slots();
        let Some(first) = slots.first() else {
            tracing::debug!("No LLM provider configured, using keyword search");
            return answer_locally(question, messages);
        };

        // Checked once, before any provider is called
        let first_context = build_context(messages, first.settings.context_budget);
        if first_context.is_empty() {
            return NO_DATA_ANSWER.to_string();
        }
        let mut first_context = Some(first_context);

        let mut last_failure: Option<(ProviderType, String)> = None;

        for (index, slot) in slots.iter().enumerate() {
            let context = first_context
                .take()
                .unwrap_or_else(|| build_context(messages, slot.settings.context_budget));

            let outcome = if context.is_empty() {
                AttemptOutcome::Failed {
                    provider: slot.provider,
                    reason: format!(
                        "no message fits the {} character context budget",
                        slot.settings.context_budget
                    ),
                }
            } else {
                self.attempt(slot, &Prompt::new(&context, question)).await
            };

            match outcome {
                AttemptOutcome::Answered { provider, model, text } => {
                    tracing::info!("Answered with {} ({})", provider, model);
                    return text;
                }
                AttemptOutcome::Failed { provider, reason } => {
                    if index == 0 {
                        tracing::warn!("{} error: {}, falling back if available", provider, reason);
                    } else {
                        tracing::warn!("{} error: {}", provider, reason);
                    }
                    last_failure = Some((provider, reason));
                }
            }
        }

        match last_failure {
            Some((provider, reason)) => {
                format!("Error generating answer with {}: {}", provider, reason)
            }
            None => answer_locally(question, messages),
        }
    }

    /// Try each of the slot's models in order until one accepts the call
    pub async fn attempt(&self, slot: &ProviderSlot, prompt: &Prompt) -> AttemptOutcome {
        let mut last_error: Option<String> = None;

        for model in &slot.settings.models {
            let request = ChatRequest::new(model.clone(), prompt.to_messages())
                .with_options(slot.settings.chat_options());

            match slot.client.chat(request).await {
                Ok(response) => {
                    return match response.text() {
                        Some(text) => AttemptOutcome::Answered {
                            provider: slot.provider,
                            model: model.clone(),
                            text: text.to_string(),
                        },
                        None => AttemptOutcome::Failed {
                            provider: slot.provider,
                            reason: format!("model {} returned an empty completion", model),
                        },
                    };
                }
                Err(err) => {
                    tracing::debug!("{} model {} rejected the call: {:#}", slot.provider, model, err);
                    last_error = Some(format!("{:#}", err));
                }
            }
        }

        AttemptOutcome::Failed {
            provider: slot.provider,
            reason: last_error
                .unwrap_or_else(|| format!("Failed to find a working {} model", slot.provider)),
        }
    }
}
