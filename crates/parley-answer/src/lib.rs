mod answerer;
mod chain;
mod local;

pub use answerer::{AttemptOutcome, Answerer, NO_DATA_ANSWER};
pub use chain::{ProviderChain, ProviderSettings, ProviderSlot};
pub use local::{answer_locally, CANDIDATE_LIMIT, NO_MATCH_ANSWER};
