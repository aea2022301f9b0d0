mod builder;
mod templates;

pub use builder::{build_context, format_message, COMPACT_CONTEXT_BUDGET, FULL_CONTEXT_BUDGET};
pub use templates::{Prompt, SYSTEM_PROMPT};
