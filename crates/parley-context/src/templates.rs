use parley_llm::Message;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions accurately based on the provided context. Be specific and cite user names when relevant.";

/// System instruction plus the user turn that embeds context and question
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(context: &str, question: &str) -> Self {
        let user = format!(
            "Here are the messages from members:\n\n\
             {context}\n\n\
             Based on the above messages, please answer the following question. \
             If the information is not available in the messages, say so. \
             Be specific and cite user names when relevant.\n\n\
             Question: {question}\n\n\
             Answer:"
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::system(self.system.clone()), Message::human(self.user.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_question() {
        let prompt = Prompt::new("User: Layla ...\n", "When is Layla flying?");

        assert!(prompt.user.starts_with("Here are the messages from members:\n\nUser: Layla ...\n"));
        assert!(prompt.user.contains("Question: When is Layla flying?"));
        assert!(prompt.user.ends_with("Answer:"));
        assert_eq!(prompt.system, SYSTEM_PROMPT);
    }

    #[test]
    fn test_messages_are_system_then_user() {
        let messages = Prompt::new("ctx", "q").to_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), "system");
        assert_eq!(messages[1].role(), "user");
    }
}
