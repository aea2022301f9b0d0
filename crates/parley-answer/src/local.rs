use std::collections::HashSet;

use parley_source::MemberMessage;

/// How many candidate messages the keyword scan looks at
pub const CANDIDATE_LIMIT: usize = 50;

pub const NO_MATCH_ANSWER: &str =
    "I couldn't find relevant information in the messages to answer this question.";

/// Keywords must be longer than this many characters to count
const MIN_KEYWORD_CHARS: usize = 3;

/// Keyword-overlap search over the messages, used when no provider is configured.
///
/// Deterministic: the same question and messages always produce the same text.
pub fn answer_locally(question: &str, messages: &[MemberMessage]) -> String {
    let question_lower = question.to_lowercase();

    let mentioned: HashSet<&str> = messages
        .iter()
        .map(|msg| msg.user_name.as_str())
        .filter(|name| !name.trim().is_empty())
        .filter(|name| question_lower.contains(&name.to_lowercase()))
        .collect();

    let keywords = keywords(&question_lower);

    let mut ranked: Vec<(usize, &MemberMessage)> = messages
        .iter()
        .filter(|msg| mentioned.is_empty() || mentioned.contains(msg.user_name.as_str()))
        .take(CANDIDATE_LIMIT)
        .filter_map(|msg| {
            let body = msg.message.to_lowercase();
            let matches = keywords.iter().filter(|kw| body.contains(kw.as_str())).count();
            (matches > 0).then_some((matches, msg))
        })
        .collect();

    // Stable: equal scores keep input order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    match ranked.first() {
        Some((_, top)) => format!(
            "Based on the messages, I found that {} mentioned: '{}' (on {})",
            top.user_name, top.message, top.timestamp
        ),
        None => NO_MATCH_ANSWER.to_string(),
    }
}

/// Whitespace tokens with surrounding punctuation stripped, so "london?" matches "London"
fn keywords(question_lower: &str) -> Vec<String> {
    question_lower
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, name: &str, body: &str) -> MemberMessage {
        MemberMessage {
            id: id.to_string(),
            user_id: format!("u-{}", name.to_lowercase()),
            user_name: name.to_string(),
            timestamp: "2024-01-01T10:00:00".to_string(),
            message: body.to_string(),
        }
    }

    #[test]
    fn test_layla_trip() {
        let messages = vec![message("1", "Layla", "I am flying to London next Friday")];

        let answer = answer_locally("When is Layla planning her trip to London?", &messages);

        assert!(answer.contains("Layla"));
        assert!(answer.contains("flying to London next Friday"));
        assert!(answer.contains("2024-01-01T10:00:00"));
    }

    #[test]
    fn test_no_match() {
        let messages = vec![message("1", "Layla", "I am flying to London next Friday")];
        assert_eq!(answer_locally("How many cars does Vikram own?", &messages), NO_MATCH_ANSWER);
    }

    #[test]
    fn test_short_keywords_ignored() {
        let messages = vec![message("1", "Amira", "the cat is on the mat")];
        assert_eq!(answer_locally("the cat on mat", &messages), NO_MATCH_ANSWER);
    }

    #[test]
    fn test_mentioned_author_restricts_pool() {
        let messages = vec![
            message("1", "Vikram Desai", "I love sushi restaurants downtown"),
            message("2", "Amira", "My favorite restaurants serve sushi"),
        ];

        let answer = answer_locally("What are Amira's favorite restaurants?", &messages);

        assert!(answer.contains("Amira mentioned"));
        assert!(answer.contains("My favorite restaurants serve sushi"));
    }

    #[test]
    fn test_best_match_wins() {
        let messages = vec![
            message("1", "Amira", "dinner reservation"),
            message("2", "Bilal", "dinner reservation tonight"),
            message("3", "Chen", "dinner reservation"),
        ];

        let answer = answer_locally("dinner reservation tonight please", &messages);
        assert!(answer.starts_with("Based on the messages, I found that Bilal mentioned"));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let messages = vec![
            message("1", "Amira", "dinner reservation"),
            message("2", "Bilal", "dinner reservation tonight"),
            message("3", "Chen", "dinner reservation tonight"),
        ];

        let answer = answer_locally("dinner reservation tonight please", &messages);
        assert!(answer.starts_with("Based on the messages, I found that Bilal mentioned"));

        let answer = answer_locally("dinner reservation", &messages);
        assert!(answer.starts_with("Based on the messages, I found that Amira mentioned"));
    }

    #[test]
    fn test_only_first_fifty_candidates_scanned() {
        let mut messages: Vec<MemberMessage> = (0..CANDIDATE_LIMIT)
            .map(|i| message(&i.to_string(), "Filler", "nothing relevant here"))
            .collect();
        messages.push(message("late", "Late", "helicopter booking confirmed"));

        assert_eq!(answer_locally("helicopter booking", &messages), NO_MATCH_ANSWER);
    }

    #[test]
    fn test_deterministic() {
        let messages = vec![
            message("1", "Amira", "concert tickets for Saturday"),
            message("2", "Bilal", "concert tickets sold out"),
        ];
        let question = "who has concert tickets?";
        assert_eq!(answer_locally(question, &messages), answer_locally(question, &messages));
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(answer_locally("anything interesting?", &[]), NO_MATCH_ANSWER);
    }
}
