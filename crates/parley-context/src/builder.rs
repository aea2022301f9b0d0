use parley_source::MemberMessage;

/// Budget for providers with tight input limits (~5k tokens)
pub const COMPACT_CONTEXT_BUDGET: usize = 20_000;

/// Budget for providers with large context windows
pub const FULL_CONTEXT_BUDGET: usize = 100_000;

/// Render one message as a single context line
pub fn format_message(msg: &MemberMessage) -> String {
    format!(
        "User: {} (ID: {}, Time: {}): {}\n",
        msg.user_name, msg.user_id, msg.timestamp, msg.message
    )
}

/// Concatenate formatted messages, in order, until the next one would push the
/// result past `max_chars`. Lines are never cut; the first line that does not
/// fit ends the context.
///
/// Budgets are counted in `char`s, not bytes.
pub fn build_context(messages: &[MemberMessage], max_chars: usize) -> String {
    let mut context = String::new();
    let mut char_count = 0usize;

    for msg in messages {
        let line = format_message(msg);
        let line_chars = line.chars().count();

        if char_count + line_chars > max_chars {
            break;
        }

        context.push_str(&line);
        char_count += line_chars;
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, body: &str) -> MemberMessage {
        MemberMessage {
            id: "m1".to_string(),
            user_id: "u1".to_string(),
            user_name: name.to_string(),
            timestamp: "2024-01-01T10:00:00".to_string(),
            message: body.to_string(),
        }
    }

    #[test]
    fn test_line_format() {
        let line = format_message(&message("Layla", "I am flying to London next Friday"));
        assert_eq!(
            line,
            "User: Layla (ID: u1, Time: 2024-01-01T10:00:00): I am flying to London next Friday\n"
        );
    }

    #[test]
    fn test_everything_fits() {
        let messages = vec![message("A", "one"), message("B", "two")];
        let context = build_context(&messages, FULL_CONTEXT_BUDGET);
        assert_eq!(context.lines().count(), 2);
        assert!(context.ends_with('\n'));
    }

    #[test]
    fn test_drops_trailing_messages_whole() {
        let messages = vec![message("A", "one"), message("B", "two"), message("C", "three")];
        let first_two = format_message(&messages[0]).len() + format_message(&messages[1]).len();

        // One char short of the third line
        let budget = first_two + format_message(&messages[2]).len() - 1;
        let context = build_context(&messages, budget);

        assert_eq!(context.chars().count(), first_two);
        assert!(!context.contains("three"));
    }

    #[test]
    fn test_exact_budget_is_inclusive() {
        let messages = vec![message("A", "one")];
        let budget = format_message(&messages[0]).chars().count();
        assert_eq!(build_context(&messages, budget), format_message(&messages[0]));
    }

    #[test]
    fn test_oversized_first_message_yields_empty() {
        let messages = vec![message("A", &"x".repeat(500)), message("B", "short")];
        assert_eq!(build_context(&messages, 100), "");
    }

    #[test]
    fn test_never_exceeds_budget() {
        let messages: Vec<MemberMessage> = (0..50)
            .map(|i| message("Amira", &"é".repeat(i * 7)))
            .collect();

        for budget in [0, 1, 60, 333, 1_000, 4_096] {
            let context = build_context(&messages, budget);
            assert!(context.chars().count() <= budget);
            assert!(context.is_empty() || context.ends_with('\n'));
        }
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let messages = vec![message("Zoë", "crème brûlée")];
        let line = format_message(&messages[0]);
        assert!(line.len() > line.chars().count());
        assert_eq!(build_context(&messages, line.chars().count()), line);
    }

    #[test]
    fn test_deterministic() {
        let messages = vec![message("A", "one"), message("B", "two")];
        assert_eq!(build_context(&messages, 80), build_context(&messages, 80));
    }
}
