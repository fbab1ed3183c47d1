//! Prompt builder: fixed consultant persona + one grounded user turn.

use ai_llm_service::ChatMessage;

/// Persona and ground rules sent as the first message of every request.
pub const SYSTEM_PROMPT: &str = "You are a professional consultant on investment products.
Your task:
- Answer client questions about investment units, closed-end funds (ZPIF) and investment services
- Use only the information provided from the knowledge base
- Give accurate and professional answers
- If the knowledge base has no relevant information, say so honestly
- Do not give financial advice, only information about the products
Style: business-like, but easy for clients to understand.";

/// Builds the ordered `[system, user]` messages for one question.
///
/// An empty `context` is treated as absent.
///
/// # Example
/// ```
/// # use advisor::prompt::build_messages;
/// let msgs = build_messages("What is a unit?", Some("A unit is a security."));
/// assert_eq!(msgs.len(), 2);
/// assert!(msgs[1].content.contains("A unit is a security."));
/// ```
pub fn build_messages(query: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let user = match context.filter(|c| !c.is_empty()) {
        Some(ctx) => format!(
            "Information from the knowledge base:\n{ctx}\n\n\
             Client question: {query}\n\n\
             Answer based on the information provided."
        ),
        None => format!(
            "Client question: {query}\n\n\
             No relevant information was found in the knowledge base. \
             Say that you cannot give a precise answer and suggest contacting our specialists."
        ),
    };

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}

#[cfg(test)]
mod tests {
    use ai_llm_service::Role;

    use super::*;

    #[test]
    fn system_message_comes_first() {
        let msgs = build_messages("q", None);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[0].content, SYSTEM_PROMPT);
        assert_eq!(msgs[1].role, Role::User);
    }

    #[test]
    fn context_precedes_question() {
        let msgs = build_messages("Can I exit early?", Some("Units trade on the exchange."));
        let user = &msgs[1].content;
        let ctx_at = user.find("Units trade on the exchange.").unwrap();
        let q_at = user.find("Can I exit early?").unwrap();
        assert!(ctx_at < q_at);
        assert!(!user.contains("No relevant information"));
    }

    #[test]
    fn missing_context_asks_to_refer_to_specialists() {
        for ctx in [None, Some("")] {
            let user = &build_messages("Can I exit early?", ctx)[1].content;
            assert!(user.contains("Can I exit early?"));
            assert!(user.contains("No relevant information"));
            assert!(user.contains("specialists"));
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            build_messages("q", Some("c")),
            build_messages("q", Some("c"))
        );
    }
}
