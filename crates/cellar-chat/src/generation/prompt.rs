//! Prompt templates for grounded chat and query rewriting

use crate::types::Turn;

/// Prompt builder for chat turns
///
/// Assembly is purely textual: identical inputs always produce identical
/// output, which downstream caching and the test suite both rely on.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render a history window as readable dialogue text
    ///
    /// One line per turn, `User:` / `Assistant:` prefixed, in arrival order.
    pub fn render_history(turns: &[Turn]) -> String {
        let mut dialogue = String::new();
        for turn in turns {
            dialogue.push_str(turn.role.label());
            dialogue.push_str(": ");
            dialogue.push_str(&turn.text);
            dialogue.push('\n');
        }
        dialogue
    }

    /// Build the final grounded chat prompt
    ///
    /// Four tagged regions in fixed order: chat history, retrieved context,
    /// question, trailing answer cue. The context tag is present even when
    /// retrieval came back empty; the model decides how to respond to an
    /// empty context. The persona instructions forbid naming the context or
    /// history sources in the answer, which is an instruction-level
    /// constraint only and cannot be enforced here.
    pub fn build_chat_prompt(question: &str, context: &str, history: &str) -> String {
        format!(
            r#"You are a world class sommelier. Our guests seek knowledge and guidance.
Answer the question based on the context found between the <context> and </context> tags.
The guest's question is between the <question> and </question> tags.
You offer a chat experience considering the prior conversation included between the
<chat_history> and </chat_history> tags.
Present each wine nicely: where it is from, the variety, and the price.
Be concise and do not hallucinate. If you do not have the information, just say so.
Do not mention the CONTEXT used in your answer.
Do not mention the CHAT HISTORY used in your answer.

<chat_history>
{history}
</chat_history>
<context>
{context}
</context>
<question>
{question}
</question>
Answer:"#,
            history = history,
            context = context,
            question = question
        )
    }

    /// Build the standalone-query rewrite prompt
    ///
    /// Asks the model to fold the conversational context into the question,
    /// producing a single self-contained natural-language query. The
    /// instruction demands only the query so the raw completion can be used
    /// directly after sanitization.
    pub fn build_rewrite_prompt(history: &str, question: &str) -> String {
        format!(
            r#"Based on the chat history below and the question, generate a query that extends
the question with the chat history provided. The query should be in natural language.
Answer with only the query. Do not add any explanation.

<chat_history>
{history}
</chat_history>
<question>
{question}
</question>"#,
            history = history,
            question = question
        )
    }
}
