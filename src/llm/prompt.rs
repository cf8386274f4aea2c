// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Prompt assembly

use crate::session::{ConversationTurn, Role};

/// Build the single generation prompt in fixed order: system instruction,
/// retrieved context, conversation history, new question.
///
/// The context block is labeled so the model can tell corpus text from
/// conversation; an empty context still gets its header, keeping the prompt
/// shape stable.
pub fn build_prompt(
    system_instruction: &str,
    context: &str,
    history: &[ConversationTurn],
    question: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("System: ");
    prompt.push_str(system_instruction);
    prompt.push_str("\n\n");

    prompt.push_str("Context:\n");
    prompt.push_str(context);
    prompt.push_str("\n\n");

    for turn in history {
        match turn.role {
            Role::User => {
                prompt.push_str("User: ");
                prompt.push_str(&turn.text);
                prompt.push('\n');
            }
            Role::Assistant => {
                prompt.push_str("Assistant: ");
                prompt.push_str(&turn.text);
                prompt.push('\n');
            }
        }
    }

    prompt.push_str("User: ");
    prompt.push_str(question);
    prompt.push_str("\nAssistant: ");
    prompt
}
