// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Confidence classification and handover negotiation
//!
//! `is_fallback` decides whether a generated answer is low-confidence by
//! case-insensitive substring matching against the configured marker
//! phrases. The two-state negotiation itself (NORMAL vs awaiting a yes/no)
//! lives on `SessionState`; this module supplies the pure pieces the
//! orchestrator applies.

/// True iff the lowercased text contains any configured marker phrase.
/// Plain substring match, first hit short-circuits; not semantic.
pub fn is_fallback(text: &str, markers: &[String]) -> bool {
    let lowered = text.to_lowercase();
    markers
        .iter()
        .any(|marker| !marker.is_empty() && lowered.contains(&marker.to_lowercase()))
}

/// Interpretation of user input while a handover offer is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Accepts the transfer (`yes` / `y`)
    Yes,
    /// Declines the transfer (`no` / `n`)
    No,
    /// Anything else; the user is reprompted and the offer stays pending
    Unrecognized,
}

/// Parse a yes/no reply, case-insensitively, ignoring surrounding whitespace.
/// Longer phrases ("yes please") are deliberately unrecognized.
pub fn parse_confirmation(input: &str) -> Confirmation {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" => Confirmation::Yes,
        "no" | "n" => Confirmation::No,
        _ => Confirmation::Unrecognized,
    }
}
