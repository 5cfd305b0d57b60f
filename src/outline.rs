//! Rendering of a dialogue's turn-by-turn outline: the dialogue acts of
//! each turn with their slot/value parameters, e.g. `INFORM(price_range=cheap)`.

use std::io::Write;

use crate::errors::*;
use crate::models::{Dialogue, Turn};

pub fn utterances(dialogue: &Dialogue) -> Vec<&str> {
    dialogue
        .turns
        .iter()
        .map(|turn| turn.utterance.as_str())
        .collect()
}

/// Formats the actions of one turn. Multiple frames per turn are a
/// corpus-format violation.
pub fn turn_actions(dialogue_id: &str, turn: &Turn) -> Result<Vec<String>> {
    if turn.frames.len() != 1 {
        return Err(SgdError::InvalidFrame {
            dialogue_id: dialogue_id.to_string(),
            n_frames: turn.frames.len(),
        }
        .into());
    }
    let mut formatted = Vec::new();
    for action in &turn.frames[0].actions {
        let value = if action.slot.is_empty() {
            String::new()
        } else {
            action.values.join(" ")
        };
        if !action.slot.is_empty() && !value.is_empty() {
            formatted.push(format!("{}({}={})", action.act, action.slot, value));
        } else {
            formatted.push(format!("{}({})", action.act, action.slot));
        }
    }
    Ok(formatted)
}

/// Per-turn action outlines for the whole dialogue.
pub fn dialogue_outline(dialogue: &Dialogue) -> Result<Vec<Vec<String>>> {
    dialogue
        .turns
        .iter()
        .map(|turn| turn_actions(&dialogue.dialogue_id, turn))
        .collect()
}

/// Writes the outline, optionally alongside the utterances.
pub fn write_dialogue_outline<W: Write>(
    dialogue: &Dialogue,
    with_text: bool,
    writer: &mut W,
) -> Result<()> {
    let outlines = dialogue_outline(dialogue)?;
    for (index, (outline, turn)) in outlines.iter().zip(&dialogue.turns).enumerate() {
        if with_text {
            writeln!(writer, "Turn {}: {}", index, turn.utterance)?;
        } else {
            writeln!(writer, "Turn {}:", index)?;
        }
        for action in outline {
            writeln!(writer, "{}", action)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Frame, Speaker};

    fn turn_with_actions(actions: Vec<Action>) -> Turn {
        Turn {
            speaker: Speaker::User,
            utterance: "I want a cheap restaurant.".to_string(),
            frames: vec![Frame {
                service: "Restaurants_1".to_string(),
                slots: vec![],
                actions,
                state: None,
                service_call: None,
                service_results: None,
            }],
        }
    }

    #[test]
    fn test_turn_actions_formatting() {
        // Given
        let turn = turn_with_actions(vec![
            Action {
                act: "INFORM".to_string(),
                slot: "price_range".to_string(),
                values: vec!["cheap".to_string()],
                canonical_values: vec![],
            },
            Action {
                act: "REQUEST".to_string(),
                slot: "city".to_string(),
                values: vec![],
                canonical_values: vec![],
            },
            Action {
                act: "GOODBYE".to_string(),
                slot: String::new(),
                values: vec![],
                canonical_values: vec![],
            },
        ]);

        // When
        let formatted = turn_actions("1_00000", &turn).unwrap();

        // Then
        assert_eq!(
            formatted,
            vec!["INFORM(price_range=cheap)", "REQUEST(city)", "GOODBYE()"]
        );
    }

    #[test]
    fn test_turn_actions_rejects_multiple_frames() {
        // Given
        let mut turn = turn_with_actions(vec![]);
        let extra_frame = turn.frames[0].clone();
        turn.frames.push(extra_frame);

        // When
        let result = turn_actions("1_00000", &turn);

        // Then
        assert!(result.is_err());
    }
}
