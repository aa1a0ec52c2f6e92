//! Self-assigned goal extraction from model responses.
//!
//! The goal-setting prompt asks for a JSON object such as
//! `{"name": "iron_pickaxe", "quantity": 1}`, either inside a ` ```json `
//! fenced block or as a bare object in the text. Anything malformed yields
//! `None`; the caller decides what to do without a goal.

use serde_json::Value;

/// A goal the agent set for itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfGoal {
    pub name: String,
    pub quantity: u64,
}

/// Parse a goal from model response text.
///
/// Supports two formats:
/// 1. ` ```json ` (or bare ` ``` `) fenced blocks containing an object
/// 2. A bare JSON object somewhere in the text
pub fn parse_goal(response: &str) -> Option<SelfGoal> {
    let mut in_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```") {
            in_block = true;
            current_block.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Ok(parsed) = serde_json::from_str::<Value>(&current_block) {
                return parse_goal_json(&parsed);
            }
        } else if in_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    let parsed = serde_json::from_str::<Value>(&response[start..=end]).ok()?;
    parse_goal_json(&parsed)
}

/// Validate a parsed goal object.
///
/// `name` must be a non-empty string; `quantity` a non-negative integer given
/// as a number or a numeric string.
pub fn parse_goal_json(json: &Value) -> Option<SelfGoal> {
    let name = json.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let quantity = match json.get("quantity")? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Some(SelfGoal {
        name: name.to_string(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_block() {
        let response = "Next I will craft tools.\n```json\n{\"name\": \"iron_pickaxe\", \"quantity\": 1}\n```";
        assert_eq!(
            parse_goal(response),
            Some(SelfGoal {
                name: "iron_pickaxe".to_string(),
                quantity: 1
            })
        );
    }

    #[test]
    fn test_parse_bare_object() {
        let response = r#"Goal: {"name": "oak_log", "quantity": "16"} then build."#;
        assert_eq!(
            parse_goal(response),
            Some(SelfGoal {
                name: "oak_log".to_string(),
                quantity: 16
            })
        );
    }

    #[test]
    fn test_missing_or_empty_name() {
        assert_eq!(parse_goal(r#"{"quantity": 3}"#), None);
        assert_eq!(parse_goal(r#"{"name": "  ", "quantity": 3}"#), None);
    }

    #[test]
    fn test_invalid_quantity() {
        assert_eq!(parse_goal(r#"{"name": "stone", "quantity": -2}"#), None);
        assert_eq!(parse_goal(r#"{"name": "stone", "quantity": 1.5}"#), None);
        assert_eq!(parse_goal(r#"{"name": "stone", "quantity": "lots"}"#), None);
        assert_eq!(parse_goal(r#"{"name": "stone"}"#), None);
    }

    #[test]
    fn test_no_json() {
        assert_eq!(parse_goal("I have no idea what to do."), None);
        assert_eq!(parse_goal("} backwards {"), None);
    }

    #[test]
    fn test_zero_quantity_allowed() {
        assert_eq!(
            parse_goal(r#"{"name": "rest", "quantity": 0}"#).map(|g| g.quantity),
            Some(0)
        );
    }
}
