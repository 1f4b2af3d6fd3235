//! Built-in tool implementations.
//!
//! Each tool is a plain function from the step input to its output. Inputs
//! are JSON values; text tools expect a string and reject anything else.

use serde_json::Value;
use stepwise_application::ToolError;

pub type ToolFn = fn(&str, &Value) -> Result<Value, ToolError>;

pub const ECHO: &str = "echo";
pub const WORD_COUNT: &str = "word_count";
pub const UPPERCASE: &str = "uppercase";

/// All built-in tools by name
pub fn builtin_tools() -> [(&'static str, ToolFn); 3] {
    [
        (ECHO, echo as ToolFn),
        (WORD_COUNT, word_count as ToolFn),
        (UPPERCASE, uppercase as ToolFn),
    ]
}

fn text_input<'a>(tool: &str, input: &'a Value) -> Result<&'a str, ToolError> {
    input.as_str().ok_or_else(|| ToolError::InvalidInput {
        tool: tool.to_string(),
        message: "expected a string".to_string(),
    })
}

/// Returns its input unchanged.
pub fn echo(_tool: &str, input: &Value) -> Result<Value, ToolError> {
    Ok(input.clone())
}

pub fn word_count(tool: &str, input: &Value) -> Result<Value, ToolError> {
    let text = text_input(tool, input)?;
    Ok(Value::from(text.split_whitespace().count()))
}

pub fn uppercase(tool: &str, input: &Value) -> Result<Value, ToolError> {
    let text = text_input(tool, input)?;
    Ok(Value::from(text.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_echo_passes_anything_through() {
        assert_eq!(echo(ECHO, &json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert_eq!(echo(ECHO, &Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(
            word_count(WORD_COUNT, &json!("  rust  vs go ")).unwrap(),
            json!(3)
        );
        assert_eq!(word_count(WORD_COUNT, &json!("")).unwrap(), json!(0));
    }

    #[test]
    fn test_text_tools_reject_non_strings() {
        let err = uppercase(UPPERCASE, &json!(42)).unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidInput {
                tool: UPPERCASE.to_string(),
                message: "expected a string".to_string(),
            }
        );
        assert!(word_count(WORD_COUNT, &Value::Null).is_err());
    }
}
