use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use crate::errors::{AgentError, Result};

/// Turns raw model text into a structured value
pub trait OutputParser {
    type Output;

    fn parse(&self, text: &str) -> Result<Self::Output>;
}

/// Trims surrounding whitespace
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOutputParser;

impl OutputParser for TextOutputParser {
    type Output = String;

    fn parse(&self, text: &str) -> Result<String> {
        Ok(text.trim().to_string())
    }
}

/// Deserializes JSON, tolerating a surrounding markdown code fence
pub struct JsonOutputParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for JsonOutputParser<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> JsonOutputParser<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the language tag on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

impl<T: DeserializeOwned> OutputParser for JsonOutputParser<T> {
    type Output = T;

    fn parse(&self, text: &str) -> Result<T> {
        serde_json::from_str(strip_code_fence(text))
            .map_err(|e| AgentError::InvalidResponseFormat(format!("{}: {}", e, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        answer: String,
        confidence: f64,
    }

    #[test]
    fn test_text_parser_trims() {
        assert_eq!(TextOutputParser.parse("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn test_json_parser() {
        let parser = JsonOutputParser::<Verdict>::new();
        let verdict = parser.parse(r#"{"answer": "yes", "confidence": 0.9}"#).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                answer: "yes".to_string(),
                confidence: 0.9
            }
        );
    }

    #[test]
    fn test_json_parser_strips_fence() {
        let parser = JsonOutputParser::<Verdict>::new();
        let text = "```json\n{\"answer\": \"no\", \"confidence\": 0.1}\n```";
        assert_eq!(parser.parse(text).unwrap().answer, "no");
    }

    #[test]
    fn test_json_parser_rejects_prose() {
        let parser = JsonOutputParser::<Verdict>::new();
        assert!(matches!(
            parser.parse("I think yes"),
            Err(AgentError::InvalidResponseFormat(_))
        ));
    }
}
