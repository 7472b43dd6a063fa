//! Decoding of Responses-API bodies.
//!
//! Providers answer either with a flat `output_text` field or with a list of
//! output items carrying typed content parts. [`ResponseShape`] names each
//! form explicitly; [`ResponseShape::from_raw`] fixes the order in which they
//! are tried.

use serde::Deserialize;

const TEXT_PART_TYPES: [&str; 2] = ["output_text", "text"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<Option<OutputItem>>>,
}

/// Only the content parts of an output item are read; `null` items and parts
/// are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Option<Vec<Option<ContentPart>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// A non-empty top-level `output_text`.
    Flat(String),
    /// Text parts gathered in order from `output[*].content[*]`.
    Nested(Vec<String>),
    /// Nothing usable.
    Empty,
}

impl ResponseShape {
    pub fn from_raw(raw: RawResponse) -> Self {
        if let Some(text) = raw.output_text.filter(|t| !t.is_empty()) {
            return ResponseShape::Flat(text);
        }

        match raw.output {
            Some(items) => {
                let parts = items
                    .into_iter()
                    .flatten()
                    .filter_map(|item| item.content)
                    .flatten()
                    .flatten()
                    .filter(|part| {
                        part.kind.as_deref().is_some_and(|kind| TEXT_PART_TYPES.contains(&kind))
                    })
                    .filter_map(|part| part.text.filter(|t| !t.is_empty()))
                    .collect();
                ResponseShape::Nested(parts)
            }
            None => ResponseShape::Empty,
        }
    }

    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawResponse>(body).map(Self::from_raw)
    }

    /// Plain text of the response. Flat text is returned as-is; nested parts
    /// are joined without a separator and trimmed.
    pub fn text(&self) -> String {
        match self {
            ResponseShape::Flat(text) => text.clone(),
            ResponseShape::Nested(parts) => parts.concat().trim().to_string(),
            ResponseShape::Empty => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> ResponseShape {
        ResponseShape::from_json(body).unwrap()
    }

    #[test]
    fn flat_output_text_wins() {
        let shape = decode(r#"{"output_text": "X", "output": [{"content": [{"type": "text", "text": "ignored"}]}]}"#);
        assert_eq!(shape, ResponseShape::Flat("X".into()));
        assert_eq!(shape.text(), "X");
    }

    #[test]
    fn flat_text_is_not_trimmed() {
        assert_eq!(decode(r#"{"output_text": "  padded \n"}"#).text(), "  padded \n");
    }

    #[test]
    fn nested_parts_concatenate_in_order() {
        let shape = decode(
            r#"{"output": [{"content": [{"type": "output_text", "text": "A"}, {"type": "text", "text": "B"}]}]}"#
        );
        assert_eq!(shape.text(), "AB");
    }

    #[test]
    fn nested_parts_span_items_and_skip_other_types() {
        let shape = decode(
            r#"{
                "output": [
                    {"type": "reasoning", "summary": []},
                    {"type": "message", "role": "assistant", "content": [
                        {"type": "output_text", "text": "  Hello"},
                        {"type": "refusal", "refusal": "no"}
                    ]},
                    {"type": "message", "content": [
                        {"type": "text", "text": " world  "},
                        {"text": "untyped"}
                    ]}
                ]
            }"#
        );
        assert_eq!(shape.text(), "Hello world");
    }

    #[test]
    fn empty_output_text_falls_back_to_nested() {
        let shape = decode(r#"{"output_text": "", "output": [{"content": [{"type": "text", "text": "B"}]}]}"#);
        assert_eq!(shape.text(), "B");
    }

    #[test]
    fn null_items_and_parts_are_skipped() {
        let shape = decode(
            r#"{"output": [null, {"content": null}, {"content": [null, {"type": "text", "text": "B"}]}]}"#
        );
        assert_eq!(shape, ResponseShape::Nested(vec!["B".into()]));
        assert_eq!(shape.text(), "B");
    }

    #[test]
    fn unknown_shape_yields_empty_text() {
        assert_eq!(decode(r#"{"id": "resp_1"}"#), ResponseShape::Empty);
        assert_eq!(decode(r#"{"output": []}"#).text(), "");
    }
}
