//! Wire format of the parse endpoint and rendering of its reply.
//!
//! ```text
//! POST {endpoint}
//! Content-Type: application/json
//!
//! {"resumeText": "..."}
//! ```
//!
//! The reply is `{"success": <any>, "reply"?: "<json document as a string>"}`.
//! `success` is judged by JavaScript truthiness, matching the browser client
//! this protocol was written for.

use crate::error::ResumeError;
use crate::output::Rendered;
use serde::Serialize;
use serde_json::Value;

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
pub struct ParseRequest<'a> {
    #[serde(rename = "resumeText")]
    pub resume_text: &'a str,
}

/// True when JavaScript's `String.prototype.trim` would leave nothing.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_js_whitespace)
}

/// ECMAScript WhiteSpace and LineTerminator. Unlike `char::is_whitespace`
/// this excludes U+0085 and includes U+FEFF.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// JavaScript truthiness of an optional JSON value (`None` is `undefined`).
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Turn a raw response body into what the output pane shows.
///
/// The HTTP status is only used for error messages: the body is interpreted
/// whatever the status.
pub fn render_reply(status: u16, body: &[u8]) -> Result<Rendered, ResumeError> {
    let data: Value = serde_json::from_slice(body).map_err(|e| ResumeError::MalformedResponse {
        status,
        detail: e.to_string(),
    })?;

    if data.is_null() {
        return Err(ResumeError::MalformedResponse {
            status,
            detail: "body is JSON null".into(),
        });
    }

    if !is_truthy(data.get("success")) {
        return Ok(Rendered::ParsingFailed);
    }

    let reply = match data.get("reply") {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ResumeError::MalformedReply {
                detail: format!("expected a string, got {}", kind(other)),
            })
        }
        None => {
            return Err(ResumeError::MalformedReply {
                detail: "success is set but reply is missing".into(),
            })
        }
    };

    let document: Value = serde_json::from_str(reply).map_err(|e| ResumeError::MalformedReply {
        detail: e.to_string(),
    })?;
    let pretty = serde_json::to_string_pretty(&document)
        .map_err(|e| ResumeError::Internal(format!("re-serialising reply: {e}")))?;

    Ok(Rendered::Json(pretty))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(body: Value) -> Result<Rendered, ResumeError> {
        render_reply(200, body.to_string().as_bytes())
    }

    #[test]
    fn request_body_uses_camel_case_key() {
        let body = serde_json::to_string(&ParseRequest { resume_text: "Jane\nDoe" }).unwrap();
        assert_eq!(body, r#"{"resumeText":"Jane\nDoe"}"#);
    }

    #[test]
    fn success_reply_is_reindented_with_two_spaces() {
        let rendered = render(json!({"success": true, "reply": "{\"a\":1}"})).unwrap();
        assert_eq!(rendered, Rendered::Json("{\n  \"a\": 1\n}".into()));
    }

    #[test]
    fn reply_keeps_key_order() {
        let rendered = render(json!({
            "success": true,
            "reply": "{\"profile\":{\"name\":\"Ada\"},\"achievements\":[],\"embeddings\":{}}"
        }))
        .unwrap();
        let text = rendered.as_text();
        let profile = text.find("profile").unwrap();
        let achievements = text.find("achievements").unwrap();
        let embeddings = text.find("embeddings").unwrap();
        assert!(profile < achievements && achievements < embeddings, "got: {text}");
    }

    #[test]
    fn falsy_success_renders_failure_marker() {
        for body in [
            json!({"success": false}),
            json!({"success": false, "reply": "{\"a\":1}"}),
            json!({"success": 0}),
            json!({"success": ""}),
            json!({"success": null}),
            json!({}),
            json!([1, 2]),
            json!("text"),
        ] {
            assert_eq!(render(body.clone()).unwrap(), Rendered::ParsingFailed, "body {body}");
        }
        assert_eq!(render(json!({"success": false})).unwrap().as_text(), "Parsing failed");
    }

    #[test]
    fn truthy_non_boolean_success_is_accepted() {
        for success in [json!(1), json!("yes"), json!({}), json!([])] {
            let rendered = render(json!({"success": success, "reply": "[]"})).unwrap();
            assert_eq!(rendered, Rendered::Json("[]".into()));
        }
    }

    #[test]
    fn scalar_reply_documents_render_as_json() {
        assert_eq!(
            render(json!({"success": true, "reply": "\"Error calling Gemini API\""})).unwrap(),
            Rendered::Json("\"Error calling Gemini API\"".into())
        );
        assert_eq!(
            render(json!({"success": true, "reply": " 42 "})).unwrap(),
            Rendered::Json("42".into())
        );
    }

    #[test]
    fn non_json_reply_is_malformed() {
        let err = render(json!({"success": true, "reply": "Error calling Gemini API"})).unwrap_err();
        assert!(matches!(err, ResumeError::MalformedReply { .. }));
    }

    #[test]
    fn missing_or_non_string_reply_is_malformed() {
        let missing = render(json!({"success": true})).unwrap_err();
        assert!(missing.to_string().contains("missing"), "got: {missing}");

        let object = render(json!({"success": true, "reply": {"a": 1}})).unwrap_err();
        assert!(object.to_string().contains("an object"), "got: {object}");
    }

    #[test]
    fn non_json_body_is_malformed_response() {
        let err = render_reply(500, b"<html>Internal Server Error</html>").unwrap_err();
        assert!(matches!(err, ResumeError::MalformedResponse { status: 500, .. }));
        assert!(matches!(
            render_reply(200, b"null").unwrap_err(),
            ResumeError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(is_truthy(Some(&json!(-1))));
        assert!(is_truthy(Some(&json!("false"))));
    }

    #[test]
    fn blank_text() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\r\n\u{00A0}\u{FEFF}"));
        assert!(!is_blank("  a  "));
    }

    #[test]
    fn blank_text_follows_js_trim() {
        assert!(is_blank("\u{2028}\u{3000}\u{2003}\u{000B}"));
        // NEL is whitespace to Rust but not to JavaScript.
        assert!(!is_blank("\u{0085}"));
        assert!(!is_blank(" \u{0085} "));
        // Zero-width space is not whitespace in either.
        assert!(!is_blank("\u{200B}"));
    }
}
