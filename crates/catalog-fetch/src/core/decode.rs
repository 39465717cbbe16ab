use catalog_name::Name;
use serde::de::DeserializeOwned;

use crate::data::{Completion, Response, ResultBatch};
use crate::error::{Error, Result};

/// Strip embedded NUL characters and the trailing control characters
/// producers pad their segments with. Line structure is kept.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != '\0').collect();
    cleaned.trim_end_matches(|c: char| c.is_control()).to_string()
}

/// Prepare a structured payload for parsing: [`clean_text`] plus removal of
/// the newlines producers break long JSON segments with.
pub fn sanitize_payload(text: &str) -> String { clean_text(&text.replace('\n', "")) }

fn utf8<'a>(name: &Name, content: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(content).map_err(|e| Error::MalformedResponse {
        name: name.clone(),
        reason: format!("payload is not UTF-8: {e}"),
    })
}

/// Decode a free-form text payload, keeping its lines.
pub fn decode_text(name: &Name, content: &[u8]) -> Result<String> {
    Ok(clean_text(utf8(name, content)?))
}

/// Decode a payload that is about to be parsed as JSON.
pub fn decode_structured(name: &Name, content: &[u8]) -> Result<String> {
    Ok(sanitize_payload(utf8(name, content)?))
}

fn decode_json<T: DeserializeOwned>(response: &Response) -> Result<T> {
    let text = decode_structured(&response.name, &response.content)?;
    serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
        name: response.name.clone(),
        reason: e.to_string(),
    })
}

/// Decode one segment of a query result object.
///
/// An empty payload decodes to an empty batch rather than an error.
pub fn decode_batch(response: &Response) -> Result<ResultBatch> {
    if response.is_empty() {
        return Ok(ResultBatch::default());
    }
    decode_json(response)
}

/// Decode one segment of a completion answer.
pub fn decode_completion(response: &Response) -> Result<Completion> {
    if response.is_empty() {
        return Ok(Completion::default());
    }
    decode_json(response)
}
