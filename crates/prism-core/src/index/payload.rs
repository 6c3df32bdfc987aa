use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ErrorCode, PrismError, PrismResult};
use crate::types::{ImageReference, RetrievalNode};

const TEXT: &str = "text";
const DOCUMENT_ID: &str = "document_id";
const SEQUENCE_INDEX: &str = "sequence_index";
const IMAGE_PATH: &str = "image_path";

/// Payload stored next to a node's vector.
pub fn node_payload(node: &RetrievalNode) -> HashMap<String, Value> {
    let mut payload = HashMap::new();
    payload.insert(TEXT.to_string(), Value::String(node.text.clone()));
    payload.insert(DOCUMENT_ID.to_string(), Value::String(node.document_id.clone()));
    payload.insert(SEQUENCE_INDEX.to_string(), Value::from(node.sequence_index as u64));
    if let Some(image) = &node.image_reference {
        payload.insert(IMAGE_PATH.to_string(), Value::String(image.to_string()));
    }
    payload
}

/// Rebuild a node from a stored payload.
pub fn node_from_payload(id: &str, payload: &HashMap<String, Value>) -> PrismResult<RetrievalNode> {
    let text = payload
        .get(TEXT)
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(id, TEXT))?;
    let document_id = payload
        .get(DOCUMENT_ID)
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(id, DOCUMENT_ID))?;
    let sequence_index = payload
        .get(SEQUENCE_INDEX)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| invalid(id, SEQUENCE_INDEX))? as usize;

    let mut node = RetrievalNode::new(document_id, sequence_index, text);
    node.id = id.to_string();
    if let Some(path) = payload.get(IMAGE_PATH).and_then(|v| v.as_str()) {
        node = node.with_image(ImageReference::new(path));
    }
    Ok(node)
}

fn invalid(id: &str, field: &str) -> PrismError {
    PrismError::Retrieval {
        message: format!("Stored node '{}' has no valid '{}' field", id, field),
        code: ErrorCode::RetInvalidPayload,
        query: String::new(),
        source: None,
    }
}
