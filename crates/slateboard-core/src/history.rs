//! Bulk history decoding for the room backfill fetched over HTTP.
//!
//! The history endpoint returns rows whose `message` field is the same
//! JSON-encoded chat payload that travels over the socket. Rows written by
//! older clients may lack a shape id; those get a deterministic id derived
//! from the shape fields so every client assigns the same one.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored row of room history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: String,
}

/// Decode a batch of history rows into shapes.
///
/// Paint order follows row order. A row that fails to decode is logged and
/// skipped; it never poisons the rest of the batch.
pub fn shapes_from_history(entries: &[HistoryEntry]) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(entries.len());
    for entry in entries {
        match shape_from_message(&entry.message) {
            Ok(shape) => shapes.push(shape),
            Err(e) => log::warn!("Skipping undecodable history row: {}", e),
        }
    }
    shapes
}

fn shape_from_message(message: &str) -> Result<Shape, serde_json::Error> {
    let mut payload: Value = serde_json::from_str(message)?;
    if let Some(shape) = payload.get_mut("shape") {
        if shape.get("id").is_none() {
            let id = legacy_id(shape)?;
            if let Some(obj) = shape.as_object_mut() {
                obj.insert("id".to_string(), Value::String(id));
            }
        }
        serde_json::from_value(shape.take())
    } else {
        // Rows that are a bare shape rather than a {shape: ...} wrapper
        // never occurred in practice; treat them as malformed.
        serde_json::from_value(payload)
    }
}

/// Deterministic id for a shape stored without one.
///
/// Hashes the shape's canonical JSON (object keys sorted) with the classic
/// 31x rolling string hash over UTF-16 code units, truncated to i32, then
/// renders the magnitude in base 36 under a `legacy_` prefix.
pub fn legacy_id(shape: &Value) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(shape)?;
    let mut h: i32 = 0;
    for unit in canonical.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i32);
    }
    Ok(format!("legacy_{}", to_base36(h.unsigned_abs())))
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).expect("base36 digits are ascii")
}
