use axum::http::HeaderMap;
use bytes::Bytes;
use futures_util::Stream;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::models::ResumeMeta;

use super::validate::RESUME_MAX_BYTES;

/// Name of the multipart file field carrying the resume.
pub const RESUME_FIELD: &str = "resume";

/// Untyped submission input handed to the validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPayload {
    pub fields: Map<String, Value>,
    pub resume: ResumeField,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResumeField {
    #[default]
    Absent,
    Upload(ResumeMeta),
    /// Something was sent under `resume` that is not file metadata.
    Malformed,
}

impl RawPayload {
    /// Build a payload from a decoded JSON or form body.
    ///
    /// Returns `None` when the body is not a key/value object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(obj) = value else {
            return None;
        };

        let mut fields = fold_bracket_keys(obj);
        let resume = match fields.remove(RESUME_FIELD) {
            None | Some(Value::Null) => ResumeField::Absent,
            Some(Value::String(s)) if s.trim().is_empty() => ResumeField::Absent,
            Some(v @ Value::Object(_)) => serde_json::from_value::<ResumeMeta>(v)
                .map(ResumeField::Upload)
                .unwrap_or(ResumeField::Malformed),
            Some(_) => ResumeField::Malformed,
        };

        Some(RawPayload { fields, resume })
    }
}

/// Parse a request body based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("multipart/form-data") {
        Err("multipart".to_string())
    } else {
        // Try JSON first, then form-urlencoded
        serde_json::from_slice(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let pairs: HashMap<String, String> = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert(k, Value::String(v));
    }
    Ok(Value::Object(map))
}

/// Parse a streamed multipart body using multer.
///
/// Text parts become string fields. The `resume` part is counted chunk by
/// chunk and reduced to its metadata; counting stops once it is past the
/// resume size rule, and the rest of the part is discarded when the next
/// field is requested. If the stream then exceeds `max_upload_size`, the
/// fields read so far are returned so the resume still gets its field error.
pub async fn parse_multipart<S, E>(
    headers: &HeaderMap,
    stream: S,
    max_upload_size: u64,
) -> Result<RawPayload, String>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(max_upload_size));
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    let mut map = Map::new();
    let mut resume = ResumeField::Absent;
    loop {
        let next = match multipart.next_field().await {
            Ok(next) => next,
            Err(multer::Error::StreamSizeExceeded { limit }) if resume_oversized(&resume) => {
                tracing::debug!("Multipart stream passed {limit} bytes after an oversized resume");
                break;
            }
            Err(e) => return Err(format!("Multipart error: {e}")),
        };
        let Some(mut field) = next else {
            break;
        };

        let name = field.name().unwrap_or("unknown").to_string();

        if name == RESUME_FIELD {
            let file_name = field.file_name().unwrap_or("").to_string();
            let mime_type = field
                .content_type()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let mut size: u64 = 0;
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| format!("Field read error: {e}"))?
            {
                size += chunk.len() as u64;
                if size > RESUME_MAX_BYTES {
                    break;
                }
            }

            // Browsers send an empty part when no file was picked.
            resume = if file_name.is_empty() && size == 0 {
                ResumeField::Absent
            } else {
                ResumeField::Upload(ResumeMeta {
                    name: file_name,
                    mime_type,
                    size,
                })
            };
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(RawPayload {
        fields: fold_bracket_keys(map),
        resume,
    })
}

fn resume_oversized(resume: &ResumeField) -> bool {
    matches!(resume, ResumeField::Upload(meta) if meta.size > RESUME_MAX_BYTES)
}

/// Fold `outer[inner]` keys into nested objects, e.g.
/// `visaCategories[O-1]=true` becomes `{"visaCategories": {"O-1": "true"}}`.
fn fold_bracket_keys(obj: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in obj {
        let Some((outer, inner)) = split_bracket_key(&key) else {
            out.insert(key, value);
            continue;
        };

        let entry = out
            .entry(outer.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Some(nested) = entry.as_object_mut() {
            nested.insert(inner.to_string(), value);
        }
    }
    out
}

fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let inner_and_close = key.strip_suffix(']')?;
    let (outer, inner) = inner_and_close.split_once('[')?;
    if outer.is_empty() || inner.is_empty() {
        return None;
    }
    Some((outer, inner))
}
