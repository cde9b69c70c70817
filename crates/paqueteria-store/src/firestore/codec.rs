//! Firestore `Value` encoding.
//!
//! Server-assigned timestamps are not values on the wire: they are removed
//! from `fields` and sent as `REQUEST_TIME` field transforms on the same
//! write. Firestore cannot apply a transform inside an array, so a
//! server-assigned timestamp there is rejected.

use chrono::{DateTime, SecondsFormat, Utc};
use paqueteria_core::{AppError, AppResult};
use paqueteria_models::{Document, FieldValue, Timestamp};
use serde_json::{Map, Value, json};

/// A document ready to be sent in a `Write`.
#[derive(Debug, Default, PartialEq)]
pub struct EncodedDocument {
    pub fields: Map<String, Value>,
    /// Field paths to stamp with the server's request time.
    pub server_timestamps: Vec<String>,
}

impl EncodedDocument {
    /// `updateTransforms` entries for the write, empty when none are needed.
    pub fn field_transforms(&self) -> Vec<Value> {
        self.server_timestamps
            .iter()
            .map(|path| json!({"fieldPath": path, "setToServerValue": "REQUEST_TIME"}))
            .collect()
    }
}

pub fn encode_document(document: &Document) -> AppResult<EncodedDocument> {
    let mut server_timestamps = Vec::new();
    let fields = encode_map(document, None, false, &mut server_timestamps)?;
    Ok(EncodedDocument {
        fields,
        server_timestamps,
    })
}

fn encode_map(
    document: &Document,
    parent: Option<&str>,
    inside_array: bool,
    server_timestamps: &mut Vec<String>,
) -> AppResult<Map<String, Value>> {
    let mut fields = Map::new();
    for (name, value) in document.iter() {
        let path = match parent {
            Some(parent) => format!("{parent}.{}", quote_segment(name)),
            None => quote_segment(name),
        };

        if let FieldValue::Timestamp(Timestamp::ServerAssigned) = value {
            if inside_array {
                return Err(server_timestamp_in_array(&path));
            }
            server_timestamps.push(path);
            continue;
        }

        let encoded = encode_value(value, &path, inside_array, server_timestamps)?;
        fields.insert(name.to_string(), encoded);
    }
    Ok(fields)
}

fn encode_value(
    value: &FieldValue,
    path: &str,
    inside_array: bool,
    server_timestamps: &mut Vec<String>,
) -> AppResult<Value> {
    let encoded = match value {
        FieldValue::Null => json!({"nullValue": null}),
        FieldValue::Bool(b) => json!({"booleanValue": b}),
        FieldValue::Integer(i) => json!({"integerValue": i.to_string()}),
        FieldValue::Double(d) => json!({"doubleValue": d}),
        FieldValue::String(s) => json!({"stringValue": s}),
        FieldValue::Timestamp(Timestamp::At(at)) => {
            json!({"timestampValue": format_timestamp(at)})
        }
        FieldValue::Timestamp(Timestamp::ServerAssigned) => {
            return Err(server_timestamp_in_array(path));
        }
        FieldValue::Array(values) => {
            let values = values
                .iter()
                .map(|v| encode_value(v, path, true, server_timestamps))
                .collect::<AppResult<Vec<_>>>()?;
            json!({"arrayValue": {"values": values}})
        }
        FieldValue::Map(document) => {
            let fields = encode_map(document, Some(path), inside_array, server_timestamps)?;
            json!({"mapValue": {"fields": fields}})
        }
    };
    Ok(encoded)
}

fn server_timestamp_in_array(path: &str) -> AppError {
    AppError::invalid_document(format!(
        "server-assigned timestamp inside array field '{path}'"
    ))
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Quotes a field name for use in a field path.
///
/// Simple names (`[A-Za-z_][A-Za-z0-9_]*`) are used as is; anything else is
/// wrapped in backticks with backticks and backslashes escaped.
pub fn quote_segment(name: &str) -> String {
    let mut chars = name.chars();
    let simple = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        return name.to_string();
    }

    let escaped = name.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{escaped}`")
}

/// Decodes the `fields` object of a Firestore document.
pub fn decode_fields(fields: &Map<String, Value>) -> AppResult<Document> {
    fields
        .iter()
        .map(|(name, value)| Ok::<_, AppError>((name.clone(), decode_value(value)?)))
        .collect()
}

pub fn decode_value(value: &Value) -> AppResult<FieldValue> {
    let object = value.as_object().ok_or_else(|| {
        AppError::invalid_document(format!("expected a Firestore value, got {value}"))
    })?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| AppError::invalid_document("empty Firestore value"))?;

    let decoded = match kind.as_str() {
        "nullValue" => FieldValue::Null,
        "booleanValue" => FieldValue::Bool(inner.as_bool().ok_or_else(|| mismatch(kind, inner))?),
        "integerValue" => {
            // int64 arrives as a JSON string; accept a bare number too
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            FieldValue::Integer(parsed.ok_or_else(|| mismatch(kind, inner))?)
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            };
            FieldValue::Double(parsed.ok_or_else(|| mismatch(kind, inner))?)
        }
        "stringValue" | "referenceValue" | "bytesValue" => {
            FieldValue::String(inner.as_str().ok_or_else(|| mismatch(kind, inner))?.to_string())
        }
        "timestampValue" => {
            let raw = inner.as_str().ok_or_else(|| mismatch(kind, inner))?;
            let at = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| AppError::invalid_document(format!("bad timestamp '{raw}': {e}")))?;
            FieldValue::Timestamp(Timestamp::At(at.with_timezone(&Utc)))
        }
        "arrayValue" => {
            let values = match inner.get("values").and_then(Value::as_array) {
                Some(values) => values.iter().map(decode_value).collect::<AppResult<Vec<_>>>()?,
                None => Vec::new(),
            };
            FieldValue::Array(values)
        }
        "mapValue" => {
            let document = match inner.get("fields").and_then(Value::as_object) {
                Some(fields) => decode_fields(fields)?,
                None => Document::new(),
            };
            FieldValue::Map(document)
        }
        "geoPointValue" => {
            let coordinate = |axis: &str| inner.get(axis).and_then(Value::as_f64).unwrap_or(0.0);
            FieldValue::Map(
                Document::new()
                    .with("latitude", coordinate("latitude"))
                    .with("longitude", coordinate("longitude")),
            )
        }
        other => {
            return Err(AppError::invalid_document(format!(
                "unsupported Firestore value type '{other}'"
            )));
        }
    };
    Ok(decoded)
}

fn mismatch(kind: &str, inner: &Value) -> AppError {
    AppError::invalid_document(format!("malformed {kind}: {inner}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_encode_scalars() {
        let document = Document::new()
            .with("nombre", "Juan")
            .with("activo", true)
            .with("intentos", 3_i64)
            .with("peso", 1.5)
            .with("fechaEntrega", FieldValue::Null)
            .with("fechaCreacion", at());

        let encoded = encode_document(&document).unwrap();

        assert_eq!(encoded.fields["nombre"], json!({"stringValue": "Juan"}));
        assert_eq!(encoded.fields["activo"], json!({"booleanValue": true}));
        assert_eq!(encoded.fields["intentos"], json!({"integerValue": "3"}));
        assert_eq!(encoded.fields["peso"], json!({"doubleValue": 1.5}));
        assert_eq!(encoded.fields["fechaEntrega"], json!({"nullValue": null}));
        assert_eq!(
            encoded.fields["fechaCreacion"],
            json!({"timestampValue": "2025-03-14T09:30:00.000000Z"})
        );
        assert!(encoded.server_timestamps.is_empty());
    }

    #[test]
    fn test_server_timestamps_become_transforms() {
        let document = Document::new()
            .with("email", "admin@paqueteria.com")
            .with("createdAt", Timestamp::ServerAssigned)
            .with("meta", Document::new().with("updated at", Timestamp::ServerAssigned));

        let encoded = encode_document(&document).unwrap();

        assert!(!encoded.fields.contains_key("createdAt"));
        assert_eq!(encoded.fields["meta"], json!({"mapValue": {"fields": {}}}));
        assert_eq!(encoded.server_timestamps, vec!["createdAt", "meta.`updated at`"]);
        assert_eq!(
            encoded.field_transforms()[0],
            json!({"fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME"})
        );
    }

    #[test]
    fn test_server_timestamp_in_array_rejected() {
        let document = Document::new().with(
            "estadoHistorial",
            vec![FieldValue::Map(
                Document::new().with("fecha", Timestamp::ServerAssigned),
            )],
        );

        let error = encode_document(&document).unwrap_err();
        assert!(matches!(error, AppError::InvalidDocument(_)));
    }

    #[test]
    fn test_quote_segment() {
        assert_eq!(quote_segment("createdAt"), "createdAt");
        assert_eq!(quote_segment("_private1"), "_private1");
        assert_eq!(quote_segment("1st"), "`1st`");
        assert_eq!(quote_segment("with space"), "`with space`");
        assert_eq!(quote_segment("tick`"), "`tick\\``");
    }

    #[test]
    fn test_decode_document() {
        let fields = json!({
            "numeroOrden": {"stringValue": "ORD-2025-001"},
            "activa": {"booleanValue": true},
            "intentos": {"integerValue": "2"},
            "fechaCreacion": {"timestampValue": "2025-03-14T09:30:00Z"},
            "fechaEntrega": {"nullValue": null},
            "estadoHistorial": {"arrayValue": {"values": [
                {"mapValue": {"fields": {"estado": {"stringValue": "CREADA"}}}}
            ]}},
            "vacio": {"arrayValue": {}}
        });

        let document = decode_fields(fields.as_object().unwrap()).unwrap();

        assert_eq!(document.get_str("numeroOrden"), Some("ORD-2025-001"));
        assert_eq!(document.get("activa"), Some(&FieldValue::Bool(true)));
        assert_eq!(document.get("intentos"), Some(&FieldValue::Integer(2)));
        assert_eq!(document.get_timestamp("fechaCreacion"), Some(Timestamp::At(at())));
        assert!(document.get("fechaEntrega").unwrap().is_null());
        assert_eq!(document.get("vacio"), Some(&FieldValue::Array(Vec::new())));

        let Some(FieldValue::Array(history)) = document.get("estadoHistorial") else {
            panic!("expected array");
        };
        let FieldValue::Map(first) = &history[0] else {
            panic!("expected map");
        };
        assert_eq!(first.get_str("estado"), Some("CREADA"));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let error = decode_value(&json!({"mysteryValue": 1})).unwrap_err();
        assert!(matches!(error, AppError::InvalidDocument(_)));
    }
}
