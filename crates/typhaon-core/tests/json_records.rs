//! Integration test: JSON documents arriving at the record boundary.
//!
//! Records usually reach the validator as parsed JSON. These tests pin down
//! how JSON shapes map onto the flat record model.

use serde_json::json;
use typhaon_core::{is_falsy, FieldValue, Record, ValidationError};

#[test]
fn test_mixed_record_converts_field_by_field() {
    let record = Record::try_from(json!({
        "id": "a-1",
        "count": 3,
        "ratio": 0.25,
        "active": false,
        "tags": [],
        "meta": {"source": "import"},
        "note": null
    }))
    .unwrap();

    assert_eq!(record.len(), 7);
    assert_eq!(record.get("count"), Some(&FieldValue::Integer(3)));
    assert_eq!(record.get("ratio"), Some(&FieldValue::Float(0.25)));
    assert!(is_falsy(record.get("active")));
    assert!(is_falsy(record.get("tags")));
    assert!(!is_falsy(record.get("meta")));
    assert!(is_falsy(record.get("note")));
    assert!(is_falsy(record.get("never_set")));
}

#[test]
fn test_non_object_documents_are_not_records() {
    for (doc, found) in [
        (json!("text"), "string"),
        (json!(12), "int"),
        (json!(1.5), "float"),
        (json!(null), "null"),
        (json!([{"a": 1}]), "array"),
    ] {
        let err = Record::try_from(doc).unwrap_err();
        assert_eq!(err, ValidationError::NotARecord { found });
    }
}

#[test]
fn test_record_back_to_json_preserves_fields() {
    let doc = json!({"a": [1, "two", null], "b": {"c": true}});
    let record = Record::try_from(doc.clone()).unwrap();
    assert_eq!(record.to_json(), doc);
}
