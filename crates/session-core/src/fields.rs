//! Hash field layout of a persisted session.
//!
//! Every value is text; numbers are written in decimal so records stay
//! readable from any client.

use crate::domain::{Attributes, SessionRecord};
use crate::error::{SerializerError, StoreError};

pub const ID: &str = "id";
pub const CONTEXT_PATH: &str = "cpath";
pub const VIRTUAL_HOST: &str = "vhost";
pub const CREATED: &str = "created";
pub const LAST_ACCESSED: &str = "lastAccessed";
pub const ACCESSED: &str = "accessed";
pub const MAX_INACTIVE_MS: &str = "maxInactiveMs";
pub const COOKIE_SET: &str = "cookieSet";
pub const ATTRIBUTES: &str = "attributes";
pub const LAST_SAVED: &str = "lastSaved";

/// Fields fetched on load, in decode order. `lastSaved` is last and optional.
pub const LOAD_FIELDS: [&str; 9] = [
    CONTEXT_PATH,
    VIRTUAL_HOST,
    CREATED,
    ACCESSED,
    LAST_ACCESSED,
    MAX_INACTIVE_MS,
    ATTRIBUTES,
    COOKIE_SET,
    LAST_SAVED,
];

pub type FieldMap = Vec<(String, String)>;

/// Everything but `lastSaved`, which is stamped when the write actually runs.
pub fn to_fields(record: &SessionRecord, serialized_attributes: String) -> FieldMap {
    vec![
        (ID.to_string(), record.id.clone()),
        (CONTEXT_PATH.to_string(), record.context_path.clone()),
        (VIRTUAL_HOST.to_string(), record.virtual_host.clone()),
        (CREATED.to_string(), record.created.to_string()),
        (LAST_ACCESSED.to_string(), record.last_accessed.to_string()),
        (ACCESSED.to_string(), record.accessed.to_string()),
        (MAX_INACTIVE_MS.to_string(), record.max_inactive_ms.to_string()),
        (COOKIE_SET.to_string(), record.cookie_set.to_string()),
        (ATTRIBUTES.to_string(), serialized_attributes),
    ]
}

/// Append (or replace) the `lastSaved` stamp.
pub fn stamp_last_saved(fields: &mut FieldMap, last_saved: i64) {
    fields.retain(|(name, _)| name != LAST_SAVED);
    fields.push((LAST_SAVED.to_string(), last_saved.to_string()));
}

/// Rebuild a record from values fetched in [`LOAD_FIELDS`] order.
///
/// An absent first field means the key does not exist and yields `Ok(None)`.
pub fn from_values<D>(
    id: &str,
    values: Vec<Option<String>>,
    deserialize: D,
) -> Result<Option<SessionRecord>, StoreError>
where
    D: FnOnce(&str) -> Result<Attributes, SerializerError>,
{
    if values.first().map_or(true, Option::is_none) {
        return Ok(None);
    }
    if values.len() != LOAD_FIELDS.len() {
        return Err(StoreError::malformed(
            id,
            format!("expected {} fields, got {}", LOAD_FIELDS.len(), values.len()),
        ));
    }

    let mut values = values.into_iter();
    let mut next = |name: &str| -> Result<String, StoreError> {
        values
            .next()
            .flatten()
            .ok_or_else(|| StoreError::malformed(id, format!("missing field `{}`", name)))
    };

    let context_path = next(CONTEXT_PATH)?;
    let virtual_host = next(VIRTUAL_HOST)?;
    let created = parse_millis(id, CREATED, &next(CREATED)?)?;
    let accessed = parse_millis(id, ACCESSED, &next(ACCESSED)?)?;
    let last_accessed = parse_millis(id, LAST_ACCESSED, &next(LAST_ACCESSED)?)?;
    let max_inactive_ms = parse_millis(id, MAX_INACTIVE_MS, &next(MAX_INACTIVE_MS)?)?;
    let attributes = deserialize(&next(ATTRIBUTES)?)?;
    let cookie_set = parse_millis(id, COOKIE_SET, &next(COOKIE_SET)?)?;
    let last_saved = match next(LAST_SAVED) {
        Ok(raw) => parse_millis(id, LAST_SAVED, &raw)?,
        Err(_) => 0,
    };

    Ok(Some(SessionRecord {
        id: id.to_string(),
        context_path,
        virtual_host,
        created,
        accessed,
        last_accessed,
        max_inactive_ms,
        cookie_set,
        last_saved,
        attributes,
    }))
}

fn parse_millis(id: &str, field: &str, raw: &str) -> Result<i64, StoreError> {
    raw.trim().parse::<i64>().map_err(|_| {
        StoreError::malformed(id, format!("field `{}` is not a decimal number: {:?}", field, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionRecord {
        let mut record = SessionRecord::new("abc", "/app", "example.com", 100, 60_000).unwrap();
        record.access(200);
        record.access(300);
        record.cookie_set = 150;
        record
    }

    fn stored_values(record: &SessionRecord, last_saved: Option<&str>) -> Vec<Option<String>> {
        vec![
            Some(record.context_path.clone()),
            Some(record.virtual_host.clone()),
            Some(record.created.to_string()),
            Some(record.accessed.to_string()),
            Some(record.last_accessed.to_string()),
            Some(record.max_inactive_ms.to_string()),
            Some("{}".to_string()),
            Some(record.cookie_set.to_string()),
            last_saved.map(str::to_string),
        ]
    }

    #[test]
    fn test_to_fields_layout() {
        let fields = to_fields(&sample(), "{\"k\":1}".to_string());
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "id", "cpath", "vhost", "created", "lastAccessed", "accessed",
                "maxInactiveMs", "cookieSet", "attributes"
            ]
        );
        assert!(fields.contains(&("lastAccessed".to_string(), "300".to_string())));
        assert!(fields.contains(&("accessed".to_string(), "200".to_string())));
        assert!(fields.contains(&("maxInactiveMs".to_string(), "60000".to_string())));
    }

    #[test]
    fn test_stamp_last_saved_replaces() {
        let mut fields = to_fields(&sample(), "{}".to_string());
        stamp_last_saved(&mut fields, 1);
        stamp_last_saved(&mut fields, 2);
        let stamps: Vec<_> = fields.iter().filter(|(n, _)| n == LAST_SAVED).collect();
        assert_eq!(stamps, vec![&(LAST_SAVED.to_string(), "2".to_string())]);
    }

    #[test]
    fn test_from_values_rebuilds_record() {
        let expected = sample();
        let values = stored_values(&expected, Some("999"));
        let record = from_values("abc", values, |raw| {
            assert_eq!(raw, "{}");
            Ok(Attributes::new())
        })
        .unwrap()
        .unwrap();

        assert_eq!(record.last_saved, 999);
        assert_eq!(SessionRecord { last_saved: 0, ..record }, expected);
    }

    #[test]
    fn test_missing_first_field_is_absent() {
        let values = vec![None; LOAD_FIELDS.len()];
        assert_eq!(from_values("abc", values, |_| Ok(Attributes::new())).unwrap(), None);
        assert_eq!(from_values("abc", Vec::new(), |_| Ok(Attributes::new())).unwrap(), None);
    }

    #[test]
    fn test_missing_last_saved_defaults_to_zero() {
        let values = stored_values(&sample(), None);
        let record = from_values("abc", values, |_| Ok(Attributes::new())).unwrap().unwrap();
        assert_eq!(record.last_saved, 0);
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let mut values = stored_values(&sample(), Some("1"));
        values[2] = Some("yesterday".to_string());
        let err = from_values("abc", values, |_| Ok(Attributes::new())).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref reason, .. } if reason.contains("created")));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let values = vec![Some("/".to_string()), Some("host".to_string())];
        let err = from_values("abc", values, |_| Ok(Attributes::new())).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let mut values = stored_values(&sample(), Some("1"));
        values[6] = None;
        let err = from_values("abc", values, |_| Ok(Attributes::new())).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref reason, .. } if reason.contains("attributes")));
    }

    #[test]
    fn test_deserializer_failure_propagates() {
        let values = stored_values(&sample(), Some("1"));
        let err = from_values("abc", values, |_| Err(SerializerError::Deserialize("eof".into())))
            .unwrap_err();
        assert_eq!(err, StoreError::Serializer(SerializerError::Deserialize("eof".into())));
    }
}
