//! Turns the bridge's ID-keyed collection objects into ordered lists.
//!
//! Collection endpoints answer `{"1": {...}, "2": {...}}` rather than an
//! array; the key is the only place the ID appears.

use crate::{HueError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::str::FromStr;

const LAST_SCAN_KEY: &str = "lastscan";

/// A record whose identity is assigned by the bridge and carried by the
/// collection key.
pub(crate) trait Keyed: DeserializeOwned {
    type Id: FromStr + Ord;

    fn id(&self) -> &Self::Id;
    fn set_id(&mut self, id: Self::Id);
}

/// Decodes a collection body. An empty body is an empty collection.
pub(crate) fn normalize<T: Keyed>(body: &[u8]) -> Result<Vec<T>> {
    match decode_object(body)? {
        Some(map) => normalize_map(map),
        None => Ok(Vec::new()),
    }
}

/// Decodes an already parsed ID-keyed object, sorted by ID.
pub(crate) fn normalize_map<T: Keyed>(map: Map<String, Value>) -> Result<Vec<T>> {
    let mut records = Vec::with_capacity(map.len());
    for (key, value) in map {
        let id = key
            .parse::<T::Id>()
            .map_err(|_| HueError::decode_err(format!("unexpected collection key {key:?}")))?;
        let mut record: T = serde_json::from_value(value)?;
        record.set_id(id);
        records.push(record);
    }
    records.sort_by(|a, b| a.id().cmp(b.id()));
    log::debug!("normalized {} records", records.len());
    Ok(records)
}

/// Decodes the answer of a `/new` endpoint: the discovered records keyed by
/// ID next to a `lastscan` timestamp.
pub(crate) fn normalize_scan<T: Keyed>(body: &[u8]) -> Result<(Vec<T>, Option<String>)> {
    let Some(mut map) = decode_object(body)? else {
        return Ok((Vec::new(), None));
    };
    let last_scan = match map.remove(LAST_SCAN_KEY) {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(HueError::decode_err(format!(
                "expected {LAST_SCAN_KEY} to be a string, got {other}"
            )))
        }
    };
    Ok((normalize_map(map)?, last_scan))
}

fn decode_object(body: &[u8]) -> Result<Option<Map<String, Value>>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Thing {
        #[serde(skip)]
        id: u32,
        name: String,
    }

    impl Keyed for Thing {
        type Id = u32;
        fn id(&self) -> &u32 {
            &self.id
        }
        fn set_id(&mut self, id: u32) {
            self.id = id;
        }
    }

    #[derive(Debug, Default, Deserialize)]
    struct Named {
        #[serde(skip)]
        id: String,
    }

    impl Keyed for Named {
        type Id = String;
        fn id(&self) -> &String {
            &self.id
        }
        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    #[test]
    fn ids_come_from_keys_in_numeric_order() {
        let body = br#"{"10": {"name": "ten"}, "2": {"name": "two"}, "1": {"name": "one"}}"#;
        let things: Vec<Thing> = normalize(body).unwrap();
        let ids: Vec<u32> = things.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 10]);
        assert_eq!(things[2].name, "ten");
    }

    #[test]
    fn string_ids_are_kept() {
        let body = br#"{"4e1c6b20e-on-0": {}, "ab341ef24-on-5": {}}"#;
        let named: Vec<Named> = normalize(body).unwrap();
        assert_eq!(named[0].id, "4e1c6b20e-on-0");
        assert_eq!(named[1].id, "ab341ef24-on-5");
    }

    #[test]
    fn empty_inputs() {
        assert!(normalize::<Thing>(b"").unwrap().is_empty());
        assert!(normalize::<Thing>(b"  \n").unwrap().is_empty());
        assert!(normalize::<Thing>(b"{}").unwrap().is_empty());
    }

    #[test]
    fn bad_shapes_are_decode_errors() {
        for body in [
            &br#"[{"name": "x"}]"#[..],
            br#"{"one": {"name": "x"}}"#,
            br#"{"1": {"name": 4}}"#,
            b"{",
        ] {
            let err = normalize::<Thing>(body).unwrap_err();
            assert!(matches!(err, HueError::DecodeError { .. }), "{err}");
        }
    }

    #[test]
    fn scan_results() {
        let body = br#"{"7": {"name": "Hue Lamp 7"}, "8": {"name": "Hue Lamp 8"}, "lastscan": "2012-10-29T12:00:00"}"#;
        let (found, last_scan) = normalize_scan::<Thing>(body).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, 7);
        assert_eq!(found[1].name, "Hue Lamp 8");
        assert_eq!(last_scan.as_deref(), Some("2012-10-29T12:00:00"));

        let (found, last_scan) = normalize_scan::<Thing>(br#"{"lastscan": "active"}"#).unwrap();
        assert!(found.is_empty());
        assert_eq!(last_scan.as_deref(), Some("active"));

        let (found, last_scan) = normalize_scan::<Thing>(b"").unwrap();
        assert!(found.is_empty());
        assert!(last_scan.is_none());
    }
}
