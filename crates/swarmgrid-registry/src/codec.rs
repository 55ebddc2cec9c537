//! JSON encoding of the two persisted documents.
//!
//! The swarm list is a JSON array of records. The active pointer is a
//! single record; an absent key, an empty string, `null` and `{}` all
//! mean "no active swarm".

use serde_json::Value;
use swarmgrid_state::StateError;

use crate::error::{RegistryError, RegistryResult};
use crate::types::SwarmRecord;

pub fn encode_swarms(swarms: &[SwarmRecord]) -> RegistryResult<String> {
    serde_json::to_string(swarms).map_err(encode_error)
}

pub fn decode_swarms(key: &str, raw: Option<&str>) -> RegistryResult<Vec<SwarmRecord>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| decode_error(key, e)),
    }
}

pub fn encode_active(active: &SwarmRecord) -> RegistryResult<String> {
    serde_json::to_string(active).map_err(encode_error)
}

pub fn decode_active(key: &str, raw: Option<&str>) -> RegistryResult<Option<SwarmRecord>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    let value: Value = serde_json::from_str(raw).map_err(|e| decode_error(key, e))?;
    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| decode_error(key, e))
}

fn encode_error(e: serde_json::Error) -> RegistryError {
    RegistryError::Storage(StateError::Serialize(e.to_string()))
}

fn decode_error(key: &str, e: serde_json::Error) -> RegistryError {
    RegistryError::StorageDecode {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(name: &str) -> SwarmRecord {
        SwarmRecord {
            name: name.into(),
            manager_addresses: vec!["10.0.0.5".into(), "10.0.0.6".into()],
            manager_token: format!("SWMTKN-{name}-m"),
            worker_token: format!("SWMTKN-{name}-w"),
        }
    }

    #[test]
    fn encode_failure_is_a_serialization_error() {
        let source = serde_json::from_str::<Value>("{").unwrap_err();
        let err = encode_error(source);
        assert!(matches!(err, RegistryError::Storage(StateError::Serialize(_))));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn swarm_list_roundtrip_preserves_order() {
        let swarms = vec![record("prod"), record("staging"), record("dev")];
        let encoded = encode_swarms(&swarms).unwrap();
        let decoded = decode_swarms("swarms", Some(&encoded)).unwrap();
        assert_eq!(decoded, swarms);
    }

    #[test]
    fn active_roundtrip() {
        let active = record("prod");
        let encoded = encode_active(&active).unwrap();
        assert_eq!(decode_active("active", Some(&encoded)).unwrap(), Some(active));
    }

    #[test]
    fn missing_or_blank_means_empty() {
        assert!(decode_swarms("swarms", None).unwrap().is_empty());
        assert!(decode_swarms("swarms", Some("  ")).unwrap().is_empty());
        assert_eq!(decode_active("active", None).unwrap(), None);
        assert_eq!(decode_active("active", Some("")).unwrap(), None);
        assert_eq!(decode_active("active", Some("null")).unwrap(), None);
        assert_eq!(decode_active("active", Some("{}")).unwrap(), None);
    }

    #[test]
    fn malformed_blobs_are_decode_errors() {
        let err = decode_swarms("swarms", Some("[{")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageDecode);

        let err = decode_swarms("swarms", Some(r#"{"name":"prod"}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageDecode);

        let err = decode_active("active", Some(r#"{"name":"prod"}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageDecode);
    }
}
