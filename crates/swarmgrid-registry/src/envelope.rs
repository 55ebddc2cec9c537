//! Result envelope returned by the CRUD entry points.
//!
//! Wire shape: `{"message": string|null, "code": int}` plus either a
//! `data` or a `success` member. `code == 0` is success; failures carry a
//! stable negative code (see [`RegistryError::code`]).

use serde::Serialize;

use crate::error::{ErrorKind, Operation, RegistryError};
use crate::types::{SwarmRecord, SwarmView};

/// Query results carried in `data`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SwarmData {
    Swarms(Vec<SwarmView>),
    Swarm(SwarmRecord),
    /// `null` when no swarm is active.
    Active(Option<SwarmRecord>),
    Leader(String),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Data(SwarmData),
    Success(bool),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Envelope {
    pub message: Option<String>,
    pub code: i32,
    #[serde(flatten)]
    pub payload: Option<Payload>,
    #[serde(skip)]
    kind: Option<ErrorKind>,
}

impl Envelope {
    pub fn data(data: SwarmData) -> Self {
        Self::ok(Some(Payload::Data(data)))
    }

    pub fn success() -> Self {
        Self::ok(Some(Payload::Success(true)))
    }

    /// Accepted request with nothing to report.
    pub fn empty() -> Self {
        Self::ok(None)
    }

    pub fn failure(op: Operation, err: &RegistryError) -> Self {
        Self {
            message: Some(err.to_string()),
            code: err.code(op),
            payload: None,
            kind: Some(err.kind()),
        }
    }

    fn ok(payload: Option<Payload>) -> Self {
        Self {
            message: None,
            code: 0,
            payload,
            kind: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// Kind of the failure this envelope reports, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_shape() {
        let value = serde_json::to_value(Envelope::success()).unwrap();
        assert_eq!(value, json!({"message": null, "code": 0, "success": true}));
    }

    #[test]
    fn data_shape() {
        let value = serde_json::to_value(Envelope::data(SwarmData::Leader("10.0.0.5".into()))).unwrap();
        assert_eq!(value, json!({"message": null, "code": 0, "data": "10.0.0.5"}));

        let value = serde_json::to_value(Envelope::data(SwarmData::Active(None))).unwrap();
        assert_eq!(value, json!({"message": null, "code": 0, "data": null}));

        let value = serde_json::to_value(Envelope::data(SwarmData::Swarms(vec![]))).unwrap();
        assert_eq!(value, json!({"message": null, "code": 0, "data": []}));
    }

    #[test]
    fn failure_shape() {
        let envelope = Envelope::failure(
            Operation::Delete,
            &RegistryError::ActiveClusterProtected("prod".into()),
        );
        assert!(!envelope.is_ok());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::ActiveClusterProtected));

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["code"], -1032);
        assert!(value["message"].as_str().unwrap().contains("prod"));
        assert!(value.get("success").is_none());
        assert!(value.get("data").is_none());
    }

    #[test]
    fn empty_has_no_payload() {
        let value = serde_json::to_value(Envelope::empty()).unwrap();
        assert_eq!(value, json!({"message": null, "code": 0}));
    }
}
