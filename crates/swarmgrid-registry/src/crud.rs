//! CRUD entry points: the four operations an outer routing layer calls.
//!
//! Each returns an [`Envelope`]; no error escapes as a fault.

use tracing::{debug, info};

use crate::envelope::{Envelope, SwarmData};
use crate::error::{Operation, RegistryError};
use crate::registry::SwarmRegistry;

impl SwarmRegistry {
    /// `GET ?query=all|active|leader|<name>[&checkState=bool]`.
    ///
    /// Keywords are matched case-insensitively; names are matched exactly.
    pub async fn handle_get(&self, query: Option<&str>, check_state: bool) -> Envelope {
        debug!(?query, check_state, "get request");
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => {
                let err = RegistryError::InvalidInput("query param is required".to_string());
                return finish(Operation::Get, Err(err));
            }
        };

        let result = if query.eq_ignore_ascii_case("all") {
            self.list(check_state).await.map(SwarmData::Swarms)
        } else if query.eq_ignore_ascii_case("active") {
            self.active().map(SwarmData::Active)
        } else if query.eq_ignore_ascii_case("leader") {
            self.leader().await.map(SwarmData::Leader)
        } else {
            match self.get(query) {
                Ok(Some(record)) => Ok(SwarmData::Swarm(record)),
                Ok(None) => Err(RegistryError::NotFound(query.to_string())),
                Err(e) => Err(e),
            }
        };

        finish(Operation::Get, result.map(Envelope::data))
    }

    /// `POST {name, address}`.
    pub async fn handle_post(&self, name: &str, address: &str) -> Envelope {
        debug!(%name, %address, "post request");
        let result = self.add(name, address).await.map(|_| Envelope::success());
        finish(Operation::Post, result)
    }

    /// `DELETE {name}`.
    pub async fn handle_delete(&self, name: &str) -> Envelope {
        debug!(%name, "delete request");
        let result = self.remove(name).await.map(|()| Envelope::success());
        finish(Operation::Delete, result)
    }

    /// `PUT {name, setActive}`. Only activation is supported; without
    /// `setActive` the request is accepted and nothing changes.
    pub async fn handle_put(&self, name: &str, set_active: bool) -> Envelope {
        debug!(%name, set_active, "put request");
        if !set_active {
            return Envelope::empty();
        }
        let result = self.activate(name).await.map(|()| Envelope::success());
        finish(Operation::Put, result)
    }
}

fn finish(op: Operation, result: Result<Envelope, RegistryError>) -> Envelope {
    match result {
        Ok(envelope) => envelope,
        Err(e) => {
            let envelope = Envelope::failure(op, &e);
            info!(?op, code = envelope.code, error = %e, "request rejected");
            envelope
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};
    use swarmgrid_state::MemoryStore;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::FakeCluster;

    fn setup() -> SwarmRegistry {
        let cluster = Arc::new(FakeCluster::default());
        cluster.add_node("10.0.0.5", &["10.0.0.5"]);
        cluster.add_node("10.0.1.5", &["10.0.1.5"]);
        SwarmRegistry::new(Arc::new(MemoryStore::new()), cluster)
    }

    fn json(envelope: &Envelope) -> Value {
        serde_json::to_value(envelope).unwrap()
    }

    #[tokio::test]
    async fn register_activate_and_delete_scenario() {
        let registry = setup();

        let all = registry.handle_get(Some("all"), false).await;
        assert_eq!(json(&all), json!({"message": null, "code": 0, "data": []}));

        let post = registry.handle_post("prod", "10.0.0.5").await;
        assert_eq!(json(&post), json!({"message": null, "code": 0, "success": true}));

        let get = json(&registry.handle_get(Some("prod"), false).await);
        assert_eq!(get["code"], 0);
        assert_eq!(get["data"]["name"], "prod");
        assert_eq!(get["data"]["managerAddresses"], json!(["10.0.0.5"]));
        assert_eq!(get["data"]["managerToken"], "SWMTKN-1-10.0.0.5-m");
        assert_eq!(get["data"]["workerToken"], "SWMTKN-1-10.0.0.5-w");

        let put = registry.handle_put("prod", true).await;
        assert_eq!(json(&put)["success"], true);

        let active = json(&registry.handle_get(Some("active"), false).await);
        assert_eq!(active["data"], get["data"]);

        let delete = registry.handle_delete("prod").await;
        assert_eq!(delete.code, -1032);
        assert_eq!(delete.error_kind(), Some(ErrorKind::ActiveClusterProtected));

        registry.handle_post("staging", "10.0.1.5").await;
        assert!(registry.handle_put("staging", true).await.is_ok());

        let delete = registry.handle_delete("prod").await;
        assert_eq!(json(&delete)["success"], true);
        assert!(!registry.is_member("prod").unwrap());
    }

    #[tokio::test]
    async fn get_requires_query() {
        let registry = setup();
        assert_eq!(registry.handle_get(None, false).await.code, -1010);
        assert_eq!(registry.handle_get(Some("  "), false).await.code, -1010);
    }

    #[tokio::test]
    async fn get_unknown_name() {
        let registry = setup();
        let envelope = registry.handle_get(Some("ghost"), false).await;
        assert_eq!(envelope.code, -1011);
        assert!(envelope.payload.is_none());
    }

    #[tokio::test]
    async fn get_name_is_not_trimmed() {
        let registry = setup();
        registry.handle_post("prod", "10.0.0.5").await;

        assert_eq!(registry.handle_get(Some(" prod"), false).await.code, -1011);
        assert_eq!(registry.handle_get(Some("prod "), false).await.code, -1011);
        assert!(registry.handle_get(Some("prod"), false).await.is_ok());
    }

    #[tokio::test]
    async fn get_keywords_ignore_case() {
        let registry = setup();
        registry.handle_post("prod", "10.0.0.5").await;
        registry.handle_put("prod", true).await;

        let all = json(&registry.handle_get(Some("ALL"), true).await);
        assert_eq!(all["data"][0]["name"], "prod");
        assert_eq!(all["data"][0]["state"], "healthy");
        assert_eq!(all["data"][0]["manager"], "10.0.0.5:2377");

        let leader = json(&registry.handle_get(Some("Leader"), false).await);
        assert_eq!(leader["data"], "10.0.0.5");
    }

    #[tokio::test]
    async fn get_active_when_unset_is_null() {
        let registry = setup();
        let active = json(&registry.handle_get(Some("active"), false).await);
        assert_eq!(active, json!({"message": null, "code": 0, "data": null}));
    }

    #[tokio::test]
    async fn get_leader_without_active() {
        let registry = setup();
        assert_eq!(registry.handle_get(Some("leader"), false).await.code, -1011);
    }

    #[tokio::test]
    async fn post_failure_codes() {
        let registry = setup();
        assert_eq!(registry.handle_post("prod", "not-an-ip").await.code, -1020);
        assert_eq!(registry.handle_post("all", "10.0.0.5").await.code, -1023);
        assert_eq!(registry.handle_post("prod", "10.9.9.9").await.code, -1022);

        registry.handle_post("prod", "10.0.0.5").await;
        assert_eq!(registry.handle_post("prod", "10.0.0.5").await.code, -1021);
    }

    #[tokio::test]
    async fn delete_failure_codes() {
        let registry = setup();
        assert_eq!(registry.handle_delete("all").await.code, -1031);
        assert_eq!(registry.handle_delete("ghost").await.code, -1030);
    }

    #[tokio::test]
    async fn put_without_set_active_is_a_no_op() {
        let registry = setup();
        registry.handle_post("prod", "10.0.0.5").await;

        let put = registry.handle_put("prod", false).await;
        assert_eq!(json(&put), json!({"message": null, "code": 0}));
        assert_eq!(registry.active().unwrap(), None);
    }

    #[tokio::test]
    async fn put_unknown_name() {
        let registry = setup();
        assert_eq!(registry.handle_put("ghost", true).await.code, -1040);
        assert_eq!(registry.handle_put("", true).await.code, -1040);
        assert_eq!(registry.active().unwrap(), None);
    }
}
