use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::{json, Map, Value};

use super::{DocumentStore, WriteBatch};

const PRODUCTION_BASE: &str = "https://firestore.googleapis.com/v1";

/// Bearer token the emulator accepts as an admin credential.
const EMULATOR_OWNER: &str = "owner";

/// Firestore over its REST API. Each batch is one atomic `documents:commit`
/// of full-document `update` writes.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    /// "projects/{project}/databases/(default)"
    database: String,
    token: Option<String>,
}

impl FirestoreStore {
    /// Production endpoint, authenticated with an OAuth access token.
    pub fn new(project: &str, token: Option<String>) -> Result<Self> {
        Self::with_base(PRODUCTION_BASE, project, token)
    }

    /// Local emulator at `host` (e.g. "localhost:8080"). Without a token the
    /// emulator's `owner` admin credential is used.
    pub fn emulator(project: &str, host: &str, token: Option<String>) -> Result<Self> {
        let token = token.unwrap_or_else(|| EMULATOR_OWNER.to_string());
        Self::with_base(&format!("http://{host}/v1"), project, Some(token))
    }

    fn with_base(base_url: &str, project: &str, token: Option<String>) -> Result<Self> {
        if project.is_empty() {
            bail!("[FirestoreStore] project id must not be empty");
        }
        let client = Client::builder()
            .user_agent(concat!("wardseed/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .context("[FirestoreStore] build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            database: format!("projects/{project}/databases/(default)"),
            token,
        })
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database)
    }

    /// Request body for a commit of `batch`.
    fn commit_body(&self, batch: &WriteBatch) -> Result<Value> {
        let writes = batch.ops().iter()
            .map(|op| {
                let fields = encode_fields(&op.data)
                    .with_context(|| format!("[FirestoreStore::commit_body] {}", op.path()))?;
                Ok(json!({
                    "update": {
                        "name": format!("{}/documents/{}/{}", self.database, op.collection, op.id),
                        "fields": fields,
                    }
                }))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({ "writes": writes }))
    }
}

impl DocumentStore for FirestoreStore {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> {
        let body = self.commit_body(batch)?;
        let url = self.commit_url();

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().with_context(|| format!("[FirestoreStore::commit] POST {url}"))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            bail!("[FirestoreStore::commit] POST {url} returned {status}: {text}");
        }
        Ok(())
    }
}

/// Encode a JSON object as a Firestore `fields` map.
fn encode_fields(data: &Value) -> Result<Map<String, Value>> {
    let obj = data.as_object()
        .ok_or_else(|| anyhow!("document data must be a JSON object"))?;
    Ok(obj.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect())
}

/// Encode one JSON value as a Firestore typed `Value`.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => json!({ "integerValue": i.to_string() }),
            (None, Some(u)) => json!({ "integerValue": u.to_string() }),
            (None, None) => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) if items.is_empty() => json!({ "arrayValue": {} }),
        Value::Array(items) => json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } }),
        Value::Object(obj) => json!({
            "mapValue": { "fields": obj.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect::<Map<_, _>>() }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_encoding() {
        assert_eq!(encode_value(&json!(null)), json!({"nullValue": null}));
        assert_eq!(encode_value(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode_value(&json!(42)), json!({"integerValue": "42"}));
        assert_eq!(encode_value(&json!(4200.0)), json!({"doubleValue": 4200.0}));
        assert_eq!(encode_value(&json!("pending")), json!({"stringValue": "pending"}));
    }

    #[test]
    fn nested_encoding() {
        assert_eq!(encode_value(&json!([])), json!({"arrayValue": {}}));
        assert_eq!(
            encode_value(&json!({"lat": 23.8, "ids": ["a"]})),
            json!({"mapValue": {"fields": {
                "lat": {"doubleValue": 23.8},
                "ids": {"arrayValue": {"values": [{"stringValue": "a"}]}}
            }}})
        );
    }

    #[test]
    fn commit_body_names_documents() {
        let store = FirestoreStore::emulator("demo-campaign", "localhost:8080", None).unwrap();
        let mut batch = WriteBatch::new();
        batch.set("wards", "ward-1-ramna", json!({"status": "pending"}));

        let body = store.commit_body(&batch).unwrap();
        assert_eq!(
            body["writes"][0]["update"]["name"],
            json!("projects/demo-campaign/databases/(default)/documents/wards/ward-1-ramna")
        );
        assert_eq!(body["writes"][0]["update"]["fields"]["status"], json!({"stringValue": "pending"}));
        assert_eq!(
            store.commit_url(),
            "http://localhost:8080/v1/projects/demo-campaign/databases/(default)/documents:commit"
        );
    }

    #[test]
    fn non_object_document_is_rejected() {
        let store = FirestoreStore::emulator("p", "localhost:8080", None).unwrap();
        let mut batch = WriteBatch::new();
        batch.set("wards", "a", json!([1, 2]));
        assert!(store.commit_body(&batch).is_err());
    }

    #[test]
    fn emulator_keeps_a_given_token() {
        let with_token = FirestoreStore::emulator("p", "localhost:8080", Some("secret".into())).unwrap();
        assert_eq!(with_token.token.as_deref(), Some("secret"));

        let without = FirestoreStore::emulator("p", "localhost:8080", None).unwrap();
        assert_eq!(without.token.as_deref(), Some(EMULATOR_OWNER));
    }

    #[test]
    fn empty_project_is_rejected() {
        assert!(FirestoreStore::new("", None).is_err());
    }
}
