//! HTTP gateway to the remote task API.
//!
//! One method per remote capability, each a single best-effort round trip.
//! No retries, no caching, no request deduplication. Non-2xx responses with
//! a structured JSON body become [`Error::Rejected`]; anything else becomes
//! a transport-level error.

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::task::{Stats, Task, TaskDraft};

#[derive(Debug, Clone)]
pub struct TaskGateway {
    client: Client,
    base_url: String,
}

impl TaskGateway {
    /// Build a gateway against a base URL such as `http://localhost:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `/tasks/` — the full collection.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        debug!(url = %self.url("tasks/"), "list tasks");
        let response = self
            .client
            .get(self.url("tasks/"))
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        read_json(response)
    }

    /// POST `/tasks/` — returns the record the server created, with its
    /// assigned `id` and `createdAt`.
    pub fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        debug!(title = %draft.title, "create task");
        let response = self.client.post(self.url("tasks/")).json(draft).send()?;
        read_json(response)
    }

    /// PUT `/tasks/{id}/` — full replace of the mutable fields.
    pub fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task> {
        debug!(%id, "update task");
        let response = self
            .client
            .put(self.url(&format!("tasks/{id}/")))
            .json(draft)
            .send()?;
        read_json(response)
    }

    /// DELETE `/tasks/{id}/`. Deleting an already-deleted id surfaces the
    /// server's error rather than being swallowed.
    pub fn delete_task(&self, id: &str) -> Result<()> {
        debug!(%id, "delete task");
        let response = self
            .client
            .delete(self.url(&format!("tasks/{id}/")))
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        check_status(response)?;
        Ok(())
    }

    /// PATCH `/tasks/{id}/toggle/` — flips `completed` server-side and
    /// returns the updated record.
    pub fn toggle_complete(&self, id: &str) -> Result<Task> {
        debug!(%id, "toggle task");
        let response = self
            .client
            .patch(self.url(&format!("tasks/{id}/toggle/")))
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        read_json(response)
    }

    /// GET `/tasks/categories/`. A failure here is non-fatal: the caller
    /// gets an empty list and the error goes to the log.
    pub fn list_categories(&self) -> Vec<String> {
        let fetch = || -> Result<Vec<String>> {
            let response = self
                .client
                .get(self.url("tasks/categories/"))
                .header(CONTENT_TYPE, "application/json")
                .send()?;
            read_json(response)
        };
        match fetch() {
            Ok(categories) => categories,
            Err(err) => {
                warn!(%err, "category fetch failed, continuing with none");
                Vec::new()
            }
        }
    }

    /// GET `/tasks/stats/`. Failures propagate.
    pub fn fetch_stats(&self) -> Result<Stats> {
        let response = self
            .client
            .get(self.url("tasks/stats/"))
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        read_json(response)
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response)?;
    Ok(response.json()?)
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(error_for_status(status, &body))
}

fn error_for_status(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<Value>(body) {
        Ok(value) if value.is_object() || value.is_array() => Error::Rejected {
            message: flatten_error_body(&value),
            body: value,
        },
        _ => Error::Status {
            status: status.as_u16(),
        },
    }
}

/// Flatten the API's error shapes into one readable line. The server sends
/// either `{"error": "..."}` / `{"detail": "..."}` or a per-field map like
/// `{"title": ["This field may not be blank."]}`.
fn flatten_error_body(value: &Value) -> String {
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(message) = value.get("detail").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(map) = value.as_object() {
        let mut parts = Vec::new();
        for (field, messages) in map {
            let joined = match messages {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            parts.push(format!("{field}: {joined}"));
        }
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_doubled_slashes() {
        let gateway = TaskGateway::new("http://localhost:8000/api/");
        assert_eq!(gateway.url("tasks/"), "http://localhost:8000/api/tasks/");
        assert_eq!(
            gateway.url("/tasks/42/toggle/"),
            "http://localhost:8000/api/tasks/42/toggle/"
        );
    }

    #[test]
    fn field_errors_flatten_to_one_line() {
        let body: Value = serde_json::from_str(
            r#"{"title": ["This field may not be blank."], "dueDate": ["Date has wrong format."]}"#,
        )
        .expect("json");
        let message = flatten_error_body(&body);
        assert!(message.contains("title: This field may not be blank."));
        assert!(message.contains("dueDate: Date has wrong format."));
    }

    #[test]
    fn error_key_wins_over_field_map() {
        let body: Value = serde_json::from_str(r#"{"error": "Task not found"}"#).expect("json");
        assert_eq!(flatten_error_body(&body), "Task not found");
    }

    #[test]
    fn unstructured_body_maps_to_status_error() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, Error::Status { status: 502 }));
    }

    #[test]
    fn structured_body_maps_to_rejected() {
        let err = error_for_status(StatusCode::NOT_FOUND, r#"{"error": "Task not found"}"#);
        match err {
            Error::Rejected { message, .. } => assert_eq!(message, "Task not found"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
