use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::SupabaseConfig;

/// One row of the hosted reminders table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub user_id: String,
    pub task: String,
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReminder {
    pub user_id: String,
    pub task: String,
    pub due_date: String,
}

/// Partial update: only set fields are sent, the store leaves the rest
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderPatch {
    pub task: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<bool>,
}

impl ReminderPatch {
    fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(task) = &self.task {
            body.insert("task".to_string(), Value::from(task.clone()));
        }
        if let Some(due_date) = &self.due_date {
            body.insert("due_date".to_string(), Value::from(due_date.clone()));
        }
        if let Some(completed) = self.completed {
            body.insert("completed".to_string(), Value::from(completed));
        }
        Value::Object(body)
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.due_date.is_none() && self.completed.is_none()
    }
}

/// Pass-through CRUD over the Supabase REST table. Ids are assigned by the
/// store; this client never invents them.
pub struct ReminderStore {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl ReminderStore {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.key)
            .header("Authorization", format!("Bearer {}", self.config.key))
            // Ask PostgREST to echo affected rows back in the response body.
            .header("Prefer", "return=representation")
    }

    async fn rows_from(&self, response: reqwest::Response) -> Result<Vec<Reminder>> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reminder store error ({}): {}", status, error_body);
        }
        response
            .json()
            .await
            .context("Failed to parse reminder store response")
    }

    pub async fn create(&self, reminder: &NewReminder) -> Result<Vec<Reminder>> {
        debug!("Creating reminder for user {}", reminder.user_id);
        let response = self
            .authed(self.client.post(self.table_url()))
            .json(reminder)
            .send()
            .await
            .context("Failed to reach reminder store")?;
        self.rows_from(response).await
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let filter = format!("eq.{user_id}");
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("user_id", filter.as_str())])
            .send()
            .await
            .context("Failed to reach reminder store")?;
        self.rows_from(response).await
    }

    pub async fn update(&self, reminder_id: i64, patch: &ReminderPatch) -> Result<Vec<Reminder>> {
        debug!("Updating reminder {}", reminder_id);
        let response = self
            .authed(self.client.patch(self.table_url()))
            .query(&[("id", format!("eq.{reminder_id}"))])
            .json(&patch.to_body())
            .send()
            .await
            .context("Failed to reach reminder store")?;
        self.rows_from(response).await
    }

    pub async fn delete(&self, reminder_id: i64) -> Result<Vec<Reminder>> {
        debug!("Deleting reminder {}", reminder_id);
        let response = self
            .authed(self.client.delete(self.table_url()))
            .query(&[("id", format!("eq.{reminder_id}"))])
            .send()
            .await
            .context("Failed to reach reminder store")?;
        self.rows_from(response).await
    }
}
