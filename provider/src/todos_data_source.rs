//! The `todo_todos` data source: every todo the API knows about.

use std::collections::HashMap;

use hemmer_provider_sdk::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use hemmer_provider_sdk::ProviderError;
use serde_json::{json, Value};
use todo_core::Todo;

use crate::client::ApiClient;
use crate::todo_resource::TodoState;

pub const TYPE_NAME: &str = "todo_todos";

/// Identifier of the result set. Lists have no natural identity.
pub const TODOS_ID_PLACEHOLDER: &str = "todos_id_placeholder";

pub fn schema() -> Schema {
    let item = HashMap::from([
        ("id".to_string(), AttributeType::String),
        ("text".to_string(), AttributeType::String),
        ("priority".to_string(), AttributeType::String),
        ("completed".to_string(), AttributeType::Bool),
        ("time_created".to_string(), AttributeType::String),
        ("time_updated".to_string(), AttributeType::String),
    ]);

    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "todos",
            Attribute::new(
                AttributeType::list(AttributeType::object(item)),
                AttributeFlags::computed(),
            ),
        )
}

/// Data source state for a list response.
pub fn todos_state(todos: &[Todo]) -> Value {
    let items: Vec<TodoState> = todos.iter().map(TodoState::from).collect();
    json!({
        "id": TODOS_ID_PLACEHOLDER,
        "todos": items,
    })
}

pub fn read(client: &ApiClient) -> Result<Value, ProviderError> {
    let todos = client
        .list_todos()
        .map_err(|err| err.into_provider_error("Unable to read todos"))?;
    tracing::debug!(count = todos.len(), "read todos");

    Ok(todos_state(&todos))
}
