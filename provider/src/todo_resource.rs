//! The `todo_todo` resource: one todo item managed through the API.

use hemmer_provider_sdk::schema::{Attribute, AttributeFlags, AttributeType, Diagnostic, Schema};
use hemmer_provider_sdk::{validate, ImportedResource, PlanResult, ProviderError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use todo_core::{CreateTodo, Priority, Todo, UpdateTodo};

use crate::client::ApiClient;
use crate::plan;

pub const TYPE_NAME: &str = "todo_todo";

/// Computed attributes the server sets at create and an update leaves alone.
const STABLE_ATTRIBUTES: [&str; 3] = ["id", "completed", "time_created"];

/// Plan and state of one todo. Unset or not yet known values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    pub id: Option<String>,
    pub text: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub time_created: Option<String>,
    pub time_updated: Option<String>,
}

impl TodoState {
    fn from_value(value: Value) -> Result<Self, ProviderError> {
        Ok(serde_json::from_value(value)?)
    }

    fn into_value(self) -> Result<Value, ProviderError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// State for an API response. The ID is written in canonical form, so an
/// imported uppercase ID reads back like a created one.
impl From<&Todo> for TodoState {
    fn from(todo: &Todo) -> Self {
        TodoState {
            id: Some(todo.id.to_string()),
            text: Some(todo.text.clone()),
            priority: Some(todo.priority.to_string()),
            completed: Some(todo.completed),
            time_created: Some(todo.time_created.to_rfc3339()),
            time_updated: Some(todo.time_updated.to_rfc3339()),
        }
    }
}

pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("Identifier assigned by the todo API."),
        )
        .with_attribute("text", Attribute::required_string())
        .with_attribute(
            "priority",
            Attribute::new(AttributeType::String, AttributeFlags::optional_computed())
                .with_description("One of low, medium or high.")
                .with_default(json!(Priority::default().as_str())),
        )
        .with_attribute("completed", Attribute::computed_bool())
        .with_attribute("time_created", Attribute::computed_string())
        .with_attribute("time_updated", Attribute::computed_string())
}

/// An empty priority means the default, like an unset one.
fn normalize(config: &Value) -> Value {
    let mut config = config.clone();
    if let Some(priority) = config.get_mut("priority") {
        if priority.as_str() == Some("") {
            *priority = Value::Null;
        }
    }
    config
}

pub fn validate_config(config: &Value) -> Vec<Diagnostic> {
    let config = normalize(config);
    let priorities: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();
    let mut diagnostics = validate(&schema(), &config);
    diagnostics.extend(plan::check_one_of(&config, "priority", &priorities));
    diagnostics
}

/// Plan a create (no prior state), an update, or a destroy (null config).
pub fn plan_change(prior_state: Option<&Value>, config: &Value) -> Result<PlanResult, ProviderError> {
    if config.is_null() {
        return Ok(PlanResult::from_diff(prior_state, &Value::Null));
    }

    let config = normalize(config);
    plan::into_result(validate_config(&config))?;

    let schema = schema();
    let mut planned = plan::planned_from_config(&schema, &config);
    let Some(prior) = prior_state else {
        return Ok(PlanResult::from_diff(None, &Value::Object(planned)));
    };

    if plan::configuration_unchanged(&schema, prior, &planned) {
        return Ok(PlanResult::no_change(prior.clone()));
    }
    plan::use_state_for_unknown(&mut planned, prior, &STABLE_ATTRIBUTES);
    Ok(PlanResult::from_diff(Some(prior), &Value::Object(planned)))
}

/// Set, non-empty priority strings are parsed; anything else is `None`.
fn parse_priority(value: Option<&str>) -> Result<Option<Priority>, ProviderError> {
    match value.filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) => p
            .parse::<Priority>()
            .map(Some)
            .map_err(|err| ProviderError::Validation(format!("Invalid todo priority (at priority): {err}"))),
    }
}

/// Request body for create. Priority defaults to low.
pub fn create_request(plan: &TodoState) -> Result<CreateTodo, ProviderError> {
    Ok(CreateTodo {
        text: plan.text.clone().unwrap_or_default(),
        priority: parse_priority(plan.priority.as_deref())?.unwrap_or_default(),
    })
}

/// Request body for update. All three mutable fields are always sent, using
/// the planned value when set, then the prior state, then the default, so an
/// update never resets a field the plan left open.
pub fn update_request(plan: &TodoState, prior: &TodoState) -> Result<UpdateTodo, ProviderError> {
    let text = plan.text.as_ref().or(prior.text.as_ref()).cloned().unwrap_or_default();
    let priority = match parse_priority(plan.priority.as_deref())? {
        Some(p) => p,
        None => parse_priority(prior.priority.as_deref())?.unwrap_or_default(),
    };
    let completed = plan.completed.or(prior.completed).unwrap_or(false);

    Ok(UpdateTodo {
        text: Some(text),
        priority: Some(priority),
        completed: Some(completed),
    })
}

pub fn create(client: &ApiClient, planned_state: Value) -> Result<Value, ProviderError> {
    let plan = TodoState::from_value(planned_state)?;
    let params = create_request(&plan)?;

    let todo = client
        .create_todo(&params)
        .map_err(|err| err.into_provider_error("Error creating todo: Could not create todo, unexpected error"))?;
    tracing::debug!(id = %todo.id, "created todo");

    TodoState::from(&todo).into_value()
}

pub fn read(client: &ApiClient, current_state: Value) -> Result<Value, ProviderError> {
    let state = TodoState::from_value(current_state)?;
    let id = state.id.unwrap_or_default();

    let todo = client
        .get_todo(&id)
        .map_err(|err| err.into_provider_error(format!("Error reading todo: Could not read todo ID {id}")))?;
    tracing::debug!(%id, "read todo");

    TodoState::from(&todo).into_value()
}

pub fn update(client: &ApiClient, prior_state: Value, planned_state: Value) -> Result<Value, ProviderError> {
    let prior = TodoState::from_value(prior_state)?;
    let plan = TodoState::from_value(planned_state)?;
    let params = update_request(&plan, &prior)?;

    let id = prior.id.unwrap_or_default();
    let todo = client
        .update_todo(&id, &params)
        .map_err(|err| err.into_provider_error("Error updating todo: Could not update todo, unexpected error"))?;
    tracing::debug!(%id, "updated todo");

    TodoState::from(&todo).into_value()
}

pub fn delete(client: &ApiClient, current_state: Value) -> Result<(), ProviderError> {
    let state = TodoState::from_value(current_state)?;
    let id = state.id.unwrap_or_default();

    client
        .delete_todo(&id)
        .map_err(|err| err.into_provider_error("Error deleting todo: Could not delete todo, unexpected error"))?;
    tracing::debug!(%id, "deleted todo");
    Ok(())
}

/// The imported state holds only the ID. The host reads the rest.
pub fn import(id: &str) -> Vec<ImportedResource> {
    vec![ImportedResource::new(TYPE_NAME, json!({ "id": id }))]
}
