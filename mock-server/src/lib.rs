use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Todos ordered by creation time so listings are stable.
async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    let mut all: Vec<Todo> = todos.values().cloned().collect();
    all.sort_by(|a, b| a.time_created.cmp(&b.time_created).then(a.id.cmp(&b.id)));
    Json(all)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let now = Utc::now();
    let todo = Todo {
        id: Uuid::new_v4(),
        text: input.text,
        priority: input.priority,
        completed: false,
        time_created: now,
        time_updated: now,
    };
    tracing::debug!(id = %todo.id, "created todo");
    db.write().await.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, StatusCode> {
    let todos = db.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let todo = todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(text) = input.text {
        todo.text = text;
    }
    if let Some(priority) = input.priority {
        todo.priority = priority;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.time_updated = Utc::now();
    tracing::debug!(%id, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut todos = db.write().await;
    let removed = todos.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::debug!(id = %removed.id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
