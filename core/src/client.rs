//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos".to_string(), None)
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/todos/{id}"), None)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::SerializationError)?;
        Ok(self.request(HttpMethod::Post, "/todos".to_string(), Some(body)))
    }

    pub fn build_update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::SerializationError)?;
        Ok(self.request(HttpMethod::Put, format!("/todos/{id}"), Some(body)))
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/todos/{id}"), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        parse_body(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(ApiError::DeserializationError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    const TODO_JSON: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","text":"New","priority":"medium","completed":false,"time_created":"2024-05-01T10:00:00Z","time_updated":"2024-05-01T10:00:00Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:3000/todos/00000000-0000-0000-0000-000000000000"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_sends_text_and_priority() {
        let input = CreateTodo {
            text: "Buy milk".to_string(),
            priority: Priority::High,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["text"], "Buy milk");
        assert_eq!(body["priority"], "high");
    }

    #[test]
    fn build_update_todo_omits_absent_fields() {
        let input = UpdateTodo {
            text: Some("Updated".to_string()),
            ..Default::default()
        };
        let req = client().build_update_todo(Uuid::nil(), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["text"], "Updated");
        assert!(body.get("priority").is_none());
        assert!(body.get("completed").is_none());
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse::new(200, format!("[{TODO_JSON}]"));
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "New");
        assert_eq!(todos[0].priority, Priority::Medium);
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client().parse_get_todo(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_todo_success() {
        let todo = client().parse_create_todo(HttpResponse::new(201, TODO_JSON)).unwrap();
        assert_eq!(todo.text, "New");
        assert_eq!(todo.id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let err = client()
            .parse_create_todo(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
        assert_eq!(err.to_string(), "HTTP 500: internal error");
    }

    #[test]
    fn parse_create_todo_rejects_ok_instead_of_created() {
        let err = client().parse_create_todo(HttpResponse::new(200, TODO_JSON)).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 200, .. }));
    }

    #[test]
    fn parse_update_todo_rejects_unknown_priority() {
        let body = TODO_JSON.replace("medium", "urgent");
        let err = client().parse_update_todo(HttpResponse::new(200, body)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_delete_todo_success() {
        assert!(client().parse_delete_todo(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client().parse_delete_todo(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.build_list_todos().url, "http://localhost:3000/todos");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
