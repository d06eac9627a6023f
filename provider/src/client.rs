//! Blocking executor for `todo_core` requests.
//!
//! # Design
//! `todo_core::TodoClient` shapes requests and interprets responses; this
//! type only performs the round-trip with a shared `ureq::Agent`. HTTP error
//! statuses are returned as data so the core decides what they mean.

use std::fmt;

use todo_core::{CreateTodo, HttpMethod, HttpRequest, HttpResponse, Todo, TodoClient, UpdateTodo};
use ureq::{Agent, RequestBuilder};
use uuid::Uuid;

use crate::error::ClientError;

/// Client for the todo API, shared by every resource and data source of one
/// configured provider.
pub struct ApiClient {
    core: TodoClient,
    agent: Agent,
}

impl ApiClient {
    /// Build a client for `host`, which must be an absolute http or https URL.
    pub fn new(host: &str) -> Result<Self, ClientError> {
        let invalid = |reason| ClientError::InvalidHost {
            host: host.to_string(),
            reason,
        };
        let rest = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .ok_or_else(|| invalid("scheme must be http or https"))?;
        if rest.trim_end_matches('/').is_empty() {
            return Err(invalid("missing host name"));
        }

        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Ok(Self {
            core: TodoClient::new(host),
            agent,
        })
    }

    pub fn host(&self) -> &str {
        self.core.base_url()
    }

    pub fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.execute(self.core.build_list_todos())?;
        Ok(self.core.parse_list_todos(response)?)
    }

    pub fn get_todo(&self, id: &str) -> Result<Todo, ClientError> {
        let response = self.execute(self.core.build_get_todo(parse_id(id)?))?;
        Ok(self.core.parse_get_todo(response)?)
    }

    pub fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ClientError> {
        let response = self.execute(self.core.build_create_todo(input)?)?;
        Ok(self.core.parse_create_todo(response)?)
    }

    pub fn update_todo(&self, id: &str, input: &UpdateTodo) -> Result<Todo, ClientError> {
        let response = self.execute(self.core.build_update_todo(parse_id(id)?, input)?)?;
        Ok(self.core.parse_update_todo(response)?)
    }

    pub fn delete_todo(&self, id: &str) -> Result<(), ClientError> {
        let response = self.execute(self.core.build_delete_todo(parse_id(id)?))?;
        Ok(self.core.parse_delete_todo(response)?)
    }

    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        tracing::debug!(method = %req.method, url = %req.url, "sending todo API request");

        let mut response = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.url), &req.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&req.url), &req.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&req.url), &req.headers);
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&req.url), &req.headers);
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        tracing::debug!(method = %req.method, url = %req.url, status, "received todo API response");

        Ok(HttpResponse::new(status, body))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("host", &self.host()).finish()
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn parse_id(id: &str) -> Result<Uuid, ClientError> {
    Uuid::parse_str(id).map_err(|err| ClientError::InvalidId(id.to_string(), err))
}
