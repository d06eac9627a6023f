//! The `todo` provider: resolves the API host, builds the shared client and
//! dispatches lifecycle calls to the resource and data source.

use std::sync::Arc;

use hemmer_provider_sdk::schema::{Attribute, Diagnostic, Schema};
use hemmer_provider_sdk::{
    validate, validate_result, ImportedResource, PlanResult, ProviderError, ProviderSchema,
    ProviderService,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::client::ApiClient;
use crate::{todo_resource, todos_data_source};

/// Environment variable holding the API host when the provider block omits it.
pub const HOST_ENV_VAR: &str = "TODO_HOST";

pub struct TodoProvider {
    version: String,
    env: fn(&str) -> Option<String>,
    client: RwLock<Option<Arc<ApiClient>>>,
}

impl TodoProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            env: |key| std::env::var(key).ok(),
            client: RwLock::new(None),
        }
    }

    /// Use `env` instead of the process environment to look up `TODO_HOST`.
    pub fn with_env(mut self, env: fn(&str) -> Option<String>) -> Self {
        self.env = env;
        self
    }

    /// The client from the last successful configure. Every resource and
    /// data source call of this provider goes through it.
    pub async fn client(&self) -> Result<Arc<ApiClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "Unconfigured todo API client: the provider must be configured before managing todos".to_string(),
            )
        })
    }

    /// Run a blocking API call on the shared client off the async runtime.
    async fn with_client<T, F>(&self, op: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce(&ApiClient) -> Result<T, ProviderError> + Send + 'static,
    {
        let client = self.client().await?;
        tokio::task::spawn_blocking(move || op(&*client))
            .await
            .map_err(|err| ProviderError::Sdk(format!("todo API call did not complete: {err}")))?
    }

    fn build_client(&self, config: &Value) -> Result<ApiClient, Vec<Diagnostic>> {
        validate_result(&provider_schema(), config)?;
        let configured = config.get("host").and_then(Value::as_str);
        let host = resolve_host(configured, (self.env)(HOST_ENV_VAR)).map_err(|diag| vec![diag])?;

        tracing::debug!(todo_host = %host, "Creating todo client");
        ApiClient::new(&host).map_err(|err| {
            vec![Diagnostic::error("Unable to create todo API client").with_detail(format!(
                "An unexpected error occurred when creating the todo API client. \
                 If the error is not clear, please contact the provider developers.\n\n\
                 todo client error: {err}"
            ))]
        })
    }
}

fn provider_schema() -> Schema {
    Schema::v0().with_attribute(
        "host",
        Attribute::optional_string().with_description("URL of the todo API. May also be set with TODO_HOST."),
    )
}

/// Pick the API host: the configured value when set, else the environment.
///
/// An empty result is an error, so a client is never built against an
/// empty host. A configured empty string does not fall back to the
/// environment.
pub fn resolve_host(configured: Option<&str>, env_host: Option<String>) -> Result<String, Diagnostic> {
    let host = match configured {
        Some(host) => host.to_string(),
        None => env_host.unwrap_or_default(),
    };

    if host.is_empty() {
        return Err(Diagnostic::error("Missing todo API host")
            .with_detail(
                "The provider cannot create the todo API client as there is a missing or empty value for the todo API host. \
                 Set the host value in the configuration or use the TODO_HOST environment variable. \
                 If either is already set, ensure the value is not empty.",
            )
            .with_attribute("host"));
    }
    Ok(host)
}

fn check_resource_type(resource_type: &str) -> Result<(), ProviderError> {
    if resource_type == todo_resource::TYPE_NAME {
        Ok(())
    } else {
        Err(ProviderError::UnknownResource(format!("Unknown resource type: {resource_type}")))
    }
}

fn check_data_source_type(data_source_type: &str) -> Result<(), ProviderError> {
    if data_source_type == todos_data_source::TYPE_NAME {
        Ok(())
    } else {
        Err(ProviderError::UnknownResource(format!("Unknown data source type: {data_source_type}")))
    }
}

#[async_trait::async_trait]
impl ProviderService for TodoProvider {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(provider_schema())
            .with_resource(todo_resource::TYPE_NAME, todo_resource::schema())
            .with_data_source(todos_data_source::TYPE_NAME, todos_data_source::schema())
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&provider_schema(), &config))
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        tracing::info!(version = %self.version, "Configuring todo client");

        let mut slot = self.client.write().await;
        match self.build_client(&config) {
            Ok(client) => {
                tracing::info!(todo_host = %client.host(), success = true, "Configured todo client");
                *slot = Some(Arc::new(client));
                Ok(Vec::new())
            }
            Err(diagnostics) => {
                *slot = None;
                Ok(diagnostics)
            }
        }
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        check_resource_type(resource_type)?;
        Ok(todo_resource::validate_config(&config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        _proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        check_resource_type(resource_type)?;
        todo_resource::plan_change(prior_state.as_ref(), &config)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        check_resource_type(resource_type)?;
        self.with_client(move |client| todo_resource::create(client, planned_state))
            .await
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        check_resource_type(resource_type)?;
        self.with_client(move |client| todo_resource::read(client, current_state))
            .await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        check_resource_type(resource_type)?;
        self.with_client(move |client| todo_resource::update(client, prior_state, planned_state))
            .await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        check_resource_type(resource_type)?;
        self.with_client(move |client| todo_resource::delete(client, current_state))
            .await
    }

    async fn import_resource(&self, resource_type: &str, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        check_resource_type(resource_type)?;
        Ok(todo_resource::import(id))
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        check_data_source_type(data_source_type)?;
        Ok(validate(&todos_data_source::schema(), &config))
    }

    async fn read_data_source(&self, data_source_type: &str, _config: Value) -> Result<Value, ProviderError> {
        check_data_source_type(data_source_type)?;
        self.with_client(todos_data_source::read).await
    }
}
