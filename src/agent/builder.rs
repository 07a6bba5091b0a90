//! Assembles an [`Agent`] from its parts.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::agent_loop::Agent;
use super::prompt::build_system_prompt;
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient};
use crate::tools::ToolRegistry;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no LLM client configured")]
    MissingLlm,

    #[error("agent needs at least one tool")]
    NoTools,

    #[error("model name must not be empty")]
    EmptyModel,

    #[error("temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    #[error("failed to set up tools: {0:#}")]
    Tools(anyhow::Error),
}

/// Builder for [`Agent`].
pub struct AgentBuilder {
    llm: Option<Arc<dyn LlmClient>>,
    tools: ToolRegistry,
    system_prompt: Option<String>,
    model: String,
    temperature: f32,
    max_iterations: usize,
    workspace: PathBuf,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self {
            llm: None,
            tools: ToolRegistry::new(),
            system_prompt: None,
            model: crate::config::DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_iterations: 15,
            workspace: PathBuf::from("."),
        }
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Override the generated system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = workspace.into();
        self
    }

    pub fn build(self) -> Result<Agent, BuildError> {
        let llm = self.llm.ok_or(BuildError::MissingLlm)?;
        if self.tools.is_empty() {
            return Err(BuildError::NoTools);
        }
        if self.model.trim().is_empty() {
            return Err(BuildError::EmptyModel);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(BuildError::InvalidTemperature(self.temperature));
        }
        if self.max_iterations == 0 {
            return Err(BuildError::ZeroIterations);
        }

        let system_prompt = self
            .system_prompt
            .unwrap_or_else(|| build_system_prompt(&self.tools));

        Ok(Agent {
            llm,
            tools: self.tools,
            system_prompt,
            model: self.model,
            temperature: self.temperature,
            max_iterations: self.max_iterations,
            workspace: self.workspace,
        })
    }
}

/// Build the news agent from configuration.
///
/// Failures are logged before being returned.
pub fn create_agent(config: &Config) -> Result<Agent, BuildError> {
    let build = || {
        let tools = ToolRegistry::with_defaults(config).map_err(BuildError::Tools)?;
        let llm = Arc::new(OpenAiClient::new(config.api_key.clone(), config.base_url.clone()));

        AgentBuilder::new()
            .llm(llm)
            .tools(tools)
            .model(config.default_model.clone())
            .temperature(config.temperature)
            .max_iterations(config.max_iterations)
            .workspace(config.workspace_path.clone())
            .build()
    };

    build().map_err(|e| {
        tracing::error!("Error creating agent: {}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::WriteFile;

    fn one_tool() -> ToolRegistry {
        let mut tools = ToolRegistry::new();
        tools.register(WriteFile);
        tools
    }

    fn llm() -> Arc<dyn LlmClient> {
        Arc::new(OpenAiClient::new("sk-test", "http://127.0.0.1:1"))
    }

    #[test]
    fn create_agent_wires_config() {
        let mut config = Config::new("sk-test".into(), "gpt-4o-mini".into(), PathBuf::from("/tmp/news"));
        config.temperature = 0.2;
        config.max_iterations = 4;

        let agent = create_agent(&config).expect("agent builds");
        assert_eq!(agent.model(), "gpt-4o-mini");
        assert_eq!(agent.temperature(), 0.2);
        assert_eq!(agent.max_iterations(), 4);
        assert_eq!(agent.tools().len(), 3);
        assert!(agent.system_prompt().contains("**get_page**"));
    }

    #[test]
    fn build_validates_inputs() {
        assert!(matches!(
            AgentBuilder::new().tools(one_tool()).build(),
            Err(BuildError::MissingLlm)
        ));
        assert!(matches!(
            AgentBuilder::new().llm(llm()).build(),
            Err(BuildError::NoTools)
        ));
        assert!(matches!(
            AgentBuilder::new().llm(llm()).tools(one_tool()).model(" ").build(),
            Err(BuildError::EmptyModel)
        ));
        assert!(matches!(
            AgentBuilder::new().llm(llm()).tools(one_tool()).temperature(2.5).build(),
            Err(BuildError::InvalidTemperature(_))
        ));
        assert!(matches!(
            AgentBuilder::new().llm(llm()).tools(one_tool()).max_iterations(0).build(),
            Err(BuildError::ZeroIterations)
        ));
    }

    #[test]
    fn custom_system_prompt_is_kept() {
        let agent = AgentBuilder::new()
            .llm(llm())
            .tools(one_tool())
            .system_prompt("You are a helpful assistant.")
            .build()
            .unwrap();
        assert_eq!(agent.system_prompt(), "You are a helpful assistant.");
    }
}
