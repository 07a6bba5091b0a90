//! Core agent loop implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::ToolRegistry;

/// One tool call and its observation, as fed back to the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub arguments: Value,
    pub observation: String,
    pub is_error: bool,
}

/// Final answer and scratchpad of a run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    pub output: String,
    pub steps: Vec<AgentStep>,
    pub iterations: usize,
}

/// The tool-calling agent.
pub struct Agent {
    pub(super) llm: Arc<dyn LlmClient>,
    pub(super) tools: ToolRegistry,
    pub(super) system_prompt: String,
    pub(super) model: String,
    pub(super) temperature: f32,
    pub(super) max_iterations: usize,
    pub(super) workspace: PathBuf,
}

impl Agent {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Run a task and return the final response with its scratchpad.
    pub async fn run_task(&self, task: &str) -> anyhow::Result<AgentOutcome> {
        let mut steps = Vec::new();
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(task),
        ];

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(
                    &self.model,
                    &messages,
                    Some(tool_schemas.as_slice()),
                    Some(self.temperature),
                )
                .await?;

            let tool_calls = response.requested_tools();
            if !tool_calls.is_empty() {
                if let Some(thought) = response.content.as_deref() {
                    tracing::info!("Agent: {}", truncate_for_log(thought, 500));
                }

                messages.push(ChatMessage::assistant_tool_calls(
                    response.content.clone(),
                    tool_calls.to_vec(),
                ));

                for tool_call in tool_calls {
                    let step = self.execute_tool_call(tool_call).await;
                    messages.push(ChatMessage::tool_result(
                        tool_call.id.clone(),
                        step.observation.clone(),
                    ));
                    steps.push(step);
                }

                continue;
            }

            // No tool calls - this is the final response
            if let Some(output) = response.content {
                tracing::info!("Agent finished: {}", truncate_for_log(&output, 2000));
                return Ok(AgentOutcome {
                    output,
                    steps,
                    iterations: iteration + 1,
                });
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.max_iterations
        ))
    }

    /// Run a task, giving up once `limit` has elapsed. `None` means no limit.
    pub async fn run_task_with_timeout(
        &self,
        task: &str,
        limit: Option<Duration>,
    ) -> anyhow::Result<AgentOutcome> {
        let Some(limit) = limit else {
            return self.run_task(task).await;
        };

        match tokio::time::timeout(limit, self.run_task(task)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("Agent run exceeded {:?}", limit);
                Err(anyhow::anyhow!("Agent run timed out after {}s", limit.as_secs()))
            }
        }
    }

    /// Execute a single tool call, turning failures into error observations.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> AgentStep {
        let name = tool_call.function.name.as_str();
        let raw_args = tool_call.function.arguments.as_str();

        tracing::info!("Calling tool: {} with args: {}", name, truncate_for_log(raw_args, 500));

        let parsed: Result<Value, _> = if raw_args.trim().is_empty() {
            Ok(Value::Object(Default::default()))
        } else {
            serde_json::from_str(raw_args)
        };

        let (arguments, result) = match parsed {
            Ok(args) => {
                let result = self.tools.execute(name, args.clone(), &self.workspace).await;
                (args, result)
            }
            Err(e) => (
                Value::String(raw_args.to_string()),
                Err(anyhow::anyhow!("Invalid JSON arguments for {}: {}", name, e)),
            ),
        };

        let step = match result {
            Ok(observation) => AgentStep {
                tool: name.to_string(),
                arguments,
                observation,
                is_error: false,
            },
            Err(e) => AgentStep {
                tool: name.to_string(),
                arguments,
                observation: render_error(&e),
                is_error: true,
            },
        };

        if step.is_error {
            tracing::warn!("Tool {} failed: {}", name, step.observation);
        } else {
            tracing::info!("Tool {} returned: {}", name, truncate_for_log(&step.observation, 1000));
        }

        step
    }
}

/// Observation text for a failed tool call.
fn render_error(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... [truncated]", &s[..cut]),
        None => s.to_string(),
    }
}
