//! Agent module - the tool-calling agent.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user task
//! 2. Call LLM with available tools
//! 3. If LLM requests tool calls, execute them and feed results back
//! 4. Repeat until LLM produces final response or max iterations reached
//!
//! Which tool to call, and when to stop, is decided by the LLM.

mod agent_loop;
mod builder;
mod prompt;

pub use agent_loop::{Agent, AgentOutcome, AgentStep};
pub use builder::{create_agent, AgentBuilder, BuildError};
pub use prompt::{build_news_task, build_system_prompt};
