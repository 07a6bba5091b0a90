//! # News Agent
//!
//! A tool-calling LLM agent that finds the most important Japanese news of
//! the day, summarizes it in Japanese and saves the summary to a file.
//!
//! This library provides:
//! - A tool-based agent loop driven by an OpenAI-compatible chat API
//! - A web search tool backed by DuckDuckGo lite
//! - A page fetch tool that returns readable text
//! - A file write tool
//!
//! ## Example
//!
//! ```rust,ignore
//! use news_agent::{agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = agent::create_agent(&config)?;
//! let outcome = agent.run_task(&agent::build_news_task(&chrono::Local::now())).await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use config::Config;
