//! Prompt templates for the agent.

use chrono::{DateTime, TimeZone};

use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful assistant.

You have access to the following tools:
{tool_descriptions}

Use a tool whenever you need information you do not have. When the task is done, reply with a short summary of what you did and do not call any more tools."#,
        tool_descriptions = tool_descriptions
    )
}

/// The news instruction given to the agent, dated with `now` as `YYYY-MM`.
pub fn build_news_task<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let month = now.format("%Y-%m");
    format!(
        r#"Search for the latest news in Japan with Japanese, focusing on significant events.
Pick the most impactful news story, retrieve its content, summarize in Japanese it.
Finally, write the summarized content to a file.

# Instructions
1. Today's date is {month}."#
    )
}
