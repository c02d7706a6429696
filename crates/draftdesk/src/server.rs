//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the offline draft tools over stdio so an assistant can classify,
//! measure and split posts. Provider calls are not exposed: they need saved
//! keys and spend the user's quota.
//!
//! Each `#[tool]` method delegates to `draftdesk_core` and returns pretty JSON
//! (or plain text for `get_info` by default).

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use draftdesk_core::metrics::{self, LengthBudget};
use draftdesk_core::tone::TonePreset;
use draftdesk_core::{DEFAULT_MAX_INPUT_BYTES, classifier};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for tools that only take a draft.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TextParams {
    /// The draft text.
    pub text: String,
}

/// Parameters for the `measure_text` and `split_thread` tools.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LengthParams {
    /// The draft text.
    pub text: String,
    /// Limit to measure against (default 280).
    pub max_length: Option<usize>,
}

/// Parameters for the `list_tones` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListTonesParams {
    /// Include each tone's full rewrite instructions.
    #[serde(default)]
    pub include_prompts: bool,
}

#[derive(Serialize)]
struct EntitiesReport {
    hashtags: Vec<String>,
    mentions: Vec<String>,
    starts_with_mention: bool,
}

#[derive(Serialize)]
struct ToneSummary {
    id: TonePreset,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<String>,
}

/// MCP server exposing the draft tools to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl ProjectServer {
    /// Create a server with the default input limit.
    pub fn new() -> Self {
        Self::with_max_input_bytes(Some(DEFAULT_MAX_INPUT_BYTES))
    }

    /// Create a server that rejects drafts larger than `max_input_bytes`.
    pub fn with_max_input_bytes(max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes,
        }
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        if let Some(max) = self.max_input_bytes
            && text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            ));
        }
        Ok(())
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        if params.format == "json" {
            return to_json(&info);
        }
        let text = format!(
            "{} v{}\n{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION"),
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Classify a draft.
    #[tool(
        description = "Classify a draft as new-post, reply, comment, or quote-tweet. Returns the type, a confidence score, and the indicators that matched."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn classify_content(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let analysis = classifier::classify(&params.text);
        tracing::info!(
            tool = "classify_content",
            content_type = %analysis.content_type,
            "MCP tool completed"
        );
        to_json(&analysis)
    }

    /// Measure a draft against the length limit.
    #[tool(
        description = "Measure post length with URLs counted as 23 characters. Returns length, limit, remaining, over_limit, and percentage."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn measure_text(
        &self,
        Parameters(params): Parameters<LengthParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let budget = budget(params.max_length);
        let report = budget.measure(&params.text);
        tracing::info!(tool = "measure_text", length = report.length, "MCP tool completed");
        to_json(&report)
    }

    /// Split a long draft into a numbered thread.
    #[tool(
        description = "Split a draft into numbered thread parts that each fit the limit. Parts break at word boundaries; an over-long word gets its own part."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn split_thread(
        &self,
        Parameters(params): Parameters<LengthParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let preview = budget(params.max_length).preview_thread(&params.text);
        tracing::info!(
            tool = "split_thread",
            parts = preview.part_count,
            "MCP tool completed"
        );
        to_json(&preview)
    }

    /// List hashtags and mentions.
    #[tool(description = "List unique hashtags and @mentions in a draft, in order of appearance.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn extract_entities(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let report = EntitiesReport {
            hashtags: metrics::extract_hashtags(&params.text),
            mentions: metrics::extract_mentions(&params.text),
            starts_with_mention: metrics::starts_with_mention(&params.text),
        };
        to_json(&report)
    }

    /// List tone presets.
    #[tool(description = "List the tone presets available for rewriting drafts.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn list_tones(
        &self,
        Parameters(params): Parameters<ListTonesParams>,
    ) -> Result<CallToolResult, McpError> {
        let tones: Vec<ToneSummary> = TonePreset::ALL
            .into_iter()
            .map(|tone| ToneSummary {
                id: tone,
                label: tone.label(),
                description: tone.description(),
                icon: tone.icon(),
                system_prompt: params.include_prompts.then(|| tone.system_prompt()),
            })
            .collect();
        to_json(&tones)
    }
}

fn budget(max_length: Option<usize>) -> LengthBudget {
    max_length.map_or(LengthBudget::DEFAULT, |max| {
        LengthBudget::DEFAULT.with_max_length(max)
    })
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use the tools to classify, measure, and split short social posts.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    fn text(text: &str) -> Parameters<TextParams> {
        Parameters(TextParams {
            text: text.to_string(),
        })
    }

    #[test]
    fn server_info_has_name_and_tools() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = ProjectServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: "text".to_string(),
            }))
            .expect("get_info should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .expect("get_info should succeed");

        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn classify_content_detects_reply() {
        let server = ProjectServer::new();
        let result = server
            .classify_content(text("@alice great point, thanks"))
            .expect("classify should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = json_of(&result);
        assert_eq!(json["type"], "reply");
        assert!(json["confidence"].as_f64().unwrap() > 0.5);
    }

    #[test]
    fn measure_text_counts_urls_as_fixed_width() {
        let server = ProjectServer::new();
        let result = server
            .measure_text(Parameters(LengthParams {
                text: "read https://example.com/a/very/long/path/to/an/article".to_string(),
                max_length: None,
            }))
            .expect("measure should succeed");

        let json = json_of(&result);
        assert_eq!(json["length"], 28);
        assert_eq!(json["limit"], 280);
        assert_eq!(json["over_limit"], false);
    }

    #[test]
    fn split_thread_numbers_parts() {
        let server = ProjectServer::new();
        let sentence = "This sentence is here to take up space in the draft. ";
        let result = server
            .split_thread(Parameters(LengthParams {
                text: sentence.repeat(10),
                max_length: None,
            }))
            .expect("split should succeed");

        let json = json_of(&result);
        let parts = json["parts"].as_array().unwrap();
        assert!(parts.len() >= 2);
        assert!(parts[0].as_str().unwrap().starts_with("1/"));
        assert_eq!(json["part_count"], parts.len());
    }

    #[test]
    fn split_thread_keeps_overlong_word_whole() {
        let server = ProjectServer::new();
        let giant = "x".repeat(400);
        let result = server
            .split_thread(Parameters(LengthParams {
                text: format!("intro {giant} outro"),
                max_length: None,
            }))
            .expect("split should succeed");

        let json = json_of(&result);
        assert_eq!(json["parts"][1], format!("2/3 {giant}"));

        let tools = server.tool_router.list_all();
        let tool = tools
            .iter()
            .find(|t| t.name == "split_thread")
            .expect("split_thread is registered");
        let description = tool.description.as_deref().unwrap_or_default();
        assert!(description.contains("word boundaries"), "{description}");
        assert!(!description.contains("sentence"), "{description}");
    }

    #[test]
    fn extract_entities_lists_tags_and_mentions() {
        let server = ProjectServer::new();
        let result = server
            .extract_entities(text("@bob shipping #rust and #mcp today"))
            .expect("extract should succeed");

        let json = json_of(&result);
        assert_eq!(json["hashtags"], serde_json::json!(["#rust", "#mcp"]));
        assert_eq!(json["mentions"], serde_json::json!(["@bob"]));
        assert_eq!(json["starts_with_mention"], true);
    }

    #[test]
    fn list_tones_omits_prompts_unless_asked() {
        let server = ProjectServer::new();
        let result = server
            .list_tones(Parameters(ListTonesParams::default()))
            .expect("list should succeed");
        let json = json_of(&result);
        let tones = json.as_array().unwrap();
        assert_eq!(tones.len(), 5);
        assert_eq!(tones[0]["id"], "professional");
        assert!(tones[0].get("system_prompt").is_none());

        let result = server
            .list_tones(Parameters(ListTonesParams {
                include_prompts: true,
            }))
            .expect("list should succeed");
        let json = json_of(&result);
        assert!(json[0]["system_prompt"].as_str().unwrap().len() > 20);
    }

    #[test]
    fn oversized_input_is_rejected() {
        let server = ProjectServer::with_max_input_bytes(Some(8));
        let err = server
            .classify_content(text("this is longer than eight bytes"))
            .unwrap_err();
        assert!(err.message.contains("input too large"));
    }
}
