//! Nutriscan MCP Server Implementation
//!
//! Implements the MCP server with the label scanning tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{AppConfig, PresentationPolicy};
use crate::models::{LabelTranscripts, RegionTexts};
use crate::nutrition::Extractor;
use crate::tools::label::{self, LabelError};
use crate::tools::status::StatusTracker;

/// Nutriscan MCP Service
#[derive(Clone)]
pub struct LabelService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    extractor: Extractor,
    policy: PresentationPolicy,
    tool_router: ToolRouter<LabelService>,
}

impl LabelService {
    pub fn new(config: AppConfig) -> Self {
        Self {
            extractor: Extractor::new(config.extraction.clone()),
            policy: config.presentation.clone(),
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScanLabelTextParams {
    /// OCR transcript of the whole label
    #[serde(default)]
    pub text: String,
    /// Transcript of the cropped serving size ("takaran saji") region
    pub serving_size_text: Option<String>,
    /// Transcript of the cropped servings per pack ("sajian per kemasan") region
    pub servings_per_pack_text: Option<String>,
    /// Transcript of the cropped sugar ("gula") region
    pub sugar_text: Option<String>,
}

impl ScanLabelTextParams {
    fn into_transcripts(self) -> LabelTranscripts {
        LabelTranscripts {
            global: self.text,
            regions: RegionTexts {
                serving_size: self.serving_size_text,
                servings_per_pack: self.servings_per_pack_text,
                sugar: self.sugar_text,
            },
            ..LabelTranscripts::default()
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeLabelTextParams {
    pub text: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl LabelService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutriscan service including build info, active configuration, and process information")]
    async fn nutriscan_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json(&status)
    }

    #[tool(description = "Get instructions for scanning nutrition labels. Call this before the first scan or when unsure how to read the results.")]
    fn label_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LABEL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LABEL_INSTRUCTIONS)]))
    }

    // --- Labels ---

    #[tool(description = "Extract serving size, servings per pack, and sugar per serving/pack from the OCR text of a nutrition label. Optional region texts (cropped rows) take priority over the whole-label text for their field.")]
    fn scan_label_text(&self, Parameters(p): Parameters<ScanLabelTextParams>) -> Result<CallToolResult, McpError> {
        let transcripts = p.into_transcripts();
        let response = label::scan_label_text(&self.extractor, &self.policy, &transcripts)
            .map_err(|e| match e {
                LabelError::NoText => McpError::invalid_params(e.to_string(), None),
                other => McpError::internal_error(other.to_string(), None),
            })?;
        to_json(&response)
    }

    #[tool(description = "Show the normalized form of a label transcript (lower-cased, misread units repaired) as the extractor sees it")]
    fn normalize_label_text(&self, Parameters(p): Parameters<NormalizeLabelTextParams>) -> Result<CallToolResult, McpError> {
        to_json(&label::normalize_label_text(&p.text))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LabelService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutriscan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Label Scanner".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutriscan - serving size and sugar extraction from nutrition label OCR text. \
                 IMPORTANT: Call label_instructions before the first scan. \
                 Scanning: scan_label_text (whole-label text plus optional region texts). \
                 Debugging: normalize_label_text. \
                 Status: nutriscan_status."
                    .into(),
            ),
        }
    }
}
