//! The `get_element_info` lookup tool.
//!
//! The lookup itself is a pure read of [`Directory::builtin`]. When a
//! [`ToolContext`] is supplied the call is also recorded in it: the key is
//! appended to the session's query history, the last query and its time are
//! written to the change-tracked state, and a successful result is saved as a
//! JSON artifact. Recording is best-effort; failures are logged and never
//! change the returned [`ElementInfo`].

use chrono::Local;
use crate::FunctionTool;
use periodic_core::{Part, PeriodicError, ToolContext};
use periodic_table::{Directory, ElementRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const TOOL_NAME: &str = "get_element_info";
pub const TOOL_DESCRIPTION: &str =
    "Returns information about a chemical element by its symbol or Chinese name.";

pub const QUERY_HISTORY_KEY: &str = "query_history";
pub const LAST_QUERY_KEY: &str = "last_query";
pub const LAST_QUERY_TIME_KEY: &str = "last_query_time";

pub const ARTIFACT_MIME_TYPE: &str = "application/json";

/// Outcome of a lookup, serialized as `{"status": "success", "report": ...}`
/// or `{"status": "error", "error_message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ElementInfo {
    Success { report: String },
    Error { error_message: String },
}

impl ElementInfo {
    pub fn is_success(&self) -> bool {
        matches!(self, ElementInfo::Success { .. })
    }

    /// The report or the error message.
    pub fn message(&self) -> &str {
        match self {
            ElementInfo::Success { report } => report,
            ElementInfo::Error { error_message } => error_message,
        }
    }
}

/// `氢（Hydrogen），原子序数：1，原子量：1.008`
pub fn format_report(record: &ElementRecord) -> String {
    format!(
        "{}（{}），原子序数：{}，原子量：{}",
        record.chinese_name, record.name, record.atomic_number, record.atomic_weight
    )
}

pub fn not_found_message(key: &str) -> String {
    format!("元素符号或中文名 '{key}' 未找到。")
}

pub fn artifact_name(key: &str) -> String {
    format!("element_info_{key}.json")
}

/// Looks up `symbol` by element symbol or Chinese name.
pub fn get_element_info(symbol: &str, ctx: Option<&dyn ToolContext>) -> ElementInfo {
    info!("查询元素信息: {symbol}");

    let record = Directory::builtin().lookup(symbol);

    if let Some(ctx) = ctx {
        record_query(ctx, symbol, record);
    }

    match record {
        Some(record) => {
            let report = format_report(record);
            info!("查询成功: {report}");
            ElementInfo::Success { report }
        }
        None => {
            let error_message = not_found_message(symbol);
            warn!("{error_message}");
            ElementInfo::Error { error_message }
        }
    }
}

fn record_query(ctx: &dyn ToolContext, key: &str, record: Option<&ElementRecord>) {
    info!(session_id = ctx.session_id(), invocation_id = ctx.invocation_id(), "Session信息");
    debug!(state = ?ctx.session_state().all(), "Session State信息");

    match ctx.session_state().append(QUERY_HISTORY_KEY, json!(key)) {
        Ok(len) => info!(history_len = len, "查询历史已更新"),
        Err(e) => warn!(error = %e, "failed to append to query history"),
    }

    let now = Local::now().to_rfc3339();
    for (state_key, value) in [(LAST_QUERY_KEY, json!(key)), (LAST_QUERY_TIME_KEY, json!(now))] {
        if let Err(e) = ctx.state().set(state_key, value) {
            warn!(key = state_key, error = %e, "failed to write state");
        }
    }

    if let Some(record) = record {
        save_snapshot(ctx, key, record);
    }
}

fn save_snapshot(ctx: &dyn ToolContext, key: &str, record: &ElementRecord) {
    let Some(artifacts) = ctx.artifacts() else {
        debug!("no artifact store, snapshot skipped");
        return;
    };

    let bytes = match serde_json::to_vec_pretty(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "failed to serialize element snapshot");
            return;
        }
    };

    let name = artifact_name(key);
    let part = Part::inline_data(ARTIFACT_MIME_TYPE, bytes);
    ctx.scheduler().schedule(Box::pin(async move {
        match artifacts.save(&name, &part).await {
            Ok(version) => info!(artifact = %name, version, "已保存元素信息artifact"),
            Err(e) => error!(artifact = %name, error = %e, "保存artifact失败"),
        }
    }));
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ElementInfoArgs {
    /// Element symbol such as "Fe", or Chinese name such as "铁".
    pub symbol: String,
}

/// [`get_element_info`] as a [`FunctionTool`] taking `{"symbol": string}`.
pub fn element_info_tool() -> FunctionTool {
    FunctionTool::new(TOOL_NAME, TOOL_DESCRIPTION, |ctx: Arc<dyn ToolContext>, args: Value| async move {
        let args: ElementInfoArgs = serde_json::from_value(args)
            .map_err(|e| PeriodicError::Tool(format!("invalid arguments for {TOOL_NAME}: {e}")))?;
        let info = get_element_info(&args.symbol, Some(ctx.as_ref()));
        Ok::<_, PeriodicError>(serde_json::to_value(info)?)
    })
    .with_parameters_schema::<ElementInfoArgs>()
}
