//! JSON-RPC request handling
//!
//! Each input line is one request. `Server::handle_line` returns the
//! serialized response, or `None` for notifications.

use std::collections::BTreeMap;
use std::sync::Arc;

use proconv_core::Value;
use proconv_plugin::{EvalContext, PluginRegistry, MAX_DECIMALS};
use proconv_units::format_value;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "proconv";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    /// `None` only when the member is absent; an explicit `null` id is kept
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => Self { jsonrpc: "2.0".to_string(), id, result: Some(r), error: None },
            Err(e) => Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(e) },
        }
    }
}

fn encode(response: &McpResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        warn!(error = %e, "failed to encode response");
        r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#.to_string()
    })
}

pub struct Server {
    registry: Arc<PluginRegistry>,
    ctx: EvalContext,
}

impl Server {
    pub fn new(registry: Arc<PluginRegistry>, decimals: usize) -> Self {
        Self {
            registry,
            ctx: EvalContext::new().with_decimals(decimals),
        }
    }

    /// Handle one input line; `None` means nothing should be written back
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!(bytes = line.len(), "received");

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                let response = McpResponse::new(None, Err(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }));
                return Some(encode(&response));
            }
        };

        let response = self.handle_request(&request);

        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }

        debug!(method = %request.method, "sending response");
        Some(encode(&response))
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        McpResponse::new(request.id.clone(), result)
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        match name {
            "convert" => self.tool_convert(&args),
            "convert_query" => self.tool_convert_query(&args),
            "list_categories" => Ok(self.tool_call_function("list_categories", &[])),
            "list_units" => self.tool_list_units(&args),
            "help" => Ok(self.tool_help(&args)),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    fn tool_convert(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = required_str(args, "category")?;
        let from_unit = required_str(args, "from_unit")?;
        let to_unit = required_str(args, "to_unit")?;

        let value = match args.get("value") {
            None | Some(JsonValue::Null) => Value::Number(1.0),
            Some(v) => json_to_value(v).to_number(),
        };

        let decimals = match args.get("decimals") {
            None | Some(JsonValue::Null) => self.ctx.decimals,
            Some(d) => match d.as_u64() {
                Some(d) => usize::try_from(d).unwrap_or(MAX_DECIMALS).min(MAX_DECIMALS),
                None => {
                    return Err(McpError::invalid_params(format!(
                        "decimals must be a non-negative integer, got {}",
                        d
                    )))
                }
            },
        };

        let call_args = [value, Value::from(category), Value::from(from_unit), Value::from(to_unit)];
        let result = self.registry.call_function("convert", &call_args, &self.ctx);

        Ok(match result {
            Value::Number(n) => {
                let rendered = format_value(n, to_unit, decimals);
                info!(%category, %from_unit, %to_unit, result = %rendered, "converted");
                json!({
                    "content": [{ "type": "text", "text": format!("Converted value: {}", rendered) }],
                    "value": n,
                    "unit": to_unit,
                    "display": rendered,
                    "isError": false
                })
            }
            other => tool_error(&other),
        })
    }

    fn tool_convert_query(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let query = required_str(args, "query")?;
        let result = self.registry.call_function("convert_query", &[Value::from(query)], &self.ctx);

        if result.is_error() {
            return Ok(tool_error(&result));
        }

        let rendered = result.get("display").as_text().unwrap_or_default().to_string();
        Ok(json!({
            "content": [{ "type": "text", "text": format!("Converted value: {}", rendered) }],
            "value": value_to_json(&result.get("value")),
            "unit": value_to_json(&result.get("unit")),
            "display": rendered,
            "isError": false
        }))
    }

    fn tool_list_units(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = required_str(args, "category")?;
        Ok(self.tool_call_function("list_units", &[Value::from(category)]))
    }

    fn tool_help(&self, args: &JsonValue) -> JsonValue {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self.registry.help(name);
        if help.is_error() {
            return tool_error(&help);
        }
        json!({
            "content": [{ "type": "text", "text": format_help(&help) }],
            "data": value_to_json(&help),
            "isError": false
        })
    }

    fn tool_call_function(&self, name: &str, args: &[Value]) -> JsonValue {
        let result = self.registry.call_function(name, args, &self.ctx);
        if result.is_error() {
            return tool_error(&result);
        }
        json!({
            "content": [{ "type": "text", "text": result.to_string() }],
            "data": value_to_json(&result),
            "isError": false
        })
    }
}

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

/// Tool-level failure: a normal result flagged with `isError`
fn tool_error(value: &Value) -> JsonValue {
    match value {
        Value::Error(e) => {
            debug!(code = %e.code, "tool returned error");
            let text = match &e.suggestion {
                Some(s) => format!("Error: {} ({})", e.message, s),
                None => format!("Error: {}", e.message),
            };
            json!({
                "content": [{ "type": "text", "text": text }],
                "error": e,
                "isError": true
            })
        }
        other => json!({
            "content": [{ "type": "text", "text": format!("Unexpected result: {}", other) }],
            "isError": true
        }),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion across length, weight, temperature, area, volume, speed, time, energy and pressure"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use list_categories and list_units to discover valid names, then convert. Results are full precision; 'display' is rounded for presentation."
    }))
}

fn tools_list() -> JsonValue {
    json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value between two units of the same category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Measurement category",
                            "enum": proconv_units::categories()
                        },
                        "from_unit": { "type": "string", "description": "Source unit, e.g. meters" },
                        "to_unit": { "type": "string", "description": "Target unit, e.g. feet" },
                        "value": { "type": "number", "description": "Value to convert (default: 1.0)", "default": 1.0 },
                        "decimals": { "type": "integer", "description": "Decimal places in the display string (default: 4)" }
                    },
                    "required": ["category", "from_unit", "to_unit"]
                }
            },
            {
                "name": "convert_query",
                "description": "Convert using a free-form query such as \"10 kilograms to grams\".",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "<value> <unit> to|in|-> <unit>" }
                    },
                    "required": ["query"]
                }
            },
            {
                "name": "list_categories",
                "description": "List the supported measurement categories.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "list_units",
                "description": "List the units valid for a category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": proconv_units::categories() }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "help",
                "description": "Get documentation for a function, or a general overview.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name. Omit for general help." }
                    }
                }
            }
        ]
    })
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if out.is_empty() {
                out = help.to_string();
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        _ => help.to_string(),
    }
}

fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => Value::Number(f),
            None => Value::Text(n.to_string()),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect::<BTreeMap<_, _>>(),
        ),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => json!(n),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new(Arc::new(proconv_units::standard_registry()), 4)
    }

    fn call(server: &Server, request: JsonValue) -> JsonValue {
        let line = server.handle_line(&request.to_string()).expect("expected a response");
        serde_json::from_str(&line).unwrap()
    }

    fn tool(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        call(server, json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }))
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let resp = call(&server(), json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "clientInfo": { "name": "tester" } }
        }));
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_tools_list() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
        let names: Vec<&str> = resp["result"]["tools"].as_array().unwrap()
            .iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, vec!["convert", "convert_query", "list_categories", "list_units", "help"]);
    }

    #[test]
    fn test_notification_gets_no_response() {
        let line = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
        assert!(server().handle_line(&line).is_none());
        assert!(server().handle_line("   ").is_none());
    }

    #[test]
    fn test_parse_error() {
        let line = server().handle_line("{not json").unwrap();
        let resp: JsonValue = serde_json::from_str(&line).unwrap();
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert!(resp.get("id").is_none());
    }

    #[test]
    fn test_unknown_method() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}));
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_convert_tool() {
        let resp = tool(&server(), "convert", json!({
            "category": "Length", "from_unit": "meters", "to_unit": "feet", "value": 1.0
        }));
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["value"], 3.281);
        assert_eq!(result["display"], "3.2810 feet");
        assert_eq!(result["content"][0]["text"], "Converted value: 3.2810 feet");
    }

    #[test]
    fn test_convert_tool_value_defaults_to_one() {
        let resp = tool(&server(), "convert", json!({
            "category": "Speed", "from_unit": "m/s", "to_unit": "knots"
        }));
        assert_eq!(resp["result"]["value"], 1.944);
    }

    #[test]
    fn test_convert_tool_accepts_numeric_string_and_decimals() {
        let resp = tool(&server(), "convert", json!({
            "category": "Temperature", "from_unit": "fahrenheit", "to_unit": "celsius",
            "value": "212", "decimals": 1
        }));
        assert_eq!(resp["result"]["value"], 100.0);
        assert_eq!(resp["result"]["display"], "100.0 celsius");
    }

    #[test]
    fn test_convert_tool_unknown_unit_is_tool_error() {
        let resp = tool(&server(), "convert", json!({
            "category": "Weight", "from_unit": "grams", "to_unit": "stones", "value": 5
        }));
        let result = &resp["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");
        assert!(resp.get("error").is_none());
    }

    #[test]
    fn test_convert_tool_missing_argument() {
        let resp = tool(&server(), "convert", json!({ "category": "Length", "from_unit": "meters" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_convert_query_tool() {
        let resp = tool(&server(), "convert_query", json!({ "query": "0 celsius to fahrenheit" }));
        assert_eq!(resp["result"]["value"], 32.0);
        assert_eq!(resp["result"]["unit"], "fahrenheit");
        assert_eq!(resp["result"]["display"], "32.0000 fahrenheit");
    }

    #[test]
    fn test_list_tools() {
        let resp = tool(&server(), "list_categories", json!({}));
        assert_eq!(resp["result"]["data"].as_array().unwrap().len(), 9);

        let resp = tool(&server(), "list_units", json!({ "category": "temperature" }));
        assert_eq!(resp["result"]["data"], json!(["celsius", "fahrenheit", "kelvin"]));

        let resp = tool(&server(), "list_units", json!({ "category": "Mass" }));
        assert_eq!(resp["result"]["error"]["code"], "UNKNOWN_CATEGORY");
    }

    #[test]
    fn test_help_tool() {
        let resp = tool(&server(), "help", json!({ "name": "convert" }));
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("# convert"));

        let resp = tool(&server(), "help", json!({ "name": "teleport" }));
        assert_eq!(resp["result"]["isError"], true);
    }

    #[test]
    fn test_unknown_tool() {
        let resp = tool(&server(), "teleport", json!({}));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_decimals_from_config() {
        let server = Server::new(Arc::new(proconv_units::standard_registry()), 2);
        let resp = tool(&server, "convert", json!({
            "category": "Length", "from_unit": "meters", "to_unit": "feet"
        }));
        assert_eq!(resp["result"]["display"], "3.28 feet");
    }

    #[test]
    fn test_ping_and_initialized_with_id() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}));
        assert_eq!(resp["id"], 4);
        assert_eq!(resp["result"], json!({}));

        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 5, "method": "initialized"}));
        assert_eq!(resp["id"], 5);
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_null_id_still_gets_response() {
        let line = server().handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .expect("null id is a request, not a notification");
        let resp: JsonValue = serde_json::from_str(&line).unwrap();
        assert!(resp["id"].is_null());
        assert!(resp.get("id").is_some());
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_tools_call_without_params_or_name() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call"}));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert_eq!(resp["error"]["message"], "Missing params");

        let resp = call(&server(), json!({
            "jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": { "arguments": {} }
        }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert_eq!(resp["error"]["message"], "Missing tool name");
    }

    #[test]
    fn test_convert_tool_rejects_bad_decimals() {
        for bad in [json!(-1), json!(2.5), json!("2"), json!(true)] {
            let resp = tool(&server(), "convert", json!({
                "category": "Length", "from_unit": "meters", "to_unit": "feet", "decimals": bad
            }));
            assert_eq!(resp["error"]["code"], INVALID_PARAMS, "accepted decimals {}", bad);
            assert!(resp.get("result").is_none());
        }
    }

    #[test]
    fn test_convert_tool_caps_decimals() {
        let resp = tool(&server(), "convert", json!({
            "category": "Length", "from_unit": "meters", "to_unit": "feet", "decimals": 40
        }));
        assert_eq!(resp["result"]["display"], "3.281000000000 feet");
    }
}
