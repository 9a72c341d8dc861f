//! Microtools MCP Server
//!
//! MCP Server for protocol revision 2025-11-25 over stdio, one JSON-RPC message
//! per line. Logs go to stderr.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - list_categories: List categories with their units and default pair
//! - list_units: List the units of one category
//! - help: Get documentation for the unit functions

mod config;

use std::io::{self, BufRead, Write};
use microtools_core::{ToolError, Value};
use microtools_plugin::{EvalContext, PluginRegistry, MAX_PRECISION};
use microtools_units::{convert_request, format_result, CategoryInfo, ConversionRequest, CATEGORIES};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "microtools-units";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    /// Always present; `null` when the request id could not be read
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

/// Function registry plus startup configuration
struct Server {
    registry: PluginRegistry,
    config: ServerConfig,
}

impl Server {
    fn new(config: ServerConfig) -> Self {
        Server {
            registry: microtools_units::units_registry(),
            config,
        }
    }

    fn context(&self, precision: u32) -> EvalContext {
        EvalContext::new().with_precision(precision)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let server = Server::new(config);

    info!("{} MCP Server v{} started", SERVER_NAME, SERVER_VERSION);
    info!(protocol = PROTOCOL_VERSION, precision = server.config.precision, "Server ready, waiting for requests");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = handle_line(&server, &line) else {
                    continue;
                };
                if let Err(e) = write_response(&response) {
                    error!("Error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Error reading input: {}", e);
                break;
            }
        }
    }

    info!("Server shutting down");
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

/// Handle one input line. Returns `None` for blank lines and notifications.
fn handle_line(server: &Server, line: &str) -> Option<McpResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    debug!("Received: {} bytes", line.len());

    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!("Error parsing request: {}", e);
            return Some(McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            });
        }
    };

    debug!("Processing: {}", request.method);
    let response = handle_request(server, &request);

    // Notifications (no id) should NOT receive a response
    if request.id.is_none() {
        debug!("Notification processed (no response): {}", request.method);
        return None;
    }

    Some(response)
}

fn handle_request(server: &Server, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(server, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
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

    info!("Client connected: {} (protocol: {})", client_info, client_protocol);

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion for length, mass, volume, temperature, time, speed, area and data storage"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'list_categories' to see the available categories and units, then 'convert' to convert a value. Unit names accept common abbreviations (km, lb, °C)."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another within a category. Returns the raw value and a display-rounded result.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["number", "string"],
                            "description": "Value to convert"
                        },
                        "category": {
                            "type": "string",
                            "description": "Category (e.g. length, temperature, data storage)"
                        },
                        "from_unit": {
                            "type": "string",
                            "description": "Source unit (e.g. kilometers or km)"
                        },
                        "to_unit": {
                            "type": "string",
                            "description": "Target unit (e.g. miles or mi)"
                        },
                        "precision": {
                            "type": "integer",
                            "description": "Fractional digits of the display result (default: server setting)"
                        }
                    },
                    "required": ["value", "category", "from_unit", "to_unit"]
                }
            },
            {
                "name": "list_categories",
                "description": "List unit categories with their units and default unit pair.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of a category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name"
                        }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "help",
                "description": "Get documentation for unit functions. Call without arguments for an overview.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Function name (optional)"
                        }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(server, args),
        "list_categories" => tool_list_categories(),
        "list_units" => tool_list_units(server, args),
        "help" => tool_help(server, args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_convert(server: &Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let precision = match args.get("precision") {
        None | Some(JsonValue::Null) => server.config.precision,
        Some(p) => p.as_u64()
            .map(|p| p.min(MAX_PRECISION as u64) as u32)
            .ok_or_else(|| McpError::invalid_params("precision must be a non-negative integer"))?,
    };

    let request: ConversionRequest = serde_json::from_value(args)
        .map_err(|e| McpError::invalid_params(format!("Invalid convert arguments: {}", e)))?;

    match convert_request(&request, precision) {
        Ok(result) => {
            let text = format!(
                "{} {} = {} {}",
                format_result(result.input, precision),
                result.from_label,
                result.display,
                result.to_label,
            );
            Ok(json!({
                "content": [{ "type": "text", "text": text }],
                "value": result.value,
                "display": result.display.clone(),
                "result": result,
                "isError": false
            }))
        }
        Err(e) => {
            debug!(error = %e, "conversion rejected");
            Ok(tool_error(&ToolError::from(e)))
        }
    }
}

fn tool_list_categories() -> Result<JsonValue, McpError> {
    let infos: Vec<CategoryInfo> = CATEGORIES.all().iter().map(|c| c.describe()).collect();

    let text = infos.iter()
        .map(|info| {
            let units: Vec<&str> = info.units.iter().map(|u| u.id).collect();
            format!("- {} (base: {}): {}", info.id, info.base, units.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "data": infos
    }))
}

fn tool_list_units(server: &Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing category argument"))?;

    let ctx = server.context(server.config.precision);
    let units = server.registry.call_function("list_units", &[Value::from(category)], &ctx);

    if let Value::Error(e) = &units {
        return Ok(tool_error(e));
    }

    let text = units.as_list()
        .map(|list| list.iter()
            .map(|u| format!("- {} ({})", u.get("id"), u.get("label")))
            .collect::<Vec<_>>()
            .join("\n"))
        .unwrap_or_default();

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "data": value_to_json(&units)
    }))
}

fn tool_help(server: &Server, args: JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name").and_then(|v| v.as_str());
    let help = server.registry.help(name);

    Ok(json!({
        "content": [{ "type": "text", "text": format_help(&help) }],
        "data": value_to_json(&help),
        "isError": help.is_error()
    }))
}

/// Tool-level failure: reported in the result, not as a JSON-RPC error
fn tool_error(err: &ToolError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err,
        "isError": true
    })
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                out.push_str("**Examples:**\n");
                for ex in examples {
                    out.push_str(&format!("- `{}`\n", ex));
                }
            }
            if let Some(Value::Object(funcs)) = map.get("functions") {
                let mut cats: Vec<_> = funcs.iter().collect();
                cats.sort_by(|a, b| a.0.cmp(b.0));
                for (cat, names) in cats {
                    out.push_str(&format!("**{}:** {}\n", cat, names));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        other => other.to_string(),
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
        Server::new(ServerConfig::default())
    }

    fn call(server: &Server, method: &str, params: JsonValue) -> McpResponse {
        let request = McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        };
        handle_request(server, &request)
    }

    fn call_tool(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        let response = call(server, "tools/call", json!({ "name": name, "arguments": arguments }));
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    #[test]
    fn test_initialize() {
        let response = call(&server(), "initialize", json!({
            "protocolVersion": "2025-06-18",
            "clientInfo": { "name": "test" }
        }));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-06-18");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_tools_list() {
        let result = call(&server(), "tools/list", json!({})).result.unwrap();
        let names: Vec<&str> = result["tools"].as_array().unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["convert", "list_categories", "list_units", "help"]);
    }

    #[test]
    fn test_unknown_method() {
        let response = call(&server(), "resources/list", json!({}));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_convert_tool() {
        let result = call_tool(&server(), "convert", json!({
            "value": 100,
            "category": "temperature",
            "from_unit": "celsius",
            "to_unit": "fahrenheit"
        }));
        assert_eq!(result["isError"], false);
        assert_eq!(result["value"], 212.0);
        assert_eq!(result["display"], "212");
        assert_eq!(result["content"][0]["text"], "100 Celsius (°C) = 212 Fahrenheit (°F)");
    }

    #[test]
    fn test_convert_tool_precision() {
        let result = call_tool(&server(), "convert", json!({
            "value": "5",
            "category": "length",
            "from_unit": "km",
            "to_unit": "mi",
            "precision": 2
        }));
        assert_eq!(result["display"], "3.11");
    }

    #[test]
    fn test_convert_tool_errors() {
        let server = server();

        let result = call_tool(&server, "convert", json!({
            "value": "abc",
            "category": "length",
            "from_unit": "meters",
            "to_unit": "feet"
        }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_INPUT");

        let result = call_tool(&server, "convert", json!({
            "value": 1,
            "category": "length",
            "from_unit": "meters",
            "to_unit": "celsius"
        }));
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");

        let result = call_tool(&server, "convert", json!({
            "value": 1,
            "category": "colour",
            "from_unit": "red",
            "to_unit": "blue"
        }));
        assert_eq!(result["error"]["code"], "UNKNOWN_CATEGORY");
    }

    #[test]
    fn test_convert_tool_non_numeric_value() {
        let server = server();
        for value in [json!(true), json!(null), json!([1])] {
            let result = call_tool(&server, "convert", json!({
                "value": value,
                "category": "length",
                "from_unit": "meters",
                "to_unit": "feet"
            }));
            assert_eq!(result["isError"], true);
            assert_eq!(result["error"]["code"], "INVALID_INPUT");
        }
    }

    #[test]
    fn test_convert_tool_missing_arguments() {
        let response = call(&server(), "tools/call", json!({
            "name": "convert",
            "arguments": { "value": 1 }
        }));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_list_categories_tool() {
        let result = call_tool(&server(), "list_categories", json!({}));
        let data = result["data"].as_array().unwrap();
        assert_eq!(data.len(), 8);
        assert_eq!(data[0]["id"], "length");
        assert_eq!(data[3]["kind"], "affine");
        assert_eq!(data[0]["defaults"]["to"], "kilometers");
    }

    #[test]
    fn test_list_units_tool() {
        let result = call_tool(&server(), "list_units", json!({ "category": "temperature" }));
        let data = result["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["id"], "celsius");

        let result = call_tool(&server(), "list_units", json!({ "category": "colour" }));
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_help_tool() {
        let result = call_tool(&server(), "help", json!({ "name": "convert" }));
        assert!(result["content"][0]["text"].as_str().unwrap().starts_with("# convert"));

        let result = call_tool(&server(), "help", json!({ "name": "nope" }));
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_handle_line() {
        let server = server();
        assert!(handle_line(&server, "   ").is_none());

        let response = handle_line(&server, "{not json").unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire.get("id"), Some(&JsonValue::Null));
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);

        // Notifications get no response
        assert!(handle_line(&server, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());

        let response = handle_line(&server, r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert_eq!(response.id, Some(json!(7)));
        assert_eq!(response.result, Some(json!({})));
    }
}
