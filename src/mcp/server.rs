//! Servidor MCP do polquiz.
//!
//! Loop de leitura/resposta sobre o transporte de linhas e despacho dos
//! métodos JSON-RPC para o [`ToolHandler`].

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::config::Config;
use crate::types::errors::PolquizError;
use crate::PolquizResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::{LineTransport, StdioTransport};

/// Servidor MCP do polquiz.
pub struct McpServer {
    tools: ToolHandler,
    initialized: bool,
}

impl McpServer {
    /// Cria um novo servidor MCP.
    pub fn new(config: Config) -> PolquizResult<Self> {
        Ok(Self::with_tools(ToolHandler::new(config)?))
    }

    /// Servidor sobre um handler já montado.
    pub fn with_tools(tools: ToolHandler) -> Self {
        Self {
            tools,
            initialized: false,
        }
    }

    /// Inicia o servidor sobre stdin/stdout.
    ///
    /// Bloqueia até o cliente fechar stdin.
    pub async fn run(&mut self) -> PolquizResult<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    /// Processa mensagens até EOF.
    pub async fn serve<R: BufRead, W: Write>(
        &mut self,
        transport: &mut LineTransport<R, W>,
    ) -> PolquizResult<()> {
        tracing::info!("polquiz MCP server starting");

        loop {
            let request = match transport.read_message() {
                Ok(Some(request)) => request,
                Ok(None) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Err(PolquizError::Json(e)) => {
                    tracing::warn!(error = %e, "Malformed message");
                    let response = JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error().with_data(json!(e.to_string())),
                    );
                    Self::send(transport, &response)?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            // notificações (sem ID) não recebem resposta
            let is_notification = request.is_notification();
            let response = self.handle_request(request).await;

            if !is_notification {
                Self::send(transport, &response)?;
            }
        }

        tracing::info!("polquiz MCP server stopped");
        Ok(())
    }

    fn send<R: BufRead, W: Write>(
        transport: &mut LineTransport<R, W>,
        response: &JsonRpcResponse,
    ) -> PolquizResult<()> {
        transport
            .write_response(response)
            .map_err(|e| PolquizError::McpServer(format!("failed to write response: {}", e)))
    }

    /// Processa uma requisição JSON-RPC.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "Handling request");

        if !request.has_valid_version() {
            return JsonRpcResponse::error(request.id, JsonRpcError::invalid_request());
        }

        match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(request),
            "initialized" | "notifications/initialized" => self.handle_initialized(request),
            "shutdown" => self.handle_shutdown(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),

            // Tools
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,

            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers de lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let client = request
            .params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(client, "Client initializing connection");

        self.initialized = true;

        JsonRpcResponse::from_outcome(request.id, to_result(&InitializeResult::default()))
    }

    fn handle_initialized(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client initialization complete");

        // é notificação; só responde se veio com ID
        JsonRpcResponse::success(request.id, json!({}))
    }

    fn handle_shutdown(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client requested shutdown");

        self.initialized = false;

        JsonRpcResponse::success(request.id, json!(null))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers de tools
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: ToolHandler::list_tools(),
        };

        JsonRpcResponse::from_outcome(request.id, to_result(&result))
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                );
            }
        };

        let result = self
            .tools
            .handle_tool_call(&params.name, params.arguments)
            .await;

        JsonRpcResponse::from_outcome(request.id, to_result(&result))
    }
}

/// Serializa o resultado de um handler; falha vira internal error.
fn to_result<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize result");
        JsonRpcError::internal_error(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{JsonRpcId, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
    use std::io::Cursor;

    fn server() -> McpServer {
        let mut config = Config::default();
        config.quiz.seed = Some(3);
        McpServer::new(config).unwrap()
    }

    fn create_test_request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let mut server = server();

        let request = create_test_request(
            "initialize",
            Some(json!({"clientInfo": {"name": "test-client"}})),
        );
        let response = server.handle_request(request).await;

        assert!(!response.is_error());
        assert!(server.initialized);

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "polquiz");
    }

    #[tokio::test]
    async fn test_handle_tools_list() {
        let mut server = server();

        let response = server.handle_request(create_test_request("tools/list", None)).await;
        assert!(!response.is_error());

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 9);

        let tool_names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert!(tool_names.contains(&"political_compass"));
        assert!(tool_names.contains(&"eightvalues_status"));
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[test]
    fn test_unserializable_result_is_internal_error() {
        // chaves não-string não viram objeto JSON
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "x");

        let err = to_result(&map).unwrap_err();
        assert_eq!(err.code, INTERNAL_ERROR);

        let response = JsonRpcResponse::from_outcome(Some(JsonRpcId::Number(9)), Err(err));
        assert!(response.is_error());
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_handle_tools_call_status() {
        let mut server = server();

        let request = create_test_request(
            "tools/call",
            Some(json!({
                "name": "political_compass_status",
                "arguments": {}
            })),
        );
        let response = server.handle_request(request).await;

        assert!(!response.is_error());
        let result = response.result.unwrap();
        // isError só é serializado quando true
        assert!(!result["isError"].as_bool().unwrap_or(false));
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Answered: 0/62"));
    }

    #[tokio::test]
    async fn test_handle_tools_call_invalid_answer() {
        let mut server = server();

        let start = create_test_request(
            "tools/call",
            Some(json!({"name": "politiscales", "arguments": {}})),
        );
        server.handle_request(start).await;

        let answer = create_test_request(
            "tools/call",
            Some(json!({"name": "politiscales", "arguments": {"response": "nope"}})),
        );
        let response = server.handle_request(answer).await;

        // erro de ferramenta, não de protocolo
        assert!(!response.is_error());
        assert_eq!(response.result.unwrap()["isError"], true);
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let mut server = server();

        let response = server
            .handle_request(create_test_request("unknown/method", None))
            .await;

        assert!(response.is_error());
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_tools_call_invalid_params() {
        let mut server = server();

        // falta 'name'
        let request = create_test_request("tools/call", Some(json!({"arguments": {}})));
        let response = server.handle_request(request).await;

        assert!(response.is_error());
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let mut server = server();
        let mut request = create_test_request("ping", None);
        request.jsonrpc = "1.0".to_string();

        let response = server.handle_request(request).await;
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_handle_shutdown() {
        let mut server = server();
        server.initialized = true;

        let response = server.handle_request(create_test_request("shutdown", None)).await;

        assert!(!response.is_error());
        assert!(!server.initialized);
    }

    #[tokio::test]
    async fn test_serve_skips_notifications_and_reports_parse_errors() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "{broken\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n"
        );
        let mut transport = LineTransport::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());

        let mut server = server();
        server.serve(&mut transport).await.unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], PARSE_ERROR);
        assert!(lines[1]["id"].is_null());
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["result"], json!({}));
    }
}
