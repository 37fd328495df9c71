//! Testes de integração para o protocolo MCP do polquiz.

use std::io::Cursor;

use polquiz::mcp::{
    JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse, LineTransport, McpServer,
    ToolHandler, ToolResult, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use polquiz::Config;
use serde_json::{json, Value};

/// Helper para criar uma mensagem JSON-RPC.
fn jsonrpc_request(id: u64, method: &str, params: Option<Value>) -> String {
    let mut req = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        req["params"] = p;
    }
    serde_json::to_string(&req).unwrap()
}

fn tool_call(id: u64, name: &str, response: Option<&str>) -> String {
    let arguments = match response {
        Some(r) => json!({ "response": r }),
        None => json!({}),
    };
    jsonrpc_request(id, "tools/call", Some(json!({ "name": name, "arguments": arguments })))
}

fn seeded_config() -> Config {
    let mut config = Config::default();
    config.quiz.seed = Some(2024);
    config
}

/// Roda o servidor sobre as linhas dadas e devolve as respostas.
async fn run_session(lines: &[String]) -> Vec<Value> {
    let input = lines.iter().map(|l| format!("{}\n", l)).collect::<String>();
    let mut transport = LineTransport::new(Cursor::new(input.into_bytes()), Vec::new());

    let mut server = McpServer::new(seeded_config()).unwrap();
    server.serve(&mut transport).await.unwrap();

    String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn result_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

fn is_tool_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════════════════════
// Tipos do protocolo
// ═══════════════════════════════════════════════════════════════════════════

mod protocol_tests {
    use super::*;

    #[test]
    fn test_json_rpc_id_roundtrip() {
        assert_eq!(serde_json::to_string(&JsonRpcId::Number(42)).unwrap(), "42");
        let id: JsonRpcId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, JsonRpcId::String("abc".to_string()));
    }

    #[test]
    fn test_request_without_params() {
        let req: JsonRpcRequest =
            serde_json::from_str(&jsonrpc_request(7, "tools/list", None)).unwrap();
        assert_eq!(req.method, "tools/list");
        assert!(req.params.is_none());
        assert!(!req.is_notification());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PARSE_ERROR, -32700);
        assert_eq!(INVALID_REQUEST, -32600);
        assert_eq!(METHOD_NOT_FOUND, -32601);
        assert_eq!(INVALID_PARAMS, -32602);
        assert_eq!(INTERNAL_ERROR, -32603);
    }

    #[test]
    fn test_error_response_serialization() {
        let response =
            JsonRpcResponse::error(Some(3.into()), JsonRpcError::method_not_found("nope"));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_tool_result_text() {
        let result = ToolResult::success("hello");
        assert_eq!(result.text(), "hello");
        assert!(!result.is_error);
    }

    #[test]
    fn test_tool_catalog() {
        let tools = ToolHandler::list_tools();
        assert_eq!(tools.len(), 9);
        for prefix in ["political_compass", "eightvalues", "politiscales"] {
            for suffix in ["", "_reset", "_status"] {
                let name = format!("{}{}", prefix, suffix);
                assert!(tools.iter().any(|t| t.name == name), "missing tool {}", name);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Fluxo completo sobre o transporte de linhas
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_full_compass_run_over_protocol() {
    let mut lines = vec![
        jsonrpc_request(1, "initialize", Some(json!({}))),
        tool_call(2, "political_compass", None),
    ];
    for i in 0..62 {
        lines.push(tool_call(3 + i, "political_compass", Some("Agree")));
    }
    lines.push(tool_call(100, "political_compass_status", None));
    lines.push(tool_call(101, "political_compass", Some("Agree")));

    let responses = run_session(&lines).await;
    assert_eq!(responses.len(), lines.len());

    assert!(result_text(&responses[1]).contains("Question 1 of 62"));
    assert!(result_text(&responses[62]).contains("Question 62 of 62"));

    let report = result_text(&responses[63]);
    assert!(!is_tool_error(&responses[63]));
    assert!(report.contains("Quadrant:"));
    assert!([
        "Authoritarian Right",
        "Libertarian Right",
        "Authoritarian Left",
        "Libertarian Left",
    ]
        .iter()
        .any(|label| report.contains(label)));
    assert!(report.contains("```svg\n<svg"));

    let status = result_text(&responses[64]);
    assert!(status.contains("Answered: 62/62"));
    assert!(status.contains("Agree: 62 (100.0%)"));

    // depois de completo: erro de ferramenta com o resumo em cache
    let after = &responses[65];
    assert!(is_tool_error(after));
    assert!(result_text(after).contains("already complete"));
    assert!(result_text(after).contains("Quadrant:"));
}

#[tokio::test]
async fn test_invalid_token_keeps_question_pending() {
    let lines = vec![
        tool_call(1, "eightvalues", None),
        tool_call(2, "eightvalues", Some("absolutely")),
        tool_call(3, "eightvalues", Some("strongly agree")),
        tool_call(4, "eightvalues", Some("strongly_agree")),
        tool_call(5, "eightvalues_status", None),
    ];
    let responses = run_session(&lines).await;

    for rejected in &responses[1..3] {
        assert!(is_tool_error(rejected));
        assert!(result_text(rejected).contains("Accepted answers:"));
        assert!(result_text(rejected).contains("Pending question:"));
    }
    assert!(result_text(&responses[3]).contains("Question 2 of 70"));
    assert!(result_text(&responses[4]).contains("Strongly Agree: 1 (100.0%)"));
}

#[tokio::test]
async fn test_reset_returns_to_first_question() {
    let lines = vec![
        tool_call(1, "politiscales", None),
        tool_call(2, "politiscales", Some("agree")),
        tool_call(3, "politiscales_reset", None),
        tool_call(4, "politiscales_status", None),
        tool_call(5, "politiscales", None),
    ];
    let responses = run_session(&lines).await;

    assert!(result_text(&responses[2]).contains("reset"));
    assert!(result_text(&responses[3]).contains("State: not started"));
    assert!(result_text(&responses[4]).contains("Question 1 of 62"));
}

#[tokio::test]
async fn test_variants_are_independent() {
    let lines = vec![
        tool_call(1, "political_compass", None),
        tool_call(2, "political_compass", Some("agree")),
        tool_call(3, "eightvalues_status", None),
        tool_call(4, "political_compass_status", None),
    ];
    let responses = run_session(&lines).await;

    assert!(result_text(&responses[2]).contains("Answered: 0/70"));
    assert!(result_text(&responses[3]).contains("Answered: 1/62"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let lines = vec![
        jsonrpc_request(1, "resources/list", None),
        jsonrpc_request(2, "tools/call", None),
        tool_call(3, "unknown_tool", None),
    ];
    let responses = run_session(&lines).await;

    assert_eq!(responses[0]["error"]["code"], METHOD_NOT_FOUND);
    assert_eq!(responses[1]["error"]["code"], INVALID_PARAMS);
    assert!(is_tool_error(&responses[2]));
}

#[tokio::test]
async fn test_non_utf8_line_gets_parse_error_and_loop_continues() {
    let mut input = vec![0xff, 0xfe, b'\n'];
    input.extend_from_slice(jsonrpc_request(1, "ping", None).as_bytes());
    input.push(b'\n');
    let mut transport = LineTransport::new(Cursor::new(input), Vec::new());

    let mut server = McpServer::new(seeded_config()).unwrap();
    server.serve(&mut transport).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["result"], json!({}));
}
