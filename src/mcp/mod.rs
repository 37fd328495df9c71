//! Servidor MCP do polquiz.
//!
//! Expõe os quizzes como ferramentas MCP (Model Context Protocol) sobre
//! stdio.
//!
//! ## Ferramentas Expostas
//!
//! Para cada prefixo (`political_compass`, `eightvalues`, `politiscales`):
//!
//! - `<prefixo>` - Inicia o quiz ou responde à pergunta pendente
//! - `<prefixo>_reset` - Descarta a sessão
//! - `<prefixo>_status` - Progresso e pontuações parciais
//!
//! ## Exemplo de Uso
//!
//! ```ignore
//! use polquiz::mcp::McpServer;
//! use polquiz::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = McpServer::new(Config::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod protocol;
mod server;
mod tools;
mod transport;

pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDescription, ToolResult,
    ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};

pub use server::McpServer;
pub use tools::{AnswerParams, ToolHandler};
pub use transport::{LineTransport, StdioTransport};
