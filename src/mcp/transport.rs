//! Transporte stdio para comunicação MCP.
//!
//! Mensagens JSON-RPC 2.0 delimitadas por newline, conforme o transporte
//! stdio do MCP:
//! - cada mensagem é um objeto JSON completo em uma única linha
//! - mensagens NÃO DEVEM conter newlines embutidos
//! - stdout é exclusivo do protocolo; logs vão para stderr
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{...}}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```

use std::io::{BufRead, BufReader, BufWriter, Stdin, Stdout, Write};

use serde::Serialize;

use crate::types::errors::PolquizError;
use crate::PolquizResult;

use super::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Transporte de linhas sobre qualquer par leitor/escritor.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transporte sobre stdin/stdout do processo.
pub type StdioTransport = LineTransport<BufReader<Stdin>, BufWriter<Stdout>>;

impl StdioTransport {
    /// Cria um transporte stdio.
    pub fn stdio() -> Self {
        LineTransport::new(
            BufReader::new(std::io::stdin()),
            BufWriter::new(std::io::stdout()),
        )
    }
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Lê a próxima mensagem.
    ///
    /// `Ok(None)` indica EOF (cliente desconectou). Linhas em branco são
    /// ignoradas. JSON inválido ou bytes fora de UTF-8 viram
    /// [`PolquizError::Json`], e o loop do servidor responde com parse error
    /// sem encerrar.
    pub fn read_message(&mut self) -> PolquizResult<Option<JsonRpcRequest>> {
        let mut line = Vec::new();

        loop {
            line.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut line)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                break;
            }
        }

        // from_slice valida UTF-8; um byte inválido vira erro de JSON
        let request: JsonRpcRequest = serde_json::from_slice(&line)?;

        tracing::debug!(
            method = %request.method,
            id = ?request.id,
            "Received request"
        );

        Ok(Some(request))
    }

    /// Escreve uma resposta como JSON compacto seguido de `\n`.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> PolquizResult<()> {
        self.write_message(response)?;

        tracing::debug!(
            id = ?response.id,
            is_error = response.is_error(),
            "Sent response"
        );

        Ok(())
    }

    fn write_message<T: Serialize>(&mut self, message: &T) -> PolquizResult<()> {
        let body = serde_json::to_string(message).map_err(PolquizError::Json)?;

        self.writer.write_all(body.as_bytes())?;
        self.writer.write_all(b"\n")?;
        // sem flush a resposta fica presa no buffer e o cliente trava
        self.writer.flush()?;

        Ok(())
    }

    /// Devolve o escritor (usado em testes para inspecionar a saída).
    pub fn into_writer(self) -> W {
        self.writer
    }
}
