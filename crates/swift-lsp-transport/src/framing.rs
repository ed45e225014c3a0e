//! Message framing for the LSP Base Protocol
//!
//! Each message is preceded by a header block (`Content-Length` is the one
//! that matters) terminated by an empty line.

use std::io::{self, BufRead, Read, Write};

use serde_json::Value;
use swift_lsp_protocol::{JsonRpcMessage, JsonRpcResponse};

/// One framed unit off the wire.
pub enum IncomingFrame {
    /// A decoded message.
    Message(JsonRpcMessage),
    /// A frame whose body was not valid JSON-RPC; carries the decode
    /// error for the protocol-level reply.
    Malformed(String),
}

/// Read the next frame from a buffered reader.
///
/// Frames without a usable `Content-Length` header are logged and
/// skipped; bodies that fail to decode are surfaced as
/// [`IncomingFrame::Malformed`] so the caller can reply with a parse
/// error. `Ok(None)` means the stream reached EOF. Returns `Err` only on
/// I/O errors.
pub fn read_message<R: BufRead>(reader: &mut R) -> io::Result<Option<IncomingFrame>> {
    loop {
        let mut content_length: Option<usize> = None;

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None); // EOF
            }
            let line = line.trim_end();
            if line.is_empty() {
                break; // End of headers
            }
            if let Some((key, value)) = line.split_once(": ") {
                if key.eq_ignore_ascii_case("Content-Length") {
                    content_length = value.parse().ok();
                }
            }
        }

        let Some(length) = content_length else {
            eprintln!("[swift-lsp:rx] frame without Content-Length header, skipping");
            continue;
        };

        let mut content = vec![0u8; length];
        if reader.read_exact(&mut content).is_err() {
            return Ok(None); // Truncated frame at EOF
        }

        match serde_json::from_slice(&content) {
            Ok(message) => return Ok(Some(IncomingFrame::Message(message))),
            Err(err) => {
                let preview = String::from_utf8_lossy(&content);
                let preview = preview.get(..preview.len().min(100)).unwrap_or_default();
                eprintln!("[swift-lsp:rx] malformed frame ({err}): {preview}");
                return Ok(Some(IncomingFrame::Malformed(err.to_string())));
            }
        }
    }
}

fn write_framed<W: Write>(writer: &mut W, content: &str) -> io::Result<()> {
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}

/// Write a framed response.
pub fn write_message<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let content = serde_json::to_string(response)?;
    write_framed(writer, &content)
}

/// Write a framed notification.
pub fn write_notification<W: Write>(writer: &mut W, method: &str, params: Value) -> io::Result<()> {
    let notification = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
    });
    write_framed(writer, &serde_json::to_string(&notification)?)
}

/// Write a framed server-initiated request.
pub fn write_request<W: Write>(
    writer: &mut W,
    id: Value,
    method: &str,
    params: Value,
) -> io::Result<()> {
    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    });
    write_framed(writer, &serde_json::to_string(&request)?)
}

/// Log an outgoing response for debugging.
pub fn log_response(response: &JsonRpcResponse) {
    if let Ok(content) = serde_json::to_string(response) {
        eprintln!(
            "[swift-lsp:tx] id={:?} has_result={} has_error={} len={}",
            response.id,
            response.result.is_some(),
            response.error.is_some(),
            content.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::BufReader;

    fn frame(body: &str) -> Vec<u8> {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
    }

    #[test]
    fn round_trips_a_framed_message() -> io::Result<()> {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#;
        let framed = frame(body);
        let mut reader = BufReader::new(framed.as_slice());
        let Some(IncomingFrame::Message(message)) = read_message(&mut reader)? else {
            return Err(io::ErrorKind::InvalidData.into());
        };
        assert_eq!(message.method.as_deref(), Some("shutdown"));
        assert_eq!(message.id, Some(json!(1)));
        Ok(())
    }

    #[test]
    fn malformed_bodies_are_surfaced_then_reading_continues() -> io::Result<()> {
        let mut bytes = frame("{not json");
        let good = r#"{"jsonrpc":"2.0","method":"exit"}"#;
        bytes.extend_from_slice(&frame(good));
        let mut reader = BufReader::new(bytes.as_slice());
        let Some(IncomingFrame::Malformed(_)) = read_message(&mut reader)? else {
            return Err(io::ErrorKind::InvalidData.into());
        };
        let Some(IncomingFrame::Message(next)) = read_message(&mut reader)? else {
            return Err(io::ErrorKind::InvalidData.into());
        };
        assert_eq!(next.method.as_deref(), Some("exit"));
        assert!(read_message(&mut reader)?.is_none());
        Ok(())
    }

    #[test]
    fn headerless_frames_are_skipped() -> io::Result<()> {
        let mut bytes = b"X-Nonsense: 1\r\n\r\n".to_vec();
        bytes.extend_from_slice(&frame(r#"{"jsonrpc":"2.0","method":"exit"}"#));
        let mut reader = BufReader::new(bytes.as_slice());
        let Some(IncomingFrame::Message(next)) = read_message(&mut reader)? else {
            return Err(io::ErrorKind::InvalidData.into());
        };
        assert_eq!(next.method.as_deref(), Some("exit"));
        Ok(())
    }

    #[test]
    fn eof_yields_none() -> io::Result<()> {
        let mut reader = BufReader::new(&[] as &[u8]);
        assert!(read_message(&mut reader)?.is_none());
        Ok(())
    }

    #[test]
    fn writes_content_length_header() -> io::Result<()> {
        let mut out = Vec::new();
        write_notification(&mut out, "textDocument/publishDiagnostics", json!({"uri": "u"}))?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("Content-Length: "));
        assert!(text.contains("publishDiagnostics"));
        Ok(())
    }
}
