//! Test fixtures: a scripted HTTP stub standing in for the task API.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// One response the stub will play back.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.into(),
        }
    }
}

/// Loopback HTTP server that answers a fixed script of responses, one
/// connection each, then stops. `finish` joins the thread and returns the
/// requests that were received, in order.
pub struct StubServer {
    base_url: String,
    handle: Option<JoinHandle<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let base_url = format!("http://{addr}/api");

        let handle = std::thread::spawn(move || {
            let mut recorded = Vec::new();
            for response in responses {
                let Ok((stream, _)) = listener.accept() else {
                    break;
                };
                if let Some(request) = serve_one(stream, &response) {
                    recorded.push(request);
                }
            }
            recorded
        });

        Self {
            base_url,
            handle: Some(handle),
        }
    }

    /// Base URL to hand to the gateway, ending in `/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn finish(mut self) -> Vec<RecordedRequest> {
        self.handle
            .take()
            .expect("stub already finished")
            .join()
            .expect("stub server thread")
    }
}

fn serve_one(mut stream: TcpStream, response: &CannedResponse) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some(value) = trimmed.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body_bytes = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body_bytes).ok()?;
    }
    let body = String::from_utf8_lossy(&body_bytes).to_string();

    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason_phrase(response.status),
        response.content_type,
        response.body.len(),
        response.body
    );
    stream.write_all(payload.as_bytes()).ok()?;
    let _ = stream.flush();

    Some(RecordedRequest { method, path, body })
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "",
    }
}
