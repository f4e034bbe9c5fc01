//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves scripted routes: a body, a number of leading 500s or truncated
//! bodies, a fixed error status, an optional missing `Content-Length`, and a
//! per-request delay. Counts hits per path and the peak number of requests
//! being handled at once.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Route {
    pub body: Vec<u8>,
    /// Answer the first N hits with 500.
    pub fail_first: u32,
    /// Answer the first N hits with a declared length larger than the body sent.
    pub truncate_first: u32,
    /// Always answer with this status (and a short error body).
    pub status: Option<u16>,
    /// Omit `Content-Length`; the body ends when the connection closes.
    pub omit_length: bool,
    /// Sleep this long before answering.
    pub delay: Duration,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

struct State {
    routes: HashMap<String, Route>,
    hits: Mutex<HashMap<String, u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

pub struct TestServer {
    base: String,
    state: Arc<State>,
}

impl TestServer {
    /// Starts a server in a background thread. Runs until the process exits.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(State {
            routes: routes
                .into_iter()
                .map(|(p, r)| (p.to_string(), r))
                .collect(),
            hits: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&accept_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self, path: &str) -> u32 {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let text = String::from_utf8_lossy(&buf);
    let first = text.lines().next()?;
    first.split_whitespace().nth(1).map(str::to_string)
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };
    let hit = {
        let mut hits = state.hits.lock().unwrap();
        let n = hits.entry(path.clone()).or_insert(0);
        *n += 1;
        *n
    };

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let route = state.routes.get(&path).cloned();
    if let Some(r) = &route {
        thread::sleep(r.delay);
    }
    // Leave the in-flight window before answering so a client that already
    // read its response never overlaps with this request in the count.
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    let response = match route {
        None => status_response(404, "Not Found"),
        Some(r) if r.status.is_some() => {
            let code = r.status.unwrap_or(500);
            status_response(code, "Scripted")
        }
        Some(r) if hit <= r.fail_first => status_response(500, "Internal Server Error"),
        Some(r) if hit <= r.fail_first + r.truncate_first => {
            let half = &r.body[..r.body.len() / 2];
            let mut out = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                r.body.len()
            )
            .into_bytes();
            out.extend_from_slice(half);
            out
        }
        Some(r) => {
            let length = if r.omit_length {
                String::new()
            } else {
                format!("Content-Length: {}\r\n", r.body.len())
            };
            let mut out =
                format!("HTTP/1.1 200 OK\r\n{}Connection: close\r\n\r\n", length).into_bytes();
            out.extend_from_slice(&r.body);
            out
        }
    };
    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

fn status_response(code: u16, reason: &str) -> Vec<u8> {
    let body = format!("{} {}", code, reason);
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    )
    .into_bytes()
}
