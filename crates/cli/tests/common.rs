// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `ireport` pointed at `state`, with an API URL nothing listens on.
pub fn ireport(state: &TempDir) -> Command {
    ireport_at(state, &unreachable_url())
}

/// `ireport` pointed at `state` and the API at `url`.
pub fn ireport_at(state: &TempDir, url: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("ireport");
    cmd.arg("-C")
        .arg(state.path())
        .env("IREPORT_API_URL", url)
        .env_remove("IREPORT_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// A local URL whose port was free a moment ago.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Queue a comment and return the full action ID.
pub fn queue_comment(state: &TempDir, incident_id: &str, content: &str) -> String {
    ireport(state)
        .args(["queue", "comment", incident_id, content])
        .assert()
        .success();
    let out = ireport(state)
        .args(["pending", "-o", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    json["actions"]
        .as_array()
        .unwrap()
        .last()
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Parse `ireport pending -o json`.
pub fn pending_json(state: &TempDir) -> serde_json::Value {
    let out = ireport(state)
        .args(["pending", "-o", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
}

/// Minimal reporting API answering every request with a fixed status.
pub struct StubApi {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubApi {
    pub fn start(status: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let log = Arc::clone(&log);
                std::thread::spawn(move || respond(stream, status, &log));
            }
        });
        StubApi { url, requests }
    }

    /// Request lines received so far, e.g. `POST /incidents/42/comments`.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.lines().next())
            .map(|line| line.trim_end_matches(" HTTP/1.1").to_string())
            .collect()
    }

    pub fn raw_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn respond(mut stream: TcpStream, status: &str, log: &Mutex<Vec<String>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let head = text[..head_end].to_ascii_lowercase();
        if head.contains("transfer-encoding: chunked") {
            if text.ends_with("0\r\n\r\n") {
                break;
            }
            continue;
        }
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if request.len() >= head_end + 4 + length {
            break;
        }
    }

    // Connectivity probes connect and hang up without a request
    if request.is_empty() {
        return;
    }
    log.lock()
        .unwrap()
        .push(String::from_utf8_lossy(&request).to_string());

    let body = r#"{"id": 7}"#;
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).ok();
}
