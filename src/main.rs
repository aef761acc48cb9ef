use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use cbtadmind::backend::{Backend, HttpBackend};
use cbtadmind::ipc;

fn main() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let backend = match std::env::var("CBT_BACKEND_URL") {
        Ok(url) => match HttpBackend::new(&url) {
            Ok(b) => {
                tracing::info!(base_url = %url, "connected to backend from CBT_BACKEND_URL");
                Some(Box::new(b) as Box<dyn Backend>)
            }
            Err(e) => {
                tracing::warn!("CBT_BACKEND_URL rejected: {}", e);
                None
            }
        },
        Err(_) => None,
    };
    let mut state = ipc::AppState::new(backend);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with the request id; report what we can.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
