//! Interactive terminal front-end for the AI-Twin API.
//!
//! Reads messages from stdin and POSTs them to `/chat` on a running backend.
//! Pass the base URL as the first argument, or rely on the local default:
//!
//! ```text
//! cargo run --bin console -- http://127.0.0.1:8000
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());

    let client = reqwest::Client::new();

    println!("AI-Twin console — talking to {base_url}");
    println!("Type a message, or 'quit' to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "quit" || message == "exit" {
            break;
        }

        let response = client
            .post(format!("{base_url}/chat"))
            .json(&ChatRequest { message })
            .send()
            .await
            .context("Failed to reach the API server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eprintln!("server error ({status}): {body}");
            continue;
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat response")?;
        println!("twin> {}\n", reply.response);
    }

    Ok(())
}
