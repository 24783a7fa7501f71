//! CLI Status Command
//!
//! Queries `/health` on a running server.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    println!("TextGrab status: checking...");
    let url = format!("http://localhost:{port}/health");
    match reqwest::get(&url).await {
        Ok(resp) => {
            let status = resp.status();
            let body: serde_json::Value = resp.json().await?;
            println!("{status} {}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("TextGrab is not running on port {port}");
        }
    }
    Ok(())
}
