//! CLI Status Command
//!
//! Queries a running hub's health endpoint.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://127.0.0.1:{port}/health");
    let client = reqwest::Client::new();
    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("callhub is not running on port {port}");
        }
    }
    Ok(())
}
