//! Readiness probe for the download daemon's RPC endpoint
//!
//! The orchestrator only ever asks the daemon one thing at startup: "are you
//! there, and what version are you". The full transfer protocol lives behind
//! the daemon handle and is someone else's problem.

use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

pub trait RpcProbe {
    /// One connection attempt. Errors mean "not reachable yet", the caller
    /// decides whether to keep trying.
    fn get_version(&self) -> Result<String, Box<dyn Error>>;
}

#[derive(Deserialize)]
struct VersionResponse {
    result: VersionResult,
}

#[derive(Deserialize)]
struct AddUriResponse {
    result: String,
}

#[derive(Deserialize)]
struct VersionResult {
    version: String,
}

/// JSON-RPC probe against a local aria2 instance.
pub struct HttpRpcProbe {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpRpcProbe {
    pub fn new(host: &str, port: u16) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()?;
        Ok(HttpRpcProbe {
            endpoint: format!("http://{host}:{port}/jsonrpc"),
            client,
        })
    }

    pub fn from_endpoint(endpoint: &str) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(HttpRpcProbe {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Enqueue one download into the daemon's (paused) queue. Returns the
    /// gid aria2 assigned to it.
    pub fn add_uri(&self, url: &str, dir: &std::path::Path) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "windlass")
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": "windlass",
                "method": "aria2.addUri",
                "params": [[url], {"dir": dir.to_string_lossy()}],
            }))
            .send()?;

        if !response.status().is_success() {
            return Err(format!("rpc endpoint returned HTTP {}", response.status()).into());
        }

        let body: AddUriResponse = response.json()?;
        Ok(body.result)
    }
}

impl RpcProbe for HttpRpcProbe {
    fn get_version(&self) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "windlass")
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": "windlass",
                "method": "aria2.getVersion",
                "params": [],
            }))
            .send()?;

        if !response.status().is_success() {
            return Err(format!("rpc endpoint returned HTTP {}", response.status()).into());
        }

        let body: VersionResponse = response.json()?;
        Ok(body.result.version)
    }
}
