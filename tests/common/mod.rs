#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary; inherit environment so the server
        // sees DATABASE_URL when one is configured
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_store-admin-api"));
        cmd.env("ADMIN_API_PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .env("SECURITY_ENABLE_TOKEN_MINT", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready on liveness, with or without a reachable database
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Suites that need PostgreSQL skip cleanly when no database is configured
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Mint a session token for the given user id via the dev token endpoint
pub async fn mint_token(server: &TestServer, user_id: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/auth/token", server.base_url))
        .json(&serde_json::json!({ "userId": user_id }))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::OK, "token mint failed: {}", resp.status());

    let body = resp.json::<serde_json::Value>().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("token missing from mint response")
}

/// Create a store owned by the bearer of `token`; returns its id
pub async fn create_store(server: &TestServer, token: &str, name: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/api/stores", server.base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await?;
    anyhow::ensure!(
        resp.status() == StatusCode::CREATED,
        "store create failed: {}",
        resp.status()
    );

    let body = resp.json::<serde_json::Value>().await?;
    body["id"].as_str().map(str::to_string).context("store id missing")
}

/// Create a billboard under a store; returns its id
pub async fn create_billboard(
    server: &TestServer,
    token: &str,
    store_id: &str,
    label: &str,
) -> Result<String> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/api/{}/billboards", server.base_url, store_id))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "label": label,
            "imageUrl": "https://cdn.example.com/billboard.png"
        }))
        .send()
        .await?;
    anyhow::ensure!(
        resp.status() == StatusCode::CREATED,
        "billboard create failed: {}",
        resp.status()
    );

    let body = resp.json::<serde_json::Value>().await?;
    body["id"].as_str().map(str::to_string).context("billboard id missing")
}
