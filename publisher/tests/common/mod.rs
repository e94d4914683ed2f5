//! Shared test doubles and helpers

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::mpsc;

use bucket_storage::{ObjectStore, StoreError, StoreResult};
use publisher::job::UploadJob;

/// Spy object store: records every call, with programmable put failures
#[derive(Default)]
pub struct MockStore {
    puts: Mutex<Vec<String>>,
    signs: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, u32>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `attempts` put calls for `key` fail
    pub fn fail_attempts(&self, key: &str, attempts: u32) {
        self.failures
            .lock()
            .unwrap()
            .insert(key.to_string(), attempts);
    }

    /// How many put attempts were made for `key`
    pub fn put_attempts(&self, key: &str) -> usize {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }

    /// Every recorded put key, in call order
    pub fn put_keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    /// Every recorded sign key, in call order
    pub fn sign_keys(&self) -> Vec<String> {
        self.signs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put_file(&self, key: &str, _path: &Path) -> StoreResult<()> {
        self.puts.lock().unwrap().push(key.to_string());

        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(StoreError::Connection("injected failure".to_string()));
            }
        }

        Ok(())
    }

    async fn presign_get(&self, key: &str, _expires_in: Duration) -> StoreResult<String> {
        self.signs.lock().unwrap().push(key.to_string());
        Ok(format!("https://signed.example/{key}"))
    }
}

/// A job with test defaults pointing at nothing real
pub fn test_job(local_path: &str, remote_path: &str) -> UploadJob {
    UploadJob {
        endpoint: "https://oss.example.com".to_string(),
        access_key_id: "key-id".to_string(),
        access_key_secret: "key-secret".to_string(),
        bucket: "artifacts".to_string(),
        region: "us-east-1".to_string(),
        local_path: local_path.to_string(),
        remote_path: remote_path.to_string(),
        max_retries: 3,
        auto_sign: false,
        webhook_url: None,
        webhook_skip_tls_verify: false,
    }
}

/// Starts a local webhook endpoint that captures every JSON body it receives
pub async fn start_webhook_capture() -> (String, mpsc::UnboundedReceiver<serde_json::Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/webhook",
        post(move |Json(body): Json<serde_json::Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                "ok"
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/webhook"), rx)
}
