//! Product source loading and the in-memory product collection.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::product::{parse_catalog, Product, ShapeError};

/// Where the catalog document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductSource {
    Url(String),
    File(PathBuf),
}

impl ProductSource {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is treated as a local path.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ProductSource::Url(raw.to_string())
        } else {
            ProductSource::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for ProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductSource::Url(url) => f.write_str(url),
            ProductSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),
    /// A response arrived with a failure status.
    #[error("HTTP error! status: {0}")]
    BadStatus(u16),
    /// The body did not contain the expected `products` sequence.
    #[error(transparent)]
    Malformed(#[from] ShapeError),
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Build the HTTP client used for catalog requests. `None` disables the
/// request timeout.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, LoadError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| LoadError::Transport(e.to_string()))
}

/// Fetch and parse the catalog document from `source`.
pub async fn fetch(
    client: &reqwest::Client,
    source: &ProductSource,
) -> Result<Vec<Product>, LoadError> {
    let body = match source {
        ProductSource::Url(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::BadStatus(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| LoadError::Transport(e.to_string()))?
        }
        ProductSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoadError::Transport(format!("{}: {e}", path.display())))?,
    };

    Ok(parse_catalog(&body)?)
}

// ---------------------------------------------------------------------------
// ProductRepository
// ---------------------------------------------------------------------------

/// Holds the product collection. It is written once, when the load resolves,
/// and only read afterwards.
#[derive(Debug, Default)]
pub struct ProductRepository {
    products: Vec<Product>,
    loaded: bool,
}

impl ProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly loaded collection. Returns `false` and leaves the
    /// existing collection untouched if one has already been stored.
    pub fn store(&mut self, products: Vec<Product>) -> bool {
        if self.loaded {
            tracing::warn!("ignoring second product load; collection already stored");
            return false;
        }
        self.products = products;
        self.loaded = true;
        true
    }

    pub fn current(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("catalog_repo_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Serve exactly one HTTP response on a loopback port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://127.0.0.1:{}/products.json", port)
    }

    /// Accept one connection on a loopback port and never answer it.
    fn serve_silence(hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                std::thread::sleep(hold);
            }
        });
        format!("http://127.0.0.1:{}/products.json", port)
    }

    fn loopback_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            ProductSource::parse("https://shop.example/products.json"),
            ProductSource::Url("https://shop.example/products.json".to_string())
        );
        assert_eq!(
            ProductSource::parse("products.json"),
            ProductSource::File(PathBuf::from("products.json"))
        );
    }

    #[test]
    fn test_bad_status_message_contains_code() {
        assert_eq!(LoadError::BadStatus(404).to_string(), "HTTP error! status: 404");
    }

    #[test]
    fn test_store_only_once() {
        let mut repo = ProductRepository::new();
        assert!(!repo.is_loaded());
        assert!(repo.store(vec![Product {
            name: "first".into(),
            ..Product::default()
        }]));
        assert!(!repo.store(Vec::new()));
        assert_eq!(repo.current().len(), 1);
        assert_eq!(repo.current()[0].name, "first");
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let path = temp_file(
            "ok.json",
            r#"{"products":[{"name":"Widget","description":"A small widget","category":"Tools","price":"$5","image":"w.png","affiliateLink":"http://x"}]}"#,
        );
        let client = loopback_client();
        let products = fetch(&client, &ProductSource::File(path)).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_transport_error() {
        let client = loopback_client();
        let source = ProductSource::File(PathBuf::from("/definitely/not/here/products.json"));
        let err = fetch(&client, &source).await.unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_file() {
        let path = temp_file("bad.json", r#"{"items":[]}"#);
        let client = loopback_client();
        let err = fetch(&client, &ProductSource::File(path)).await.unwrap_err();
        assert_eq!(err, LoadError::Malformed(ShapeError::MissingProducts));
        assert!(err.to_string().contains("\"products\" array"));
    }

    #[tokio::test]
    async fn test_fetch_http_ok() {
        let url = serve_once("200 OK", r#"{"products":[{"name":"Widget","category":"Tools"}]}"#);
        let products = fetch(&loopback_client(), &ProductSource::Url(url))
            .await
            .unwrap();
        assert_eq!(products[0].name, "Widget");
    }

    #[tokio::test]
    async fn test_fetch_http_404() {
        let url = serve_once("404 Not Found", "missing");
        let err = fetch(&loopback_client(), &ProductSource::Url(url))
            .await
            .unwrap_err();
        assert_eq!(err, LoadError::BadStatus(404));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_transport_error() {
        let url = serve_silence(Duration::from_secs(3));
        let client = http_client(Some(Duration::from_millis(200))).unwrap();
        let err = fetch(&client, &ProductSource::Url(url)).await.unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }
}
