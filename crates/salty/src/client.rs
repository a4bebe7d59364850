//! HTTPS + websocket client for the salty surface.

use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    anyhow::Context,
    async_trait::async_trait,
    chrono::Utc,
    futures::StreamExt,
    serde::Deserialize,
    tokio::sync::mpsc,
    tokio_tungstenite::{connect_async, tungstenite::Message},
    tracing::{debug, info, warn},
    url::Url,
};

use saltygram_relay::{FederatedClient, FederatedConnector, RawMessage};

use crate::{
    addr::Addr,
    error::{Error, Result},
    identity::Identity,
};

/// Published capability record of a salty address.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    /// Inbox endpoint messages are posted to (and subscribed from).
    pub endpoint: Url,
    /// Public key of the address owner.
    pub key: String,
}

/// Timestamp layout of the wire record (ISO-8601 UTC).
const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Delay before reopening a dropped subscription.
const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

/// Identity-bound salty client, one per session.
pub struct SaltyClient {
    http: reqwest::Client,
    identity: Identity,
}

impl SaltyClient {
    pub fn new(identity: Identity) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, identity })
    }
}

#[async_trait]
impl FederatedClient for SaltyClient {
    async fn send(&self, recipient: &str, text: &str) -> anyhow::Result<()> {
        let addr = Addr::parse(recipient)?;
        let descriptor = lookup(&self.http, &addr).await?;
        let timestamp = Utc::now().format(WIRE_TIMESTAMP).to_string();
        let record = wire_record(&timestamp, self.identity.addr(), text);
        self.http
            .post(descriptor.endpoint.clone())
            .body(record)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("posting to {}", descriptor.endpoint))?;
        debug!(%addr, "relayed message to salty");
        Ok(())
    }

    async fn subscribe(&self) -> mpsc::Receiver<RawMessage> {
        let (tx, rx) = mpsc::channel(64);
        let http = self.http.clone();
        let addr = self.identity.addr().clone();
        tokio::spawn(subscribe_loop(http, addr, tx));
        rx
    }
}

/// Fetch the published capability record for an address.
async fn lookup(http: &reqwest::Client, addr: &Addr) -> Result<Descriptor> {
    let url = addr.well_known_url()?;
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::discovery(
            addr,
            format!("HTTP {}", response.status()),
        ));
    }
    Ok(response.json().await?)
}

/// Compose the tab-separated wire record the receiving side reformats.
fn wire_record(timestamp: &str, sender: &Addr, body: &str) -> String {
    format!("{timestamp}\t({sender})\t{body}")
}

/// Swap a descriptor endpoint to its websocket equivalent.
fn websocket_url(endpoint: &Url) -> Result<Url> {
    let mut url = endpoint.clone();
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(Error::discovery(
                url.as_str(),
                format!("unsupported endpoint scheme {other:?}"),
            ));
        },
    };
    if url.set_scheme(scheme).is_err() {
        return Err(Error::discovery(url.as_str(), "cannot derive websocket URL"));
    }
    Ok(url)
}

/// Keep the inbox subscription alive for the feed's consumer.
///
/// The websocket is reopened after transport drops; the loop ends only when
/// the receiving side of the feed is gone.
async fn subscribe_loop(http: reqwest::Client, addr: Addr, tx: mpsc::Sender<RawMessage>) {
    loop {
        if tx.is_closed() {
            debug!(%addr, "subscription consumer gone");
            return;
        }
        match subscribe_once(&http, &addr, &tx).await {
            Ok(()) => debug!(%addr, "subscription stream ended"),
            Err(e) => warn!(%addr, error = %e, "subscription failed"),
        }
        tokio::time::sleep(RESUBSCRIBE_DELAY).await;
    }
}

async fn subscribe_once(
    http: &reqwest::Client,
    addr: &Addr,
    tx: &mpsc::Sender<RawMessage>,
) -> Result<()> {
    let descriptor = lookup(http, addr).await?;
    let url = websocket_url(&descriptor.endpoint)?;
    let (mut stream, _) = connect_async(url.as_str()).await.map_err(Box::new)?;
    info!(%addr, "salty subscription open");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let message = RawMessage {
                    text: text.to_string(),
                };
                if tx.send(message).await.is_err() {
                    return Ok(());
                }
            },
            Ok(Message::Close(_)) => return Ok(()),
            Ok(_) => {},
            Err(e) => return Err(Box::new(e).into()),
        }
    }
    Ok(())
}

/// Builds one [`SaltyClient`] per authorized session from the key file.
pub struct SaltyConnector {
    key_path: PathBuf,
}

impl SaltyConnector {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }
}

#[async_trait]
impl FederatedConnector for SaltyConnector {
    async fn connect(&self) -> anyhow::Result<Arc<dyn FederatedClient>> {
        let identity = Identity::load(&self.key_path)?;
        info!(addr = %identity.addr(), "loaded salty identity");
        Ok(Arc::new(SaltyClient::new(identity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_record_layout() {
        let addr = Addr::parse("alice@example.com").unwrap();
        assert_eq!(
            wire_record("2024-01-02T03:04:05Z", &addr, "hi there"),
            "2024-01-02T03:04:05Z\t(alice@example.com)\thi there"
        );
    }

    #[test]
    fn wire_record_roundtrips_through_the_formatter() {
        let addr = Addr::parse("alice@example.com").unwrap();
        let record = wire_record("2024-01-02T03:04:05Z", &addr, "hi there");
        assert_eq!(
            saltygram_relay::format_relayed(&record),
            "2024-01-02 03:04:05 <alice@example.com>\nhi there"
        );
    }

    #[test]
    fn websocket_url_from_https() {
        let endpoint = Url::parse("https://example.com/api/v1/inbox").unwrap();
        assert_eq!(
            websocket_url(&endpoint).unwrap().as_str(),
            "wss://example.com/api/v1/inbox"
        );
    }

    #[test]
    fn websocket_url_from_http() {
        let endpoint = Url::parse("http://localhost:8000/inbox").unwrap();
        assert_eq!(
            websocket_url(&endpoint).unwrap().as_str(),
            "ws://localhost:8000/inbox"
        );
    }

    #[test]
    fn descriptor_from_well_known_json() {
        let json = r#"{
            "endpoint": "https://example.com/api/v1/inbox",
            "key": "kex1publickey"
        }"#;
        let descriptor: Descriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor.endpoint.as_str(),
            "https://example.com/api/v1/inbox"
        );
        assert_eq!(descriptor.key, "kex1publickey");
    }
}
