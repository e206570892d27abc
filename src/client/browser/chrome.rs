//! Headless Chrome driver over the DevTools protocol (`chromiumoxide`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ErrorReason, EventResponseReceived, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::Page;
use futures::{FutureExt, StreamExt};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::{classify_net_error, BrowserDriver};
use crate::client::ResponseSnapshot;
use crate::config::{BROWSER_IDLE_TIMEOUT, DEFAULT_USER_AGENT};
use crate::error_handling::{InitializationError, TransportError};

/// Resource types that are never downloaded while probing.
const BLOCKED_RESOURCES: [ResourceType; 6] = [
    ResourceType::Image,
    ResourceType::Media,
    ResourceType::Stylesheet,
    ResourceType::Font,
    ResourceType::Manifest,
    ResourceType::TextTrack,
];

const LAUNCH_ARGS: [&str; 6] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-sandbox",
    "--no-first-run",
    "--disable-extensions",
];

/// How to launch Chrome.
#[derive(Debug, Clone)]
pub struct ChromeSettings {
    /// Chrome/Chromium executable; autodetected when `None`
    pub chrome_path: Option<PathBuf>,
    /// User-Agent sent by the browser
    pub user_agent: Option<String>,
    /// Upper bound on waiting for network idle after load
    pub idle_timeout: Duration,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            user_agent: None,
            idle_timeout: BROWSER_IDLE_TIMEOUT,
        }
    }
}

/// A launched headless Chrome shared by all probes.
pub struct ChromeDriver {
    browser: RwLock<Option<Browser>>,
    handler: std::sync::Mutex<Option<JoinHandle<()>>>,
    idle_timeout: Duration,
}

impl ChromeDriver {
    /// Launches Chrome and spawns its event handler.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::BrowserLaunchError` if Chrome cannot be
    /// found or started.
    pub async fn launch(settings: ChromeSettings) -> Result<Self, InitializationError> {
        let user_agent = settings
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let mut builder = BrowserConfig::builder()
            .args(LAUNCH_ARGS)
            .arg(format!("--user-agent={user_agent}"));
        if let Some(path) = &settings.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(InitializationError::BrowserLaunchError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| InitializationError::BrowserLaunchError(e.to_string()))?;
        let handle = tokio::spawn(async move { while handler.next().await.is_some() {} });
        debug!("Headless browser launched");

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            handler: std::sync::Mutex::new(Some(handle)),
            idle_timeout: settings.idle_timeout,
        })
    }

    async fn open_page(&self) -> Result<Page, TransportError> {
        let guard = self.browser.read().await;
        let browser = guard.as_ref().ok_or(TransportError::Closed)?;
        browser
            .new_page("about:blank")
            .await
            .map_err(|e| classify_net_error(&e.to_string()))
    }

    async fn load(&self, page: &Page, url: &str) -> Result<ResponseSnapshot, TransportError> {
        let cdp = |e: chromiumoxide::error::CdpError| classify_net_error(&e.to_string());

        let patterns: Vec<RequestPattern> = BLOCKED_RESOURCES
            .iter()
            .map(|kind| RequestPattern::builder().resource_type(kind.clone()).build())
            .collect();
        let mut paused = page.event_listener::<EventRequestPaused>().await.map_err(cdp)?;
        page.execute(EnableParams::builder().patterns(patterns).build())
            .await
            .map_err(cdp)?;
        let blocker_page = page.clone();
        let blocker = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let fail =
                    FailRequestParams::new(event.request_id.clone(), ErrorReason::BlockedByClient);
                if blocker_page.execute(fail).await.is_err() {
                    break;
                }
            }
        });

        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(cdp)?;
        let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await.map_err(cdp)?;

        let navigation = page.goto(url).await.map(|_| ()).map_err(cdp);
        if navigation.is_ok() {
            let idle = async {
                while let Some(event) = lifecycle.next().await {
                    if event.name == "networkIdle" {
                        break;
                    }
                }
            };
            if tokio::time::timeout(self.idle_timeout, idle).await.is_err() {
                debug!("{url} did not reach network idle within {:?}", self.idle_timeout);
            }
        }
        blocker.abort();
        navigation?;

        let mut documents: Vec<Arc<EventResponseReceived>> = Vec::new();
        while let Some(Some(event)) = responses.next().now_or_never() {
            if event.r#type == ResourceType::Document {
                documents.push(event);
            }
        }

        let final_url = page
            .url()
            .await
            .map_err(cdp)?
            .unwrap_or_else(|| url.to_string());
        let main = documents
            .iter()
            .rev()
            .find(|event| event.response.url == final_url)
            .or_else(|| documents.last())
            .ok_or_else(|| TransportError::Other {
                name: "BrowserError".to_string(),
                message: format!("no document response for {url}"),
            })?;

        let status = u16::try_from(main.response.status).unwrap_or(0);
        let headers = header_map(main.response.headers.inner());
        let body = page.content().await.map_err(cdp)?.into_bytes();

        Ok(ResponseSnapshot::new(status, headers, body, final_url))
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<ResponseSnapshot, TransportError> {
        let page = self.open_page().await?;
        let result = self.load(&page, url).await;
        if let Err(e) = page.close().await {
            warn!("Failed to close page for {url}: {e}");
        }
        result
    }

    async fn shutdown(&self) {
        if let Some(mut browser) = self.browser.write().await.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            let _ = browser.wait().await;
        }
        let handle = self.handler.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            handle.abort();
        }
        debug!("Headless browser shut down");
    }
}

/// DevTools reports headers as a JSON object of name to value.
fn header_map(raw: &serde_json::Value) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(object) = raw.as_object() {
        for (name, value) in object {
            let (Ok(name), Some(value)) = (HeaderName::from_bytes(name.as_bytes()), value.as_str())
            else {
                continue;
            };
            // Multi-valued headers arrive newline-joined
            for part in value.split('\n') {
                if let Ok(value) = HeaderValue::from_str(part) {
                    headers.append(name.clone(), value);
                }
            }
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_splits_multi_values() {
        let raw = serde_json::json!({
            "Content-Type": "text/html",
            "Set-Cookie": "a=1\nb=2",
            "bad header": "x"
        });
        let headers = header_map(&raw);
        assert_eq!(headers.get("content-type").unwrap(), "text/html");
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
        assert_eq!(headers.len(), 3);
    }

    #[tokio::test]
    #[ignore] // Requires a local Chrome installation
    async fn test_chrome_navigation() {
        let driver = ChromeDriver::launch(ChromeSettings::default())
            .await
            .expect("Chrome should launch");
        let resp = driver.navigate("https://example.com").await.unwrap();
        assert_eq!(resp.status(), 200);
        driver.shutdown().await;
        assert_eq!(
            driver.navigate("https://example.com").await.unwrap_err(),
            TransportError::Closed
        );
    }
}
