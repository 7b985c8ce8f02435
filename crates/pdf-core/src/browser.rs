//! WebDriver-controlled browser sessions

use crate::{document, PageMargins, PdfError, PdfOptions, Result};
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::wd::{PrintConfiguration, PrintConfigurationBuilder, PrintMargins, PrintSize, WindowHandle};
use fantoccini::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

/// Replaces the current tab's document with the first script argument
const LOAD_SCRIPT: &str = "document.open(); document.write(arguments[0]); document.close();";

/// True once the document and every image in it have finished loading
const SETTLED_SCRIPT: &str = "return document.readyState === 'complete' \
    && Array.from(document.images).every(function (img) { return img.complete; });";

/// Delay between two settle checks
const SETTLE_POLL: Duration = Duration::from_millis(50);

impl From<CmdError> for PdfError {
    fn from(err: CmdError) -> Self {
        PdfError::CommandError(err.to_string())
    }
}

impl From<NewSessionError> for PdfError {
    fn from(err: NewSessionError) -> Self {
        PdfError::LaunchError(err.to_string())
    }
}

/// How to start a browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Label used in logs and health reports
    pub name: String,
    /// WebDriver endpoint, e.g. `http://localhost:9515` for chromedriver
    pub webdriver_url: String,
    /// Chromium command-line switches
    #[serde(default)]
    pub args: Vec<String>,
    /// Browser executable, when not the driver's default
    #[serde(default)]
    pub binary: Option<String>,
}

impl LaunchConfig {
    /// Modern headless Chromium
    pub fn headless(webdriver_url: &str) -> Self {
        Self {
            name: "headless".to_string(),
            webdriver_url: webdriver_url.to_string(),
            args: vec![
                "--headless=new".to_string(),
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
            binary: None,
        }
    }

    /// Launch profiles to try in order when probing an unknown host
    pub fn fallbacks(webdriver_url: &str) -> Vec<Self> {
        let legacy = Self {
            name: "headless-legacy".to_string(),
            args: vec![
                "--headless".to_string(),
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
            ],
            ..Self::headless(webdriver_url)
        };
        let single_process = Self {
            name: "single-process".to_string(),
            args: vec![
                "--headless".to_string(),
                "--no-sandbox".to_string(),
                "--single-process".to_string(),
                "--no-zygote".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
            ..Self::headless(webdriver_url)
        };
        vec![Self::headless(webdriver_url), legacy, single_process]
    }

    /// WebDriver capabilities for this profile
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut chrome = Map::new();
        chrome.insert("args".to_string(), json!(self.args));
        if let Some(binary) = &self.binary {
            chrome.insert("binary".to_string(), json!(binary));
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), Value::Object(chrome));
        caps
    }
}

/// One browser session
///
/// Each document is printed in its own new tab, closed afterwards, so loaded
/// HTML and cookies never carry over from one document to the next.
pub struct BrowserSession {
    client: Client,
    home: WindowHandle,
    profile: String,
}

impl BrowserSession {
    /// Start a new session
    pub async fn launch(config: &LaunchConfig) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(config.capabilities())
            .connect(&config.webdriver_url)
            .await?;
        let home = client.window().await?;
        debug!(profile = %config.name, url = %config.webdriver_url, "browser session started");

        Ok(Self {
            client,
            home,
            profile: config.name.clone(),
        })
    }

    /// Launch profile this session was started with
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Print an HTML document to PDF in a fresh tab
    pub async fn print_html(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let tab = self.client.new_window(true).await?;
        self.client.switch_to_window(tab.handle).await?;

        let printed = self.print_current_tab(html, options).await;
        let cleanup = self.close_tab().await;

        let bytes = printed?;
        cleanup?;
        Ok(bytes)
    }

    async fn print_current_tab(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let timeout = options.load_timeout();
        self.client.execute(LOAD_SCRIPT, vec![json!(html)]).await?;

        tokio::time::timeout(timeout, self.wait_until_settled())
            .await
            .map_err(|_| PdfError::Timeout(timeout))??;

        let bytes = tokio::time::timeout(timeout, self.client.print(print_configuration(options)?))
            .await
            .map_err(|_| PdfError::Timeout(timeout))??;

        document::inspect_pdf(&bytes)?;
        Ok(bytes)
    }

    async fn wait_until_settled(&self) -> Result<()> {
        loop {
            let settled = self.client.execute(SETTLED_SCRIPT, Vec::new()).await?;
            if settled.as_bool() == Some(true) {
                return Ok(());
            }
            tokio::time::sleep(SETTLE_POLL).await;
        }
    }

    async fn close_tab(&self) -> Result<()> {
        self.client.close_window().await?;
        self.client.switch_to_window(self.home.clone()).await?;
        self.client.delete_all_cookies().await?;
        Ok(())
    }

    /// End the session and let the driver stop the browser process
    pub async fn close(self) -> Result<()> {
        debug!(profile = %self.profile, "closing browser session");
        self.client.close().await?;
        Ok(())
    }
}

/// A4 print settings; WebDriver measures in centimetres
fn print_configuration(options: &PdfOptions) -> Result<PrintConfiguration> {
    let PageMargins {
        top,
        right,
        bottom,
        left,
    } = options.margins.clamped();

    PrintConfigurationBuilder::default()
        .size(PrintSize::A4)
        .margins(PrintMargins {
            top: top / 10.0,
            bottom: bottom / 10.0,
            left: left / 10.0,
            right: right / 10.0,
        })
        .background(options.background)
        .build()
        .map_err(|e| PdfError::PrintConfigError(e.to_string()))
}
