//! Pool of reusable browser sessions

use crate::browser::{BrowserSession, LaunchConfig};
use crate::{HtmlRenderer, PdfError, PdfOptions, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tracing::{debug, warn};

/// Upper bound on closing a session abandoned mid-print
const ABANDONED_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A live session able to print HTML
#[async_trait]
pub trait PrintSession: Send + Sync + 'static {
    /// Launch profile label
    fn profile(&self) -> &str;

    async fn print_html(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>>;

    async fn close(self) -> Result<()>;
}

/// Starts new sessions for a pool
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: PrintSession;

    async fn launch(&self) -> Result<Self::Session>;
}

#[async_trait]
impl PrintSession for BrowserSession {
    fn profile(&self) -> &str {
        BrowserSession::profile(self)
    }

    async fn print_html(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        BrowserSession::print_html(self, html, options).await
    }

    async fn close(self) -> Result<()> {
        BrowserSession::close(self).await
    }
}

#[async_trait]
impl SessionLauncher for LaunchConfig {
    type Session = BrowserSession;

    async fn launch(&self) -> Result<BrowserSession> {
        BrowserSession::launch(self).await
    }
}

/// Bounded pool of browser sessions
///
/// At most `max_sessions` documents print at once. Sessions are started lazily,
/// reused after a successful print and closed after a failed one. A whole render,
/// session launch included, is bounded by the load timeout.
pub struct BrowserPool<L: SessionLauncher = LaunchConfig> {
    launcher: L,
    idle: Mutex<Vec<L::Session>>,
    permits: Semaphore,
    max_sessions: usize,
}

impl<L: SessionLauncher> BrowserPool<L> {
    /// Create an empty pool; no browser is started until the first render
    pub fn new(launcher: L, max_sessions: usize) -> Self {
        let max_sessions = max_sessions.max(1);
        Self {
            launcher,
            idle: Mutex::new(Vec::new()),
            permits: Semaphore::new(max_sessions),
            max_sessions,
        }
    }

    /// Launcher used for new sessions
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Upper bound on concurrent sessions
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Number of sessions waiting for work
    pub async fn idle_sessions(&self) -> usize {
        self.idle.lock().await.len()
    }

    async fn checkout(&self) -> Result<SessionGuard<'_, L>> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| PdfError::PoolClosed)?;

        let reused = self.idle.lock().await.pop();
        let session = match reused {
            Some(session) => session,
            None => self.launcher.launch().await?,
        };

        Ok(SessionGuard {
            pool: self,
            session: Some(session),
            _permit: permit,
        })
    }

    async fn render_in_session(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let mut guard = self.checkout().await?;
        let printed = match guard.session.as_ref() {
            Some(session) => session.print_html(html, options).await,
            None => Err(PdfError::PoolClosed),
        };

        match printed {
            Ok(bytes) => {
                guard.release().await;
                Ok(bytes)
            }
            Err(e) => {
                guard.discard().await;
                Err(e)
            }
        }
    }

    /// Close every idle session and refuse further renders
    pub async fn shutdown(&self) {
        self.permits.close();
        let sessions: Vec<L::Session> = self.idle.lock().await.drain(..).collect();
        for session in sessions {
            if let Err(e) = session.close().await {
                warn!(error = %e, "failed to close browser session");
            }
        }
    }
}

#[async_trait]
impl<L: SessionLauncher> HtmlRenderer for BrowserPool<L> {
    async fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let timeout = options.load_timeout();
        tokio::time::timeout(timeout, self.render_in_session(html, options))
            .await
            .map_err(|_| PdfError::Timeout(timeout))?
    }
}

/// A checked-out session
///
/// Dropping the guard without `release` or `discard` (for instance when the
/// render times out or the request future is cancelled) closes the session in
/// the background.
struct SessionGuard<'a, L: SessionLauncher> {
    pool: &'a BrowserPool<L>,
    session: Option<L::Session>,
    _permit: SemaphorePermit<'a>,
}

impl<L: SessionLauncher> SessionGuard<'_, L> {
    /// Return the session to the pool
    async fn release(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.idle.lock().await.push(session);
        }
    }

    /// Close the session instead of reusing it
    async fn discard(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(profile = session.profile(), "discarding browser session after failure");
            if let Err(e) = session.close().await {
                warn!(error = %e, "failed to close browser session");
            }
        }
    }
}

impl<L: SessionLauncher> Drop for SessionGuard<'_, L> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match tokio::time::timeout(ABANDONED_CLOSE_TIMEOUT, session.close()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!(error = %e, "failed to close abandoned browser session"),
                        Err(_) => warn!("closing abandoned browser session timed out"),
                    }
                });
            }
            Err(_) => warn!("no runtime to close abandoned browser session"),
        }
    }
}
