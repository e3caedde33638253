//! Latest-result slot with theme notifications.
//!
//! A session owns the one piece of shared state a presentation layer needs:
//! the most recent query outcome. Starting a new query cancels the one in
//! flight, so only the newest query ever writes the slot.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::classify::Theme;
use crate::client::WeatherQueryClient;
use crate::error::QueryError;
use crate::types::{WeatherQuery, WeatherResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Loaded(WeatherResult),
    /// User-facing message of the last failure
    Failed(String),
}

pub struct WeatherSession {
    client: Arc<WeatherQueryClient>,
    state: RwLock<SessionState>,
    theme_tx: watch::Sender<Theme>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl WeatherSession {
    pub fn new(client: Arc<WeatherQueryClient>) -> Self {
        let (theme_tx, _) = watch::channel(Theme::Default);
        Self {
            client,
            state: RwLock::new(SessionState::Idle),
            theme_tx,
            in_flight: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.read(), SessionState::Loading)
    }

    /// The latest successful result, if the last query succeeded
    pub fn latest(&self) -> Option<WeatherResult> {
        match &*self.state.read() {
            SessionState::Loaded(result) => Some(result.clone()),
            _ => None,
        }
    }

    pub fn theme(&self) -> Theme {
        *self.theme_tx.borrow()
    }

    /// Receiver that always holds the current theme
    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme_tx.subscribe()
    }

    /// Cancel the query in flight, if any, and return the slot to `Idle`.
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock();
        if let Some(token) = in_flight.take() {
            token.cancel();
            *self.state.write() = SessionState::Idle;
            tracing::info!("Weather query cancelled");
        }
    }

    /// Run a query and publish its outcome.
    ///
    /// Blank input is rejected without touching the current state or the
    /// query in flight.
    ///
    /// # Errors
    /// Whatever the client returns, or `Cancelled` when a newer query
    /// replaced this one. A cancelled query never writes the slot.
    pub async fn query(&self, city: &str) -> Result<WeatherResult, QueryError> {
        let query = WeatherQuery::new(city)?;
        let token = CancellationToken::new();

        {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.replace(token.clone()) {
                previous.cancel();
                tracing::debug!("Replacing in-flight weather query");
            }
            *self.state.write() = SessionState::Loading;
        }

        let mut pending = PendingQuery {
            session: self,
            token: token.clone(),
            finished: false,
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => return Err(QueryError::Cancelled),
            outcome = self.client.fetch(&query) => outcome,
        };

        let mut in_flight = self.in_flight.lock();
        if token.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        *in_flight = None;
        pending.finished = true;

        let (state, theme) = match &outcome {
            Ok(result) => (SessionState::Loaded(result.clone()), result.theme()),
            Err(e) => {
                tracing::warn!("Weather query for {} failed: {}", query.city(), e);
                (SessionState::Failed(e.user_message().to_string()), Theme::Default)
            }
        };
        *self.state.write() = state;
        self.theme_tx.send_replace(theme);

        outcome
    }
}

/// Resets the slot when a `query` future is dropped before it finishes.
struct PendingQuery<'a> {
    session: &'a WeatherSession,
    token: CancellationToken,
    finished: bool,
}

impl Drop for PendingQuery<'_> {
    fn drop(&mut self) {
        // A cancelled token means a newer query or `cancel()` owns the slot
        if self.finished || self.token.is_cancelled() {
            return;
        }

        let mut in_flight = self.session.in_flight.lock();
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        *in_flight = None;
        *self.session.state.write() = SessionState::Idle;
        tracing::debug!("Weather query dropped before completion");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientSettings;
    use crate::retry::RetryConfig;

    #[tokio::test]
    async fn test_blank_query_leaves_state_alone() {
        let client = WeatherQueryClient::new(ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            retry: RetryConfig::new(1, 1, 1),
            ..ClientSettings::default()
        })
        .unwrap();
        let session = WeatherSession::new(Arc::new(client));

        let err = session.query("   ").await.unwrap_err();
        assert!(matches!(err, QueryError::EmptyInput));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.theme(), Theme::Default);
    }
}
