//! Single-flight insight requests.
//!
//! At most one provider call is outstanding. A call that arrives while one is
//! in flight is ignored, not queued. Every completion produces an insight:
//! provider failures are logged and replaced by the locale fallback, so
//! callers cannot tell the two apart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::InsightError;
use crate::locale::LocaleTable;
use crate::types::Insight;

use super::provider::{InsightDraft, InsightProvider, InsightRequest};

/// Observable lifecycle of the most recent request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "insight", rename_all = "camelCase")]
pub enum RequestState {
    Idle,
    Loading,
    Resolved(Insight),
    FailedWithFallback(Insight),
}

impl RequestState {
    pub fn insight(&self) -> Option<&Insight> {
        match self {
            RequestState::Resolved(insight) | RequestState::FailedWithFallback(insight) => {
                Some(insight)
            }
            RequestState::Idle | RequestState::Loading => None,
        }
    }
}

pub struct InsightCoordinator {
    provider: Arc<dyn InsightProvider>,
    locale: Arc<LocaleTable>,
    timeout: Option<Duration>,
    in_flight: AtomicBool,
    state: Mutex<RequestState>,
    last_completed_at: Mutex<Option<DateTime<Utc>>>,
}

/// Releases the in-flight flag however the request future ends. A request
/// dropped mid-flight goes back to `Idle` instead of staying `Loading`.
struct InFlightGuard<'a> {
    coordinator: &'a InsightCoordinator,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.coordinator.state.lock();
            if *state == RequestState::Loading {
                *state = RequestState::Idle;
            }
        }
        self.coordinator.in_flight.store(false, Ordering::Release);
    }
}

impl InsightCoordinator {
    pub fn new(
        provider: Arc<dyn InsightProvider>,
        locale: Arc<LocaleTable>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            provider,
            locale,
            timeout,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(RequestState::Idle),
            last_completed_at: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> RequestState {
        self.state.lock().clone()
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_completed_at.lock()
    }

    /// Run one provider call and hand the completed insight to `apply`.
    ///
    /// Returns `None` without calling the provider when a request is already
    /// in flight. `apply` runs exactly once per completed request, before the
    /// in-flight flag is released.
    pub async fn request<F>(&self, request: InsightRequest, apply: F) -> Option<Insight>
    where
        F: FnOnce(&Insight) + Send,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Insight: request ignored, another is in flight");
            return None;
        }
        let _guard = InFlightGuard { coordinator: self };
        *self.state.lock() = RequestState::Loading;

        let language = request.language;
        let next = match self.call_provider(&request).await {
            Ok(draft) => {
                let insight = draft.complete(self.locale.strings(language));
                log::info!(
                    "Insight: {} resolved (score {})",
                    self.provider.name(),
                    insight.alignment_score
                );
                RequestState::Resolved(insight)
            }
            Err(e) => {
                log::warn!(
                    "Insight: {} failed ({}): {}. Using fallback.",
                    self.provider.name(),
                    e.kind(),
                    e
                );
                RequestState::FailedWithFallback(self.locale.fallback_insight(language))
            }
        };

        let insight = next.insight().cloned()?;
        *self.state.lock() = next;
        *self.last_completed_at.lock() = Some(Utc::now());
        apply(&insight);
        Some(insight)
    }

    async fn call_provider(
        &self,
        request: &InsightRequest,
    ) -> Result<InsightDraft, InsightError> {
        let fetch = self.provider.fetch_insight(request);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or(Err(InsightError::Timeout(limit.as_secs()))),
            None => fetch.await,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Language;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Provider double: counts calls, optionally blocks until released.
    pub(crate) struct ScriptedProvider {
        pub calls: AtomicUsize,
        pub gate: Option<Arc<Notify>>,
        pub delay: Option<Duration>,
        pub result: Result<Insight, ()>,
    }

    impl ScriptedProvider {
        pub fn succeeding(score: u8) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                delay: None,
                result: Ok(Insight {
                    title: "Living Gratitude".to_string(),
                    description: "Thought and feeling agree.".to_string(),
                    alignment_score: score,
                }),
            }
        }

        pub fn failing() -> Self {
            Self {
                result: Err(()),
                ..Self::succeeding(0)
            }
        }

        pub fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InsightProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_insight(
            &self,
            _request: &InsightRequest,
        ) -> Result<InsightDraft, InsightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.result {
                Ok(insight) => Ok(insight.clone().into()),
                Err(()) => Err(InsightError::Network("connection refused".to_string())),
            }
        }
    }

    pub(crate) fn request(language: Language) -> InsightRequest {
        InsightRequest {
            intentions: vec!["Love what I do".to_string()],
            emotions: vec!["Grateful".to_string()],
            symbol: "J".to_string(),
            language,
            language_name: String::new(),
        }
    }

    fn coordinator(
        provider: Arc<ScriptedProvider>,
        timeout: Option<Duration>,
    ) -> InsightCoordinator {
        InsightCoordinator::new(provider, Arc::new(LocaleTable::builtin()), timeout)
    }

    #[tokio::test]
    async fn test_success_resolves() {
        let provider = Arc::new(ScriptedProvider::succeeding(80));
        let coord = coordinator(provider.clone(), None);
        assert_eq!(coord.state(), RequestState::Idle);

        let mut applied = Vec::new();
        let insight = coord
            .request(request(Language::En), |i| applied.push(i.clone()))
            .await
            .unwrap();

        assert_eq!(insight.alignment_score, 80);
        assert_eq!(applied, vec![insight.clone()]);
        assert_eq!(coord.state(), RequestState::Resolved(insight));
        assert!(!coord.is_loading());
        assert!(coord.last_completed_at().is_some());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_uses_locale_fallback() {
        let provider = Arc::new(ScriptedProvider::failing());
        let coord = coordinator(provider, None);

        let mut applied = None;
        let insight = coord
            .request(request(Language::Pt), |i| applied = Some(i.clone()))
            .await
            .unwrap();

        assert_eq!(insight.alignment_score, 50);
        assert_eq!(insight.title, "Coerência Inicial");
        assert_eq!(
            insight.description,
            "A sua intenção e emoção estão a começar a ressoar com o campo quântico."
        );
        assert_eq!(applied, Some(insight.clone()));
        assert_eq!(coord.state(), RequestState::FailedWithFallback(insight));
    }

    #[tokio::test]
    async fn test_second_request_while_loading_is_ignored() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(ScriptedProvider::succeeding(90).gated(gate.clone()));
        let coord = Arc::new(coordinator(provider.clone(), None));

        let first = {
            let coord = coord.clone();
            tokio::spawn(async move { coord.request(request(Language::En), |_| {}).await })
        };
        while provider.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(coord.is_loading());
        assert_eq!(coord.state(), RequestState::Loading);

        let mut second_applied = false;
        let second = coord
            .request(request(Language::En), |_| second_applied = true)
            .await;
        assert!(second.is_none());
        assert!(!second_applied);
        assert_eq!(provider.calls(), 1);

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.alignment_score, 90);
        assert_eq!(provider.calls(), 1);
        assert!(!coord.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let provider = Arc::new(ScriptedProvider {
            delay: Some(Duration::from_secs(60)),
            ..ScriptedProvider::succeeding(90)
        });
        let coord = coordinator(provider, Some(Duration::from_secs(5)));

        let insight = coord.request(request(Language::En), |_| {}).await.unwrap();
        assert_eq!(insight.alignment_score, 50);
        assert_eq!(insight.title, "Initial Coherence");
        assert!(matches!(coord.state(), RequestState::FailedWithFallback(_)));
    }

    #[tokio::test]
    async fn test_dropped_request_releases_guard() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(ScriptedProvider::succeeding(70).gated(gate));
        let coord = coordinator(provider.clone(), None);

        {
            let fut = coord.request(request(Language::En), |_| {});
            tokio::pin!(fut);
            assert!(futures_poll_once(fut.as_mut()).await.is_none());
            assert!(coord.is_loading());
        }

        assert!(!coord.is_loading());
        assert_eq!(coord.state(), RequestState::Idle);
    }

    /// Poll a future once; `None` if it is still pending.
    async fn futures_poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
