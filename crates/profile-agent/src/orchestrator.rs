//! Search flow state machine
//!
//! [`transition`] is a pure function from `(state, event)` to the next
//! state. [`Orchestrator`] drives it: it consults the cache, calls the
//! gateway, stamps and persists results, and feeds the resulting events
//! through `transition`.

use crate::error::{Operation, ProfileError, Result};
use crate::gateway::ProfileGateway;
use crate::model::{AgentResult, Store, store_key};
use crate::store::ProfileStore;
use chrono::{SecondsFormat, Utc};
use tracing::{info, instrument, warn};

/// Message shown for a blank query
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a company name.";

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Saved results and the search box
    #[default]
    Dashboard,
    /// A fetch is in flight
    Searching,
    /// One result
    Profile,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub view: View,
    pub current: Option<AgentResult>,
    pub query: String,
    pub error: Option<String>,
    pub loading: bool,
    pub steps: Vec<String>,
}

/// Something that happened during the search flow
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Rejected(String),
    CacheHit { query: String, result: AgentResult },
    FetchStarted { query: String },
    StepsRevealed { steps: Vec<String> },
    FetchSucceeded { result: AgentResult },
    FetchFailed { message: String },
    Selected { result: AgentResult },
    Back,
}

/// Apply one event
pub fn transition(state: ViewState, event: Event) -> ViewState {
    match event {
        Event::Rejected(message) => ViewState {
            error: Some(message),
            ..state
        },
        Event::CacheHit { query, result } => ViewState {
            view: View::Profile,
            current: Some(result),
            query,
            error: None,
            loading: false,
            steps: Vec::new(),
        },
        Event::FetchStarted { query } => ViewState {
            view: View::Searching,
            current: None,
            query,
            error: None,
            loading: true,
            steps: Vec::new(),
        },
        Event::StepsRevealed { steps } => ViewState {
            view: View::Searching,
            loading: false,
            steps,
            ..state
        },
        Event::FetchSucceeded { result } => ViewState {
            view: View::Profile,
            current: Some(result),
            error: None,
            loading: false,
            steps: Vec::new(),
            ..state
        },
        Event::FetchFailed { message } => ViewState {
            view: View::Dashboard,
            error: Some(message),
            loading: false,
            steps: Vec::new(),
            ..state
        },
        Event::Selected { result } => ViewState {
            view: View::Profile,
            query: result.company_data.company_name.clone(),
            current: Some(result),
            error: None,
            loading: false,
            steps: Vec::new(),
        },
        Event::Back => ViewState {
            view: View::Dashboard,
            current: None,
            error: None,
            loading: false,
            steps: Vec::new(),
            ..state
        },
    }
}

/// Current UTC time as RFC 3339 with milliseconds and a `Z` suffix
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drives searches against a gateway and a store
///
/// Operations take `&mut self`, so at most one search is in flight per
/// orchestrator.
pub struct Orchestrator<G, S> {
    gateway: G,
    store: S,
    cache: Store,
    state: ViewState,
}

impl<G: ProfileGateway, S: ProfileStore> Orchestrator<G, S> {
    /// Create an orchestrator, loading the cache from the store
    pub fn new(gateway: G, store: S) -> Self {
        let cache = store.get_all();
        info!(entries = cache.len(), "Loaded saved results");
        Self {
            gateway,
            store,
            cache,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn apply(&mut self, event: Event) {
        self.state = transition(std::mem::take(&mut self.state), event);
    }

    /// Look up or research a company
    ///
    /// Cached results are returned without calling the gateway unless
    /// `force_refresh` is set. Fresh results are stamped with the current
    /// time and saved before they are returned.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str, force_refresh: bool) -> Result<AgentResult> {
        let query = query.trim();
        if query.is_empty() {
            self.apply(Event::Rejected(EMPTY_QUERY_MESSAGE.to_string()));
            return Err(ProfileError::InvalidQuery(EMPTY_QUERY_MESSAGE.to_string()));
        }

        let key = store_key(query);
        let cached = if force_refresh {
            None
        } else {
            self.cache.get(&key).cloned()
        };
        if let Some(result) = cached {
            info!(key = %key, "Cache hit");
            self.apply(Event::CacheHit {
                query: query.to_string(),
                result: result.clone(),
            });
            return Ok(result);
        }

        self.apply(Event::FetchStarted {
            query: query.to_string(),
        });

        match self.gateway.fetch_profile(query).await {
            Ok(mut result) => {
                self.apply(Event::StepsRevealed {
                    steps: result.agent_steps.clone(),
                });

                result.company_data.last_updated = timestamp_now();
                self.store.save(&key, &result);
                self.cache.insert(key, result.clone());

                info!(
                    company = %result.company_data.company_name,
                    sources = result.sources.len(),
                    "Profile fetched"
                );
                self.apply(Event::FetchSucceeded {
                    result: result.clone(),
                });
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "Profile fetch failed");
                self.apply(Event::FetchFailed {
                    message: err.user_message(Operation::FetchProfile),
                });
                Err(err)
            }
        }
    }

    /// Re-run the last query, bypassing the cache
    ///
    /// Returns `Ok(None)` when there is no last query.
    pub async fn refresh(&mut self) -> Result<Option<AgentResult>> {
        if self.state.query.trim().is_empty() {
            return Ok(None);
        }
        let query = self.state.query.clone();
        self.search(&query, true).await.map(Some)
    }

    /// Open a saved result
    pub fn select_record(&mut self, result: AgentResult) {
        self.apply(Event::Selected { result });
    }

    /// Return to the dashboard
    pub fn back(&mut self) {
        self.apply(Event::Back);
    }

    /// Whether a saved result exists for `query`
    pub fn is_cached(&self, query: &str) -> bool {
        self.cache.contains_key(&store_key(query))
    }

    /// Saved results sorted by company name
    pub fn records(&self) -> Vec<&AgentResult> {
        let mut records: Vec<&AgentResult> = self.cache.values().collect();
        records.sort_by(|a, b| {
            a.company_data
                .company_name
                .to_lowercase()
                .cmp(&b.company_data.company_name.to_lowercase())
        });
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Citation, CompanyRecord, Scalar};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    mock! {
        Gateway {}

        #[async_trait]
        impl ProfileGateway for Gateway {
            async fn fetch_profile(&self, query: &str) -> Result<AgentResult>;
        }
    }

    fn tesla(revenue: &str) -> AgentResult {
        let mut company_data = CompanyRecord::unknown("Tesla");
        company_data.revenue = Scalar::from(revenue);
        AgentResult {
            company_data,
            agent_steps: vec!["Step 1: searched".to_string()],
            sources: vec![Citation::new("https://ir.tesla.com", "Tesla IR")],
        }
    }

    #[test]
    fn test_transition_fetch_cycle() {
        let state = transition(
            ViewState::default(),
            Event::FetchStarted {
                query: "Tesla".to_string(),
            },
        );
        assert_eq!(state.view, View::Searching);
        assert!(state.loading);

        let state = transition(
            state,
            Event::StepsRevealed {
                steps: vec!["Step 1".to_string()],
            },
        );
        assert_eq!(state.view, View::Searching);
        assert!(!state.loading);
        assert_eq!(state.steps.len(), 1);

        let state = transition(state, Event::FetchSucceeded { result: tesla("96B") });
        assert_eq!(state.view, View::Profile);
        assert_eq!(state.query, "Tesla");
        assert!(state.steps.is_empty());
        assert!(state.current.is_some());

        let state = transition(state, Event::Back);
        assert_eq!(state.view, View::Dashboard);
        assert!(state.current.is_none());
    }

    #[test]
    fn test_transition_failure_and_rejection() {
        let state = transition(
            ViewState::default(),
            Event::Rejected(EMPTY_QUERY_MESSAGE.to_string()),
        );
        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.error.as_deref(), Some(EMPTY_QUERY_MESSAGE));

        let state = transition(
            state,
            Event::FetchStarted {
                query: "Tesla".to_string(),
            },
        );
        assert!(state.error.is_none());

        let state = transition(
            state,
            Event::FetchFailed {
                message: "boom".to_string(),
            },
        );
        assert_eq!(state.view, View::Dashboard);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_transition_selected_sets_query() {
        let state = transition(ViewState::default(), Event::Selected { result: tesla("96B") });
        assert_eq!(state.view, View::Profile);
        assert_eq!(state.query, "Tesla");
    }

    #[tokio::test]
    async fn test_search_stamps_and_saves() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_profile()
            .with(eq("Tesla"))
            .times(1)
            .returning(|_| Ok(tesla("96B")));

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::new());
        let result = assert_ok!(orchestrator.search("  Tesla ", false).await);

        assert!(result.company_data.last_updated.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&result.company_data.last_updated).is_ok());
        assert_eq!(orchestrator.state().view, View::Profile);
        assert_eq!(orchestrator.store.get_all()["tesla"], result);
        assert_eq!(orchestrator.records().len(), 1);
    }

    #[tokio::test]
    async fn test_cached_query_skips_gateway() {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(|_| Ok(tesla("96B")));

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::new());
        assert_ok!(orchestrator.search("Tesla", false).await);
        let cached = assert_ok!(orchestrator.search("TESLA", false).await);

        assert_eq!(cached.company_data.revenue, Scalar::from("96B"));
        assert_eq!(orchestrator.state().view, View::Profile);
        assert!(orchestrator.is_cached(" tesla "));
    }

    #[tokio::test]
    async fn test_force_refresh_always_calls_gateway() {
        let mut store = Store::new();
        store.insert("tesla".to_string(), tesla("81B"));

        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(2).returning(|_| Ok(tesla("96B")));

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::with_entries(store));
        let refreshed = assert_ok!(orchestrator.search("Tesla", true).await);
        assert_eq!(refreshed.company_data.revenue, Scalar::from("96B"));

        let again = assert_ok!(orchestrator.refresh().await);
        assert!(again.is_some());
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().never();

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::new());
        let err = assert_err!(orchestrator.search("   ", false).await);

        assert!(matches!(err, ProfileError::InvalidQuery(_)));
        assert_eq!(orchestrator.state().error.as_deref(), Some(EMPTY_QUERY_MESSAGE));
        assert_eq!(orchestrator.state().view, View::Dashboard);
    }

    #[tokio::test]
    async fn test_failed_fetch_returns_to_dashboard() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_profile()
            .returning(|_| Err(ProfileError::UnverifiedData));

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::new());
        assert_err!(orchestrator.search("Tesla", false).await);

        let state = orchestrator.state();
        assert_eq!(state.view, View::Dashboard);
        assert!(
            state
                .error
                .as_deref()
                .unwrap()
                .starts_with("Failed to fetch company data: The AI agent provided data")
        );
        assert!(orchestrator.records().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_without_query_is_noop() {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().never();

        let mut orchestrator = Orchestrator::new(gateway, MemoryStore::new());
        assert_eq!(assert_ok!(orchestrator.refresh().await), None);
    }

    #[test]
    fn test_records_sorted_by_name() {
        let mut store = Store::new();
        for name in ["tesla", "apple", "Microsoft"] {
            store.insert(
                name.to_lowercase(),
                AgentResult {
                    company_data: CompanyRecord::unknown(name),
                    ..AgentResult::default()
                },
            );
        }

        let orchestrator = Orchestrator::new(MockGateway::new(), MemoryStore::with_entries(store));
        let names: Vec<&str> = orchestrator
            .records()
            .iter()
            .map(|r| r.company_data.company_name.as_str())
            .collect();
        assert_eq!(names, vec!["apple", "Microsoft", "tesla"]);
    }
}
