// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into the Pipeline for tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use trends_client::{InterestSeries, TimelinePoint, TrendsError, TrendsQuery};

use super::{BaseMetadataService, BaseTrendsService};
use crate::domains::movies::models::RawMetadata;

// =============================================================================
// Mock Metadata Service
// =============================================================================

pub struct MockMetadataService {
    responses: Arc<Mutex<HashMap<String, RawMetadata>>>,
    fetch_calls: Arc<Mutex<Vec<String>>>,
}

impl MockMetadataService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            fetch_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return `raw` when `title` is fetched; unknown titles get empty metadata.
    pub fn with_title(self, title: &str, raw: RawMetadata) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(title.to_string(), raw);
        self
    }

    /// Get all titles that were fetched
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn was_fetched(&self, title: &str) -> bool {
        self.fetch_calls.lock().unwrap().iter().any(|t| t == title)
    }
}

impl Default for MockMetadataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMetadataService for MockMetadataService {
    async fn fetch(&self, title: &str) -> RawMetadata {
        self.fetch_calls.lock().unwrap().push(title.to_string());

        self.responses
            .lock()
            .unwrap()
            .get(title)
            .cloned()
            .unwrap_or_default()
    }
}

// =============================================================================
// Mock Trends Service
// =============================================================================

enum MockTrendsResponse {
    /// One-point series: (first keyword value, second keyword value)
    Means(u32, u32),
    Error(TrendsError),
}

type ErrorFactory = Box<dyn Fn() -> TrendsError + Send + Sync>;

pub struct MockTrendsService {
    by_term: Arc<Mutex<HashMap<String, (u32, u32)>>>,
    queued: Arc<Mutex<VecDeque<MockTrendsResponse>>>,
    fallback_error: Option<ErrorFactory>,
    calls: Arc<Mutex<Vec<TrendsQuery>>>,
}

impl MockTrendsService {
    pub fn new() -> Self {
        Self {
            by_term: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response whose series averages to `term` and `anchor`.
    pub fn with_means(self, term: u32, anchor: u32) -> Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(MockTrendsResponse::Means(term, anchor));
        self
    }

    /// Queue a failed response.
    pub fn with_error(self, error: TrendsError) -> Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(MockTrendsResponse::Error(error));
        self
    }

    /// Always answer for `term` (first keyword) with these means.
    pub fn with_term_means(self, term: &str, term_mean: u32, anchor_mean: u32) -> Self {
        self.by_term
            .lock()
            .unwrap()
            .insert(term.to_string(), (term_mean, anchor_mean));
        self
    }

    /// Once the queue is drained, fail every call with a fresh error.
    pub fn failing_with(
        mut self,
        factory: impl Fn() -> TrendsError + Send + Sync + 'static,
    ) -> Self {
        self.fallback_error = Some(Box::new(factory));
        self
    }

    /// Get all queries that were sent
    pub fn calls(&self) -> Vec<TrendsQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn series(query: &TrendsQuery, term: u32, anchor: u32) -> trends_client::Result<InterestSeries> {
        InterestSeries::new(
            query.keywords.clone(),
            vec![TimelinePoint {
                time: "0".to_string(),
                formatted_time: String::new(),
                value: vec![term, anchor],
            }],
        )
    }
}

impl Default for MockTrendsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTrendsService for MockTrendsService {
    async fn interest_over_time(
        &self,
        query: &TrendsQuery,
    ) -> trends_client::Result<InterestSeries> {
        self.calls.lock().unwrap().push(query.clone());

        let first = query.keywords.first().cloned().unwrap_or_default();
        if let Some((term, anchor)) = self.by_term.lock().unwrap().get(&first).copied() {
            return Self::series(query, term, anchor);
        }

        let next = self.queued.lock().unwrap().pop_front();
        match next {
            Some(MockTrendsResponse::Means(term, anchor)) => Self::series(query, term, anchor),
            Some(MockTrendsResponse::Error(e)) => Err(e),
            None => match &self.fallback_error {
                Some(factory) => Err(factory()),
                None => InterestSeries::new(query.keywords.clone(), Vec::new()),
            },
        }
    }
}
