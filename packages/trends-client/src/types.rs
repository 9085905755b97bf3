use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrendsError};

/// Category code for "all categories".
pub const ALL_CATEGORIES: u32 = 0;

/// A comparison query: up to five keywords over one timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsQuery {
    pub keywords: Vec<String>,
    /// `"YYYY-MM-DD YYYY-MM-DD"`, both ends inclusive.
    pub timeframe: String,
    pub category: u32,
    /// Empty means worldwide.
    pub geo: String,
    /// Empty means web search.
    pub property: String,
}

impl TrendsQuery {
    pub fn new<S: Into<String>>(keywords: impl IntoIterator<Item = S>, timeframe: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            timeframe: timeframe.into(),
            category: ALL_CATEGORIES,
            geo: String::new(),
            property: String::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() || self.keywords.len() > 5 {
            return Err(TrendsError::InvalidQuery(format!(
                "expected 1-5 keywords, got {}",
                self.keywords.len()
            )));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(TrendsError::InvalidQuery("blank keyword".into()));
        }
        if self.timeframe.trim().is_empty() {
            return Err(TrendsError::InvalidQuery("blank timeframe".into()));
        }
        Ok(())
    }

    pub(crate) fn explore_request(&self) -> ExploreRequest {
        ExploreRequest {
            comparison_item: self
                .keywords
                .iter()
                .map(|keyword| ComparisonItem {
                    keyword: keyword.clone(),
                    geo: self.geo.clone(),
                    time: self.timeframe.clone(),
                })
                .collect(),
            category: self.category,
            property: self.property.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExploreRequest {
    #[serde(rename = "comparisonItem")]
    pub comparison_item: Vec<ComparisonItem>,
    pub category: u32,
    pub property: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ComparisonItem {
    pub keyword: String,
    pub geo: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// One explore widget; only the time-series one is used.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Widget {
    pub id: String,
    pub token: Option<String>,
    pub request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MultilineResponse {
    pub default: MultilineData,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MultilineData {
    #[serde(rename = "timelineData", default)]
    pub timeline_data: Vec<TimelinePoint>,
}

/// One sample of relative interest, one value per keyword (0-100).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelinePoint {
    pub time: String,
    #[serde(rename = "formattedTime", default)]
    pub formatted_time: String,
    pub value: Vec<u32>,
}

/// Interest over time for every keyword of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestSeries {
    keywords: Vec<String>,
    points: Vec<TimelinePoint>,
}

impl InterestSeries {
    /// Checks that every point carries a value for every keyword.
    pub fn new(keywords: Vec<String>, points: Vec<TimelinePoint>) -> Result<Self> {
        if let Some(point) = points.iter().find(|p| p.value.len() < keywords.len()) {
            return Err(TrendsError::Malformed(format!(
                "point {} has {} values for {} keywords",
                point.time,
                point.value.len(),
                keywords.len()
            )));
        }
        Ok(Self { keywords, points })
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean interest for `keyword` across the series.
    ///
    /// `None` if the keyword was not part of the query, `Some(0.0)` for an
    /// empty series.
    pub fn mean(&self, keyword: &str) -> Option<f64> {
        let index = self.keywords.iter().position(|k| k == keyword)?;
        if self.points.is_empty() {
            return Some(0.0);
        }
        let total: f64 = self.points.iter().map(|p| f64::from(p.value[index])).sum();
        Some(total / self.points.len() as f64)
    }
}
