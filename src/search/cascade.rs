//! Filter cascade and engine entry points
//!
//! Turns a free-text query (or a structured menu selection) into a ranked
//! result set. Five strategies are tried in strict priority order, and a
//! stage falls through to the next only when it produced an empty result
//! set — an entity match with zero records still falls through.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::embedding::{EmbeddingError, EmbeddingProvider};
use super::index::EmbeddingIndex;
use super::ranker::rank;
use crate::core::catalog::{load_catalog, Catalog, CatalogError, CatalogSource};
use crate::core::record::Record;
use crate::nlp::entities::{extract, ExtractedEntities};
use crate::session::{FilterMode, ResolveError, SessionStore};

#[derive(Debug, Error)]
pub enum SearchError {
    /// The embedding provider failed; user-visible as "search temporarily
    /// unavailable", distinct from "no results found".
    #[error("ranking unavailable: {0}")]
    RankingUnavailable(#[from] EmbeddingError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A completed search: which strategy produced the list, and the list.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub mode: FilterMode,
    pub results: Vec<Record>,
}

/// The query-interpretation and cascading filter-and-rank engine.
///
/// Reloads the catalog per interaction; owns the embedding cache and the
/// per-session navigation contexts.
pub struct SearchEngine {
    source: Arc<dyn CatalogSource>,
    provider: Arc<dyn EmbeddingProvider>,
    index: EmbeddingIndex,
    sessions: SessionStore,
}

impl SearchEngine {
    pub fn new(source: Arc<dyn CatalogSource>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            source,
            provider,
            index: EmbeddingIndex::new(),
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run the cascade for a free-text query and record the result set
    /// into the session's navigation context.
    pub async fn search(
        &self,
        query: &str,
        session_id: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let catalog = load_catalog(&*self.source)?;
        let entities = extract(query, &catalog.country_lookup(), &catalog.city_lookup());
        debug!(
            country = ?entities.country,
            city = ?entities.city,
            month = ?entities.month,
            range = ?entities.range,
            keywords = entities.keywords.len(),
            "entities extracted"
        );

        // Stage 1: date range + location.
        if let Some((start, end)) = entities.range {
            if entities.has_location() {
                let filtered: Vec<Record> = self
                    .location_filter(&catalog, &entities)
                    .into_iter()
                    .filter(|r| {
                        r.start_date
                            .map(|d| start <= d && d <= end)
                            .unwrap_or(false)
                    })
                    .collect();
                if !filtered.is_empty() {
                    debug!(stage = 1, results = filtered.len(), "stage matched");
                    return self
                        .finish_stage(
                            session_id,
                            filtered,
                            &entities,
                            FilterMode::CountryDateRange,
                            FilterMode::DateRangeSemantic,
                        )
                        .await;
                }
            }
        }

        // Stage 2: date range over the whole catalog.
        if let Some((start, end)) = entities.range {
            let filtered = catalog.filter_range(start, end);
            if !filtered.is_empty() {
                debug!(stage = 2, results = filtered.len(), "stage matched");
                return self
                    .finish_stage(
                        session_id,
                        filtered,
                        &entities,
                        FilterMode::DateRange,
                        FilterMode::DateRangeSemantic,
                    )
                    .await;
            }
        }

        // Stage 3: location + month.
        if entities.has_location() {
            if let Some(month) = entities.month {
                let filtered: Vec<Record> = self
                    .location_filter(&catalog, &entities)
                    .into_iter()
                    .filter(|r| {
                        r.start_date
                            .map(|d| chrono::Datelike::month(&d) == month)
                            .unwrap_or(false)
                    })
                    .collect();
                if !filtered.is_empty() {
                    debug!(stage = 3, results = filtered.len(), "stage matched");
                    return self
                        .finish_stage(
                            session_id,
                            filtered,
                            &entities,
                            FilterMode::CountryMonth,
                            FilterMode::MonthSemantic,
                        )
                        .await;
                }
            }
        }

        // Stage 4: single facet — location first, month otherwise.
        if entities.has_location() {
            let filtered = self.location_filter(&catalog, &entities);
            if !filtered.is_empty() {
                let (plain, semantic) = if entities.country.is_some() {
                    (FilterMode::Country, FilterMode::CountrySemantic)
                } else {
                    (FilterMode::City, FilterMode::CitySemantic)
                };
                debug!(stage = 4, results = filtered.len(), "stage matched");
                return self
                    .finish_stage(session_id, filtered, &entities, plain, semantic)
                    .await;
            }
        }
        if let Some(month) = entities.month {
            let filtered = catalog.filter_month(month);
            if !filtered.is_empty() {
                debug!(stage = 4, results = filtered.len(), "stage matched");
                return self
                    .finish_stage(
                        session_id,
                        filtered,
                        &entities,
                        FilterMode::Month,
                        FilterMode::MonthSemantic,
                    )
                    .await;
            }
        }

        // Stage 5: unconditional semantic fallback over the whole catalog,
        // ranked against the raw query text.
        if catalog.is_empty() {
            // Explicitly empty, distinguished from a provider failure.
            return Ok(SearchOutcome {
                mode: FilterMode::Semantic,
                results: Vec::new(),
            });
        }
        let vectors = self.index.vectors(&*self.provider, catalog.records()).await?;
        let query_vec = self.provider.embed(query).await?;
        let ranked = rank(&query_vec, &vectors);
        let results: Vec<Record> = ranked
            .into_iter()
            .map(|i| catalog.records()[i].clone())
            .collect();
        info!(results = results.len(), "semantic fallback");

        if !results.is_empty() {
            self.sessions
                .store(session_id, FilterMode::Semantic, results.clone());
        }
        Ok(SearchOutcome {
            mode: FilterMode::Semantic,
            results,
        })
    }

    /// Menu path: all records for one country.
    pub async fn browse_country(
        &self,
        session_id: &str,
        country: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let catalog = load_catalog(&*self.source)?;
        let results = catalog.filter_country(country);
        self.sessions
            .store(session_id, FilterMode::Country, results.clone());
        Ok(SearchOutcome {
            mode: FilterMode::Country,
            results,
        })
    }

    /// Menu path: all records for one city.
    pub async fn browse_city(
        &self,
        session_id: &str,
        city: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let catalog = load_catalog(&*self.source)?;
        let results = catalog.filter_city(city);
        self.sessions
            .store(session_id, FilterMode::City, results.clone());
        Ok(SearchOutcome {
            mode: FilterMode::City,
            results,
        })
    }

    /// Menu path: records starting in a month, optionally pinned to a year.
    pub async fn browse_month(
        &self,
        session_id: &str,
        month: u32,
        year: Option<i32>,
    ) -> Result<SearchOutcome, SearchError> {
        let catalog = load_catalog(&*self.source)?;
        let results = match year {
            Some(y) => catalog.filter_month_year(month, y),
            None => catalog.filter_month(month),
        };
        self.sessions
            .store(session_id, FilterMode::Month, results.clone());
        Ok(SearchOutcome {
            mode: FilterMode::Month,
            results,
        })
    }

    /// Records whose application deadline falls within the next `days`.
    pub async fn deadline_soon(
        &self,
        session_id: &str,
        days: i64,
    ) -> Result<SearchOutcome, SearchError> {
        let catalog = load_catalog(&*self.source)?;
        let results = catalog.deadline_within(days);
        self.sessions
            .store(session_id, FilterMode::DeadlineSoon, results.clone());
        Ok(SearchOutcome {
            mode: FilterMode::DeadlineSoon,
            results,
        })
    }

    /// Resolve a follow-up selection against the session's last result set.
    pub fn resolve_selection(
        &self,
        session_id: &str,
        mode: FilterMode,
        index: usize,
    ) -> Result<Record, ResolveError> {
        self.sessions.resolve(session_id, mode, index)
    }

    /// Clear the session's navigation context ("return to start").
    pub fn reset_session(&self, session_id: &str) {
        self.sessions.reset(session_id);
    }

    /// Drop the embedding cache; the next semantic operation rebuilds it.
    pub async fn invalidate_embeddings(&self) {
        self.index.invalidate().await;
    }

    /// Country filter when a country was detected, city filter otherwise.
    fn location_filter(&self, catalog: &Catalog, entities: &ExtractedEntities) -> Vec<Record> {
        if let Some(country) = &entities.country {
            catalog.filter_country(country)
        } else if let Some(city) = &entities.city {
            catalog.filter_city(city)
        } else {
            Vec::new()
        }
    }

    /// Complete a structured stage: store the filtered set as-is, or —
    /// when residual keywords exist — rank within the subset first.
    async fn finish_stage(
        &self,
        session_id: &str,
        filtered: Vec<Record>,
        entities: &ExtractedEntities,
        plain_mode: FilterMode,
        semantic_mode: FilterMode,
    ) -> Result<SearchOutcome, SearchError> {
        if entities.keywords.is_empty() {
            self.sessions
                .store(session_id, plain_mode, filtered.clone());
            return Ok(SearchOutcome {
                mode: plain_mode,
                results: filtered,
            });
        }

        // Subset vectors are embedded fresh; the cached index only serves
        // whole-catalog ranking.
        let texts: Vec<String> = filtered.iter().map(Record::embedding_text).collect();
        let vectors = self.provider.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(SearchError::RankingUnavailable(
                EmbeddingError::BatchMismatch {
                    sent: texts.len(),
                    received: vectors.len(),
                },
            ));
        }
        let query_vec = self.provider.embed(&entities.keywords.join(" ")).await?;

        let ranked = rank(&query_vec, &vectors);
        let results: Vec<Record> = ranked.into_iter().map(|i| filtered[i].clone()).collect();

        self.sessions
            .store(session_id, semantic_mode, results.clone());
        Ok(SearchOutcome {
            mode: semantic_mode,
            results,
        })
    }
}
