use std::time::Duration;

use kagami_catalog::MatchConfig;

/// AniList allows 90 requests per minute.
pub const ANILIST_INTERVAL: Duration = Duration::from_millis(700);

/// Spacing for ani.zip requests.
pub const ENRICHMENT_INTERVAL: Duration = Duration::from_millis(250);

/// Spacing and concurrency for calls to one external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Minimum time between two grants.
    pub interval: Duration,
    /// Maximum number of permits held at once.
    pub max_concurrent: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::catalog()
    }
}

impl RateLimitConfig {
    pub fn new(interval: Duration, max_concurrent: usize) -> Self {
        Self::catalog()
            .with_interval(interval)
            .with_max_concurrent(max_concurrent)
    }

    /// One request at a time, spaced for AniList.
    pub fn catalog() -> Self {
        Self {
            interval: ANILIST_INTERVAL,
            max_concurrent: 1,
        }
    }

    pub fn enrichment() -> Self {
        Self {
            interval: ENRICHMENT_INTERVAL,
            max_concurrent: 4,
        }
    }

    /// No spacing, no practical concurrency cap.
    pub fn unlimited() -> Self {
        Self {
            interval: Duration::ZERO,
            max_concurrent: 64,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the permit cap (at least 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }
}

/// Configuration for a [`Scanner`](crate::Scanner).
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub matching: MatchConfig,
    pub catalog_limit: RateLimitConfig,
    pub enrichment_limit: RateLimitConfig,
    /// How many sequel/prequel hops to follow from tracked entries.
    pub relation_depth: usize,
    /// Deadline for one enrichment fetch, after the rate limiter granted it.
    pub fetch_timeout: Duration,
    /// How long a failed enrichment fetch is remembered.
    pub negative_ttl: Duration,
    /// Enrichment fetches in flight across distinct media ids.
    pub hydration_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            catalog_limit: RateLimitConfig::catalog(),
            enrichment_limit: RateLimitConfig::enrichment(),
            relation_depth: 2,
            fetch_timeout: Duration::from_secs(30),
            negative_ttl: Duration::from_secs(60),
            hydration_concurrency: 4,
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_catalog_limit(mut self, limit: RateLimitConfig) -> Self {
        self.catalog_limit = limit;
        self
    }

    pub fn with_enrichment_limit(mut self, limit: RateLimitConfig) -> Self {
        self.enrichment_limit = limit;
        self
    }

    /// Set the relation depth, clamped to `0..=5`.
    pub fn with_relation_depth(mut self, depth: usize) -> Self {
        self.relation_depth = depth.min(5);
        self
    }

    /// Set the per-fetch deadline (at least 1 ms).
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    pub fn with_negative_ttl(mut self, ttl: Duration) -> Self {
        self.negative_ttl = ttl;
        self
    }

    /// Set hydration concurrency, clamped to `1..=64`.
    pub fn with_hydration_concurrency(mut self, concurrency: usize) -> Self {
        self.hydration_concurrency = concurrency.clamp(1, 64);
        self
    }
}
