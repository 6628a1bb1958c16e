//! Metrics definitions for the collection client.

use shared::metrics_defs::{MetricDef, MetricType};

pub const UPSTREAM_REQUESTS: MetricDef = MetricDef {
    name: "upstream.requests",
    metric_type: MetricType::Counter,
    description: "Requests sent to the museum API. Tagged with outcome.",
};

pub const UPSTREAM_DURATION: MetricDef = MetricDef {
    name: "upstream.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete an upstream request in seconds",
};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of upstream lookups served from the response cache",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of upstream lookups that missed the response cache",
};

pub const OBJECTS_SKIPPED: MetricDef = MetricDef {
    name: "objects.skipped",
    metric_type: MetricType::Counter,
    description: "Objects dropped from a batch because they could not be fetched. Tagged with reason.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    UPSTREAM_REQUESTS,
    UPSTREAM_DURATION,
    CACHE_HIT,
    CACHE_MISS,
    OBJECTS_SKIPPED,
];
