use shared::metrics_defs::{MetricDef, MetricType};

pub const GRAPHQL_REQUESTS: MetricDef = MetricDef {
    name: "graphql.requests",
    metric_type: MetricType::Counter,
    description: "GraphQL requests executed. Tagged with status.",
};

pub const GRAPHQL_DURATION: MetricDef = MetricDef {
    name: "graphql.duration",
    metric_type: MetricType::Histogram,
    description: "GraphQL request duration in seconds. Tagged with status.",
};

pub const ALL_METRICS: &[MetricDef] = &[GRAPHQL_REQUESTS, GRAPHQL_DURATION];
