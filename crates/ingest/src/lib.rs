//! Tell - Ingest
//!
//! Record preparation between raw ingested data and storage.
//!
//! # Overview
//!
//! Two independent components sit on the ingestion hot path:
//!
//! - **`FieldExtractor`**: flattens a JSON log line into an ordered list of
//!   `name=value` string fields. Nested objects become dotted names
//!   (`{"a":{"b":1}}` → `a.b=1`). Extractors own reusable buffers and are
//!   recycled through a [`Pool`], so steady-state parsing does not allocate
//!   per field.
//! - **`LabelsValidator`**: rejects label sets that exceed the configured
//!   admission limits, counting every rejection exactly and logging at most
//!   one warning per interval per violation kind.
//!
//! ```text
//! [JSON line] → [FieldExtractor (pooled)] → [Fields] → storage rows
//! [LabelSet]  → [LabelsValidator] ──────────→ admit / drop
//! ```
//!
//! # Example
//!
//! ```
//! let mut parser = tell_ingest::acquire();
//! parser.parse(br#"{"level":"info","http":{"status":200}}"#, "").unwrap();
//!
//! let fields: Vec<_> = parser.fields().map(|f| (f.name, f.value)).collect();
//! assert!(fields.contains(&("http.status", "200")));
//! tell_ingest::release(parser);
//! ```

mod error;
pub mod json;
pub mod labels;
pub mod pool;
pub mod throttle;

pub use error::{ParseError, Result};
pub use json::{
    Field, FieldExtractor, Fields, JsonKind, OwnedField, acquire, init_parser_pool, parser_pool,
    release,
};
pub use labels::{
    IGNORED_ROWS_METRIC, IgnoredSeriesMetrics, IgnoredSeriesSnapshot, Label, LabelLimits,
    LabelsValidator, LimitViolation, MAX_LABEL_NAME_LEN, labels_to_string,
};
pub use pool::{Pool, PoolMetrics, PoolMetricsSnapshot, Pooled, Reusable};
pub use throttle::Throttle;
