//! Column-oriented records: one row per entity per period.

use super::{Normalized, RowStats, SeriesBuilder};
use crate::series::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub entity: String,
    pub region: Option<String>,
    pub t: Timestamp,
    pub y: f64,
}

/// Appends each record to its entity's series. `None` items are rows the
/// caller could not decode; they are counted as dropped.
pub fn collect<I>(records: I) -> Normalized
where
    I: IntoIterator<Item = Option<LongRecord>>,
{
    let mut builder = SeriesBuilder::new();
    let mut stats = RowStats::default();

    for record in records {
        let Some(record) = record else {
            stats.dropped();
            continue;
        };

        stats.used();
        if !builder.insert(&record.entity, record.region.as_deref(), record.t, record.y) {
            stats.superseded();
        }
    }

    Normalized {
        entities: builder.build(),
        stats,
    }
}

// -- Tests -------------------------------------------------------------------
