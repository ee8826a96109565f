//! Daily atmospheric CO2 from the Mauna Loa Observatory text file.

use crate::{
    document::Provenance,
    reading::{collect_lines, DailyReading},
    series::TimePoint,
};

const ENTITY: &str = "Mauna Loa";

pub fn provenance() -> Provenance {
    Provenance::new(
        "",
        "",
        "",
        "Daily atmospheric CO2 values measured at the Mauna Loa Observatory",
    )
}

/// One point per accepted line, ordered by date. Comment and malformed lines
/// are dropped.
pub fn build<'a, I>(lines: I) -> Vec<TimePoint>
where
    I: IntoIterator<Item = &'a str>,
{
    let normalized = collect_lines::<DailyReading, _>(lines, ENTITY);
    normalized.stats.log("co2-daily");

    normalized
        .entities
        .into_iter()
        .next()
        .map(|entity| entity.series)
        .unwrap_or_default()
}

// -- Tests -------------------------------------------------------------------
