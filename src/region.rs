//! Region roll-ups and top-N ranking.

use serde::Serialize;

use crate::{
    error::RegionError,
    metrics::truncate1,
    series::{EntitySeries, TimePoint},
};

/// Sum of a fixed set of member series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAggregate {
    pub region: String,
    /// Sum of member populations in millions, truncated to one decimal.
    pub population: f64,
    pub series: Vec<TimePoint>,
}

impl RegionAggregate {
    /// Turns the aggregate into an entity tagged with `parent`.
    pub fn into_entity(self, parent: Option<&str>) -> EntitySeries {
        EntitySeries {
            region: parent.map(str::to_string),
            population: Some(self.population),
            ..EntitySeries::with_series(self.region, self.series)
        }
    }
}

/// Sums `y` and `d` of every member index by index.
///
/// Members must share the first member's timestamp axis exactly; no date
/// matching is attempted. Returns `Ok(None)` when there is nothing to sum.
pub fn aggregate_region(
    region: &str,
    members: &[&EntitySeries],
) -> Result<Option<RegionAggregate>, RegionError> {
    let Some(first) = members.first() else {
        return Ok(None);
    };
    if first.series.is_empty() {
        return Ok(None);
    }

    let mut series: Vec<TimePoint> = first
        .series
        .iter()
        .map(|p| TimePoint::new(p.t, 0.0))
        .collect();
    let mut population = 0.0;

    for member in members {
        check_alignment(region, first, member)?;

        population += member.population.unwrap_or(0.0);
        for (acc, point) in series.iter_mut().zip(&member.series) {
            acc.y += point.y;
            if let Some(d) = point.d {
                acc.d = Some(acc.d.unwrap_or(0.0) + d);
            }
        }
    }

    Ok(Some(RegionAggregate {
        region: region.to_string(),
        population: truncate1(population),
        series,
    }))
}

fn check_alignment(
    region: &str,
    reference: &EntitySeries,
    member: &EntitySeries,
) -> Result<(), RegionError> {
    let mismatch = reference
        .timestamps()
        .zip(member.timestamps())
        .position(|(a, b)| a != b)
        .or_else(|| {
            (reference.series.len() != member.series.len())
                .then(|| reference.series.len().min(member.series.len()))
        });

    match mismatch {
        None => Ok(()),
        Some(index) => Err(RegionError::Misaligned {
            region: region.to_string(),
            member: member.name.clone(),
            reference: reference.name.clone(),
            index,
        }),
    }
}

/// Entities tagged with `region`, in input order.
pub fn group_by_region<'a>(entities: &'a [EntitySeries], region: &str) -> Vec<&'a EntitySeries> {
    entities
        .iter()
        .filter(|e| e.region.as_deref() == Some(region))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub entity: &'a EntitySeries,
    pub score: f64,
}

/// The `n` entities with the highest `metric`, descending.
///
/// Entities without a finite score are left out. The sort is stable, so ties keep
/// their input order.
pub fn top_n<'a, F>(entities: &'a [EntitySeries], n: usize, metric: F) -> Vec<Ranked<'a>>
where
    F: Fn(&EntitySeries) -> Option<f64>,
{
    let mut ranked: Vec<Ranked<'a>> = entities
        .iter()
        .filter_map(|entity| metric(entity).map(|score| Ranked { entity, score }))
        .filter(|ranked| ranked.score.is_finite())
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n);
    ranked
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::series::Timestamp;

    fn day(d: u32) -> Timestamp {
        Timestamp::Date(NaiveDate::from_ymd_opt(2020, 1, d).unwrap())
    }

    fn entity(name: &str, population: f64, points: &[(u32, f64, f64)]) -> EntitySeries {
        let series = points
            .iter()
            .map(|&(t, y, d)| TimePoint::new(day(t), y).with_delta(d))
            .collect();
        EntitySeries::with_series(name, series).with_population(population)
    }

    #[test]
    fn should_return_none_for_no_members() {
        assert_eq!(aggregate_region("World", &[]), Ok(None));
        let empty = EntitySeries::new("Nowhere");
        assert_eq!(aggregate_region("World", &[&empty]), Ok(None));
    }

    #[test]
    fn should_keep_single_member_unchanged() {
        let norway = entity("Norway", 4.5, &[(30, 10.0, 9.0)]);

        let world = aggregate_region("World", &[&norway]).unwrap().unwrap();

        assert_eq!(world.population, 4.5);
        assert_eq!(world.series, norway.series);
        assert_eq!(world.region, "World");
    }

    #[test]
    fn should_sum_members() {
        let norway = entity("Norway", 4.5, &[(30, 10.0, 9.0), (31, 1.0, 1.0)]);
        let sweden = entity("Sweden", 9.0, &[(30, 11.0, 3.0), (31, 1.0, 1.0)]);

        let world = aggregate_region("World", &[&norway, &sweden]).unwrap().unwrap();

        assert_eq!(world.population, 13.5);
        assert_eq!(world.series[0].y, 21.0);
        assert_eq!(world.series[0].d, Some(12.0));
        assert_eq!(world.series[1].y, 2.0);
        assert_eq!(world.series[1].d, Some(2.0));
    }

    #[test]
    fn should_add_up_many_members() {
        let norway = entity("Norway", 4.5, &[(1, 2.0, 3.0)]);
        let members: Vec<&EntitySeries> = std::iter::repeat(&norway).take(10_000).collect();

        let world = aggregate_region("World", &members).unwrap().unwrap();

        assert_eq!(world.population, 45_000.0);
        assert_eq!(world.series[0].y, 20_000.0);
        assert_eq!(world.series[0].d, Some(30_000.0));
    }

    #[test]
    fn should_reject_misaligned_members() {
        let norway = entity("Norway", 4.5, &[(30, 10.0, 9.0), (31, 1.0, 1.0)]);
        let shifted = entity("Sweden", 9.0, &[(30, 11.0, 3.0), (1, 1.0, 1.0)]);
        let short = entity("Denmark", 5.0, &[(30, 11.0, 3.0)]);

        assert_eq!(
            aggregate_region("Nordic", &[&norway, &shifted]),
            Err(RegionError::Misaligned {
                region: "Nordic".to_string(),
                member: "Sweden".to_string(),
                reference: "Norway".to_string(),
                index: 1,
            })
        );
        assert!(aggregate_region("Nordic", &[&norway, &short]).is_err());
    }

    #[test]
    fn should_tag_region_entity_with_parent() {
        let norway = entity("Norway", 4.5, &[(30, 10.0, 9.0)]);
        let europe = aggregate_region("Europe", &[&norway])
            .unwrap()
            .unwrap()
            .into_entity(Some("World"));

        assert_eq!(europe.name, "Europe");
        assert_eq!(europe.region.as_deref(), Some("World"));
        assert_eq!(europe.population, Some(4.5));
    }

    #[test]
    fn should_select_members_by_region() {
        let entities = vec![
            entity("Norway", 5.0, &[]).with_region("Europe"),
            entity("Japan", 126.0, &[]).with_region("Asia"),
            entity("France", 65.0, &[]).with_region("Europe"),
        ];

        let europe: Vec<&str> = group_by_region(&entities, "Europe")
            .iter()
            .map(|e| e.name.as_str())
            .collect();

        assert_eq!(europe, vec!["Norway", "France"]);
    }

    #[test]
    fn should_rank_top_n_with_stable_ties() {
        let entities = vec![
            entity("A", 1.0, &[]),
            entity("B", 3.0, &[]),
            entity("C", 2.0, &[]),
            entity("D", 3.0, &[]),
            EntitySeries::new("E"),
        ];

        let top = top_n(&entities, 3, |e| e.population);
        let names: Vec<&str> = top.iter().map(|r| r.entity.name.as_str()).collect();

        assert_eq!(names, vec!["B", "D", "C"]);
        assert_eq!(top[0].score, 3.0);
    }

    #[test]
    fn should_leave_non_finite_scores_out_of_ranking() {
        let entities = vec![
            entity("A", 1.0, &[]),
            entity("B", f64::NAN, &[]),
            entity("C", f64::INFINITY, &[]),
            entity("D", 2.0, &[]),
        ];

        let top = top_n(&entities, 10, |e| e.population);
        let names: Vec<&str> = top.iter().map(|r| r.entity.name.as_str()).collect();

        assert_eq!(names, vec!["D", "A"]);
    }

    proptest! {
        #[test]
        fn region_sum_is_pointwise(
            pairs in prop::collection::vec((-10_000i32..10_000, -10_000i32..10_000), 1..28)
        ) {
            let a_points: Vec<(u32, f64, f64)> = pairs.iter().enumerate()
                .map(|(i, &(a, _))| (i as u32 + 1, f64::from(a), 0.0)).collect();
            let b_points: Vec<(u32, f64, f64)> = pairs.iter().enumerate()
                .map(|(i, &(_, b))| (i as u32 + 1, f64::from(b), 0.0)).collect();
            let a = entity("A", 1.0, &a_points);
            let b = entity("B", 2.0, &b_points);

            let sum = aggregate_region("AB", &[&a, &b]).unwrap().unwrap();

            for i in 0..pairs.len() {
                prop_assert_eq!(sum.series[i].y, a.series[i].y + b.series[i].y);
                prop_assert_eq!(sum.series[i].t, a.series[i].t);
            }
        }
    }
}
