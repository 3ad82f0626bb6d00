use crate::types::daily_series::DailySeries;
use crate::types::season::{season_of, Season};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Reduction of one season's days.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAggregate {
    /// Maximum over every day of the season in the series, snow-free days included.
    pub max_depth_cm: f64,
    pub first_snow_day: Option<NaiveDate>,
    pub last_snow_day: Option<NaiveDate>,
    pub snow_days: usize,
}

impl SeasonAggregate {
    fn empty() -> Self {
        Self {
            max_depth_cm: f64::MIN,
            first_snow_day: None,
            last_snow_day: None,
            snow_days: 0,
        }
    }
}

/// Partitions the series by season and reduces each partition in a single chronological
/// pass. The map iterates seasons in chronological order.
pub fn aggregate_by_season(series: &DailySeries) -> BTreeMap<Season, SeasonAggregate> {
    let mut seasons: BTreeMap<Season, SeasonAggregate> = BTreeMap::new();
    for day in series.iter() {
        let aggregate = seasons
            .entry(season_of(day.date))
            .or_insert_with(SeasonAggregate::empty);
        aggregate.max_depth_cm = aggregate.max_depth_cm.max(day.depth_cm);
        if day.is_snow_day() {
            aggregate.first_snow_day.get_or_insert(day.date);
            aggregate.last_snow_day = Some(day.date);
            aggregate.snow_days += 1;
        }
    }
    seasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_aggregate_two_seasons() {
        let series: DailySeries = [
            (date(2020, 6, 29), 3.0),
            (date(2020, 6, 30), 0.0),
            (date(2020, 7, 1), 0.0),
            (date(2020, 11, 2), 4.0),
            (date(2021, 3, 1), 8.0),
            (date(2021, 4, 1), 0.0),
        ]
        .into_iter()
        .collect();
        let seasons = aggregate_by_season(&series);
        assert_eq!(
            seasons.keys().copied().collect::<Vec<_>>(),
            vec![Season(2019), Season(2020)]
        );

        let first = &seasons[&Season(2019)];
        assert_eq!(first.max_depth_cm, 3.0);
        assert_eq!(first.first_snow_day, Some(date(2020, 6, 29)));
        assert_eq!(first.last_snow_day, Some(date(2020, 6, 29)));
        assert_eq!(first.snow_days, 1);

        let second = &seasons[&Season(2020)];
        assert_eq!(second.max_depth_cm, 8.0);
        assert_eq!(second.first_snow_day, Some(date(2020, 11, 2)));
        assert_eq!(second.last_snow_day, Some(date(2021, 3, 1)));
        assert_eq!(second.snow_days, 2);
    }

    #[test]
    fn test_snow_free_season_keeps_zero_max() {
        let series: DailySeries = [(date(2022, 8, 1), 0.0)].into_iter().collect();
        let seasons = aggregate_by_season(&series);
        let aggregate = &seasons[&Season(2022)];
        assert_eq!(aggregate.max_depth_cm, 0.0);
        assert_eq!(aggregate.first_snow_day, None);
        assert_eq!(aggregate.snow_days, 0);
    }
}
