use crime_explorer_stats_models::TrendPoint;

use crate::compute_rate;
use crate::record::YearlyRecord;

/// Builds an ascending trend series for one column.
///
/// Records that do not carry `field` are dropped. Each point's rate is the
/// column per 100,000 residents and is absent when the population is not
/// positive.
#[must_use]
pub fn build_trend_data<R: YearlyRecord>(records: &[R], field: R::Field) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter_map(|record| {
            let value = record.value(field)?;
            let population = record.population();
            Some(TrendPoint {
                year: record.year(),
                value,
                rate: (population > 0.0).then(|| compute_rate(value, population)),
            })
        })
        .collect();

    points.sort_by_key(|p| p.year);
    points
}

#[cfg(test)]
mod tests {
    use crime_explorer_crime_models::{CrimeSummary, SummaryField};
    use crime_explorer_stats_models::{AggregateField, YearlyAggregate};

    use super::*;

    fn summary(year: i32, population: u64, homicide: u64, arson: Option<u64>) -> CrimeSummary {
        CrimeSummary {
            year,
            state_abbr: None,
            population,
            violent_crime: 0,
            homicide,
            rape_revised: 0,
            robbery: 0,
            aggravated_assault: 0,
            property_crime: 0,
            burglary: 0,
            larceny: 0,
            motor_vehicle_theft: 0,
            arson,
        }
    }

    #[test]
    fn sorts_ascending_and_attaches_rate() {
        let records = vec![
            summary(2021, 200_000, 20, None),
            summary(2020, 100_000, 5, None),
        ];
        let points = build_trend_data(&records, SummaryField::Homicide);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, 2020);
        assert_eq!(points[0].rate, Some(5.0));
        assert_eq!(points[1].rate, Some(10.0));
    }

    #[test]
    fn rate_is_absent_without_population() {
        let points = build_trend_data(&[summary(2020, 0, 7, None)], SummaryField::Homicide);
        assert_eq!(points[0].rate, None);
        assert!((points[0].value - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn records_without_the_column_are_dropped() {
        let records = vec![
            summary(2019, 1000, 0, Some(3)),
            summary(2020, 1000, 0, None),
        ];
        let points = build_trend_data(&records, SummaryField::Arson);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 2019);
    }

    #[test]
    fn works_on_yearly_aggregates() {
        let records = vec![YearlyAggregate {
            year: 2022,
            count: 50,
            rate: 12.5,
            clearances: 10,
            population: 400_000,
        }];
        let points = build_trend_data(&records, AggregateField::Count);
        assert!((points[0].value - 50.0).abs() < f64::EPSILON);
        assert_eq!(points[0].rate, Some(12.5));
    }
}
