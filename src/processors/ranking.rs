use crate::models::CityAggregate;
use crate::utils::constants::RANKING_LIMIT;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Descending,
    Ascending,
}

/// Parameters for one ranking query over the aggregated cities: a sort
/// direction and a result cap.
#[derive(Debug, Clone, Copy)]
pub struct RankingQuery {
    pub direction: SortDirection,
    pub limit: usize,
}

impl RankingQuery {
    /// Top cities by mean PM2.5, highest first.
    pub fn most_polluted() -> Self {
        Self {
            direction: SortDirection::Descending,
            limit: RANKING_LIMIT,
        }
    }

    /// Top cities by mean PM2.5, lowest first.
    pub fn cleanest() -> Self {
        Self {
            direction: SortDirection::Ascending,
            limit: RANKING_LIMIT,
        }
    }

    /// Rank the aggregates without mutating the input. Ties on the mean
    /// are broken by state then city name so rankings are reproducible.
    pub fn execute(&self, aggregates: &[CityAggregate]) -> Vec<CityAggregate> {
        let mut ranked: Vec<CityAggregate> = aggregates.to_vec();

        ranked.sort_by(|a, b| {
            self.compare_means(a, b)
                .then_with(|| a.state_name.cmp(&b.state_name))
                .then_with(|| a.city_name.cmp(&b.city_name))
        });
        ranked.truncate(self.limit);

        ranked
    }

    fn compare_means(&self, a: &CityAggregate, b: &CityAggregate) -> Ordering {
        match self.direction {
            SortDirection::Descending => b.avg_pm25.total_cmp(&a.avg_pm25),
            SortDirection::Ascending => a.avg_pm25.total_cmp(&b.avg_pm25),
        }
    }
}
