//! Multi-year timeline bucketing and min/max synchronization.

use hashbrown::HashMap;

use crate::{
    metrics::CompareStats,
    tree::node::ComparedTourItem,
    types::{MetricKind, TourId, Year},
};

/// One bar-chart metric series across the visible window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricSeries {
    /// Bar floor values, aligned with the day-of-year offsets.
    pub low: Vec<f32>,
    /// Metric values, aligned with the day-of-year offsets.
    pub high: Vec<f32>,
    /// Minimum used for vertical scaling.
    pub min: f32,
    /// Maximum used for vertical scaling.
    pub max: f32,
}

/// Aggregated timeline series for the visible year window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSeries {
    /// First visible year.
    pub first_year: Year,
    /// Number of days per visible year, leap aware.
    pub year_days: Vec<u16>,
    /// Day-of-year offsets relative to the first visible year.
    pub doy_offsets: Vec<u32>,
    /// Tour ids aligned with the day-of-year offsets.
    pub tour_ids: Vec<TourId>,
    /// Low/high series per tracked metric.
    pub metrics: HashMap<MetricKind, MetricSeries>,
}

/// Buckets compared tours by day of year across a sliding multi-year window
/// and keeps vertical scaling consistent across refreshes.
#[derive(Debug)]
pub struct TimelineAggregator {
    last_visible_year: Year,
    num_visible_years: usize,
    bar_relative_height: u32,
    sync_min_max: bool,
    seeded_min_max: HashMap<MetricKind, (f32, f32)>,
}

impl TimelineAggregator {
    /// Creates an aggregator showing `num_visible_years` ending at
    /// `last_visible_year`; window sizes below 1 are clamped to 1.
    pub fn new(last_visible_year: Year, num_visible_years: usize) -> Self {
        Self {
            last_visible_year,
            num_visible_years: num_visible_years.max(1),
            bar_relative_height: 100,
            sync_min_max: false,
            seeded_min_max: HashMap::new(),
        }
    }

    /// Moves the visible window; takes effect on the next aggregation.
    pub fn set_window(&mut self, last_visible_year: Year, num_visible_years: usize) {
        self.last_visible_year = last_visible_year;
        self.num_visible_years = num_visible_years.max(1);
    }

    /// Sets the cosmetic bar floor in percent of the metric value.
    pub fn set_bar_relative_height(&mut self, percent: u32) {
        self.bar_relative_height = percent.min(100);
    }

    /// Enables or disables min/max synchronization across aggregations.
    pub fn set_sync_min_max(&mut self, enabled: bool) {
        self.sync_min_max = enabled;
        if !enabled {
            self.seeded_min_max.clear();
        }
    }

    /// Discards seeded min/max bounds, the next aggregation reseeds them.
    pub fn reset_min_max(&mut self) {
        self.seeded_min_max.clear();
    }

    /// First visible year.
    pub fn first_visible_year(&self) -> Year {
        self.last_visible_year - self.num_visible_years as Year + 1
    }

    /// Last visible year.
    pub fn last_visible_year(&self) -> Year {
        self.last_visible_year
    }

    /// Number of visible years.
    pub fn num_visible_years(&self) -> usize {
        self.num_visible_years
    }

    /// Aggregates tours whose year lies inside the visible window.
    ///
    /// Tours outside `[first_visible_year, last_visible_year]` are silently
    /// excluded; the caller must move the window before they appear. With
    /// synchronization enabled the first aggregation seeds the per-metric
    /// min/max bounds and later aggregations reuse them until
    /// [`Self::reset_min_max`].
    pub fn aggregate(&mut self, items: &[&ComparedTourItem]) -> TimelineSeries {
        let first_year = self.first_visible_year();
        let year_days: Vec<u16> = (0..self.num_visible_years)
            .map(|offset| days_in_year(first_year + offset as Year))
            .collect();

        let mut series = TimelineSeries {
            first_year,
            year_days,
            doy_offsets: Vec::new(),
            tour_ids: Vec::new(),
            metrics: HashMap::new(),
        };
        for kind in MetricKind::ALL {
            series.metrics.insert(kind, MetricSeries::default());
        }

        for item in items {
            if item.year() < first_year || item.year() > self.last_visible_year {
                continue;
            }

            let prior_days: u32 = (first_year..item.year())
                .map(|year| u32::from(days_in_year(year)))
                .sum();
            series.doy_offsets.push(prior_days + u32::from(item.doy()) - 1);
            series.tour_ids.push(item.tour_id());

            let stats = item.stats();
            for kind in MetricKind::ALL {
                let high = metric_value(&stats, kind);
                let low = high - high * self.bar_relative_height as f32 / 100.0;
                if let Some(metric) = series.metrics.get_mut(&kind) {
                    metric.high.push(high);
                    metric.low.push(low);
                }
            }
        }

        for (kind, metric) in series.metrics.iter_mut() {
            let (data_min, data_max) = if metric.high.is_empty() {
                (0.0, 0.0)
            } else {
                (
                    metric.low.iter().copied().fold(f32::INFINITY, f32::min),
                    metric.high.iter().copied().fold(f32::NEG_INFINITY, f32::max),
                )
            };

            metric.min = data_min;
            metric.max = data_max;

            if !self.sync_min_max {
                continue;
            }
            if data_min == 0.0 && data_max == 0.0 {
                // invalid data must not seed wrong bounds
                continue;
            }

            match self.seeded_min_max.get(kind) {
                Some(&(min, max)) => {
                    metric.min = min;
                    metric.max = max;
                }
                None => {
                    self.seeded_min_max.insert(*kind, (data_min, data_max));
                }
            }
        }

        series
    }
}

/// Number of days in `year`, leap aware.
pub fn days_in_year(year: Year) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: Year) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn metric_value(stats: &CompareStats, kind: MetricKind) -> f32 {
    match kind {
        MetricKind::AvgSpeed => stats.avg_speed,
        MetricKind::AvgPace => stats.avg_pace,
        MetricKind::AvgPulse => stats.avg_pulse,
        MetricKind::MaxPulse => stats.max_pulse,
        MetricKind::AvgAltimeter => stats.avg_altimeter,
    }
}
