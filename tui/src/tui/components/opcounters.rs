use crate::tui::{
    keybindings::KeyBindings,
    layout::legend_and_chart_area,
    Action,
    ActivateAction,
    Component,
    Theme,
};
use color_eyre::Result;
use derive_more::Debug;
use mongo_monitor_config::Config;
use mongo_monitor_sampler::{
    Counter,
    DerivedMetrics,
};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        Axis,
        Block,
        Borders,
        Chart,
        Dataset,
        GraphType,
    },
    Frame,
};
use tokio::sync::watch;

/// Line chart of the six opcounter rates over the most recent samples.
#[derive(Debug)]
pub struct Opcounters {
    active: bool,
    chart_points: usize,
    #[debug(skip)]
    metrics: watch::Receiver<Vec<DerivedMetrics>>,
}

impl Opcounters {
    pub fn new(metrics: watch::Receiver<Vec<DerivedMetrics>>) -> Self {
        Self {
            active: true,
            chart_points: 1,
            metrics,
        }
    }
}

/// Plots the newest records against the right edge of a `width` wide x axis,
/// so the chart scrolls left as samples arrive.
pub(crate) fn series_points(records: &[DerivedMetrics], counter: Counter, width: usize) -> Vec<(f64, f64)> {
    let shown = &records[records.len().saturating_sub(width)..];
    let offset = width - shown.len();
    shown
        .iter()
        .enumerate()
        .map(|(i, record)| ((offset + i) as f64, record.rate(counter)))
        .collect()
}

/// Y range covering every opcounter value, always including zero.
pub(crate) fn y_bounds(records: &[DerivedMetrics]) -> [f64; 2] {
    let (low, high) = records
        .iter()
        .flat_map(|record| Counter::opcounters().map(|counter| record.rate(counter)))
        .fold((0.0_f64, 0.0_f64), |(low, high), rate| (low.min(rate), high.max(rate)));
    if high - low < 1.0 {
        [low, low + 1.0]
    } else {
        [low, high * 1.1]
    }
}

impl Component for Opcounters {
    fn is_visible(&self) -> bool {
        self.active
    }

    fn register_config_handler(&mut self, config: Config, _keybindings: KeyBindings) -> Result<()> {
        self.chart_points = config.chart_points.max(1);
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(activate) = action {
            self.active = activate == ActivateAction::Dashboard;
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [_legend_area, chart_area] = legend_and_chart_area(area)?;
        let theme = Theme::default();
        let records = self.metrics.borrow().clone();

        let series = Counter::opcounters()
            .map(|counter| (counter, series_points(&records, counter, self.chart_points)))
            .collect::<Vec<_>>();
        let datasets = series
            .iter()
            .map(|(counter, points)| {
                Dataset::default()
                    .name(counter.to_string())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(theme.series(*counter))
                    .data(points)
            })
            .collect::<Vec<_>>();

        let x_max = (self.chart_points - 1).max(1) as f64;
        let [y_min, y_max] = y_bounds(&records);
        let oldest = records
            .len()
            .min(self.chart_points)
            .checked_sub(1)
            .map(|age| format!("-{age}"))
            .unwrap_or_default();

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(" opcounters (ops/s) ")
                    .borders(Borders::ALL)
                    .border_style(theme.border),
            )
            .x_axis(
                Axis::default()
                    .style(theme.axis)
                    .bounds([0.0, x_max])
                    .labels([Span::raw(oldest), Span::raw("now")]),
            )
            .y_axis(
                Axis::default()
                    .style(theme.axis)
                    .bounds([y_min, y_max])
                    .labels([
                        Span::styled(format!("{y_min:.0}"), Style::default()),
                        Span::styled(format!("{:.0}", (y_min + y_max) / 2.0), Style::default()),
                        Span::styled(format!("{y_max:.0}"), Style::default()),
                    ]),
            );
        frame.render_widget(chart, chart_area);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mongo_monitor_sampler::CounterValues;
    use pretty_assertions::assert_eq;

    fn record(query: f64) -> DerivedMetrics {
        let now = Utc::now();
        DerivedMetrics {
            rates: CounterValues::default().with(Counter::Query, query),
            start_time: now,
            end_time: now,
            regressions: Vec::new(),
        }
    }

    #[test]
    fn newest_sample_sits_at_the_right_edge() {
        let records = vec![record(1.0), record(2.0), record(3.0)];
        assert_eq!(
            series_points(&records, Counter::Query, 5),
            vec![(2.0, 1.0), (3.0, 2.0), (4.0, 3.0)]
        );
    }

    #[test]
    fn only_the_last_width_samples_are_plotted() {
        let records = (0..8).map(|i| record(i as f64)).collect::<Vec<_>>();
        assert_eq!(
            series_points(&records, Counter::Query, 3),
            vec![(0.0, 5.0), (1.0, 6.0), (2.0, 7.0)]
        );
        assert_eq!(series_points(&[], Counter::Query, 3), Vec::new());
    }

    #[test]
    fn y_range_includes_zero_and_negative_rates() {
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
        let [low, high] = y_bounds(&[record(100.0)]);
        assert_eq!(low, 0.0);
        assert!((high - 110.0).abs() < 1e-9, "{high}");
        assert_eq!(y_bounds(&[record(-5.0), record(10.0)])[0], -5.0);
    }

    #[test]
    fn only_visible_on_the_dashboard() {
        let (_tx, rx) = watch::channel(Vec::new());
        let mut chart = Opcounters::new(rx);
        assert!(chart.is_visible());
        chart.update(Action::Activate(ActivateAction::Logs)).unwrap();
        assert!(!chart.is_visible());
        chart.update(Action::Activate(ActivateAction::Dashboard)).unwrap();
        assert!(chart.is_visible());
    }
}
