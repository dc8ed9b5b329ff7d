use crate::tui::{
    layout::legend_and_chart_area,
    Action,
    ActivateAction,
    Component,
    Theme,
};
use color_eyre::Result;
use derive_more::Debug;
use mongo_monitor_sampler::{
    Counter,
    DerivedMetrics,
};
use ratatui::{
    layout::Rect,
    text::{
        Line,
        Span,
    },
    widgets::{
        Block,
        Borders,
        Paragraph,
    },
    Frame,
};
use strum::IntoEnumIterator as _;
use tokio::sync::watch;

/// Latest rate of every counter, one per line, in the chart's colours.
#[derive(Debug)]
pub struct Legend {
    active: bool,
    #[debug(skip)]
    metrics: watch::Receiver<Vec<DerivedMetrics>>,
}

impl Legend {
    pub fn new(metrics: watch::Receiver<Vec<DerivedMetrics>>) -> Self {
        Self { active: true, metrics }
    }

    fn lines(latest: Option<&DerivedMetrics>, theme: &Theme) -> Vec<Line<'static>> {
        let Some(latest) = latest else {
            return vec![Line::styled("waiting for samples", theme.text_muted)];
        };
        Counter::iter()
            .map(|counter| {
                let value = format!("{:.1} {}", latest.rate(counter), counter.unit());
                let value_style = if latest.is_regressed(counter) {
                    theme.regressed
                } else {
                    theme.text_default
                };
                Line::from(vec![
                    Span::styled(format!("{counter}: "), theme.series(counter)),
                    Span::styled(value, value_style),
                ])
            })
            .collect()
    }
}

impl Component for Legend {
    fn is_visible(&self) -> bool {
        self.active
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(activate) = action {
            self.active = activate == ActivateAction::Dashboard;
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [legend_area, _chart_area] = legend_and_chart_area(area)?;
        let theme = Theme::default();
        let lines = Self::lines(self.metrics.borrow().last(), &theme);

        let legend = Paragraph::new(lines).block(
            Block::default()
                .title(" rates ")
                .borders(Borders::ALL)
                .border_style(theme.border),
        );
        frame.render_widget(legend, legend_area);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mongo_monitor_sampler::CounterValues;
    use pretty_assertions::assert_eq;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn lists_all_nine_counters_in_order() {
        let now = Utc::now();
        let latest = DerivedMetrics {
            rates: CounterValues::default()
                .with(Counter::Insert, 12.5)
                .with(Counter::NetworkIn, 2048.0),
            start_time: now,
            end_time: now,
            regressions: Vec::new(),
        };
        let lines = Legend::lines(Some(&latest), &Theme::default());
        assert_eq!(lines.len(), 9);
        assert_eq!(text(&lines[0]), "insert: 12.5 ops/s");
        assert_eq!(text(&lines[6]), "network_in: 2048.0 B/s");
        assert_eq!(text(&lines[8]), "checkpoint: 0.0 ckpt/s");
    }

    #[test]
    fn regressed_values_are_highlighted() {
        let now = Utc::now();
        let theme = Theme::default();
        let latest = DerivedMetrics {
            rates: CounterValues::default().with(Counter::Delete, -4.0),
            start_time: now,
            end_time: now,
            regressions: vec![Counter::Delete],
        };
        let lines = Legend::lines(Some(&latest), &theme);
        assert_eq!(lines[3].spans[1].style, theme.regressed);
        assert_eq!(lines[0].spans[1].style, theme.text_default);
    }

    #[test]
    fn empty_store_shows_a_placeholder() {
        let lines = Legend::lines(None, &Theme::default());
        assert_eq!(text(&lines[0]), "waiting for samples");
    }
}
