use mongo_monitor_sampler::Counter;
use ratatui::style::{
    Color,
    Modifier,
    Style,
};

#[derive(Clone, Copy, Debug)]
pub(super) struct Theme {
    pub(super) default: Style,
    pub(super) text_default: Style,
    pub(super) text_muted: Style,
    pub(super) regressed: Style,
    pub(super) border: Style,
    pub(super) axis: Style,
    pub(super) log_error: Style,
    pub(super) log_warn: Style,
    pub(super) log_info: Style,
    pub(super) log_debug: Style,
    pub(super) log_trace: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            default: Style::default().bg(Color::Black).fg(Color::Gray),
            text_default: Style::default(),
            text_muted: Style::default().fg(Color::DarkGray),
            regressed: Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::Gray),
            log_error: Style::default().fg(Color::Red),
            log_warn: Style::default().fg(Color::Yellow),
            log_info: Style::default().fg(Color::Cyan),
            log_debug: Style::default().fg(Color::Green),
            log_trace: Style::default().fg(Color::Magenta),
        }
    }
}

impl Theme {
    /// Colour of a counter's series in the chart and its row in the legend.
    pub(super) fn series(&self, counter: Counter) -> Style {
        let color = match counter {
            Counter::Insert => Color::Indexed(111),
            Counter::Query => Color::Indexed(172),
            Counter::Update => Color::Indexed(107),
            Counter::Delete => Color::Indexed(161),
            Counter::Getmore => Color::Indexed(245),
            Counter::Command => Color::Indexed(135),
            Counter::NetworkIn => Color::Cyan,
            Counter::NetworkOut => Color::LightBlue,
            Counter::Checkpoint => Color::Yellow,
        };
        Style::default().fg(color)
    }
}
