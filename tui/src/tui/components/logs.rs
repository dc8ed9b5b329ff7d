use crate::tui::{
    layout::header_and_main_area,
    Action,
    ActivateAction,
    Component,
    Theme,
};
use color_eyre::Result;
use crossterm::event::{
    KeyCode,
    KeyEvent,
};
use derive_more::Debug;
use ratatui::{
    layout::Rect,
    widgets::Widget as _,
    Frame,
};
use tui_logger::{
    LevelFilter,
    TuiLoggerLevelOutput,
    TuiLoggerSmartWidget,
    TuiWidgetEvent,
    TuiWidgetState,
};

/// The Logs tab: sampler warnings, driver errors and everything else traced
/// while the dashboard runs.
#[derive(Debug)]
pub struct Logs {
    active: bool,
    #[debug(skip)]
    state: TuiWidgetState,
}

impl Logs {
    pub fn new() -> Self {
        Self {
            active: false,
            state: TuiWidgetState::new()
                .set_default_display_level(LevelFilter::Info)
                .set_level_for_target("mongodb", LevelFilter::Warn),
        }
    }
}

/// Widget keys that don't clash with the global bindings (`q`, `Esc`,
/// `Ctrl-C`, `Ctrl-Z`, `1`, `2`).
fn widget_event(code: KeyCode) -> Option<TuiWidgetEvent> {
    let event = match code {
        KeyCode::Up => TuiWidgetEvent::UpKey,
        KeyCode::Down => TuiWidgetEvent::DownKey,
        KeyCode::Left => TuiWidgetEvent::LeftKey,
        KeyCode::Right => TuiWidgetEvent::RightKey,
        KeyCode::PageUp => TuiWidgetEvent::PrevPageKey,
        KeyCode::PageDown => TuiWidgetEvent::NextPageKey,
        KeyCode::Char(' ') => TuiWidgetEvent::SpaceKey,
        KeyCode::Char('h') => TuiWidgetEvent::HideKey,
        KeyCode::Char('f') => TuiWidgetEvent::FocusKey,
        _ => return None,
    };
    Some(event)
}

impl Component for Logs {
    fn is_visible(&self) -> bool {
        self.active
    }

    fn is_focused(&self) -> bool {
        self.active
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(activate) = action {
            self.active = activate == ActivateAction::Logs;
        }
        Ok(None)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(event) = widget_event(key.code) {
            self.state.transition(event);
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [_header_area, area] = header_and_main_area(area)?;
        let theme = Theme::default();

        TuiLoggerSmartWidget::default()
            .style_error(theme.log_error)
            .style_warn(theme.log_warn)
            .style_info(theme.log_info)
            .style_debug(theme.log_debug)
            .style_trace(theme.log_trace)
            .output_separator(' ')
            .output_timestamp(Some("%H:%M:%S".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(true)
            .output_file(false)
            .output_line(false)
            .state(&self.state)
            .render(area, frame.buffer_mut());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_keys_are_left_to_the_app() {
        for code in [
            KeyCode::Esc,
            KeyCode::Char('q'),
            KeyCode::Char('1'),
            KeyCode::Char('2'),
            KeyCode::Char('+'),
        ] {
            assert!(widget_event(code).is_none(), "{code:?}");
        }
    }

    #[test]
    fn paging_keys_drive_the_widget() {
        assert!(matches!(widget_event(KeyCode::PageUp), Some(TuiWidgetEvent::PrevPageKey)));
        assert!(matches!(widget_event(KeyCode::PageDown), Some(TuiWidgetEvent::NextPageKey)));
        assert!(matches!(widget_event(KeyCode::Char(' ')), Some(TuiWidgetEvent::SpaceKey)));
    }

    #[test]
    fn only_shown_on_the_logs_tab() {
        let mut logs = Logs::new();
        assert!(!logs.is_visible());
        logs.update(Action::Activate(ActivateAction::Logs)).unwrap();
        assert!(logs.is_visible() && logs.is_focused());
        logs.update(Action::Activate(ActivateAction::Dashboard)).unwrap();
        assert!(!logs.is_visible());
    }
}
