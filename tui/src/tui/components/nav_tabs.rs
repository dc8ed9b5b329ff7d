use crate::tui::{
    layout,
    Action,
    Component,
    Screen,
    Theme,
};
use eyre::Result;
use ratatui::{
    layout::{
        Alignment,
        Rect,
    },
    style::{
        Color,
        Modifier,
        Style,
    },
    text::Line,
    widgets::{
        Block,
        Borders,
        Paragraph,
        Tabs,
    },
    Frame,
};

const QUIT_HINT: &str = "Press Esc/Q/Ctrl-C to quit";

#[derive(Debug, Default)]
pub struct NavTabs {
    screen: Screen,
}

impl Component for NavTabs {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(activate) = action {
            self.screen = activate.into();
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [header_area, _main_area] = layout::header_and_main_area(area)?;

        let selected_tab = match self.screen {
            Screen::Dashboard => 0,
            Screen::Logs => 1,
        };

        let tabs = Tabs::new(vec!["Dashboard [1]", "Logs [2]"])
            .select(selected_tab)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::new().borders(Borders::BOTTOM))
            .divider(" | ");
        frame.render_widget(tabs, header_area);

        let hint = Paragraph::new(Line::from(QUIT_HINT).style(Theme::default().text_muted)).alignment(Alignment::Right);
        frame.render_widget(hint, Rect { height: 1, ..header_area });

        Ok(())
    }
}
