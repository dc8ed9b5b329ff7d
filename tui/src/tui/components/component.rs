use crate::tui::{
    keybindings::KeyBindings,
    Action,
    Event,
};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use mongo_monitor_config::Config;
use ratatui::{
    layout::{
        Rect,
        Size,
    },
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

/// A piece of the screen that reacts to events and actions and draws itself.
///
/// Every method except [`Component::draw`] has a no-op default.
pub trait Component: Send {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config, keybindings: KeyBindings) -> Result<()> {
        let _ = (config, keybindings);
        Ok(())
    }

    fn init(&mut self, area: Size) -> Result<()> {
        let _ = area;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Focused components receive raw terminal events.
    fn is_focused(&self) -> bool {
        false
    }

    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        match event {
            Some(Event::Key(key_event)) => self.handle_key_event(key_event),
            _ => Ok(None),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()>;
}
