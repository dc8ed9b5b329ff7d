mod action;
mod app;
mod components;
mod keybindings;
mod layout;
mod theme;
#[allow(clippy::module_inception)]
mod tui;

pub(crate) use action::Action;
use action::ActivateAction;
pub use app::App;
pub(crate) use app::Screen;
use components::Component;
use theme::Theme;
use tui::Event;
pub use tui::{
    restore_terminal,
    Tui,
};
