use super::{
    action::{
        Action,
        ActivateAction,
    },
    components::{
        legend::Legend,
        logs::Logs,
        nav_tabs::NavTabs,
        opcounters::Opcounters,
        Component,
    },
    keybindings::{
        KeyBindings,
        Keymap,
    },
    tui::{
        Event,
        Tui,
    },
    Theme,
};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use mongo_monitor_config::Config;
use mongo_monitor_sampler::DerivedMetrics;
use ratatui::prelude::Rect;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::sync::{
    mpsc,
    watch,
};
use tokio_util::sync::CancellationToken;

pub struct App {
    config: Config,
    keybindings: KeyBindings,
    components: Vec<Box<dyn Component>>,
    should_quit: bool,
    should_suspend: bool,
    last_tick_key_events: Vec<KeyEvent>,
    global_keymap: Option<Keymap>,
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Dashboard,
    Logs,
}

impl From<ActivateAction> for Screen {
    fn from(activate: ActivateAction) -> Self {
        match activate {
            ActivateAction::Dashboard => Screen::Dashboard,
            ActivateAction::Logs => Screen::Logs,
        }
    }
}

type ActionSender = mpsc::UnboundedSender<Action>;
type ActionReceiver = mpsc::UnboundedReceiver<Action>;

impl App {
    pub fn new(config: Config, metrics: watch::Receiver<Vec<DerivedMetrics>>) -> Result<Self> {
        let keybindings = KeyBindings::default();

        Ok(Self {
            components: vec![
                Box::new(Logs::new()),
                Box::new(Legend::new(metrics.clone())),
                Box::new(Opcounters::new(metrics)),
                Box::new(NavTabs::default()),
            ],
            should_quit: false,
            should_suspend: false,
            last_tick_key_events: Vec::new(),
            global_keymap: keybindings.get(&Screen::Dashboard).cloned(),
            config,
            keybindings,
        })
    }

    /// Drives the terminal until the user quits or `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let refresh = self.config.refresh_interval.as_secs_f64().max(0.001);
        let mut tui = Tui::new()?.tick_rate(1.0 / refresh).frame_rate(30.0);
        tui.enter()?;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        for component in self.components.iter_mut() {
            component.register_action_handler(action_tx.clone())?;
        }
        for component in self.components.iter_mut() {
            component.register_config_handler(self.config.clone(), self.keybindings.clone())?;
        }
        for component in self.components.iter_mut() {
            component.init(tui.size()?)?;
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => self.should_quit = true,
                event = tui.next_event() => self.handle_event(event, action_tx.clone())?,
            }
            self.handle_actions(&mut tui, action_tx.clone(), &mut action_rx)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        info!("Dashboard closed");

        Ok(())
    }

    fn handle_event(&mut self, event: Option<Event>, action_tx: ActionSender) -> Result<()> {
        let Some(event) = event else {
            return Ok(());
        };
        match event {
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) => self.handle_key_event(key, action_tx.clone())?,
            Event::Error => action_tx.send(Action::Error("terminal input failed".to_string()))?,
            _ => {}
        }

        for component in self.components.iter_mut() {
            if component.is_focused() {
                if let Some(action) = component.handle_events(Some(event.clone()))? {
                    action_tx.send(action)?;
                }
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent, action_tx: ActionSender) -> Result<()> {
        let Some(keymap) = &self.global_keymap else {
            return Ok(());
        };

        match keymap.get(&vec![key]) {
            Some(action) => {
                action_tx.send(action.clone())?;
            }
            _ => {
                // Not a single key binding, so try it as part of a sequence.
                self.last_tick_key_events.push(key);

                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                    action_tx.send(action.clone())?;
                }
            }
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Tui, action_tx: ActionSender, action_rx: &mut ActionReceiver) -> Result<()> {
        while let Ok(action) = action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                trace!("{action:?}");
            }
            match &action {
                Action::Tick => self.last_tick_key_events.clear(),
                Action::Quit => self.should_quit = true,
                Action::Suspend => self.should_suspend = true,
                Action::Resume => self.should_suspend = false,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Error(message) => error!("{message}"),
                Action::Activate(activate) => {
                    self.global_keymap = self.keybindings.get(&Screen::from(*activate)).cloned();
                }
            };

            for component in self.components.iter_mut() {
                if let Some(action) = component.update(action.clone())? {
                    action_tx.send(action)?
                };
            }
        }
        Ok(())
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            frame.render_widget(
                ratatui::widgets::Block::default().style(Theme::default().default),
                frame.area(),
            );

            for component in self.components.iter_mut() {
                if component.is_visible() {
                    if let Err(err) = component.draw(frame, frame.area()) {
                        error!("Failed to draw: {:?}", err);
                    }
                }
            }
        })?;
        Ok(())
    }
}
