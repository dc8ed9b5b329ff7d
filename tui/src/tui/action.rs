use serde::{
    Deserialize,
    Serialize,
};
use strum::Display;

#[derive(Display, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),

    Activate(ActivateAction),
}

#[derive(Display, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivateAction {
    Dashboard,
    Logs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn activate_survives_yaml() {
        let result = serde_yml::to_string(&Action::Activate(ActivateAction::Logs)).unwrap();
        assert!(result.contains("Logs"), "{result}");
        let parsed: Action = serde_yml::from_str(&result).unwrap();
        assert_eq!(parsed, Action::Activate(ActivateAction::Logs));
    }
}
