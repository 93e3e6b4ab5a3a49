use serde::{Deserialize, Serialize};

use super::load::Load;
use super::session::{Session, UserProfile};

/// State shared by every screen for the lifetime of the app.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Signed-in session; `None` shows the auth screens.
    pub session: Option<Session>,
    /// Load handed from a list row to the details screen.
    pub selected_load: Option<Load>,
}

impl AppState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drops the session and anything fetched with it.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.selected_load = None;
    }

    pub fn select_load(&mut self, load: Load) {
        self.selected_load = Some(load);
    }

    /// Selected load, if it is the one with `id`.
    pub fn selected(&self, id: &str) -> Option<&Load> {
        self.selected_load.as_ref().filter(|load| load.id == id)
    }

    /// Keeps the hand-off copy in sync with edits from the details screen.
    pub fn update_selected(&mut self, load: &Load) {
        if self.selected(&load.id).is_some() {
            self.selected_load = Some(load.clone());
        }
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.session = persisted.session;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            session: self.session.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(id: &str) -> Load {
        Load {
            id: id.into(),
            ..Load::default()
        }
    }

    #[test]
    fn sign_out_forgets_selection() {
        let mut state = AppState::default();
        state.sign_in(Session::new("tok", UserProfile::default()));
        state.select_load(load("a"));
        assert!(state.is_signed_in());

        state.sign_out();
        assert!(!state.is_signed_in());
        assert!(state.selected_load.is_none());
    }

    #[test]
    fn selection_is_matched_by_id() {
        let mut state = AppState::default();
        state.select_load(load("a"));
        assert!(state.selected("a").is_some());
        assert!(state.selected("b").is_none());

        let mut edited = load("a");
        edited.status = Some("enRoute".into());
        state.update_selected(&edited);
        assert_eq!(
            state.selected("a").and_then(|l| l.status.as_deref()),
            Some("enRoute")
        );

        state.update_selected(&load("b"));
        assert!(state.selected("a").is_some());
    }

    #[test]
    fn persisted_round_trip_keeps_session() {
        let mut state = AppState::default();
        state.sign_in(Session::new("tok", UserProfile::default()));
        let json = serde_json::to_string(&state.to_persisted()).unwrap();

        let mut restored = AppState::default();
        restored.apply_persisted(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.session.map(|s| s.token), Some("tok".to_string()));
    }
}
