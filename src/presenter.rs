use std::sync::RwLock;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalState {
    pub reboot_pending: bool,
    pub error: Option<(u16, String)>,
}

// Owns which modal the dashboard shows. Only one can be up at a time;
// presenting an error takes the screen over from anything else.
pub struct ErrorPresenter {
    state: RwLock<ModalState>,
}

impl ErrorPresenter {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ModalState::default()),
        }
    }

    pub fn present(&self, code: u16, reason: &str) {
        let mut state = self.state.write().expect("modal state poisoned");
        state.reboot_pending = false;
        state.error = Some((code, reason.to_string()));
    }

    pub fn dismiss_error(&self) {
        self.state.write().expect("modal state poisoned").error = None;
    }

    pub fn begin_reboot(&self) {
        self.state.write().expect("modal state poisoned").reboot_pending = true;
    }

    pub fn view(&self) -> ModalState {
        self.state.read().expect("modal state poisoned").clone()
    }
}
