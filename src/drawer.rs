use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

type VisibilityListener = Box<dyn Fn(bool) + Send + Sync>;

// Server-held visibility of the notification drawer. Two states, no
// animation bookkeeping; interested parties register a listener and get
// called on every actual transition with the new state.
pub struct Drawer {
    open: AtomicBool,
    listeners: RwLock<Vec<VisibilityListener>>,
}

impl Drawer {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn on_visibility_change(&self, listener: impl Fn(bool) + Send + Sync + 'static) {
        self.listeners
            .write()
            .expect("drawer listeners poisoned")
            .push(Box::new(listener));
    }

    // Returns the new state. Listeners only fire when the state actually
    // changed, a redundant set is a no-op.
    pub fn set_open(&self, open: bool) -> bool {
        let was = self.open.swap(open, Ordering::SeqCst);
        if was != open {
            self.notify(open);
        }
        open
    }

    pub fn toggle(&self) -> bool {
        let now_open = !self.open.fetch_xor(true, Ordering::SeqCst);
        self.notify(now_open);
        now_open
    }

    fn notify(&self, open: bool) {
        for listener in self
            .listeners
            .read()
            .expect("drawer listeners poisoned")
            .iter()
        {
            listener(open);
        }
    }
}
