use std::sync::Arc;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::backend::BackendClient;
use crate::payloads::ImagePayload;

pub const FADE_MILLIS: u64 = 2000;
// Fixed chrome around the picture on the frame page.
pub const INFO_WIDTH: u32 = 260;
pub const NAV_HEIGHT: u32 = 56;

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Empty,
    Placeholder,
    FadeOut {
        current: String,
        next: String,
        since: Instant,
    },
    FadeIn {
        current: String,
        since: Instant,
    },
    Steady {
        current: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SlideView {
    Empty,
    Placeholder,
    Image {
        src: String,
        fading_out: bool,
        fading_in: bool,
    },
}

// Crossfade state for the picture frame. Polling drives it: each backend
// answer either latches the placeholder or starts a two-leg fade toward the
// new picture. Time moves the fade along lazily, whenever the state is read.
pub struct Slideshow {
    phase: RwLock<Phase>,
    viewport: RwLock<(u32, u32)>,
}

impl Slideshow {
    pub fn new() -> Self {
        Self {
            phase: RwLock::new(Phase::Empty),
            viewport: RwLock::new((
                1920 - INFO_WIDTH,
                1080 - NAV_HEIGHT,
            )),
        }
    }

    // The browser reports its window; the fixed chrome is carved off here.
    pub fn set_viewport(&self, window_width: u32, window_height: u32) {
        let target = (
            window_width.saturating_sub(INFO_WIDTH).max(1),
            window_height.saturating_sub(NAV_HEIGHT).max(1),
        );
        *self.viewport.write().expect("slideshow viewport poisoned") = target;
    }

    pub fn viewport(&self) -> (u32, u32) {
        *self.viewport.read().expect("slideshow viewport poisoned")
    }

    pub fn observe(&self, image: Option<String>) {
        self.observe_at(image, Instant::now());
    }

    fn observe_at(&self, image: Option<String>, now: Instant) {
        let mut phase = self.phase.write().expect("slideshow phase poisoned");
        advance(&mut phase, now);
        let next_phase = match (&*phase, image) {
            (_, None) => Phase::Placeholder,
            (Phase::Empty | Phase::Placeholder, Some(url)) => Phase::FadeIn {
                current: url,
                since: now,
            },
            (Phase::Steady { current }, Some(url)) if *current != url => Phase::FadeOut {
                current: current.clone(),
                next: url,
                since: now,
            },
            // Re-serving the picture already on screen is a no-op; fading
            // out and back in over the same file would just blink.
            (Phase::Steady { current }, Some(_)) => Phase::Steady {
                current: current.clone(),
            },
            // Mid-fade, retarget only when the new picture differs from
            // where the fade is already heading.
            (
                Phase::FadeOut {
                    current,
                    next,
                    since,
                },
                Some(url),
            ) => Phase::FadeOut {
                current: current.clone(),
                next: if *next == url { next.clone() } else { url },
                since: *since,
            },
            (Phase::FadeIn { current, since }, Some(url)) => {
                if *current == url {
                    Phase::FadeIn {
                        current: current.clone(),
                        since: *since,
                    }
                } else {
                    Phase::FadeOut {
                        current: current.clone(),
                        next: url,
                        since: now,
                    }
                }
            }
        };
        *phase = next_phase;
    }

    pub fn view(&self, now: Instant) -> SlideView {
        let mut phase = self.phase.write().expect("slideshow phase poisoned");
        advance(&mut phase, now);
        match &*phase {
            Phase::Empty => SlideView::Empty,
            Phase::Placeholder => SlideView::Placeholder,
            Phase::FadeOut { current, .. } => SlideView::Image {
                src: current.clone(),
                fading_out: true,
                fading_in: false,
            },
            Phase::FadeIn { current, .. } => SlideView::Image {
                src: current.clone(),
                fading_out: false,
                fading_in: true,
            },
            Phase::Steady { current } => SlideView::Image {
                src: current.clone(),
                fading_out: false,
                fading_in: false,
            },
        }
    }
}

pub fn spawn_refresher(slideshow: Arc<Slideshow>, backend: BackendClient, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let (width, height) = slideshow.viewport();
            let query = [("height", height.to_string()), ("width", width.to_string())];
            match backend
                .get_json::<ImagePayload>("/show/load_image/", &query)
                .await
            {
                Ok(payload) => {
                    let image = payload
                        .image
                        .map(|url| absolute_image_url(backend.base_url(), &url));
                    slideshow.observe(image);
                }
                // The frame keeps whatever it is showing when a poll fails.
                Err(err) => tracing::warn!("slide refresh failed: {err}"),
            }
        }
    });
}

// Slide URLs come back relative to the backend's media root.
fn absolute_image_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{base}{url}")
    }
}

fn advance(phase: &mut Phase, now: Instant) {
    loop {
        let next_phase = match &*phase {
            Phase::FadeOut { next, since, .. } if millis_since(*since, now) >= FADE_MILLIS => {
                Phase::FadeIn {
                    current: next.clone(),
                    since: *since + Duration::from_millis(FADE_MILLIS),
                }
            }
            Phase::FadeIn { current, since } if millis_since(*since, now) >= FADE_MILLIS => {
                Phase::Steady {
                    current: current.clone(),
                }
            }
            _ => return,
        };
        *phase = next_phase;
    }
}

fn millis_since(since: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(since).as_millis() as u64
}
