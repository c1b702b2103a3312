//! Virtual-time executor for navigator commands.
//!
//! Frames fire on fixed interval boundaries. A message scheduled for the
//! next frame while a frame is running lands in the frame after it, which
//! is what lets the navigator wait for two paints. Timers with equal
//! deadlines fire in scheduling order. When a frame and a timer are due at
//! the same instant the timer runs first.

use anyhow::{Result, bail};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::time::Duration;

use super::command::Command;
use super::controller::{NavMsg, Navigator};

/// Upper bound on events processed by `run_until_idle`
const MAX_IDLE_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    /// No font loading API; font-ready corrections are skipped
    Unsupported,
    Loading,
    Ready,
}

pub struct NavRuntime {
    navigator: Navigator,
    now: Duration,
    frame_interval: Duration,
    frame_queue: Vec<NavMsg>,
    /// Keyed by (deadline, sequence number)
    timers: BTreeMap<(Duration, u64), NavMsg>,
    next_seq: u64,
    fonts: FontStatus,
    font_waiters: Vec<NavMsg>,
}

impl NavRuntime {
    pub fn new(navigator: Navigator, frame_interval: Duration) -> Self {
        Self {
            navigator,
            now: Duration::ZERO,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            frame_queue: Vec::new(),
            timers: BTreeMap::new(),
            next_seq: 0,
            fonts: FontStatus::Loading,
            font_waiters: Vec::new(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontStatus) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Virtual time since the runtime was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn fonts(&self) -> FontStatus {
        self.fonts
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_queue.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_font_waiters(&self) -> usize {
        self.font_waiters.len()
    }

    /// True when no frame or timer work is outstanding
    pub fn is_idle(&self) -> bool {
        self.frame_queue.is_empty() && self.timers.is_empty()
    }

    /// Run the page-load sequence
    pub fn start(&mut self) {
        let command = self.navigator.start();
        self.execute_command(command);
    }

    /// Deliver a message to the navigator and schedule whatever it returns
    pub fn dispatch(&mut self, msg: NavMsg) {
        trace!("[{:?}] dispatch {:?}", self.now, msg);
        let command = self.navigator.update(msg);
        self.execute_command(command);
    }

    /// Resolve outstanding font waiters
    pub fn signal_fonts_ready(&mut self) {
        if self.fonts == FontStatus::Unsupported {
            return;
        }
        self.fonts = FontStatus::Ready;
        let waiters = std::mem::take(&mut self.font_waiters);
        debug!("Fonts ready, releasing {} waiter(s)", waiters.len());
        for msg in waiters {
            self.dispatch(msg);
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.advance_to(self.now + by);
    }

    /// Fire every frame and timer due up to and including `target`
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(at) = self.next_event_at().filter(|at| *at <= target) {
            self.now = at;
            self.run_due();
        }
        if target > self.now {
            self.now = target;
        }
    }

    /// Advance until no frame or timer work remains
    pub fn run_until_idle(&mut self) -> Result<()> {
        for _ in 0..MAX_IDLE_STEPS {
            let Some(at) = self.next_event_at() else {
                return Ok(());
            };
            self.now = at;
            self.run_due();
        }
        bail!(
            "Navigation did not settle after {} steps ({} frames, {} timers pending)",
            MAX_IDLE_STEPS,
            self.frame_queue.len(),
            self.timers.len()
        )
    }

    fn next_frame_at(&self) -> Duration {
        let interval = self.frame_interval.as_nanos();
        let boundary = (self.now.as_nanos() / interval + 1) * interval;
        Duration::from_nanos(u64::try_from(boundary).unwrap_or(u64::MAX))
    }

    fn next_timer_at(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    fn next_event_at(&self) -> Option<Duration> {
        let frame = (!self.frame_queue.is_empty()).then(|| self.next_frame_at());
        match (self.next_timer_at(), frame) {
            (Some(timer), Some(frame)) => Some(timer.min(frame)),
            (timer, frame) => timer.or(frame),
        }
    }

    /// Run one unit of work due at `self.now`: a timer if one is due, else the frame
    fn run_due(&mut self) {
        if self.next_timer_at().is_some_and(|deadline| deadline <= self.now) {
            if let Some((_, msg)) = self.timers.pop_first() {
                self.dispatch(msg);
            }
            return;
        }

        let frame = std::mem::take(&mut self.frame_queue);
        trace!("[{:?}] frame with {} callback(s)", self.now, frame.len());
        for msg in frame {
            self.dispatch(msg);
        }
    }

    fn execute_command(&mut self, command: Command<NavMsg>) {
        match command {
            Command::None => {}

            Command::Batch(commands) => {
                for cmd in commands {
                    self.execute_command(cmd);
                }
            }

            Command::NextFrame(msg) => self.frame_queue.push(msg),

            Command::Delay { after, msg } => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.timers.insert((self.now + after, seq), msg);
            }

            Command::WhenFontsReady(msg) => match self.fonts {
                FontStatus::Unsupported => trace!("Font loading unsupported, dropping {:?}", msg),
                FontStatus::Loading => self.font_waiters.push(msg),
                FontStatus::Ready => self.frame_queue.push(msg),
            },
        }
    }
}
