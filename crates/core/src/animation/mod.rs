use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ColumnField, Ticker};

/// Observable state of the wave animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationState {
    /// No ticker, never started, or permanently detached.
    Stopped,
    Running,
    Paused,
}

/// Receiver of redraw requests issued after each animation tick.
pub trait Invalidate {
    fn request_redraw(&mut self);
}

impl<F: FnMut()> Invalidate for F {
    fn request_redraw(&mut self) {
        self()
    }
}

/// Drives a [`ColumnField`] from a [`Ticker`] and arbitrates between user
/// pauses and visibility changes.
///
/// A pause requested by the user is sticky: the view becoming visible again
/// will not restart the animation until [`resume`](Self::resume) is called.
/// A visibility-driven stop leaves that flag alone.
///
/// The controller does not own the field. The host lends it for the duration
/// of every [`on_frame`](Self::on_frame) call.
#[derive(Debug)]
pub struct WaveAnimationController<T: Ticker> {
    ticker: Option<T>,
    user_paused: bool,
    detached: bool,
}

impl<T: Ticker> WaveAnimationController<T> {
    /// Creates a controller without a ticker. `paused` seeds the sticky user
    /// pause flag.
    pub fn new(paused: bool) -> Self {
        Self {
            ticker: None,
            user_paused: paused,
            detached: false,
        }
    }

    /// Installs the ticker once the field size is known. A controller that
    /// already holds a ticker keeps it.
    pub fn install(&mut self, ticker: T) {
        if self.detached || self.ticker.is_some() {
            return;
        }
        self.ticker = Some(ticker);
    }

    /// Starts or resumes ticking unless the user paused the animation.
    pub fn start(&mut self) {
        if self.user_paused || self.detached {
            return;
        }
        let Some(ticker) = self.ticker.as_mut() else {
            return;
        };

        if ticker.is_started() && ticker.is_paused() {
            ticker.resume();
        } else if !ticker.is_started() {
            ticker.start();
        } else {
            return;
        }
        tracing::debug!("wave animation running");
    }

    /// Suspends ticking without touching the user pause flag.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.as_mut() {
            if ticker.is_started() && !ticker.is_paused() {
                ticker.pause();
                tracing::debug!("wave animation suspended");
            }
        }
    }

    /// User pause. Survives visibility changes.
    pub fn pause(&mut self) {
        self.user_paused = true;
        self.stop();
    }

    /// User resume. Clears the sticky pause and starts ticking.
    pub fn resume(&mut self) {
        self.user_paused = false;
        self.start();
    }

    pub fn visibility_shown(&mut self) {
        self.start();
    }

    pub fn visibility_hidden(&mut self) {
        self.stop();
    }

    /// Releases the ticker for good. Later calls are no-ops, and no frame is
    /// delivered to the field after this returns.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.detached = true;
        tracing::debug!("wave animation detached");
    }

    /// Host refresh callback. While running, advances every column exactly
    /// once and requests one redraw. Returns the ticker progress when a tick
    /// happened.
    pub fn on_frame<I: Invalidate + ?Sized>(
        &mut self,
        delta: Duration,
        field: &mut ColumnField,
        redraw: &mut I,
    ) -> Option<f32> {
        if self.detached {
            return None;
        }
        let progress = self.ticker.as_mut()?.poll(delta)?;
        field.tick();
        redraw.request_redraw();
        Some(progress)
    }

    pub fn state(&self) -> AnimationState {
        match self.ticker.as_ref() {
            Some(ticker) if ticker.is_started() && ticker.is_paused() => AnimationState::Paused,
            Some(ticker) if ticker.is_started() => AnimationState::Running,
            _ => AnimationState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == AnimationState::Running
    }

    pub fn is_user_paused(&self) -> bool {
        self.user_paused
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn ticker(&self) -> Option<&T> {
        self.ticker.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::FrameTicker;

    const FRAME: Duration = Duration::from_millis(16);

    fn running() -> WaveAnimationController<FrameTicker> {
        let mut controller = WaveAnimationController::new(false);
        controller.install(FrameTicker::default());
        controller.start();
        controller
    }

    fn field() -> ColumnField {
        let mut field = ColumnField::new();
        field.resize(100.0, 60.0, 4.0, 8.0, &mut StdRng::seed_from_u64(21));
        field
    }

    #[test]
    fn starts_only_once_a_ticker_is_installed() {
        let mut controller = WaveAnimationController::<FrameTicker>::new(false);
        controller.start();
        assert_eq!(controller.state(), AnimationState::Stopped);

        controller.install(FrameTicker::default());
        assert_eq!(controller.state(), AnimationState::Stopped);
        controller.start();
        assert_eq!(controller.state(), AnimationState::Running);
    }

    #[test]
    fn user_pause_survives_visibility() {
        let mut controller = running();
        controller.pause();
        controller.visibility_shown();
        assert_eq!(controller.state(), AnimationState::Paused);
        assert!(controller.is_user_paused());

        controller.resume();
        assert_eq!(controller.state(), AnimationState::Running);
    }

    #[test]
    fn visibility_pause_is_not_sticky() {
        let mut controller = running();
        controller.visibility_hidden();
        assert_eq!(controller.state(), AnimationState::Paused);
        assert!(!controller.is_user_paused());

        controller.visibility_shown();
        assert_eq!(controller.state(), AnimationState::Running);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut controller = running();
        controller.pause();
        controller.pause();
        assert_eq!(controller.state(), AnimationState::Paused);
        assert!(controller.is_user_paused());

        controller.resume();
        controller.resume();
        assert_eq!(controller.state(), AnimationState::Running);
        assert!(!controller.is_user_paused());
    }

    #[test]
    fn initially_paused_waits_for_resume() {
        let mut controller = WaveAnimationController::new(true);
        controller.install(FrameTicker::default());
        controller.start();
        controller.visibility_shown();
        assert_eq!(controller.state(), AnimationState::Stopped);

        controller.resume();
        assert_eq!(controller.state(), AnimationState::Running);
    }

    #[test]
    fn install_keeps_the_first_ticker() {
        let mut controller = running();
        controller.on_frame(Duration::from_millis(500), &mut field(), &mut || {});
        controller.install(FrameTicker::default());
        assert_eq!(controller.ticker().map(|t| t.clock().progress()), Some(0.5));
        assert!(controller.is_running());
    }

    #[test]
    fn each_frame_ticks_once_and_requests_one_redraw() {
        let mut controller = running();
        let mut field = field();
        let mut expected = field.clone();
        let mut redraws = 0;

        for _ in 0..5 {
            let progress = controller.on_frame(FRAME, &mut field, &mut || redraws += 1);
            assert!(progress.is_some());
            expected.tick();
        }

        assert_eq!(redraws, 5);
        assert_eq!(field.snapshot(), expected.snapshot());
    }

    #[test]
    fn paused_frames_leave_field_alone() {
        let mut controller = running();
        let mut field = field();
        let before = field.snapshot();
        let mut redraws = 0;

        controller.pause();
        assert_eq!(controller.on_frame(FRAME, &mut field, &mut || redraws += 1), None);
        assert_eq!(field.snapshot(), before);
        assert_eq!(redraws, 0);
    }

    #[test]
    fn detach_stops_ticks_for_good() {
        let mut controller = running();
        let mut field = field();
        controller.on_frame(FRAME, &mut field, &mut || {});

        controller.detach();
        let after_detach = field.snapshot();
        let mut redraws = 0;
        for _ in 0..3 {
            assert_eq!(controller.on_frame(FRAME, &mut field, &mut || redraws += 1), None);
        }
        assert_eq!(field.snapshot(), after_detach);
        assert_eq!(redraws, 0);
        assert_eq!(controller.state(), AnimationState::Stopped);

        controller.resume();
        controller.visibility_shown();
        controller.install(FrameTicker::default());
        controller.start();
        assert_eq!(controller.state(), AnimationState::Stopped);
        assert!(controller.ticker().is_none());

        controller.detach();
        assert!(controller.is_detached());
    }
}
