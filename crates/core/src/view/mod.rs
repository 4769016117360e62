use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    AnimationState, Canvas, ColumnField, FrameTicker, Invalidate, Result, VolumeSource,
    VolumeSubscription, WaveAnimationController, WaveConfig, WaveRenderer,
};

/// Pending redraw marker consumed by the host once per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedrawFlag(bool);

impl RedrawFlag {
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

impl Invalidate for RedrawFlag {
    fn request_redraw(&mut self) {
        self.0 = true;
    }
}

/// Volume wave widget: a [`ColumnField`] animated by a
/// [`WaveAnimationController`] and highlighted from a [`VolumeSource`].
///
/// The host forwards its lifecycle events (size, visibility, user actions,
/// refresh callbacks) and paints through [`draw`](Self::draw) whenever
/// [`take_redraw`](Self::take_redraw) reports pending work. Volume changes are
/// applied on the host thread by [`poll_volume`](Self::poll_volume).
#[derive(Debug)]
pub struct WaveView<S: VolumeSource> {
    field: ColumnField,
    controller: WaveAnimationController<FrameTicker>,
    renderer: WaveRenderer,
    source: S,
    subscription: Option<VolumeSubscription>,
    rng: StdRng,
    redraw: RedrawFlag,
    bar_width: f32,
    bar_offset: f32,
    period: Duration,
}

impl<S: VolumeSource> WaveView<S> {
    /// Builds the view and subscribes to volume changes right away.
    pub fn new(config: &WaveConfig, source: S) -> Self {
        let mut view = Self {
            field: ColumnField::new(),
            controller: WaveAnimationController::new(config.paused),
            renderer: WaveRenderer::new(config),
            source,
            subscription: None,
            rng: StdRng::from_rng(&mut rand::rng()),
            redraw: RedrawFlag::default(),
            bar_width: config.bar_width_px(),
            bar_offset: config.bar_offset_px(),
            period: config.period(),
        };
        view.attach();
        view
    }

    /// Replaces the random source so column layouts are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Registers for volume changes. A view that is already subscribed keeps
    /// its existing registration.
    pub fn attach(&mut self) {
        if self.controller.is_detached() || self.subscription.is_some() {
            return;
        }
        self.subscription = Some(self.source.subscribe());
        self.refresh_highlight();
    }

    /// The drawing area changed: rebuild the columns and start animating.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        self.field
            .resize(width, height, self.bar_width, self.bar_offset, &mut self.rng);
        self.refresh_highlight();
        self.controller.install(FrameTicker::new(self.period));
        self.controller.start();
        self.redraw.request_redraw();
        tracing::info!(
            width,
            height,
            columns = self.field.column_count(),
            highlighted = self.field.highlight_count(),
            state = ?self.controller.state(),
            "wave view laid out"
        );
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        if visible {
            self.controller.visibility_shown();
        } else {
            self.controller.visibility_hidden();
        }
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn resume(&mut self) {
        self.controller.resume();
    }

    /// Applies pending volume notifications. Returns `true` if one arrived.
    pub fn poll_volume(&mut self) -> bool {
        let Some(level) = self.subscription.as_ref().and_then(VolumeSubscription::latest) else {
            return false;
        };
        self.field.refresh_highlight(level.current, level.max);
        self.redraw.request_redraw();
        true
    }

    /// Host refresh callback.
    pub fn on_frame(&mut self, delta: Duration) -> Option<f32> {
        self.controller
            .on_frame(delta, &mut self.field, &mut self.redraw)
    }

    /// Consumes the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        self.renderer.draw(&self.field, canvas)
    }

    /// Permanent teardown: stops the animation and drops the volume
    /// registration. Safe to call more than once.
    pub fn detach(&mut self) {
        self.controller.detach();
        if let Some(mut subscription) = self.subscription.take() {
            self.source.unsubscribe(&mut subscription);
        }
    }

    pub fn field(&self) -> &ColumnField {
        &self.field
    }

    pub fn renderer(&self) -> &WaveRenderer {
        &self.renderer
    }

    pub fn state(&self) -> AnimationState {
        self.controller.state()
    }

    pub fn is_user_paused(&self) -> bool {
        self.controller.is_user_paused()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn refresh_highlight(&mut self) {
        let level = self.source.level();
        self.field.refresh_highlight(level.current, level.max);
    }
}

impl<S: VolumeSource> Drop for WaveView<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
