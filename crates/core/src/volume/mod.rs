use std::{
    collections::HashMap,
    fmt,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex, MutexGuard,
    },
};

use serde::{Deserialize, Serialize};

/// A volume reading: the current step and the highest step the stream allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VolumeLevel {
    pub current: i32,
    pub max: i32,
}

impl VolumeLevel {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }

    /// Share of the maximum volume, `0.0` when the maximum is not positive.
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Identifies one registration with a [`VolumeSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Media volume provider.
///
/// Change notifications arrive through a [`VolumeSubscription`]; the owner of
/// the subscription drains it on its own thread, so listeners never run on
/// the thread that changed the volume.
pub trait VolumeSource {
    fn level(&self) -> VolumeLevel;

    fn current_volume(&self) -> i32 {
        self.level().current
    }

    fn max_volume(&self) -> i32 {
        self.level().max
    }

    fn subscribe(&self) -> VolumeSubscription;

    /// Ends a registration. Calling this on an already inactive subscription
    /// does nothing.
    fn unsubscribe(&self, subscription: &mut VolumeSubscription);
}

/// Receiving end of a volume change registration.
pub struct VolumeSubscription {
    id: SubscriptionId,
    receiver: Receiver<VolumeLevel>,
    release: Option<Box<dyn FnOnce(SubscriptionId) + Send>>,
}

impl VolumeSubscription {
    pub fn new(
        id: SubscriptionId,
        receiver: Receiver<VolumeLevel>,
        release: impl FnOnce(SubscriptionId) + Send + 'static,
    ) -> Self {
        Self {
            id,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Drains pending notifications and returns the newest one, if any.
    pub fn latest(&self) -> Option<VolumeLevel> {
        if !self.is_active() {
            return None;
        }
        self.receiver.try_iter().last()
    }

    /// Unregisters from the source. Returns `false` if this subscription was
    /// already released.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                release(self.id);
                true
            }
            None => false,
        }
    }
}

impl Drop for VolumeSubscription {
    fn drop(&mut self) {
        if self.release() {
            tracing::warn!(id = self.id.0, "volume subscription dropped while active");
        }
    }
}

impl fmt::Debug for VolumeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeSubscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Debug)]
struct VolumeState {
    level: VolumeLevel,
    next_id: u64,
    listeners: HashMap<SubscriptionId, Sender<VolumeLevel>>,
}

/// Thread-safe, clonable volume source held in memory.
///
/// Clones share the same state, so a background thread can change the volume
/// while the render thread holds a subscription.
#[derive(Debug, Clone)]
pub struct SharedVolume {
    state: Arc<Mutex<VolumeState>>,
}

impl SharedVolume {
    pub fn new(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            state: Arc::new(Mutex::new(VolumeState {
                level: VolumeLevel::new(current.clamp(0, max), max),
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Sets the volume, clamped into `[0, max]`, and notifies every
    /// subscriber when it actually changed.
    pub fn set_volume(&self, current: i32) -> VolumeLevel {
        let mut state = self.lock();
        let current = current.clamp(0, state.level.max);
        if current == state.level.current {
            return state.level;
        }
        state.level.current = current;
        let level = state.level;

        state
            .listeners
            .retain(|_, listener| listener.send(level).is_ok());
        tracing::debug!(current, max = level.max, "volume changed");
        level
    }

    pub fn step_volume(&self, delta: i32) -> VolumeLevel {
        let current = self.lock().level.current;
        self.set_volume(current.saturating_add(delta))
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, VolumeState> {
        // Listener bookkeeping stays consistent even if a holder panicked.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VolumeSource for SharedVolume {
    fn level(&self) -> VolumeLevel {
        self.lock().level
    }

    fn subscribe(&self) -> VolumeSubscription {
        let (sender, receiver) = mpsc::channel();
        let id = {
            let mut state = self.lock();
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            state.listeners.insert(id, sender);
            id
        };
        tracing::debug!(id = id.0, "volume subscription registered");

        let shared = Arc::downgrade(&self.state);
        VolumeSubscription::new(id, receiver, move |id| {
            if let Some(state) = shared.upgrade() {
                let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                state.listeners.remove(&id);
            }
            tracing::debug!(id = id.0, "volume subscription released");
        })
    }

    fn unsubscribe(&self, subscription: &mut VolumeSubscription) {
        subscription.release();
    }
}
