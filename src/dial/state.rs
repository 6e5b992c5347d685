use super::{VALUE_MAX, VALUE_MIN};
use derive_more::{Deref, Display, Into};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A dial reading. Always within `[VALUE_MIN, VALUE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Deref, Into)]
pub struct Value(f64);

impl Value {
    pub const MIN: Value = Value(VALUE_MIN);
    pub const MAX: Value = Value(VALUE_MAX);

    /// Clamps `raw` into range. NaN collapses to the minimum.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self(raw.clamp(VALUE_MIN, VALUE_MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Share of the full circle covered by this value, in `[0, 1]`.
    pub fn fraction(self) -> f64 {
        (self.0 - VALUE_MIN) / (VALUE_MAX - VALUE_MIN)
    }
}

impl From<f64> for Value {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(Value)>;

/// Shared handle to the dial state. The hosting component owns the state and
/// hands clones of this handle to the input handler and the renderer.
pub type DialHandle = Rc<RefCell<DialState>>;

pub struct DialState {
    value: Value,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl DialState {
    pub fn new(initial: f64) -> Self {
        Self {
            value: Value::new(initial),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn into_handle(self) -> DialHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn get(&self) -> Value {
        self.value
    }

    /// Clamps and stores `new_value`. Subscribers hear about it only when the
    /// stored value actually changes.
    pub fn set(&mut self, new_value: f64) -> Value {
        let value = Value::new(new_value);
        if value != self.value {
            self.value = value;
            self.notify();
        }
        self.value
    }

    /// Registers a change callback. Callbacks run while the state is mutably
    /// borrowed, so they must not borrow the handle again.
    pub fn subscribe(&mut self, subscriber: impl FnMut(Value) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        let value = self.value;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(value);
        }
    }
}

impl Default for DialState {
    fn default() -> Self {
        Self::new(VALUE_MIN)
    }
}

impl fmt::Debug for DialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialState")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
