//! Single-slot "latest value" channel between independently paced loops
//!
//! The detection loop publishes, the render loop reads. Publishing replaces
//! whatever was there; reading never waits for a new value. Intermediate
//! values are dropped on purpose: a queue would make the render loop act on
//! stale gestures.

use tokio::sync::watch;

use super::gesture::GestureSignal;

#[derive(Debug, Clone)]
struct Stamped<T> {
    sequence: u64,
    value: T,
}

/// Writing half of a latest-value slot
#[derive(Debug)]
pub struct SlotWriter<T> {
    tx: watch::Sender<Stamped<T>>,
}

/// Reading half of a latest-value slot. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SlotReader<T> {
    rx: watch::Receiver<Stamped<T>>,
}

/// Create a slot holding `initial`, with sequence number 0
pub fn latest_slot<T: Clone>(initial: T) -> (SlotWriter<T>, SlotReader<T>) {
    let (tx, rx) = watch::channel(Stamped {
        sequence: 0,
        value: initial,
    });
    (SlotWriter { tx }, SlotReader { rx })
}

impl<T: Clone> SlotWriter<T> {
    /// Overwrite the slot. Returns the new sequence number.
    ///
    /// Succeeds even when every reader is gone.
    pub fn publish(&self, value: T) -> u64 {
        let mut sequence = 0;
        self.tx.send_modify(|slot| {
            slot.sequence += 1;
            slot.value = value;
            sequence = slot.sequence;
        });
        sequence
    }

    /// A new reader observing this slot
    pub fn reader(&self) -> SlotReader<T> {
        SlotReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone> SlotReader<T> {
    /// Most recently published value
    pub fn latest(&self) -> T {
        self.rx.borrow().value.clone()
    }

    /// Number of publishes so far
    pub fn sequence(&self) -> u64 {
        self.rx.borrow().sequence
    }

    /// Latest value together with the sequence number it was published under
    pub fn latest_with_sequence(&self) -> (T, u64) {
        let slot = self.rx.borrow();
        (slot.value.clone(), slot.sequence)
    }
}

/// Publisher side used by the detection loop
pub type SignalPublisher = SlotWriter<Option<GestureSignal>>;

/// Reader side used by the render loop
pub type SignalReader = SlotReader<Option<GestureSignal>>;

/// Slot for gesture signals, starting with "no hand"
pub fn signal_slot() -> (SignalPublisher, SignalReader) {
    latest_slot(None)
}
