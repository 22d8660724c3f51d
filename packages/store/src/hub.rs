//! In-process change fan-out shared by the contexts of one medium.
//!
//! Each context owns a queue. A mutation published by one context is queued
//! for every other context and delivered to that context's handlers when it
//! calls [`ChangeHub::pump`], mirroring how a browser queues `storage` events
//! on each window's event loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::note_store::Subscription;

/// A mutation as the medium sees it: raw key, `None` key for a full clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawChange {
    pub key: Option<String>,
    pub new_value: Option<String>,
}

pub(crate) type RawHandler = Box<dyn FnMut(RawChange)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ContextId(u64);

#[derive(Default)]
struct Slot {
    pending: VecDeque<RawChange>,
    handlers: Vec<(u64, RawHandler)>,
    cancelled: Vec<u64>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    contexts: Vec<(ContextId, Slot)>,
}

impl HubInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn slot_mut(&mut self, context: ContextId) -> Option<&mut Slot> {
        self.contexts
            .iter_mut()
            .find(|(id, _)| *id == context)
            .map(|(_, slot)| slot)
    }
}

#[derive(Clone, Default)]
pub(crate) struct ChangeHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ChangeHub {
    pub fn register(&self) -> ContextId {
        let mut inner = self.inner.borrow_mut();
        let id = ContextId(inner.next_id());
        inner.contexts.push((id, Slot::default()));
        id
    }

    pub fn unregister(&self, context: ContextId) {
        self.inner
            .borrow_mut()
            .contexts
            .retain(|(id, _)| *id != context);
    }

    /// Queue `change` for every context except `from`.
    pub fn publish(&self, from: ContextId, change: RawChange) {
        let mut inner = self.inner.borrow_mut();
        for (id, slot) in inner.contexts.iter_mut() {
            if *id != from {
                slot.pending.push_back(change.clone());
            }
        }
    }

    pub fn subscribe(&self, context: ContextId, handler: RawHandler) -> Subscription {
        let handler_id = {
            let mut inner = self.inner.borrow_mut();
            let handler_id = inner.next_id();
            if let Some(slot) = inner.slot_mut(context) {
                slot.handlers.push((handler_id, handler));
            }
            handler_id
        };
        let hub: Weak<RefCell<HubInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(hub) = hub.upgrade() else {
                return;
            };
            let mut inner = hub.borrow_mut();
            if let Some(slot) = inner.slot_mut(context) {
                let before = slot.handlers.len();
                slot.handlers.retain(|(id, _)| *id != handler_id);
                if slot.handlers.len() == before {
                    // Handlers are detached while a change is being delivered.
                    slot.cancelled.push(handler_id);
                }
            }
        })
    }

    pub fn pending(&self, context: ContextId) -> usize {
        self.inner
            .borrow_mut()
            .slot_mut(context)
            .map_or(0, |slot| slot.pending.len())
    }

    /// Deliver queued changes to the handlers of `context`. Returns the number
    /// of changes delivered.
    pub fn pump(&self, context: ContextId) -> usize {
        let mut delivered = 0;
        loop {
            let (change, mut handlers) = {
                let mut inner = self.inner.borrow_mut();
                let Some(slot) = inner.slot_mut(context) else {
                    return delivered;
                };
                let Some(change) = slot.pending.pop_front() else {
                    return delivered;
                };
                (change, std::mem::take(&mut slot.handlers))
            };

            // No borrow is held here: handlers may write to the medium.
            for (_, handler) in handlers.iter_mut() {
                handler(change.clone());
            }

            let mut inner = self.inner.borrow_mut();
            if let Some(slot) = inner.slot_mut(context) {
                let cancelled = std::mem::take(&mut slot.cancelled);
                handlers.retain(|(id, _)| !cancelled.contains(id));
                handlers.append(&mut slot.handlers);
                slot.handlers = handlers;
            }
            delivered += 1;
        }
    }
}
