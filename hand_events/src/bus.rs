//! Synchronous observer list.
//!
//! Handlers are invoked in registration order on the emitting thread.  A
//! panic inside one handler is caught, logged, and does not stop the
//! remaining handlers or the caller.

use std::panic::{self, AssertUnwindSafe};

use log::error;

use crate::event::{ClickEvent, Event, EventKind, MoveEvent};

/// Token returned by [`EventBus::on`]; pass it to [`EventBus::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&Event)>;

struct Slot {
    id:      HandlerId,
    kind:    EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    slots:   Vec<Slot>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to every event of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot { id, kind, handler: Box::new(handler) });
        id
    }

    pub fn on_move<F>(&mut self, mut handler: F) -> HandlerId
    where
        F: FnMut(&MoveEvent) + 'static,
    {
        self.on(EventKind::Move, move |e| {
            if let Event::Move(m) = e {
                handler(m)
            }
        })
    }

    pub fn on_click<F>(&mut self, mut handler: F) -> HandlerId
    where
        F: FnMut(&ClickEvent) + 'static,
    {
        self.on(EventKind::Click, move |e| {
            if let Event::Click(c) = e {
                handler(c)
            }
        })
    }

    pub fn on_frame_count<F>(&mut self, mut handler: F) -> HandlerId
    where
        F: FnMut() + 'static,
    {
        self.on(EventKind::FrameCount, move |_| handler())
    }

    /// Unsubscribe.  Returns false if the handler was already gone.
    pub fn off(&mut self, id: HandlerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.slots.iter().filter(|s| s.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Deliver `event` to its subscribers.  Returns how many of them
    /// completed without panicking.
    pub fn emit(&mut self, event: &Event) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for slot in self.slots.iter_mut().filter(|s| s.kind == kind) {
            let handler = &mut slot.handler;
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(())   => delivered += 1,
                Err(err) => {
                    let msg = err
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| err.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "<non-string panic>".to_string());
                    error!("{} handler {:?} panicked: {}", kind, slot.id, msg);
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_tracker::{GestureLabel, HandId};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn move_event() -> Event {
        Event::Move(MoveEvent {
            x: 0.5, y: 0.5, id: HandId(0), gesture: GestureLabel::OpenPalm, thickness: 1.0,
        })
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for n in 0..3 {
            let log = log.clone();
            bus.on(EventKind::Move, move |_| log.borrow_mut().push(n));
        }
        bus.emit(&move_event());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn events_reach_only_their_kind() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let h = hits.clone();
        bus.on_click(move |_| *h.borrow_mut() += 1);
        bus.emit(&move_event());
        bus.emit(&Event::FrameCount);
        assert_eq!(*hits.borrow(), 0);
        bus.emit(&Event::Click(ClickEvent { x: 0.1, y: 0.2 }));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_removes_only_that_handler() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let (a, b) = (hits.clone(), hits.clone());
        let first = bus.on_frame_count(move || a.borrow_mut().push("a"));
        bus.on_frame_count(move || b.borrow_mut().push("b"));

        assert!(bus.off(first));
        assert!(!bus.off(first));
        bus.emit(&Event::FrameCount);
        assert_eq!(*hits.borrow(), vec!["b"]);
        assert_eq!(bus.handler_count(EventKind::FrameCount), 1);
    }

    #[test]
    fn panicking_handler_does_not_stop_the_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        bus.on_frame_count(|| panic!("scene blew up"));
        let h = hits.clone();
        bus.on_frame_count(move || *h.borrow_mut() += 1);

        let delivered = bus.emit(&Event::FrameCount);
        assert_eq!(delivered, 1);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [EventKind::Move, EventKind::Click, EventKind::FrameCount] {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::from_name("hover"), None);
    }
}
