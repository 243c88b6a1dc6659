//=========================================================================
// Event Bus
//=========================================================================
//
// Synchronous publish/subscribe channel shared by the orchestrator and
// scene content.
//
// Architecture:
//   subscribe(topic, handler) → HashMap<Topic, Vec<(id, Handler)>>
//                                        ↓
//   publish(event) ── snapshot handlers for event.topic() ──→ call in order
//
// The bus is a cheap cloneable handle; every clone sees the same
// registry. Handlers may publish while being invoked: the nested publish
// runs to completion before the outer one moves to its next handler.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{Event, Topic};

//=== Handler Types =======================================================

type Handler = Rc<dyn Fn(&Event)>;

/// Token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "dropping the subscription makes it impossible to unsubscribe"]
pub struct Subscription {
    topic: Topic,
    id: u64,
}

impl Subscription {
    /// Topic this subscription listens on.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<Topic, Vec<(u64, Handler)>>,
}

//=== EventBus ============================================================

/// In-process, single-threaded publish/subscribe bus.
///
/// Constructed explicitly and handed to each component; there is no
/// process-wide instance.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `handler` for `topic`.
    ///
    /// Handlers run in registration order. A handler added while a publish
    /// on the same topic is running is first called by the next publish.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&Event) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;

        registry
            .handlers
            .entry(topic)
            .or_default()
            .push((id, Rc::new(handler)));

        trace!(target: "stage::bus", "Subscribed #{} to {:?}", id, topic);
        Subscription { topic, id }
    }

    /// Removes a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(handlers) = registry.handlers.get_mut(&subscription.topic) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        before != handlers.len()
    }

    //--- Publishing -------------------------------------------------------

    /// Invokes every handler subscribed to the event's topic.
    ///
    /// The handler list is captured before the first call, so handlers are
    /// free to subscribe, unsubscribe or publish from inside the callback.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        let snapshot: Vec<Handler> = {
            let registry = self.registry.borrow();
            match registry.handlers.get(&topic) {
                Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
                None => Vec::new(),
            }
        };

        trace!(
            target: "stage::bus",
            "Publishing {:?} to {} handler(s)",
            topic,
            snapshot.len()
        );

        for handler in snapshot {
            handler(&event);
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of handlers currently subscribed to `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .borrow()
            .handlers
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("EventBus")
            .field("topics", &registry.handlers.len())
            .field("next_id", &registry.next_id)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish(Event::HideAll);
        assert_eq!(bus.subscriber_count(Topic::HideAll), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = recorder();

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            let _ = bus.subscribe(Topic::ShellRised, move |_| {
                log.borrow_mut().push(name.to_string())
            });
        }

        bus.publish(Event::ShellRised);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn handlers_only_see_their_topic() {
        let bus = EventBus::new();
        let log = recorder();

        let l = Rc::clone(&log);
        let _ = bus.subscribe(Topic::PauseAll, move |event| {
            l.borrow_mut().push(format!("{:?}", event))
        });

        bus.publish(Event::HideAll);
        bus.publish(Event::PauseAll(true));

        assert_eq!(*log.borrow(), vec!["PauseAll(true)"]);
    }

    #[test]
    fn nested_publish_completes_depth_first() {
        let bus = EventBus::new();
        let log = recorder();

        let (l, inner_bus) = (Rc::clone(&log), bus.clone());
        let _ = bus.subscribe(Topic::ShellRised, move |_| {
            l.borrow_mut().push("outer-1".into());
            inner_bus.publish(Event::ElevationStarted);
        });

        let l = Rc::clone(&log);
        let _ = bus.subscribe(Topic::ShellRised, move |_| {
            l.borrow_mut().push("outer-2".into())
        });

        let l = Rc::clone(&log);
        let _ = bus.subscribe(Topic::ElevationStarted, move |_| {
            l.borrow_mut().push("nested".into())
        });

        bus.publish(Event::ShellRised);
        assert_eq!(*log.borrow(), vec!["outer-1", "nested", "outer-2"]);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let bus = EventBus::new();
        let log = recorder();

        let l = Rc::clone(&log);
        let sub = bus.subscribe(Topic::HideAll, move |_| l.borrow_mut().push("hit".into()));

        bus.publish(Event::HideAll);
        assert!(bus.unsubscribe(sub));
        bus.publish(Event::HideAll);

        assert_eq!(log.borrow().len(), 1);
        assert!(!bus.unsubscribe(sub), "second unsubscribe should report false");
    }

    #[test]
    fn subscribing_during_publish_applies_next_time() {
        let bus = EventBus::new();
        let log = recorder();

        let (l, inner_bus) = (Rc::clone(&log), bus.clone());
        let _ = bus.subscribe(Topic::HideAll, move |_| {
            let l = Rc::clone(&l);
            let _ = inner_bus.subscribe(Topic::HideAll, move |_| l.borrow_mut().push("late".into()));
        });

        bus.publish(Event::HideAll);
        assert!(log.borrow().is_empty());

        bus.publish(Event::HideAll);
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn clones_share_registry() {
        let bus = EventBus::new();
        let other = bus.clone();
        let _ = other.subscribe(Topic::StageChanged, |_| {});
        assert_eq!(bus.subscriber_count(Topic::StageChanged), 1);
    }
}
