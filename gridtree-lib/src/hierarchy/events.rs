//! Hierarchy change notifications.

use std::fmt;

use serde::Serialize;

/// What kind of state transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// The hierarchy was (re)built by `initialize`.
    Build,
    Expand,
    Collapse,
    ExpandAll,
    CollapseAll,
    /// The engine released its state.
    Dispose,
}

/// Published after every hierarchy mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyEvent {
    pub kind: EventKind,
    /// Nodes whose expansion or visibility changed. For `Build` these are
    /// the new root ids.
    pub node_ids: Vec<String>,
}

impl HierarchyEvent {
    pub fn new(kind: EventKind, node_ids: Vec<String>) -> Self {
        Self { kind, node_ids }
    }
}

/// Which events a subscriber receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Every event.
    All,
    /// Only events of one kind.
    Kind(EventKind),
}

impl EventFilter {
    fn accepts(self, kind: EventKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kind(wanted) => wanted == kind,
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kind(kind)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__subscription_{}", self.0)
    }
}

type Handler = Box<dyn FnMut(&HierarchyEvent) + Send>;

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

/// Synchronous publish/subscribe channel.
///
/// Handlers run on the publishing call, in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler.
    pub fn subscribe<F>(&mut self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: FnMut(&HierarchyEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            filter: filter.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Delivers `event` to every matching handler.
    pub fn publish(&mut self, event: &HierarchyEvent) {
        for subscriber in &mut self.subscribers {
            if subscriber.filter.accepts(event.kind) {
                (subscriber.handler)(event);
            }
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drops every handler.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    fn recorder(
        log: &Arc<Mutex<Vec<String>>>,
        tag: &'static str,
    ) -> impl FnMut(&HierarchyEvent) + Send + 'static {
        let log = Arc::clone(log);
        move |event| {
            log.lock().unwrap().push(format!("{tag}:{:?}", event.kind));
        }
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventFilter::All, recorder(&log, "a"));
        bus.subscribe(EventKind::Expand, recorder(&log, "b"));
        bus.subscribe(EventFilter::All, recorder(&log, "c"));

        bus.publish(&HierarchyEvent::new(EventKind::Expand, vec![]));
        bus.publish(&HierarchyEvent::new(EventKind::Collapse, vec![]));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:Expand", "b:Expand", "c:Expand", "a:Collapse", "c:Collapse"]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let id = bus.subscribe(EventFilter::All, recorder(&log, "a"));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&HierarchyEvent::new(EventKind::Build, vec![]));

        assert!(log.lock().unwrap().is_empty());
        assert!(bus.is_empty());
    }
}
