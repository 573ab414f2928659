use event_emitter_rs::EventEmitter;
use serde::Serialize;

pub const PAGE_ADVANCED: &str = "PageAdvanced";
pub const FETCH_STARTED: &str = "FetchStarted";
pub const PAGE_APPENDED: &str = "PageAppended";
pub const FETCH_ENDED: &str = "FetchEnded";

/// A change notification waiting to be emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedEvent {
    pub event_type: String,
    pub data: String,
}

/// Queues change notifications while state is being mutated and emits them
/// once the mutation is done. Listeners run on emitter threads.
pub struct FeedNotifier {
    event_emitter: EventEmitter,
    events_to_emit: Vec<FeedEvent>,
}

impl Default for FeedNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedNotifier {
    pub fn new() -> Self {
        Self {
            event_emitter: EventEmitter::new(),
            events_to_emit: Vec::new(),
        }
    }

    pub fn enqueue(&mut self, event_type: impl Into<String>, data: impl Into<String>) {
        self.events_to_emit.push(FeedEvent {
            event_type: event_type.into(),
            data: data.into(),
        });
    }

    /// Queue a notification with a JSON payload.
    pub fn enqueue_with<T: Serialize>(&mut self, event_type: impl Into<String>, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(data) => self.enqueue(event_type, data),
            Err(err) => log::warn!("dropping notification, payload not serializable: {}", err),
        }
    }

    pub fn on<F>(&mut self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.event_emitter.on(event, listener);
    }

    pub fn emit_queued(&mut self) {
        let events: Vec<_> = self.events_to_emit.drain(..).collect();
        for event in events {
            self.event_emitter.emit(&event.event_type, event.data);
        }
    }

    pub fn queued(&self) -> &[FeedEvent] {
        &self.events_to_emit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn enqueue_and_emit() {
        let mut notifier = FeedNotifier::new();
        let (tx, rx) = mpsc::channel();
        let tx = std::sync::Mutex::new(tx);

        notifier.on(PAGE_ADVANCED, move |data| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(data);
            }
        });

        notifier.enqueue_with(PAGE_ADVANCED, &serde_json::json!({ "page": 1 }));
        assert_eq!(notifier.queued().len(), 1);
        assert_eq!(notifier.queued()[0].data, r#"{"page":1}"#);

        notifier.emit_queued();
        assert!(notifier.queued().is_empty());

        // listeners run on their own thread
        let data = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(data, r#"{"page":1}"#);
    }
}
