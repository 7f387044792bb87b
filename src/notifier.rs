//! Change notification with batch coalescing.
//!
//! Writes report the affected resource identifier here rather than talking to
//! the subscription transport directly. In the default Immediate mode every
//! write publishes right away; during a batch the notifier is switched to
//! Held mode and collects identifiers into an insertion-ordered set, which is
//! flushed once when the batch completes.

use std::sync::Arc;

use crate::contract::ResourceUri;

/// Subscription transport for "data behind this identifier changed" events.
///
/// The transport is an injected capability and may be absent; the provider
/// then drops notifications and query results signal the absence explicitly.
pub trait NotificationTransport: Send + Sync {
    /// Publish a change event for the given identifier.
    fn notify_change(&self, uri: &ResourceUri);

    /// Record that an open result set depends on the given identifier.
    fn register_observer(&self, uri: &ResourceUri);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotifyMode {
    Immediate,
    Held,
}

/// Two-mode change notifier owned by a provider instance.
///
/// The mode flag and pending set are single-writer state: only the thread
/// executing the current batch may mutate them, which the provider enforces
/// by requiring `&mut self` on all write paths.
pub struct ChangeNotifier {
    transport: Option<Arc<dyn NotificationTransport>>,
    mode: NotifyMode,
    pending: Vec<ResourceUri>,
}

impl ChangeNotifier {
    pub fn new(transport: Option<Arc<dyn NotificationTransport>>) -> Self {
        Self {
            transport,
            mode: NotifyMode::Immediate,
            pending: Vec::new(),
        }
    }

    pub fn transport(&self) -> Option<&dyn NotificationTransport> {
        self.transport.as_deref()
    }

    /// Report a change for `uri`.
    ///
    /// Immediate mode publishes synchronously, without deduplication. Held
    /// mode appends to the pending set, discarding duplicates so repeated
    /// writes to one resource inside a batch coalesce to a single event.
    pub fn notify(&mut self, uri: ResourceUri) {
        match self.mode {
            NotifyMode::Held => {
                if !self.pending.contains(&uri) {
                    self.pending.push(uri);
                }
            }
            NotifyMode::Immediate => match &self.transport {
                Some(transport) => transport.notify_change(&uri),
                None => tracing::trace!(%uri, "no transport attached, dropping notification"),
            },
        }
    }

    /// Enter Held mode at the start of a batch, discarding any stale
    /// pending entries.
    pub fn hold(&mut self) {
        self.pending.clear();
        self.mode = NotifyMode::Held;
    }

    /// Revert to Immediate mode and publish all pending identifiers in
    /// insertion order. Runs whether the batch succeeded or failed; with no
    /// transport attached the pending entries are silently dropped.
    pub fn release(&mut self) {
        self.mode = NotifyMode::Immediate;
        let pending = std::mem::take(&mut self.pending);
        match &self.transport {
            Some(transport) => {
                for uri in &pending {
                    transport.notify_change(uri);
                }
            }
            None => {
                if !pending.is_empty() {
                    tracing::trace!(
                        count = pending.len(),
                        "no transport attached, dropping pending notifications"
                    );
                }
            }
        }
    }
}

/// Records published identifiers for assertions in tests.
#[cfg(test)]
pub(crate) struct RecordingTransport {
    pub(crate) notified: std::sync::Mutex<Vec<String>>,
    pub(crate) observed: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            notified: std::sync::Mutex::new(Vec::new()),
            observed: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[cfg(test)]
impl NotificationTransport for RecordingTransport {
    fn notify_change(&self, uri: &ResourceUri) {
        self.notified.lock().unwrap().push(uri.to_string());
    }

    fn register_observer(&self, uri: &ResourceUri) {
        self.observed.lock().unwrap().push(uri.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> ResourceUri {
        ResourceUri::parse(s).unwrap()
    }

    #[test]
    fn test_immediate_mode_publishes_each_call() {
        let transport = RecordingTransport::new();
        let mut notifier = ChangeNotifier::new(Some(transport.clone()));

        notifier.notify(uri("content://gallery/chosen_photos/1"));
        notifier.notify(uri("content://gallery/chosen_photos/1"));

        // No dedup outside a batch.
        assert_eq!(transport.notified.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_held_mode_coalesces_and_flushes_in_order() {
        let transport = RecordingTransport::new();
        let mut notifier = ChangeNotifier::new(Some(transport.clone()));

        notifier.hold();
        notifier.notify(uri("content://gallery/chosen_photos/1"));
        notifier.notify(uri("content://gallery/chosen_photos/2"));
        notifier.notify(uri("content://gallery/chosen_photos/1"));
        assert!(transport.notified.lock().unwrap().is_empty());

        notifier.release();
        let notified = transport.notified.lock().unwrap();
        assert_eq!(
            *notified,
            vec![
                "content://gallery/chosen_photos/1".to_string(),
                "content://gallery/chosen_photos/2".to_string(),
            ]
        );
    }

    #[test]
    fn test_hold_clears_stale_pending_entries() {
        let transport = RecordingTransport::new();
        let mut notifier = ChangeNotifier::new(Some(transport.clone()));

        notifier.hold();
        notifier.notify(uri("content://gallery/chosen_photos/1"));
        // A second hold (a new batch) discards what the first one gathered.
        notifier.hold();
        notifier.notify(uri("content://gallery/chosen_photos/2"));
        notifier.release();

        let notified = transport.notified.lock().unwrap();
        assert_eq!(*notified, vec!["content://gallery/chosen_photos/2".to_string()]);
    }

    #[test]
    fn test_release_reverts_to_immediate() {
        let transport = RecordingTransport::new();
        let mut notifier = ChangeNotifier::new(Some(transport.clone()));

        notifier.hold();
        notifier.release();
        notifier.notify(uri("content://gallery/chosen_photos/3"));

        assert_eq!(transport.notified.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_absent_transport_drops_silently() {
        let mut notifier = ChangeNotifier::new(None);
        notifier.notify(uri("content://gallery/chosen_photos/1"));
        notifier.hold();
        notifier.notify(uri("content://gallery/chosen_photos/2"));
        notifier.release();
        // Nothing to assert beyond "does not panic"; absence is not an error.
    }
}
