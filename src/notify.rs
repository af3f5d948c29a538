//! Change notifications
//!
//! Observers subscribe to an address and are called synchronously, on the
//! mutating thread, after a write to that address commits. Subscriptions are
//! owned by whoever created them and last until explicitly removed.

use crate::uri::ContentUri;
use crossbeam::channel::{self, Receiver, Sender};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives change notifications.
///
/// Handlers run on the thread that performed the write and must return
/// promptly.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, uri: &ContentUri);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ContentUri) + Send + Sync,
{
    fn on_change(&self, uri: &ContentUri) {
        self(uri)
    }
}

/// A single delivered notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub uri: ContentUri,
}

/// Observer that forwards every notification into a channel, for consumers
/// that want to react on their own thread.
pub struct ChannelObserver {
    tx: Sender<ChangeEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<ChangeEvent>) {
        let (tx, rx) = channel::unbounded::<ChangeEvent>();
        (Self { tx }, rx)
    }
}

impl ChangeObserver for ChannelObserver {
    fn on_change(&self, uri: &ContentUri) {
        if self.tx.send(ChangeEvent { uri: uri.clone() }).is_err() {
            tracing::debug!("Change receiver dropped, skipping {}", uri);
        }
    }
}

/// Token returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    uri: ContentUri,
}

impl SubscriptionHandle {
    /// Unique per subscription, even for the same address
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Address this subscription watches
    pub fn uri(&self) -> &ContentUri {
        &self.uri
    }
}

struct Subscription {
    id: u64,
    uri: ContentUri,
    descendants: bool,
    observer: Arc<dyn ChangeObserver>,
}

impl Subscription {
    /// A change at `changed` reaches this subscription when it is the same
    /// address, an ancestor of it (the rows beneath changed), or, with
    /// `descendants`, anything beneath it.
    fn matches(&self, changed: &ContentUri) -> bool {
        self.uri == *changed
            || is_ancestor(changed, &self.uri)
            || (self.descendants && is_ancestor(&self.uri, changed))
    }
}

/// Strict path-prefix test on the same scheme and authority
fn is_ancestor(ancestor: &ContentUri, uri: &ContentUri) -> bool {
    ancestor.scheme == uri.scheme
        && ancestor.authority == uri.authority
        && ancestor.segments.len() < uri.segments.len()
        && uri.segments.starts_with(&ancestor.segments)
}

/// Registry of active subscriptions
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        uri: ContentUri,
        descendants: bool,
        observer: Arc<dyn ChangeObserver>,
    ) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Subscription {} on {} (descendants: {})", id, uri, descendants);
        self.lock().push(Subscription {
            id,
            uri: uri.clone(),
            descendants,
            observer,
        });
        SubscriptionHandle { id, uri }
    }

    /// Remove a subscription. Returns false if it was already removed.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let mut subscriptions = self.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != handle.id);
        before != subscriptions.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.lock().len()
    }

    /// Deliver a change to every matching subscription, returning how many
    /// observers were called.
    pub fn notify(&self, uri: &ContentUri) -> usize {
        // Observers run outside the lock so they can unsubscribe themselves.
        let observers: Vec<Arc<dyn ChangeObserver>> = self
            .lock()
            .iter()
            .filter(|s| s.matches(uri))
            .map(|s| Arc::clone(&s.observer))
            .collect();

        tracing::debug!("Notifying {} observer(s) of change at {}", observers.len(), uri);
        for observer in &observers {
            observer.on_change(uri);
        }
        observers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::TeaUris;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Arc<dyn ChangeObserver>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let observer = move |_: &ContentUri| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        (count, Arc::new(observer))
    }

    #[test]
    fn test_exact_match() {
        let uris = TeaUris::default();
        let notifier = ChangeNotifier::new();
        let (count, observer) = counter();
        notifier.subscribe(uris.item_uri(1), false, observer);

        notifier.notify(&uris.item_uri(1));
        notifier.notify(&uris.item_uri(2));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_collection_change_reaches_items() {
        let uris = TeaUris::default();
        let notifier = ChangeNotifier::new();
        let (count, observer) = counter();
        notifier.subscribe(uris.item_uri(4), false, observer);

        assert_eq!(notifier.notify(&uris.collection_uri()), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_descendants_flag() {
        let uris = TeaUris::default();
        let notifier = ChangeNotifier::new();
        let (narrow, narrow_observer) = counter();
        let (wide, wide_observer) = counter();
        notifier.subscribe(uris.collection_uri(), false, narrow_observer);
        notifier.subscribe(uris.collection_uri(), true, wide_observer);

        notifier.notify(&uris.item_uri(9));
        assert_eq!(narrow.load(Ordering::SeqCst), 0);
        assert_eq!(wide.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let uris = TeaUris::default();
        let notifier = ChangeNotifier::new();
        let (count, observer) = counter();
        let handle = notifier.subscribe(uris.collection_uri(), true, observer);
        let (_, other_observer) = counter();
        let other = notifier.subscribe(uris.collection_uri(), true, other_observer);
        assert_ne!(handle.id(), other.id());
        assert_eq!(handle.uri(), &uris.collection_uri());

        assert!(notifier.unsubscribe(&handle));
        assert_eq!(notifier.subscription_count(), 1);
        assert!(notifier.unsubscribe(&other));
        assert!(!notifier.unsubscribe(&handle));
        notifier.notify(&uris.collection_uri());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscription_count(), 0);
    }

    #[test]
    fn test_other_authority_ignored() {
        let notifier = ChangeNotifier::new();
        let (count, observer) = counter();
        notifier.subscribe(TeaUris::default().collection_uri(), true, observer);

        notifier.notify(&TeaUris::new("other.app").item_uri(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_channel_observer() {
        let uris = TeaUris::default();
        let notifier = ChangeNotifier::new();
        let (observer, rx) = ChannelObserver::new();
        notifier.subscribe(uris.collection_uri(), true, Arc::new(observer));

        notifier.notify(&uris.item_uri(3));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.uri, uris.item_uri(3));
        assert!(rx.try_recv().is_err());
    }
}
