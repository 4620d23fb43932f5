//! Cancellable live subscriptions.
//!
//! A [`Subscription`] is a long-lived stream of snapshots. It owns a cancel
//! guard: dropping the subscription (or calling [`Subscription::cancel`])
//! runs the guard exactly once, which unregisters the watcher from its
//! store. Views hold their subscription by value, so tearing a view down
//! always cancels its feed.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;

/// A live sequence of snapshots, cancelled on drop.
pub struct Subscription<T> {
    stream: BoxStream<'static, T>,
    guard: CancelGuard,
}

struct CancelGuard(Option<Box<dyn FnOnce() + Send>>);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.0.take() {
            cancel();
        }
    }
}

impl<T: Send + 'static> Subscription<T> {
    /// Wrap a stream with a cancellation hook.
    pub fn new<S>(stream: S, on_cancel: impl FnOnce() + Send + 'static) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        Self {
            stream: stream.fuse().boxed(),
            guard: CancelGuard(Some(Box::new(on_cancel))),
        }
    }

    /// Subscription fed by an unbounded channel.
    pub fn from_receiver(
        rx: mpsc::UnboundedReceiver<T>,
        on_cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        Self::new(stream, on_cancel)
    }

    /// Wait for the next snapshot. `None` once the source has shut down.
    ///
    /// Cancel-safe: dropping the returned future loses no snapshot.
    pub async fn next(&mut self) -> Option<T> {
        self.stream.next().await
    }

    /// Wait for a snapshot, then skip ahead to the newest one already queued.
    ///
    /// Snapshots are full values, so older queued ones carry nothing the
    /// newest lacks. Cancel-safe like [`Subscription::next`].
    pub async fn latest(&mut self) -> Option<T> {
        let mut latest = self.stream.next().await?;
        while let Some(Some(newer)) = self.stream.next().now_or_never() {
            latest = newer;
        }
        Some(latest)
    }

    /// Transform every snapshot, keeping the same cancellation guard.
    pub fn map<U, F>(self, f: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let Subscription { stream, guard } = self;
        Subscription {
            stream: stream.map(f).boxed(),
            guard,
        }
    }

    /// Stop receiving pushes and unregister from the source.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().stream.poll_next_unpin(cx)
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.guard.0.is_some())
            .finish_non_exhaustive()
    }
}
