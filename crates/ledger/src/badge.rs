//! Background poller for the pending-approval badge.
//!
//! Reviewer accounts see a live count of queued reassignment requests.
//! The poller fetches once immediately, then on a fixed interval until
//! its token is cancelled. Poll failures are logged and skipped; the
//! badge keeps its last value rather than flickering on transient
//! network trouble.

use std::future::Future;
use std::time::Duration;

use qm_api::ApiError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::msg::{LedgerSender, ReviewMsg};

pub fn spawn<F, Fut>(
	every: Duration,
	token: CancellationToken,
	fetch: F,
	tx: LedgerSender,
) -> JoinHandle<()>
where
	F: Fn() -> Fut + Send + 'static,
	Fut: Future<Output = Result<u64, ApiError>> + Send,
{
	tokio::spawn(async move {
		let mut ticks = tokio::time::interval(every);
		loop {
			tokio::select! {
				_ = token.cancelled() => break,
				_ = ticks.tick() => {}
			}
			match fetch().await {
				Ok(count) => {
					if tx.send(ReviewMsg::BadgeCount(count).into()).is_err() {
						break;
					}
				}
				Err(err) => tracing::debug!("badge poll failed: {err}"),
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicU64, Ordering};

	use super::*;
	use crate::msg::{self, LedgerMsg};

	#[tokio::test(start_paused = true)]
	async fn polls_immediately_and_then_on_the_interval() {
		let (tx, mut rx) = msg::channel();
		let calls = Arc::new(AtomicU64::new(0));
		let counter = Arc::clone(&calls);
		let token = CancellationToken::new();

		let handle = spawn(
			Duration::from_secs(30),
			token.clone(),
			move || {
				let counter = Arc::clone(&counter);
				async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
			},
			tx,
		);

		tokio::time::advance(Duration::from_millis(1)).await;
		assert!(matches!(rx.recv().await, Some(LedgerMsg::Review(ReviewMsg::BadgeCount(1)))));

		tokio::time::advance(Duration::from_secs(30)).await;
		assert!(matches!(rx.recv().await, Some(LedgerMsg::Review(ReviewMsg::BadgeCount(2)))));

		token.cancel();
		handle.await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_polls_are_skipped_without_stopping() {
		let (tx, mut rx) = msg::channel();
		let calls = Arc::new(AtomicU64::new(0));
		let counter = Arc::clone(&calls);
		let token = CancellationToken::new();

		spawn(
			Duration::from_secs(10),
			token.clone(),
			move || {
				let counter = Arc::clone(&counter);
				async move {
					match counter.fetch_add(1, Ordering::SeqCst) {
						0 => Err(ApiError::Network("connection refused".into())),
						n => Ok(n),
					}
				}
			},
			tx,
		);

		tokio::time::advance(Duration::from_secs(11)).await;
		assert!(matches!(rx.recv().await, Some(LedgerMsg::Review(ReviewMsg::BadgeCount(1)))));
		token.cancel();
	}
}
