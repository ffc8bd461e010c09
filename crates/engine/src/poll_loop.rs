//! Poll loop: fetch → validate → derive → dedup → notify, once per interval.
//!
//! The engine owns all cross-cycle state: the query cursor and the last
//! delivered status/error texts. A failed cycle never stops the loop and never
//! moves the cursor; the next cycle simply starts over from the same window.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use watch_common::error::WatchError;
use watch_fetcher::validator::{parse_record, validate};
use watch_fetcher::{HttpTransport, StatusFetcher};
use watch_notifier::{ChatTransport, Notifier};

use crate::catalog::{error_message, status_message};
use crate::detector::LastSent;

/// What a single cycle ended up doing.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The query window held no work items.
    NoHomeworks,
    /// Derived text equals the last delivered one; nothing sent.
    Unchanged,
    /// A new status message was delivered and the cursor advanced.
    Delivered,
    /// A new status message could not be delivered; retried next cycle.
    DeliveryFailed,
    /// The cycle failed. `reported` tells whether an error notification went out.
    Failed { error: WatchError, reported: bool },
}

/// Status text derived in one cycle, with the cursor to adopt once it is delivered.
struct StatusUpdate {
    message: String,
    next_cursor: Option<i64>,
}

/// Long-running status watcher for a single work-item feed.
pub struct PollEngine<H, C> {
    fetcher: StatusFetcher<H>,
    notifier: Notifier<C>,
    interval: Duration,
    cursor: i64,
    last_message: LastSent,
    last_error: LastSent,
}

impl<H: HttpTransport, C: ChatTransport> PollEngine<H, C> {
    pub fn new(
        fetcher: StatusFetcher<H>,
        notifier: Notifier<C>,
        interval: Duration,
        cursor: i64,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            interval,
            cursor,
            last_message: LastSent::new(),
            last_error: LastSent::new(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_sent_message(&self) -> &str {
        self.last_message.text()
    }

    pub fn last_sent_error(&self) -> &str {
        self.last_error.text()
    }

    /// Run cycles until `cancel` fires. Cancellation interrupts both an
    /// in-flight cycle and the pause between cycles.
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!(
            endpoint = self.fetcher.endpoint(),
            cursor = self.cursor,
            interval_secs = self.interval.as_secs(),
            "Status poll loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                outcome = self.run_cycle() => {
                    tracing::debug!(?outcome, "Poll cycle finished");
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(cursor = self.cursor, "Status poll loop stopped");
    }

    /// Execute exactly one poll cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check_status().await {
            Ok(None) => CycleOutcome::NoHomeworks,
            Ok(Some(update)) => self.deliver_status(update).await,
            Err(error) => self.report_error(error).await,
        }
    }

    async fn check_status(&mut self) -> Result<Option<StatusUpdate>, WatchError> {
        let response = self.fetcher.fetch(self.cursor).await?;
        let homeworks = validate(&response.payload)?;

        // The service lists the most recently updated work item first.
        let Some(latest) = homeworks.first() else {
            tracing::debug!(cursor = self.cursor, "No status changes in query window");
            if let Some(next) = response.current_date {
                self.cursor = next;
            }
            return Ok(None);
        };

        if homeworks.len() > 1 {
            tracing::debug!(
                count = homeworks.len(),
                "Several work items changed; reporting the first"
            );
        }

        let record = parse_record(latest)?;
        let message = status_message(&record)?;

        Ok(Some(StatusUpdate {
            message,
            next_cursor: response.current_date,
        }))
    }

    async fn deliver_status(&mut self, update: StatusUpdate) -> CycleOutcome {
        if !self.last_message.is_new(&update.message) {
            tracing::debug!("Review status unchanged");
            return CycleOutcome::Unchanged;
        }

        if !self.notifier.notify(&update.message).await {
            return CycleOutcome::DeliveryFailed;
        }

        self.last_message.record(update.message);
        if let Some(next) = update.next_cursor {
            self.cursor = next;
        }
        CycleOutcome::Delivered
    }

    async fn report_error(&mut self, error: WatchError) -> CycleOutcome {
        tracing::error!(error = %error, cursor = self.cursor, "Poll cycle failed");

        let message = error_message(&error);
        let reported = if self.last_error.is_new(&message) {
            let delivered = self.notifier.notify(&message).await;
            if delivered {
                self.last_error.record(message);
            }
            delivered
        } else {
            tracing::debug!("Same error already reported; not notifying again");
            false
        };

        CycleOutcome::Failed { error, reported }
    }
}
