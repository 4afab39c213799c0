use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Periodic task with explicit start and stop. Dropping the poller stops it.
pub struct Poller {
    period: Duration,
    running: Option<Running>,
}

struct Running {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self { period, running: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start calling `tick` every period, beginning immediately. A running
    /// poller is stopped first.
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        // A stop request also cancels an in-flight tick
                        tokio::select! {
                            _ = &mut stop_rx => break,
                            _ = tick() => {}
                        }
                    }
                }
            }
            debug!("Poller stopped");
        });

        self.running = Some(Running { stop_tx, task });
    }

    /// Cancel the timer. Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            // The task may already have exited; nothing to do then
            let _ = running.stop_tx.send(());
            drop(running.task);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().map(|r| !r.task.is_finished()).unwrap_or(false)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(poller: &mut Poller) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        poller.start(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        count
    }

    #[tokio::test]
    async fn ticks_until_stopped() {
        let mut poller = Poller::new(Duration::from_millis(10));
        let count = counting(&mut poller);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(poller.is_running());
        poller.stop();
        assert!(!poller.is_running());

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 2);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn dropping_cancels() {
        let mut poller = Poller::new(Duration::from_millis(10));
        let count = counting(&mut poller);
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(poller);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_drop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test]
    async fn restart_replaces_previous_task() {
        let mut poller = Poller::new(Duration::from_millis(10));
        let first = counting(&mut poller);
        let second = counting(&mut poller);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let first_after = first.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(first.load(Ordering::SeqCst), first_after);
        assert!(second.load(Ordering::SeqCst) > 0);
    }
}
