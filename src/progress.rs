use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

pub type ProgressFn = Arc<dyn Fn(f32) + Send + Sync>;

#[derive(Clone, Debug)]
pub struct TickerSettings {
    pub interval: Duration,
    /// Upper bound of the random increment added per tick, in percentage points.
    pub max_step: f32,
    /// High-water mark; emitted values hold here until the real response lands.
    pub ceiling: f32,
}

impl Default for TickerSettings {
    fn default() -> Self {
        TickerSettings {
            interval: Duration::from_millis(400),
            max_step: 10.0,
            ceiling: 90.0,
        }
    }
}

/// Fabricated progress for the in-flight window. The remote endpoint reports
/// no real progress, so the ticker climbs by random steps and holds at the
/// ceiling until stopped. The final 100% is the orchestrator's to emit.
pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    pub fn spawn(settings: TickerSettings, on_progress: ProgressFn) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(settings.interval);
            // The first interval tick completes immediately; swallow it so
            // emissions start one full interval in.
            ticker.tick().await;

            let mut accumulated = 0.0f32;
            loop {
                ticker.tick().await;
                let step = rand::thread_rng().gen_range(0.0..settings.max_step);
                accumulated += step;
                on_progress(accumulated.min(settings.ceiling));
            }
        });

        ProgressTicker {
            handle: Some(handle),
        }
    }

    pub fn stop(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Stops the ticker and waits for the task to wind down, so no emission
    /// can land after the caller's final 100%.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
