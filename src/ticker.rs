use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;
use crate::types::progress::Phase;

pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(state: AppState, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await;

            let mut last_phase = None;
            loop {
                interval.tick().await;
                let phase = state.simulator().write().await.tick();
                if last_phase != Some(phase) {
                    match phase {
                        Phase::Finished => tracing::info!("Walk finished"),
                        Phase::Active => tracing::info!("Walk active"),
                        Phase::Inactive => tracing::info!("Walk inactive"),
                    }
                    last_phase = Some(phase);
                }
            }
        });

        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
