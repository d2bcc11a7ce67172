//! Countdown background task
//!
//! The one place the wall clock touches the timer. The task parks on the
//! snapshot channel until the machine reports a running phase, then drives
//! `advance_second()` through a one-second interval. Exactly one tick is ever
//! pending: the interval lives here and nowhere else, and it is dropped the
//! moment the machine stops running.

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut updates = state.subscribe();

    loop {
        // Park until a running phase begins.
        while !updates.borrow_and_update().is_running {
            if updates.changed().await.is_err() {
                return;
            }
        }

        debug!("Countdown armed");
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await; // the first tick resolves immediately

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.advance_second() {
                        Ok(snapshot) if !snapshot.is_running => {
                            debug!("Countdown disarmed in phase '{}'", snapshot.phase.as_str());
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Failed to advance countdown: {}", e);
                            break;
                        }
                    }
                }

                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Pause, reset, or completion through another handle
                    // cancels the pending tick immediately.
                    if !updates.borrow_and_update().is_running {
                        debug!("Countdown cancelled by state change");
                        break;
                    }
                }
            }
        }
    }
}
