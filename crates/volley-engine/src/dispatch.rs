// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-wait scheduling through the external timer.
//!
//! The timer accepts waits of at most `max_wait_secs`. A longer delay is
//! scheduled as one capped wait whose payload carries the remainder; the
//! continuation endpoint re-dispatches that remainder when the wait fires.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use volley_core::{TimerGateway, TimerRequest, VolleyError};

use crate::payload::{self, Params, REMAINING_TIMEOUT_KEY};

/// How a delay is split into one wait now and a remainder for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPlan {
    pub wait_secs: u64,
    pub remaining_secs: Option<u64>,
}

impl WaitPlan {
    pub fn new(delay_secs: u64, max_wait_secs: u64) -> Self {
        if delay_secs > max_wait_secs {
            Self {
                wait_secs: max_wait_secs,
                remaining_secs: Some(delay_secs - max_wait_secs),
            }
        } else {
            Self {
                wait_secs: delay_secs,
                remaining_secs: None,
            }
        }
    }
}

/// Issues one externally scheduled wait per call.
pub struct TimeoutDispatcher {
    timer: Arc<dyn TimerGateway + Send + Sync>,
    max_wait_secs: u64,
}

impl TimeoutDispatcher {
    pub fn new(timer: Arc<dyn TimerGateway + Send + Sync>, max_wait_secs: u64) -> Self {
        Self {
            timer,
            max_wait_secs: max_wait_secs.max(1),
        }
    }

    pub fn max_wait_secs(&self) -> u64 {
        self.max_wait_secs
    }

    /// Schedule a callback carrying `params` after `delay_secs`.
    ///
    /// Errors from the timer are returned as-is; nothing is retried.
    pub async fn dispatch(
        &self,
        mut params: Params,
        delay_secs: u64,
    ) -> Result<TimerRequest, VolleyError> {
        let plan = WaitPlan::new(delay_secs, self.max_wait_secs);
        match plan.remaining_secs {
            Some(remaining) => {
                params.insert(REMAINING_TIMEOUT_KEY.to_string(), Value::from(remaining));
            }
            None => {
                params.remove(REMAINING_TIMEOUT_KEY);
            }
        }

        let request = TimerRequest {
            execution_name: uuid::Uuid::new_v4().to_string(),
            wait_secs: plan.wait_secs,
            request_path: payload::request_path(&params)?,
        };
        debug!(
            execution = %request.execution_name,
            path = %request.request_path,
            "scheduling continuation"
        );
        self.timer.schedule(&request).await?;
        info!(
            execution = %request.execution_name,
            wait_secs = plan.wait_secs,
            remaining_secs = plan.remaining_secs,
            "continuation scheduled"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{decode, iterate_blast_params, TIMEOUT_PATH_PREFIX};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokio::sync::Mutex;
    use volley_core::{AdapterType, HealthStatus, PluginAdapter};

    #[derive(Default)]
    struct RecordingTimer {
        requests: Mutex<Vec<TimerRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl PluginAdapter for RecordingTimer {
        fn name(&self) -> &str {
            "recording"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Timer
        }
        async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), VolleyError> {
            Ok(())
        }
    }

    #[async_trait]
    impl TimerGateway for RecordingTimer {
        async fn schedule(&self, request: &TimerRequest) -> Result<(), VolleyError> {
            if self.fail {
                return Err(VolleyError::Scheduler {
                    message: "quota exceeded".into(),
                    source: None,
                });
            }
            self.requests.lock().await.push(request.clone());
            Ok(())
        }
    }

    fn decoded(request: &TimerRequest) -> Params {
        decode(request.request_path.trim_start_matches(TIMEOUT_PATH_PREFIX)).unwrap()
    }

    #[test]
    fn short_delay_is_one_wait() {
        assert_eq!(
            WaitPlan::new(1, 86_400),
            WaitPlan {
                wait_secs: 1,
                remaining_secs: None
            }
        );
        assert_eq!(WaitPlan::new(86_400, 86_400).remaining_secs, None);
    }

    #[test]
    fn long_delay_carries_remainder() {
        assert_eq!(
            WaitPlan::new(100_000, 86_400),
            WaitPlan {
                wait_secs: 86_400,
                remaining_secs: Some(13_600)
            }
        );
    }

    #[tokio::test]
    async fn dispatch_injects_and_strips_remainder() {
        let timer = Arc::new(RecordingTimer::default());
        let dispatcher = TimeoutDispatcher::new(timer.clone(), 60);

        let long = dispatcher
            .dispatch(iterate_blast_params("b-1", 1), 150)
            .await
            .unwrap();
        assert_eq!(long.wait_secs, 60);
        let params = decoded(&long);
        assert_eq!(params[REMAINING_TIMEOUT_KEY], Value::from(90u64));

        // A payload that still carries a stale remainder loses it on a short dispatch.
        let short = dispatcher.dispatch(params, 5).await.unwrap();
        assert_eq!(short.wait_secs, 5);
        assert_eq!(decoded(&short), iterate_blast_params("b-1", 1));

        let requests = timer.requests.lock().await;
        assert_eq!(requests.len(), 2);
        assert_ne!(requests[0].execution_name, requests[1].execution_name);
    }

    #[tokio::test]
    async fn scheduler_errors_propagate() {
        let timer = Arc::new(RecordingTimer {
            fail: true,
            ..RecordingTimer::default()
        });
        let dispatcher = TimeoutDispatcher::new(timer, 60);
        let err = dispatcher
            .dispatch(iterate_blast_params("b-1", 1), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, VolleyError::Scheduler { .. }));
    }

    proptest! {
        /// Following the remainders always adds back up to the original delay.
        #[test]
        fn chained_waits_sum_to_delay(delay in 0u64..10_000_000, max in 1u64..200_000) {
            let mut total = 0u64;
            let mut pending = Some(delay);
            let mut hops = 0u64;
            while let Some(d) = pending {
                let plan = WaitPlan::new(d, max);
                prop_assert!(plan.wait_secs <= max);
                total += plan.wait_secs;
                pending = plan.remaining_secs;
                hops += 1;
            }
            prop_assert_eq!(total, delay);
            prop_assert_eq!(hops, delay.div_ceil(max).max(1));
        }
    }
}
