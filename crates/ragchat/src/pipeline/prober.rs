//! Waits for the model server to accept connections

use std::time::Duration;
use tokio::time::sleep;

use crate::config::Settings;
use crate::error::RagError;
use crate::pipeline::traits::Probe;

/// Fixed-interval polling with an attempt budget. Every failure counts the
/// same, whether refused, unresolvable or timed out.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityProber {
  max_retries: u32,
  interval: Duration,
}

impl AvailabilityProber {
  pub fn new(max_retries: u32, interval: Duration) -> Self {
    Self { max_retries, interval }
  }

  pub fn from_settings(settings: &Settings) -> Self {
    Self::new(settings.max_retries, settings.retry_interval)
  }

  /// Returns the number of attempts it took, or `ServiceUnavailable` once the
  /// budget is spent
  pub async fn wait_for_service(&self, probe: &dyn Probe) -> Result<u32, RagError> {
    let target = probe.target();
    bentley::info!(&format!("Connecting to model server at {target}"));

    for attempt in 1..=self.max_retries {
      match probe.probe().await {
        Ok(()) => {
          bentley::success!("Connection with model server established");
          return Ok(attempt);
        }
        Err(e) => {
          bentley::info!(&format!(
            "Waiting for model server to start... ({attempt}/{}): {e}",
            self.max_retries
          ));
          if attempt < self.max_retries {
            sleep(self.interval).await;
          }
        }
      }
    }

    Err(RagError::ServiceUnavailable { url: target, attempts: self.max_retries })
  }
}
