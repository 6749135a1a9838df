//! Makes sure the target model is available on the server

use crate::config::ModelMatch;
use crate::error::RagError;
use crate::pipeline::traits::{ModelRegistry, PullMode};

/// Result of a provisioning pass. Only transport failures and failed pulls
/// are errors; a registry that cannot be listed is reported here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
  AlreadyPresent,
  Pulled,
  /// Listing returned a non-200 status; provisioning was skipped
  Degraded { status: u16 },
}

/// Case-sensitive presence check of `target` among registry names
pub fn model_present(names: &[String], target: &str, policy: ModelMatch) -> bool {
  match policy {
    ModelMatch::Substring => names.iter().any(|name| name.contains(target)),
    ModelMatch::Exact => names.iter().any(|name| name == target),
  }
}

#[derive(Debug, Clone)]
pub struct ModelProvisioner {
  model: String,
  policy: ModelMatch,
  mode: PullMode,
}

impl ModelProvisioner {
  pub fn new(model: impl Into<String>, policy: ModelMatch, mode: PullMode) -> Self {
    Self { model: model.into(), policy, mode }
  }

  pub async fn ensure_model(&self, registry: &dyn ModelRegistry) -> Result<ProvisionOutcome, RagError> {
    bentley::info!(&format!("Checking model '{}'", self.model));

    let names = match registry.list_models().await {
      Ok(names) => names,
      Err(RagError::ProvisioningDegraded { status }) => {
        bentley::warn!(&format!("Error listing models: {status}"));
        return Ok(ProvisionOutcome::Degraded { status });
      }
      Err(e) => {
        bentley::error!(&format!("Critical error while checking model: {e}"));
        return Err(e);
      }
    };

    if model_present(&names, &self.model, self.policy) {
      bentley::info!(&format!("Model '{}' is already available on the server", self.model));
      return Ok(ProvisionOutcome::AlreadyPresent);
    }

    bentley::info!(&format!("Model '{}' not found. Pulling it, this may take a while...", self.model));
    registry.pull(&self.model, self.mode).await?;
    bentley::success!(&format!("Model '{}' pulled", self.model));

    Ok(ProvisionOutcome::Pulled)
  }
}
