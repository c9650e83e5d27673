// ── Session facade ──
//
// Builds the API client from an `OperationsConfig`, resolves the targeted
// organization and space once, and hands out operation groups that share
// one client and one cancellation token.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cfops_api::CloudFoundryClient;

use crate::config::{JobPollConfig, OperationsConfig};
use crate::domains::Domains;
use crate::error::CoreError;
use crate::model::Target;
use crate::resolve::ResourceResolver;
use crate::routes::Routes;

/// A connected, targeted session.
///
/// Cheap to clone; clones share the cancellation token.
#[derive(Debug, Clone)]
pub struct CloudFoundryOperations {
    client: CloudFoundryClient,
    target: Target,
    job_poll: JobPollConfig,
    cancel: CancellationToken,
}

impl CloudFoundryOperations {
    /// Build the client and resolve the targeted organization (and space,
    /// when one is configured).
    pub async fn connect(config: OperationsConfig) -> Result<Self, CoreError> {
        if config.organization.trim().is_empty() {
            return Err(CoreError::Config {
                message: "no organization targeted".into(),
            });
        }

        let client =
            CloudFoundryClient::from_token(config.api.as_str(), &config.token, &config.transport())?;
        let resolver = ResourceResolver::new(client.clone());

        debug!(api = %config.api, organization = %config.organization, "resolving target");
        let organization = resolver.resolve_organization(&config.organization).await?;
        let space = match config.space.as_deref().filter(|s| !s.is_empty()) {
            Some(name) => Some(resolver.resolve_space(&organization.id, name).await?),
            None => None,
        };

        info!(
            organization = %organization.name,
            space = space.as_ref().map_or("-", |s| s.name.as_str()),
            "targeted"
        );

        Ok(Self::from_parts(
            client,
            Target {
                organization_id: organization.id,
                space_id: space.map(|s| s.id),
            },
            config.job_poll,
        ))
    }

    /// Assemble a session from an already-resolved target.
    pub fn from_parts(client: CloudFoundryClient, target: Target, job_poll: JobPollConfig) -> Self {
        Self {
            client,
            target,
            job_poll,
            cancel: CancellationToken::new(),
        }
    }

    pub fn routes(&self) -> Routes {
        Routes::new(
            self.client.clone(),
            self.target.clone(),
            self.job_poll,
            self.cancel.clone(),
        )
    }

    pub fn domains(&self) -> Domains {
        Domains::new(self.client.clone(), self.target.clone(), self.cancel.clone())
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Abort every in-flight operation of this session.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
