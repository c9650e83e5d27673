// ── Domain operations ──

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::info;

use cfops_api::CloudFoundryClient;
use cfops_api::types::CreatePrivateDomainRequest;

use crate::error::CoreError;
use crate::model::{Domain, Target};
use crate::resolve::ResourceResolver;

/// Private-domain management and domain listing for one organization.
#[derive(Debug, Clone)]
pub struct Domains {
    resolver: ResourceResolver,
    target: Target,
    cancel: CancellationToken,
}

impl Domains {
    pub fn new(client: CloudFoundryClient, target: Target, cancel: CancellationToken) -> Self {
        Self {
            resolver: ResourceResolver::new(client),
            target,
            cancel,
        }
    }

    async fn guarded<T, F>(&self, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = op => result,
        }
    }

    /// Create a private domain owned by `organization`.
    pub async fn create(&self, domain: &str, organization: &str) -> Result<Domain, CoreError> {
        self.guarded(async {
            let owner = self.resolver.resolve_organization(organization).await?;
            let request = CreatePrivateDomainRequest {
                name: domain.to_owned(),
                owning_organization_guid: owner.id,
            };
            let created = Domain::from(self.resolver.client().create_private_domain(&request).await?);
            info!(domain, organization, domain_id = %created.id, "created private domain");
            Ok(created)
        })
        .await
    }

    /// Share an existing private domain with `organization`.
    pub async fn share(&self, domain: &str, organization: &str) -> Result<(), CoreError> {
        self.guarded(async {
            let org = self.resolver.resolve_organization(organization).await?;
            let private = self.resolver.resolve_private_domain(domain).await?;
            self.resolver
                .client()
                .associate_organization_private_domain(&org.id, &private.id)
                .await?;
            info!(domain, organization, "shared private domain");
            Ok(())
        })
        .await
    }

    /// Stop sharing a private domain with `organization`.
    pub async fn unshare(&self, domain: &str, organization: &str) -> Result<(), CoreError> {
        self.guarded(async {
            let org = self.resolver.resolve_organization(organization).await?;
            let private = self.resolver.resolve_private_domain(domain).await?;
            self.resolver
                .client()
                .remove_organization_private_domain(&org.id, &private.id)
                .await?;
            info!(domain, organization, "unshared private domain");
            Ok(())
        })
        .await
    }

    /// Private domains of the targeted organization, then shared domains.
    pub async fn list(&self) -> Result<Vec<Domain>, CoreError> {
        self.guarded(self.resolver.all_domains(&self.target.organization_id))
            .await
    }
}
