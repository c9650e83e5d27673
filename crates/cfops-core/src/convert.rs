// ── Wire → domain conversions ──
//
// Flattens `{metadata, entity}` resources into the model records and
// normalizes the controller's `""` host/path into `None`.

use cfops_api::types::{
    ApplicationEntity, OrganizationEntity, PrivateDomainEntity, Resource, RouteEntity,
    SharedDomainEntity, SpaceEntity,
};

use crate::model::{Domain, DomainKind, ResourceRef, Route};

impl From<Resource<OrganizationEntity>> for ResourceRef {
    fn from(r: Resource<OrganizationEntity>) -> Self {
        Self {
            id: r.metadata.guid,
            name: r.entity.name,
        }
    }
}

impl From<Resource<SpaceEntity>> for ResourceRef {
    fn from(r: Resource<SpaceEntity>) -> Self {
        Self {
            id: r.metadata.guid,
            name: r.entity.name,
        }
    }
}

impl From<Resource<ApplicationEntity>> for ResourceRef {
    fn from(r: Resource<ApplicationEntity>) -> Self {
        Self {
            id: r.metadata.guid,
            name: r.entity.name,
        }
    }
}

impl From<Resource<PrivateDomainEntity>> for Domain {
    fn from(r: Resource<PrivateDomainEntity>) -> Self {
        Self {
            id: r.metadata.guid,
            name: r.entity.name,
            kind: DomainKind::Private,
            owning_organization_id: r.entity.owning_organization_guid,
        }
    }
}

impl From<Resource<SharedDomainEntity>> for Domain {
    fn from(r: Resource<SharedDomainEntity>) -> Self {
        Self {
            id: r.metadata.guid,
            name: r.entity.name,
            kind: DomainKind::Shared,
            owning_organization_id: None,
        }
    }
}

impl From<Resource<RouteEntity>> for Route {
    fn from(r: Resource<RouteEntity>) -> Self {
        let RouteEntity {
            host,
            path,
            domain_guid,
            space_guid,
            service_instance_guid,
            ..
        } = r.entity;

        Self {
            id: r.metadata.guid,
            host: host.filter(|h| !h.is_empty()),
            path: path.filter(|p| !p.is_empty()),
            domain_id: domain_guid,
            space_id: space_guid,
            service_instance_id: service_instance_guid.filter(|s| !s.is_empty()),
        }
    }
}
