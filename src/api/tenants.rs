//
//  se2-sdk
//  api/tenants.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tenant management on the administrative API.
//!
//! A tenant's name is its stable external key; only the description can be
//! changed after creation.
//!
//! ```rust,no_run
//! # async fn demo(client: &se2_sdk::api::Se2Client) -> se2_sdk::api::common::Result<()> {
//! let tenant = client.create_tenant("acmeco", "ACME Co. plugins").await?;
//! assert_eq!(tenant.name, "acmeco");
//!
//! client.update_tenant_by_name("acmeco", "renamed description").await?;
//! client.delete_tenant_by_name("acmeco").await?;
//! # Ok(())
//! # }
//! ```

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::client::{require, Call, Se2Client, Service};
use crate::api::common::{null_as_empty, Result};

const TENANT_PATH: &str = "/environment/v1/tenant";

/// A tenant as returned by the administrative API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tenant {
    /// Server-assigned identifier.
    pub id: String,

    /// Identity provider party the tenant belongs to.
    #[serde(default)]
    pub authorized_party: String,

    /// Environment the tenant lives in.
    #[serde(default)]
    pub environment: String,

    /// Unique tenant name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TenantList {
    #[serde(default, alias = "Tenants", deserialize_with = "null_as_empty")]
    tenants: Vec<Tenant>,
}

#[derive(Debug, Serialize)]
struct DescriptionBody<'a> {
    description: &'a str,
}

impl Se2Client {
    /// Fetches a tenant by name.
    ///
    /// A missing tenant is an [`UnexpectedStatus`](crate::api::common::ApiError::UnexpectedStatus)
    /// error for which `is_not_found()` holds.
    pub async fn get_tenant_by_name(&self, name: &str) -> Result<Tenant> {
        const OP: &str = "get_tenant_by_name";
        require(OP, "tenant name", name)?;

        self.fetch(Call::get(OP, Service::Admin, TENANT_PATH).segment(name))
            .await
    }

    /// Creates a tenant. An empty `description` is left out of the request.
    pub async fn create_tenant(&self, name: &str, description: &str) -> Result<Tenant> {
        const OP: &str = "create_tenant";
        require(OP, "tenant name", name)?;

        let mut call = Call::post(OP, Service::Admin, TENANT_PATH)
            .segment(name)
            .expect(StatusCode::CREATED);
        if !description.is_empty() {
            call = call.json(&DescriptionBody { description })?;
        }

        let tenant: Tenant = self.fetch(call).await?;
        tracing::info!(tenant = %tenant.name, id = %tenant.id, "tenant created");
        Ok(tenant)
    }

    /// Lists the tenants the access key can see.
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let list: TenantList = self
            .fetch(Call::get("list_tenants", Service::Admin, TENANT_PATH))
            .await?;
        Ok(list.tenants)
    }

    /// Replaces a tenant's description.
    pub async fn update_tenant_by_name(&self, name: &str, description: &str) -> Result<Tenant> {
        const OP: &str = "update_tenant_by_name";
        require(OP, "tenant name", name)?;

        let call = Call::new(OP, Method::PATCH, Service::Admin, TENANT_PATH)
            .segment(name)
            .json(&DescriptionBody { description })?;

        let tenant: Tenant = self.fetch(call).await?;
        tracing::info!(tenant = %tenant.name, "tenant updated");
        Ok(tenant)
    }

    /// Deletes a tenant.
    ///
    /// Only the `200 OK` status is checked; whatever body the service sends
    /// back is ignored.
    pub async fn delete_tenant_by_name(&self, name: &str) -> Result<()> {
        const OP: &str = "delete_tenant_by_name";
        require(OP, "tenant name", name)?;

        self.execute(Call::new(OP, Method::DELETE, Service::Admin, TENANT_PATH).segment(name))
            .await?;
        tracing::info!(tenant = %name, "tenant deleted");
        Ok(())
    }
}
