// tracevault-tenancy - tenant extraction and validation
//
// Tenancy is carried as a request header/metadata entry. The manager is
// transport-agnostic: callers hand it the observed values for the configured
// header and get back a validated tenant string, which travels with the
// batch through the pipeline.

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TENANT_HEADER: &str = "x-tenant";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TenancyError {
    #[error("missing tenant header")]
    MissingTenant,

    #[error("extra tenant header")]
    ExtraTenant,

    #[error("unknown tenant")]
    UnknownTenant,
}

/// Tenancy configuration, deserialized from the collector config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TenancyOptions {
    pub enabled: bool,
    pub header: String,
    /// Allow-list; empty means any non-empty tenant is accepted.
    pub tenants: Vec<String>,
}

impl Default for TenancyOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            header: DEFAULT_TENANT_HEADER.to_owned(),
            tenants: Vec::new(),
        }
    }
}

/// Validates tenants against the configured allow-list.
#[derive(Debug, Clone)]
pub struct TenancyManager {
    enabled: bool,
    header: String,
    allowed: Option<HashSet<String>>,
}

impl TenancyManager {
    pub fn new(options: &TenancyOptions) -> Self {
        let allowed = if options.tenants.is_empty() {
            None
        } else {
            Some(options.tenants.iter().cloned().collect())
        };
        let header = if options.header.is_empty() {
            DEFAULT_TENANT_HEADER.to_owned()
        } else {
            options.header.clone()
        };
        Self {
            enabled: options.enabled,
            header,
            allowed,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Name of the header/metadata key the tenant travels in.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Validates the observed header values. Exactly one occurrence is
    /// required when tenancy is enabled; when disabled the tenant is always
    /// the empty string.
    pub fn extract_from<'a, I>(&self, values: I) -> Result<String, TenancyError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.enabled {
            return Ok(String::new());
        }
        let mut iter = values.into_iter();
        let tenant = iter.next().ok_or(TenancyError::MissingTenant)?;
        if iter.next().is_some() {
            return Err(TenancyError::ExtraTenant);
        }
        if !self.valid(tenant) {
            return Err(TenancyError::UnknownTenant);
        }
        Ok(tenant.to_owned())
    }

    /// Allow-list membership. With no allow-list configured any non-empty
    /// tenant is valid.
    pub fn valid(&self, tenant: &str) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.contains(tenant),
            None => !tenant.is_empty(),
        }
    }
}

tokio::task_local! {
    static CURRENT_TENANT: String;
}

/// Runs `fut` with the tenant set as the ambient context value.
pub async fn with_tenant<F>(tenant: String, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_TENANT.scope(tenant, fut).await
}

/// The tenant propagated by [`with_tenant`], if any.
pub fn current_tenant() -> Option<String> {
    CURRENT_TENANT.try_with(|t| t.clone()).ok()
}
