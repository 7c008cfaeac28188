//! Source and target tenant descriptors
//!
//! A run always works on exactly two tenants: "Main" (the source) and
//! "Target" (the destination). Both are read from the environment.

use crate::error::{Result, ValidationError};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// API token of the source environment
pub const SOURCE_API_TOKEN_VAR: &str = "DYNATRACE_SOURCE_API_TOKEN";
/// URL of the source environment
pub const SOURCE_ENV_URL_VAR: &str = "DYNATRACE_SOURCE_ENV_URL";
/// API token of the target environment
pub const TARGET_API_TOKEN_VAR: &str = "DYNATRACE_API_TOKEN";
/// URL of the target environment
pub const TARGET_ENV_URL_VAR: &str = "DYNATRACE_ENV_URL";

const HTTPS_PREFIX: &str = "https://";

/// Concurrency hint registered for both tenants
pub const TENANT_CONCURRENT_REQUESTS: u32 = 10;

/// Small integer-like key the backend uses to address a tenant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantKey(String);

impl TenantKey {
    pub fn main() -> Self {
        Self("0".to_string())
    }

    pub fn target() -> Self {
        Self("1".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// API token that never shows up in `Debug` output and is wiped on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token, only for request bodies
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl Serialize for ApiToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One environment as registered with the backend
#[derive(Debug, Clone, Serialize)]
pub struct TenantDescriptor {
    pub label: String,
    #[serde(rename = "APIKey")]
    pub api_key: ApiToken,
    pub url: String,
    pub notes: String,
    #[serde(rename = "monacoConcurrentRequests")]
    pub concurrent_requests: String,
    #[serde(rename = "disableSystemProxies")]
    pub disable_system_proxies: bool,
    #[serde(rename = "proxyURL")]
    pub proxy_url: String,
}

impl TenantDescriptor {
    /// Descriptor with the fixed defaults: concurrency 10, no proxy, no notes
    pub fn new(label: &str, api_key: ApiToken, url: &str) -> Self {
        Self {
            label: label.to_string(),
            api_key,
            url: url.to_string(),
            notes: String::new(),
            concurrent_requests: TENANT_CONCURRENT_REQUESTS.to_string(),
            disable_system_proxies: false,
            proxy_url: String::new(),
        }
    }

    /// Filesystem-safe name derived from the tenant URL
    ///
    /// Surrounding whitespace, trailing slashes and an `https://` prefix are
    /// dropped. ASCII alphanumerics are kept, every other byte is written as
    /// `_` followed by two uppercase hex digits, so distinct URLs never share a
    /// key and a key never contains `__`.
    pub fn directory_key(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        let url = match url.get(..HTTPS_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(HTTPS_PREFIX) => {
                &url[HTTPS_PREFIX.len()..]
            }
            _ => url,
        };

        let mut key = String::with_capacity(url.len());
        for byte in url.bytes() {
            if byte.is_ascii_alphanumeric() {
                key.push(char::from(byte));
            } else {
                key.push_str(&format!("_{byte:02X}"));
            }
        }
        key
    }
}

/// Main/Target key assignment in the registration body
#[derive(Debug, Clone, Serialize)]
pub struct TenantKeys {
    #[serde(rename = "Main")]
    pub main: TenantKey,
    #[serde(rename = "Target")]
    pub target: TenantKey,
}

/// Body of `POST /tenant_list`
#[derive(Debug, Clone, Serialize)]
pub struct TenantList {
    #[serde(rename = "tenantKey")]
    pub tenant_key: TenantKeys,
    pub tenants: BTreeMap<TenantKey, TenantDescriptor>,
}

/// The two tenants a run works on
#[derive(Debug, Clone)]
pub struct TenantPair {
    pub main: TenantDescriptor,
    pub target: TenantDescriptor,
}

impl TenantPair {
    /// Read both tenants from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both tenants through `lookup`, failing on the first missing variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name).ok_or_else(|| ValidationError::missing_environment(name).into())
        };

        let main = TenantDescriptor::new(
            "SourceEnv",
            ApiToken::new(require(SOURCE_API_TOKEN_VAR)?),
            &require(SOURCE_ENV_URL_VAR)?,
        );
        let target = TenantDescriptor::new(
            "Target",
            ApiToken::new(require(TARGET_API_TOKEN_VAR)?),
            &require(TARGET_ENV_URL_VAR)?,
        );

        Ok(Self { main, target })
    }

    pub fn main_key(&self) -> TenantKey {
        TenantKey::main()
    }

    pub fn target_key(&self) -> TenantKey {
        TenantKey::target()
    }

    /// Registration body sent to the backend
    pub fn tenant_list(&self) -> TenantList {
        let mut tenants = BTreeMap::new();
        tenants.insert(self.main_key(), self.main.clone());
        tenants.insert(self.target_key(), self.target.clone());

        TenantList {
            tenant_key: TenantKeys {
                main: self.main_key(),
                target: self.target_key(),
            },
            tenants,
        }
    }
}
