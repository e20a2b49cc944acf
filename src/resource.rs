//
//  se2-sdk
//  resource.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Identifiers
//!
//! A [`Plugin`] names one deployable unit of remote compute by environment,
//! tenant, namespace and name, plus the version it was last promoted to.
//! It is a local value only: constructing one performs no remote action.
//!
//! ## Path Conventions
//!
//! | Method | Shape | Used by |
//! |--------|-------|---------|
//! | [`Plugin::uri`] | `/{env}.{tenant}/{namespace}/{name}` | tokens, results, execution |
//! | [`Plugin::versioned_uri`] | `/{env}.{tenant}/{namespace}/{name}/{version}` | pinned artifacts |
//! | [`Plugin::identifier`] | `{env}.{tenant}` | deployed listings |
//! | [`Plugin::fqfn`] | `{env}.{tenant}#{namespace}::{name}[@{version}]` | display, admin listings |
//!
//! Names read back from the service go through [`Plugin::from_fqfn`] or, for
//! `fqmn://` and path-style names, [`Plugin::from_fqmn`].
//!
//! ## Example
//!
//! ```rust
//! use se2_sdk::Plugin;
//!
//! let plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello");
//! assert_eq!(plugin.uri(), "/com.suborbital.acmeco/default/hello");
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern for fully-qualified function names.
///
/// Matches `com.suborbital.acmeco#default::hello@v1.0.0`, where the
/// environment is everything up to the last dot before the `#`.
static FQFN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<environment>.+\..+)\.(?P<tenant>[^.#]+)#(?P<namespace>[^:]+)::(?P<name>[^@]+)(?:@(?P<version>.+))?$")
        .unwrap()
});

const FQMN_SCHEME: &str = "fqmn://";

/// A single deployable unit of remote compute.
///
/// Everything except the version is fixed at construction. The version is
/// written by [`Se2Client::promote_draft`](crate::api::Se2Client::promote_draft)
/// after a successful promotion and shows up immediately in
/// [`versioned_uri`](Self::versioned_uri).
///
/// `Plugin` is a plain value: callers sharing one across tasks must
/// synchronise writes to the version themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plugin {
    environment: String,
    tenant: String,
    namespace: String,
    name: String,
    version: Option<String>,
}

impl Plugin {
    /// Creates an unversioned plugin reference.
    pub fn new(
        environment: impl Into<String>,
        tenant: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            tenant: tenant.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: None,
        }
    }

    /// Returns the same plugin pinned to `version`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parses a fully-qualified function name back into a plugin.
    ///
    /// The tenant is the segment after the last dot before the `#`, and the
    /// environment must itself contain a dot. A plugin in a single-label
    /// environment such as `dev` formats to `dev.t1#ns::fn`, which does not
    /// parse back; [`from_fqmn`](Self::from_fqmn) accepts that case.
    ///
    /// ```rust
    /// use se2_sdk::Plugin;
    ///
    /// let plugin = Plugin::from_fqfn("com.suborbital.acmeco#default::hello@v1.0.0").unwrap();
    /// assert_eq!(plugin.environment(), "com.suborbital");
    /// assert_eq!(plugin.tenant(), "acmeco");
    /// assert_eq!(plugin.version(), Some("v1.0.0"));
    /// ```
    pub fn from_fqfn(fqfn: &str) -> Option<Self> {
        let caps = FQFN_PATTERN.captures(fqfn)?;
        let plugin = Self::new(
            &caps["environment"],
            &caps["tenant"],
            &caps["namespace"],
            &caps["name"],
        );

        Some(match caps.name("version") {
            Some(version) => plugin.with_version(version.as_str()),
            None => plugin,
        })
    }

    /// Parses a path-style module name back into a plugin.
    ///
    /// Accepts `fqmn://{env}.{tenant}/{namespace}/{name}[@{ref}]` as well as
    /// the [`uri`](Self::uri) and [`versioned_uri`](Self::versioned_uri)
    /// shapes. The owner identifier is split at its last dot, so single-label
    /// environments are fine here.
    ///
    /// ```rust
    /// use se2_sdk::Plugin;
    ///
    /// let plugin = Plugin::from_fqmn("fqmn://dev.t1/ns/fn@7c1fd2").unwrap();
    /// assert_eq!(plugin.environment(), "dev");
    /// assert_eq!(plugin.tenant(), "t1");
    /// assert_eq!(plugin.version(), Some("7c1fd2"));
    /// ```
    pub fn from_fqmn(fqmn: &str) -> Option<Self> {
        let path = fqmn.strip_prefix(FQMN_SCHEME).unwrap_or(fqmn);
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        let (identifier, namespace, name, pinned) = match segments.as_slice() {
            [identifier, namespace, name] => (*identifier, *namespace, *name, None),
            [identifier, namespace, name, version] => (*identifier, *namespace, *name, Some(*version)),
            _ => return None,
        };

        let (environment, tenant) = identifier.rsplit_once('.')?;
        if environment.is_empty() || tenant.is_empty() {
            return None;
        }

        let (name, reference) = match name.split_once('@') {
            Some((name, reference)) if !name.is_empty() && !reference.is_empty() => {
                (name, Some(reference))
            }
            Some(_) => return None,
            None => (name, None),
        };

        let plugin = Self::new(environment, tenant, namespace, name);
        Some(match pinned.or(reference) {
            Some(version) => plugin.with_version(version),
            None => plugin,
        })
    }

    /// The environment, e.g. `com.suborbital`.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The owning tenant.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// The namespace within the tenant.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last promoted version, if known.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn set_version(&mut self, version: String) {
        self.version = Some(version);
    }

    /// `{env}.{tenant}`, the owner identifier used by the administrative API.
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.environment, self.tenant)
    }

    /// Canonical version-less path.
    pub fn uri(&self) -> String {
        format!(
            "/{}.{}/{}/{}",
            self.environment, self.tenant, self.namespace, self.name
        )
    }

    /// Canonical path with the version appended when one is set.
    pub fn versioned_uri(&self) -> String {
        match &self.version {
            Some(version) => format!("{}/{}", self.uri(), version),
            None => self.uri(),
        }
    }

    /// Fully-qualified function name, `{env}.{tenant}#{namespace}::{name}[@{version}]`.
    pub fn fqfn(&self) -> String {
        let base = format!(
            "{}#{}::{}",
            self.identifier(),
            self.namespace,
            self.name
        );
        match &self.version {
            Some(version) => format!("{}@{}", base, version),
            None => base,
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqfn())
    }
}
