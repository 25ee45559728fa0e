//! # Access Gate
//!
//! Classifies each request as an anonymous guest, a signed-in customer, or an admin,
//! and turns that into the set of orders the caller may see.
//!
//! Privileged operations take an [`AdminIdentity`], which only [`AccessGate`] can
//! construct. Holding one is the proof that the allow-list check passed.

pub mod identity;

pub use identity::*;

use crate::error::{DomainError, ErrorKind};
use crate::model::{OrderQuery, OrderScope, Owner};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    #[error("Missing or invalid credentials")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Identity provider timed out")]
    ProviderTimeout,
}

impl DomainError for AccessError {
    fn kind(&self) -> ErrorKind {
        match self {
            AccessError::Unauthorized => ErrorKind::Unauthorized,
            AccessError::Forbidden => ErrorKind::Forbidden,
            AccessError::ProviderUnavailable(_) => ErrorKind::UpstreamUnavailable,
            AccessError::ProviderTimeout => ErrorKind::UpstreamTimeout,
        }
    }
}

/// An identity that passed the admin allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    identity: Identity,
}

impl AdminIdentity {
    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Customer(Identity),
    Admin(AdminIdentity),
}

/// Guest lookup keys sent alongside anonymous requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestKeys {
    pub guest_id: Option<String>,
    pub phone: Option<String>,
}

impl GuestKeys {
    pub fn new(guest_id: Option<String>, phone: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            guest_id: clean(guest_id),
            phone: clean(phone),
        }
    }
}

impl Caller {
    /// Orders this caller may read.
    pub fn order_query(&self, guest: GuestKeys) -> OrderQuery {
        match self {
            Caller::Admin(_) => OrderQuery::All,
            Caller::Customer(identity) => OrderQuery::Scope(OrderScope::User(identity.id.clone())),
            Caller::Anonymous => OrderQuery::Scope(OrderScope::Guest {
                guest_id: guest.guest_id,
                phone: guest.phone,
            }),
        }
    }

    /// Owner recorded on an order this caller places.
    pub fn owner(&self, guest: &GuestKeys) -> Owner {
        match self {
            Caller::Customer(identity) => Owner::User(identity.id.clone()),
            Caller::Admin(admin) => Owner::User(admin.id().to_string()),
            Caller::Anonymous => match &guest.guest_id {
                Some(token) => Owner::Guest(token.clone()),
                None => Owner::Anonymous,
            },
        }
    }
}

/// Case-insensitive set of admin emails.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }
}

#[derive(Clone)]
pub struct AccessGate {
    provider: Arc<dyn IdentityProvider>,
    admins: AdminAllowList,
}

impl AccessGate {
    pub fn new(provider: Arc<dyn IdentityProvider>, admins: AdminAllowList) -> Self {
        Self { provider, admins }
    }

    /// Classifies a request from its `Authorization` header value.
    ///
    /// No header is an anonymous guest. A header that is not a bearer token, or a token
    /// the provider rejects, is `Unauthorized`.
    pub async fn classify(&self, authorization: Option<&str>) -> Result<Caller, AccessError> {
        let Some(header) = authorization else {
            return Ok(Caller::Anonymous);
        };
        let token = bearer_token(header).ok_or(AccessError::Unauthorized)?;
        let identity = self
            .provider
            .current_identity(token)
            .await?
            .ok_or(AccessError::Unauthorized)?;

        if self.admins.contains(&identity.email) {
            debug!(user_id = %identity.id, "Admin caller");
            Ok(Caller::Admin(AdminIdentity { identity }))
        } else {
            debug!(user_id = %identity.id, "Customer caller");
            Ok(Caller::Customer(identity))
        }
    }

    /// Admin proof for a privileged operation.
    pub fn require_admin(caller: Caller) -> Result<AdminIdentity, AccessError> {
        match caller {
            Caller::Admin(admin) => Ok(admin),
            Caller::Customer(_) => Err(AccessError::Forbidden),
            Caller::Anonymous => Err(AccessError::Unauthorized),
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
