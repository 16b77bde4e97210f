//! Access policy: decides whether a caller may perform an action on a
//! resource type.
//!
//! Decisions are pure functions of the caller's role and the requested action.
//! Anything not explicitly granted is denied.

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::UserRole,
};

/// Semantic action a route performs, independent of the HTTP verb carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Order,
}

pub trait Policy {
    fn allow(&self, caller: Option<&AuthUser>, action: Action) -> bool;
}

pub struct ProductPolicy;

impl Policy for ProductPolicy {
    fn allow(&self, caller: Option<&AuthUser>, action: Action) -> bool {
        let Some(caller) = caller else {
            return false;
        };
        match action {
            Action::List | Action::Retrieve => true,
            Action::Create => match caller.role {
                UserRole::Seller => true,
                UserRole::Buyer => false,
            },
            Action::Update | Action::PartialUpdate | Action::Destroy => false,
        }
    }
}

pub struct OrderPolicy;

impl Policy for OrderPolicy {
    fn allow(&self, caller: Option<&AuthUser>, action: Action) -> bool {
        let Some(caller) = caller else {
            return false;
        };
        match action {
            Action::List => true,
            Action::Create => match caller.role {
                UserRole::Buyer => true,
                UserRole::Seller => false,
            },
            Action::Retrieve | Action::Update | Action::PartialUpdate | Action::Destroy => false,
        }
    }
}

pub fn policy_for(resource: Resource) -> &'static dyn Policy {
    match resource {
        Resource::Product => &ProductPolicy,
        Resource::Order => &OrderPolicy,
    }
}

pub fn allow(caller: Option<&AuthUser>, action: Action, resource: Resource) -> bool {
    policy_for(resource).allow(caller, action)
}

/// Boundary form of [`allow`]: a missing caller is `Unauthorized`, a denied
/// one is `Forbidden`.
pub fn authorize(
    caller: Option<&AuthUser>,
    resource: Resource,
    action: Action,
) -> AppResult<&AuthUser> {
    let Some(user) = caller else {
        tracing::debug!(?resource, ?action, "anonymous caller rejected");
        return Err(AppError::Unauthorized);
    };

    let allowed = allow(Some(user), action, resource);
    tracing::debug!(
        user = %user.uuid,
        role = ?user.role,
        ?resource,
        ?action,
        allowed,
        "policy decision"
    );

    if allowed { Ok(user) } else { Err(AppError::Forbidden) }
}
