//! Authorization engine. Decides whether an actor may create, update, or
//! delete another account, based purely on the role hierarchy.

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::user::Role;
use portal_entity::user::hierarchy::{authority, has_authority, level_of, role_from_name};

/// Stateless role-comparison checks for user management.
///
/// Every check takes the actor's role explicitly and returns `Ok(())` when
/// allowed. Denials carry `ErrorKind::InsufficientPrivilege` when the actor
/// lacks the authority or level, and `ErrorKind::RoleEscalationDenied` when
/// the target role is above what the actor may grant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationEngine;

impl AuthorizationEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Checks whether `actor` may create an account holding `target`.
    pub fn can_create(&self, actor: Role, target: Role) -> AppResult<()> {
        if !has_authority(actor, authority::USER_CREATE) {
            return Err(AppError::insufficient_privilege(format!(
                "Role '{actor}' does not have authority '{}'",
                authority::USER_CREATE
            )));
        }

        if actor == Role::Admin && target == Role::SuperAdmin {
            return Err(AppError::role_escalation_denied(
                "ADMIN users cannot create SUPER_ADMIN users",
            ));
        }

        if actor != Role::SuperAdmin && level_of(target) > level_of(actor) {
            return Err(AppError::role_escalation_denied(format!(
                "Cannot create users with a higher role than your own. Your role: {actor}, requested role: {target}"
            )));
        }

        Ok(())
    }

    /// Checks whether `actor` may set an account's role to `requested`.
    ///
    /// `actor_is_self` selects between the rules for editing another
    /// account and the no-self-escalation rule, which compares against the
    /// account's `target_current` role.
    pub fn can_update(
        &self,
        actor: Role,
        actor_is_self: bool,
        target_current: Role,
        requested: Role,
    ) -> AppResult<()> {
        if !has_authority(actor, authority::USER_UPDATE) {
            return Err(AppError::insufficient_privilege(format!(
                "Role '{actor}' does not have authority '{}'",
                authority::USER_UPDATE
            )));
        }

        if actor_is_self {
            if level_of(requested) > level_of(target_current) {
                return Err(AppError::role_escalation_denied(format!(
                    "Users cannot escalate their own privileges. Current role: {target_current}, requested role: {requested}"
                )));
            }
            return Ok(());
        }

        if level_of(actor) < level_of(Role::Admin) {
            return Err(AppError::insufficient_privilege(
                "Only ADMIN and SUPER_ADMIN can update other users",
            ));
        }

        if actor == Role::Admin && requested == Role::SuperAdmin {
            return Err(AppError::role_escalation_denied(
                "ADMIN users cannot promote users to SUPER_ADMIN",
            ));
        }

        if actor != Role::SuperAdmin && level_of(requested) > level_of(actor) {
            return Err(AppError::role_escalation_denied(format!(
                "Cannot assign a role higher than your own. Your role: {actor}, requested role: {requested}"
            )));
        }

        Ok(())
    }

    /// Checks whether an actor holding `actor_authorities` may delete
    /// accounts at all.
    ///
    /// Identity rules (protected super-admin, no self-deletion) are applied
    /// by the user-management layer on top of this.
    pub fn can_delete<S: AsRef<str>>(&self, actor_authorities: &[S]) -> AppResult<()> {
        if actor_authorities
            .iter()
            .any(|a| a.as_ref() == authority::USER_DELETE)
        {
            Ok(())
        } else {
            Err(AppError::insufficient_privilege(format!(
                "Missing authority '{}'",
                authority::USER_DELETE
            )))
        }
    }

    /// Like [`can_create`](Self::can_create) with the target role given by
    /// name. Returns the resolved role on success.
    pub fn can_create_named(&self, actor: Role, target: &str) -> AppResult<Role> {
        let target = role_from_name(target)?;
        self.can_create(actor, target)?;
        Ok(target)
    }

    /// Like [`can_update`](Self::can_update) with the requested role given
    /// by name. Returns the resolved role on success.
    pub fn can_update_named(
        &self,
        actor: Role,
        actor_is_self: bool,
        target_current: Role,
        requested: &str,
    ) -> AppResult<Role> {
        let requested = role_from_name(requested)?;
        self.can_update(actor, actor_is_self, target_current, requested)?;
        Ok(requested)
    }
}
