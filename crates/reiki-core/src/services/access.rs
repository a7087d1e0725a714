//! Route guards for the therapist and admin views.

use reiki_types::{AuthUser, Profile};

use crate::backend::AgendaBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Forbidden,
}

impl Access {
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

pub const ADMIN_ONLY: &str = "Solo administradores.";
pub const NO_PERMISSION: &str = "No tenés permisos.";

/// Admin view guard. Every failure path degrades to [`Access::Forbidden`].
pub async fn require_admin(backend: &dyn AgendaBackend) -> Access {
    let user = match backend.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => return Access::Forbidden,
        Err(e) => {
            tracing::warn!("Session lookup failed: {}", e);
            return Access::Forbidden;
        }
    };
    match backend.is_admin(user.id).await {
        Ok(true) => Access::Granted,
        Ok(false) => Access::Forbidden,
        Err(e) => {
            tracing::warn!("is_admin check failed for {}: {}", user.id, e);
            Access::Forbidden
        }
    }
}

/// Therapist view guard: the caller's profile must carry a panel role.
pub async fn require_therapist(backend: &dyn AgendaBackend) -> Access {
    match signed_in_profile(backend).await {
        Some((_, profile)) if profile.can_use_panel() => Access::Granted,
        _ => Access::Forbidden,
    }
}

/// The signed-in user and their profile row, `None` on any failure.
pub async fn signed_in_profile(backend: &dyn AgendaBackend) -> Option<(AuthUser, Profile)> {
    let user = backend.current_user().await.ok().flatten()?;
    match backend.get_profile(user.id).await {
        Ok(profile) => Some((user, profile)),
        Err(e) => {
            tracing::warn!("Profile lookup failed for {}: {}", user.id, e);
            None
        }
    }
}

/// Name shown in the panel header: profile name, then email, then a generic label.
pub fn header_name(user: &AuthUser, profile: Option<&Profile>) -> String {
    profile
        .and_then(|p| p.full_name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or(user.email.as_deref())
        .unwrap_or("Terapeuta")
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::{profile, MemoryBackend};
    use reiki_types::Role;

    #[tokio::test]
    async fn test_admin_guard() {
        let backend = MemoryBackend::with_user(profile("Ada", Role::Admin));
        assert_eq!(require_admin(&backend).await, Access::Granted);

        let backend = MemoryBackend::with_user(profile("Tom", Role::Therapist));
        assert_eq!(require_admin(&backend).await, Access::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_guard_degrades_on_error_and_no_session() {
        let backend = MemoryBackend::with_user(profile("Ada", Role::Admin));
        backend.state().fail_is_admin = true;
        assert_eq!(require_admin(&backend).await, Access::Forbidden);

        let anonymous = MemoryBackend::default();
        assert_eq!(require_admin(&anonymous).await, Access::Forbidden);
    }

    #[tokio::test]
    async fn test_therapist_guard() {
        let backend = MemoryBackend::with_user(profile("Tom", Role::Therapist));
        assert!(require_therapist(&backend).await.is_granted());

        let backend = MemoryBackend::with_user(profile("Ada", Role::Admin));
        assert!(require_therapist(&backend).await.is_granted());

        backend.state().fail_profiles = true;
        assert_eq!(require_therapist(&backend).await, Access::Forbidden);

        assert_eq!(require_therapist(&MemoryBackend::default()).await, Access::Forbidden);
    }

    #[test]
    fn test_header_name_fallbacks() {
        let user = AuthUser { id: uuid::Uuid::nil(), email: Some("t@example.com".to_string()) };
        let mut p = profile("Tom", Role::Therapist);

        assert_eq!(header_name(&user, Some(&p)), "Tom");
        p.full_name = Some(" ".to_string());
        assert_eq!(header_name(&user, Some(&p)), "t@example.com");
        assert_eq!(header_name(&AuthUser { email: None, ..user }, None), "Terapeuta");
    }
}
