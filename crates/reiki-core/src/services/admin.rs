//! Admin panel: list profiles, flip roles, activate or deactivate therapists.

use std::sync::Arc;

use uuid::Uuid;

use reiki_types::{BackendError, Profile, Role};

use crate::backend::AgendaBackend;
use crate::error::{AppError, AppResult};
use crate::services::access::{require_admin, ADMIN_ONLY};

pub const ROLE_UPDATED: &str = "Rol actualizado";
pub const ROLE_FAILED: &str = "No se pudo cambiar el rol";
pub const ACTIVE_FAILED: &str = "No se pudo actualizar el estado";

pub const fn active_message(active: bool) -> &'static str {
    if active {
        "Activado"
    } else {
        "Desactivado"
    }
}

/// Profiles whose lowercase name or id contains `query`; blank keeps all.
pub fn filter_profiles<'a>(profiles: &'a [Profile], query: &str) -> Vec<&'a Profile> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return profiles.iter().collect();
    }
    profiles
        .iter()
        .filter(|p| {
            p.full_name.as_deref().is_some_and(|n| n.to_lowercase().contains(&q))
                || p.id.to_string().contains(&q)
        })
        .collect()
}

pub struct AdminPanel {
    backend: Arc<dyn AgendaBackend>,
    profiles: Vec<Profile>,
}

impl AdminPanel {
    /// Open the panel; anyone but an admin gets [`AppError::Forbidden`].
    pub async fn open(backend: Arc<dyn AgendaBackend>) -> AppResult<Self> {
        if !require_admin(backend.as_ref()).await.is_granted() {
            return Err(AppError::Forbidden(ADMIN_ONLY.to_string()));
        }
        let mut panel = Self { backend, profiles: Vec::new() };
        panel.reload().await?;
        Ok(panel)
    }

    pub async fn reload(&mut self) -> AppResult<()> {
        self.profiles = self.backend.list_profiles().await?;
        Ok(())
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn filter(&self, query: &str) -> Vec<&Profile> {
        filter_profiles(&self.profiles, query)
    }

    fn position(&self, id: Uuid) -> AppResult<usize> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BackendError::NotFound { what: format!("profile {id}") }.into())
    }

    /// Switch between admin and therapist; returns the new role.
    pub async fn toggle_role(&mut self, id: Uuid) -> AppResult<Role> {
        let idx = self.position(id)?;
        let new_role = self.profiles[idx].role.toggled();
        if let Err(e) = self.backend.admin_set_role(id, new_role).await {
            tracing::warn!("{} for {}: {}", ROLE_FAILED, id, e);
            return Err(e.into());
        }
        self.profiles[idx].role = new_role;
        tracing::info!("{}: {} is now {}", ROLE_UPDATED, id, new_role);
        Ok(new_role)
    }

    pub async fn set_active(&mut self, id: Uuid, active: bool) -> AppResult<()> {
        let idx = self.position(id)?;
        if let Err(e) = self.backend.set_profile_active(id, active).await {
            tracing::warn!("{} for {}: {}", ACTIVE_FAILED, id, e);
            return Err(e.into());
        }
        self.profiles[idx].is_active = active;
        tracing::info!("{} {}", active_message(active), id);
        Ok(())
    }
}
