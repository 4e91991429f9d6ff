// ============================================================================
// AUTH (GoTrue)
// ============================================================================

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use crate::models::{AuthSession, SyncError};
use crate::utils::constants::{SESSION_STORAGE_KEY, SUPABASE_ANON_KEY, SUPABASE_URL};
use crate::utils::storage::{load_from_storage, raw_remove, save_to_storage};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: crate::models::AuthUser,
}

/// Sesión guardada de un arranque anterior (None si no hay)
pub fn current_session() -> Option<AuthSession> {
    load_from_storage::<AuthSession>(SESSION_STORAGE_KEY)
}

fn persist_session(session: &AuthSession) {
    if let Err(e) = save_to_storage(SESSION_STORAGE_KEY, session) {
        log::error!("❌ Error guardando la sesión: {}", e);
    }
}

fn clear_session() {
    let _ = raw_remove(SESSION_STORAGE_KEY);
}

pub async fn sign_in(email: &str, password: &str) -> Result<AuthSession, SyncError> {
    log::info!("🔐 Iniciando sesión: {}", email);
    let url = format!("{}/auth/v1/token?grant_type=password", SUPABASE_URL);

    let response = Request::post(&url)
        .header("apikey", SUPABASE_ANON_KEY)
        .json(&PasswordGrant { email, password })
        .map_err(|e| SyncError::Network(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(SyncError::Http { status, message });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| SyncError::Decode(e.to_string()))?;

    let session = AuthSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        user: token.user,
    };
    persist_session(&session);
    log::info!("✅ Sesión iniciada: {}", session.user.id);
    Ok(session)
}

pub async fn sign_up(email: &str, password: &str) -> Result<(), SyncError> {
    let url = format!("{}/auth/v1/signup", SUPABASE_URL);

    let response = Request::post(&url)
        .header("apikey", SUPABASE_ANON_KEY)
        .json(&PasswordGrant { email, password })
        .map_err(|e| SyncError::Network(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(SyncError::Http { status, message });
    }
    Ok(())
}

/// Cierra la sesión. Los errores del endpoint ("Auth session missing"
/// incluido) se ignoran - el estado local se limpia en cualquier caso.
pub async fn sign_out() {
    if let Some(session) = current_session() {
        let url = format!("{}/auth/v1/logout", SUPABASE_URL);
        let result = Request::post(&url)
            .header("apikey", SUPABASE_ANON_KEY)
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .send()
            .await;
        if let Err(e) = result {
            log::warn!("⚠️ Logout remoto falló (se ignora): {}", e);
        }
    }
    clear_session();
    log::info!("👋 Sesión cerrada");
}
