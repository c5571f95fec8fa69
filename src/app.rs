use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::auth::{
    AuthGate, DisabledAuth, GateDecision, IdentityProvider, LawyerKeyStore, Session, SessionStore,
    SupabaseAuth,
};
use crate::commands;
use crate::config::Config;
use crate::routes::Route;

/// Dependencias compartidas por todas las pantallas
pub struct App {
    pub api: ApiClient,
    pub auth: Box<dyn IdentityProvider>,
    pub lawyer_keys: LawyerKeyStore,
    pub downloads_dir: PathBuf,
}

impl App {
    pub fn from_config(config: &Config) -> Self {
        let auth: Box<dyn IdentityProvider> = match &config.supabase {
            Some(supabase) => Box::new(SupabaseAuth::new(
                supabase.clone(),
                SessionStore::new(config.session_path()),
            )),
            None => Box::new(DisabledAuth),
        };

        App {
            api: ApiClient::new(config.api_base.clone()),
            auth,
            lawyer_keys: LawyerKeyStore::new(config.lawyer_key_path()),
            downloads_dir: PathBuf::from("."),
        }
    }

    pub fn gate(&self) -> AuthGate<'_> {
        AuthGate::new(self.auth.as_ref())
    }

    /// Sesión para una pantalla protegida, o la ruta de login a la que ir
    pub async fn require_session(&self, route: &Route) -> Result<Session, Route> {
        match self.gate().check(route).await {
            GateDecision::Allow(session) => Ok(session),
            GateDecision::Redirect(login) => Err(login),
            GateDecision::Open => self
                .auth
                .current_session()
                .await
                .ok_or_else(|| Route::login_returning_to(route.path())),
        }
    }

    /// Clave de abogado guardada, o la ruta del login de abogados
    pub fn require_lawyer_key(&self) -> Result<String, Route> {
        match self.lawyer_keys.load() {
            Ok(Some(key)) => Ok(key),
            Ok(None) => Err(Route::LawyerLogin),
            Err(e) => {
                println!("{}", format!("No se pudo leer la clave de abogado: {}", e).red());
                Err(Route::LawyerLogin)
            }
        }
    }

    /// Muestra una pantalla y devuelve la siguiente ruta
    pub async fn navigate(&self, route: Route) -> Result<Route> {
        match route {
            Route::Home => commands::home_menu(self).await,
            Route::FillNda => commands::fill_nda(self).await,
            Route::SubmitSuccess { case_id } => {
                commands::submission_success(self, case_id.as_deref()).await
            }
            Route::ClientLogin { redirect } => commands::client_login(self, redirect).await,
            Route::ClientSignup => commands::client_signup(self).await,
            Route::ClientLogout => commands::client_logout(self).await,
            Route::ClientDashboard => commands::client_dashboard(self).await,
            Route::ClientCase { id } => commands::client_case(self, &id).await,
            Route::LawyerLogin => commands::lawyer_login(self),
            Route::LawyerCases => commands::lawyer_cases(self).await,
            Route::LawyerCase { id } => commands::lawyer_case(self, &id).await,
            Route::LawyerLogout => commands::lawyer_logout(self),
            Route::Exit => Ok(Route::Exit),
        }
    }

    /// Recorre pantallas hasta que el usuario sale
    pub async fn run(&self, start: Route) -> Result<()> {
        let mut route = start;

        while route != Route::Exit {
            info!(route = %route, "navegando");
            route = match self.navigate(route).await {
                Ok(next) => next,
                Err(e) => {
                    error!(error = %e, "error en la pantalla");
                    println!("{}", format!("Error: {:#}", e).red());
                    Route::Home
                }
            };
        }

        println!("¡Hasta pronto!");
        Ok(())
    }
}
