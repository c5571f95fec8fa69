use tracing::info;

use crate::auth::{IdentityProvider, Session};
use crate::routes::Route;

/// Resultado de comprobar el acceso a una ruta
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Ruta protegida con sesión vigente
    Allow(Session),
    /// Ruta pública
    Open,
    /// Sin sesión: ir al login y volver después
    Redirect(Route),
}

/// Protege las rutas de cliente con la sesión del proveedor de identidad
pub struct AuthGate<'a> {
    provider: &'a dyn IdentityProvider,
}

impl<'a> AuthGate<'a> {
    pub fn new(provider: &'a dyn IdentityProvider) -> Self {
        Self { provider }
    }

    pub async fn check(&self, route: &Route) -> GateDecision {
        if !route.requires_client_session() {
            return GateDecision::Open;
        }

        match self.provider.current_session().await {
            Some(session) => GateDecision::Allow(session),
            None => {
                info!(route = %route, "ruta protegida sin sesión, redirigiendo al login");
                GateDecision::Redirect(Route::login_returning_to(route.path()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::tests::session;
    use crate::auth::{DisabledAuth, SignUpOutcome};
    use crate::error::AuthError;
    use async_trait::async_trait;

    struct SignedIn(Session);

    #[async_trait]
    impl IdentityProvider for SignedIn {
        fn is_configured(&self) -> bool {
            true
        }

        async fn current_session(&self) -> Option<Session> {
            Some(self.0.clone())
        }

        async fn sign_in(&self, _: &str, _: &str) -> Result<Session, AuthError> {
            Ok(self.0.clone())
        }

        async fn sign_up(&self, _: &str, _: &str) -> Result<SignUpOutcome, AuthError> {
            Ok(SignUpOutcome::SignedIn(self.0.clone()))
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn no_session_redirects_with_return_path() {
        let provider = DisabledAuth;
        let gate = AuthGate::new(&provider);
        let route = Route::ClientCase {
            id: "c-42".to_string(),
        };

        let decision = gate.check(&route).await;

        assert_eq!(
            decision,
            GateDecision::Redirect(Route::ClientLogin {
                redirect: Some("/client/cases/c-42".to_string())
            })
        );
        if let GateDecision::Redirect(login) = decision {
            assert_eq!(login.path(), "/client/login?redirect=%2Fclient%2Fcases%2Fc-42");
        }
    }

    #[tokio::test]
    async fn active_session_is_handed_to_the_page() {
        let provider = SignedIn(session(i64::MAX));
        let gate = AuthGate::new(&provider);

        match gate.check(&Route::FillNda).await {
            GateDecision::Allow(s) => assert_eq!(s.access_token, "access"),
            other => panic!("se esperaba acceso, se obtuvo {:?}", other),
        }
    }

    #[tokio::test]
    async fn public_routes_are_open() {
        let provider = DisabledAuth;
        let gate = AuthGate::new(&provider);

        assert_eq!(
            gate.check(&Route::SubmitSuccess { case_id: None }).await,
            GateDecision::Open
        );
        assert_eq!(gate.check(&Route::LawyerCases).await, GateDecision::Open);
    }
}
