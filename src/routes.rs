//! Tabla de rutas del portal.
//!
//! Cada pantalla tiene una ruta con forma de path, p. ej. `/client/cases/<id>`,
//! para poder volver a ella después de iniciar sesión.

use std::fmt;

use reqwest::Url;

use crate::error::RouteError;

/// Base ficticia para reutilizar el parser de URLs con paths relativos
const ROUTE_BASE: &str = "http://portal.local";

pub const DEFAULT_LOGIN_REDIRECT: &str = "/client/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    FillNda,
    SubmitSuccess { case_id: Option<String> },
    ClientLogin { redirect: Option<String> },
    ClientSignup,
    ClientLogout,
    ClientDashboard,
    ClientCase { id: String },
    LawyerLogin,
    LawyerCases,
    LawyerCase { id: String },
    LawyerLogout,
    Exit,
}

impl Route {
    /// Rutas que requieren una sesión de cliente
    pub fn requires_client_session(&self) -> bool {
        matches!(
            self,
            Route::FillNda | Route::ClientDashboard | Route::ClientCase { .. }
        )
    }

    /// Login de cliente que vuelve a `path` al terminar
    pub fn login_returning_to(path: impl Into<String>) -> Self {
        Route::ClientLogin {
            redirect: Some(path.into()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::FillNda => "/fill/nda".to_string(),
            Route::SubmitSuccess { case_id } => {
                with_query("/submit/success", "caseId", case_id.as_deref())
            }
            Route::ClientLogin { redirect } => {
                with_query("/client/login", "redirect", redirect.as_deref())
            }
            Route::ClientSignup => "/client/signup".to_string(),
            Route::ClientLogout => "/client/logout".to_string(),
            Route::ClientDashboard => "/client/dashboard".to_string(),
            Route::ClientCase { id } => format!("/client/cases/{}", id),
            Route::LawyerLogin => "/lawyer".to_string(),
            Route::LawyerCases => "/lawyer/cases".to_string(),
            Route::LawyerCase { id } => format!("/lawyer/cases/{}", id),
            Route::LawyerLogout => "/lawyer/logout".to_string(),
            Route::Exit => "/exit".to_string(),
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        if !trimmed.starts_with('/') {
            return Err(RouteError::Invalid {
                path: path.to_string(),
                reason: "debe empezar con '/'".to_string(),
            });
        }

        let url = Url::parse(ROUTE_BASE)
            .and_then(|base| base.join(trimmed))
            .map_err(|e| RouteError::Invalid {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let query = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["fill", "nda"] => Route::FillNda,
            ["submit", "success"] => Route::SubmitSuccess {
                case_id: query("caseId"),
            },
            ["client", "login"] => Route::ClientLogin {
                redirect: query("redirect"),
            },
            ["client", "signup"] => Route::ClientSignup,
            ["client", "logout"] => Route::ClientLogout,
            ["client", "dashboard"] => Route::ClientDashboard,
            ["client", "cases", id] => Route::ClientCase { id: id.to_string() },
            ["lawyer"] => Route::LawyerLogin,
            ["lawyer", "cases"] => Route::LawyerCases,
            ["lawyer", "cases", id] => Route::LawyerCase { id: id.to_string() },
            ["lawyer", "logout"] => Route::LawyerLogout,
            ["exit"] => Route::Exit,
            _ => return Err(RouteError::Unknown(path.to_string())),
        };

        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn with_query(path: &str, name: &str, value: Option<&str>) -> String {
    let Some(value) = value else {
        return path.to_string();
    };

    match Url::parse(ROUTE_BASE).and_then(|base| base.join(path)) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(name, value);
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        }
        Err(_) => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_preserves_return_path() {
        let login = Route::login_returning_to(Route::FillNda.path());

        assert_eq!(login.path(), "/client/login?redirect=%2Ffill%2Fnda");
        assert_eq!(
            Route::parse(&login.path()),
            Ok(Route::ClientLogin {
                redirect: Some("/fill/nda".to_string())
            })
        );
    }

    #[test]
    fn unencoded_redirect_is_accepted() {
        assert_eq!(
            Route::parse("/client/login?redirect=/client/cases/abc"),
            Ok(Route::login_returning_to("/client/cases/abc"))
        );
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            Route::Home,
            Route::FillNda,
            Route::SubmitSuccess {
                case_id: Some("c-1".to_string()),
            },
            Route::SubmitSuccess { case_id: None },
            Route::ClientLogin { redirect: None },
            Route::ClientSignup,
            Route::ClientLogout,
            Route::ClientDashboard,
            Route::ClientCase {
                id: "c-1".to_string(),
            },
            Route::LawyerLogin,
            Route::LawyerCases,
            Route::LawyerCase {
                id: "c-2".to_string(),
            },
            Route::LawyerLogout,
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.path()), Ok(route.clone()), "{}", route);
        }
    }

    #[test]
    fn rejects_unknown_and_relative_paths() {
        assert_eq!(
            Route::parse("/admin"),
            Err(RouteError::Unknown("/admin".to_string()))
        );
        assert!(matches!(
            Route::parse("client/dashboard"),
            Err(RouteError::Invalid { .. })
        ));
    }

    #[test]
    fn protected_routes() {
        assert!(Route::FillNda.requires_client_session());
        assert!(Route::ClientCase { id: "x".into() }.requires_client_session());
        assert!(!Route::SubmitSuccess { case_id: None }.requires_client_session());
        assert!(!Route::LawyerCases.requires_client_session());
    }
}
