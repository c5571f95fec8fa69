use anyhow::Result;
use colored::*;
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::info;

use crate::app::App;
use crate::auth::SignUpOutcome;
use crate::commands::{choose_route, offer_download, print_api_error, print_cancelled};
use crate::models::{CaseDetail, CaseState, CaseSummary};
use crate::routes::{Route, DEFAULT_LOGIN_REDIRECT};
use crate::utils::{format_timestamp, humanize_key, short_id, status_badge};

const MIN_PASSWORD_LEN: usize = 6;

/// Destino después del login. Nunca vuelve a una pantalla de login.
fn login_target(redirect: Option<&str>) -> Route {
    let fallback = || Route::parse(DEFAULT_LOGIN_REDIRECT).unwrap_or(Route::ClientDashboard);

    match redirect.map(Route::parse) {
        Some(Ok(Route::ClientLogin { .. } | Route::ClientSignup | Route::ClientLogout)) => fallback(),
        Some(Ok(route)) => route,
        Some(Err(_)) | None => fallback(),
    }
}

fn prompt_credentials(confirm_password: bool) -> Option<(String, String)> {
    let email = Text::new("Correo electrónico:")
        .with_placeholder("tu@ejemplo.com")
        .prompt()
        .ok()?;

    let mut password = Password::new("Contraseña:").with_display_mode(PasswordDisplayMode::Masked);
    if confirm_password {
        password = password.with_custom_confirmation_message("Repite la contraseña:");
    } else {
        password = password.without_confirmation();
    }
    let password = password.prompt().ok()?;

    Some((email.trim().to_string(), password))
}

fn print_not_configured() {
    println!(
        "{}",
        "Faltan las credenciales de Supabase. Agrega SUPABASE_URL y SUPABASE_ANON_KEY al entorno (o a .env) para habilitar el login de clientes."
            .yellow()
    );
}

/// Login de clientes. Al terminar vuelve a la ruta de `redirect`.
pub async fn client_login(app: &App, redirect: Option<String>) -> Result<Route> {
    println!();
    println!("{}", "Login de clientes".bold().blue());
    println!("Accede a tu panel de NDAs");

    if !app.auth.is_configured() {
        print_not_configured();
        return Ok(Route::Home);
    }

    let target = login_target(redirect.as_deref());
    let login_again = Route::ClientLogin { redirect };

    match choose_route(
        "¿Qué deseas hacer?",
        vec![
            ("Iniciar sesión".to_string(), login_again.clone()),
            ("¿No tienes cuenta? Regístrate".to_string(), Route::ClientSignup),
            ("Volver al inicio".to_string(), Route::Home),
        ],
    ) {
        route if route == login_again => {}
        other => return Ok(other),
    }

    let Some((email, password)) = prompt_credentials(false) else {
        print_cancelled();
        return Ok(Route::Home);
    };

    println!("{}", "Espera un momento...".blue());
    match app.auth.sign_in(&email, &password).await {
        Ok(session) => {
            println!("{}", format!("Sesión iniciada como {}", session.email()).green());
            Ok(target)
        }
        Err(e) => {
            println!("{}", format!("Error: {}", e).red());
            Ok(login_again)
        }
    }
}

/// Registro de clientes
pub async fn client_signup(app: &App) -> Result<Route> {
    println!();
    println!("{}", "Crear cuenta".bold().blue());
    println!("Regístrate para seguir tus solicitudes de NDA");

    if !app.auth.is_configured() {
        print_not_configured();
        return Ok(Route::Home);
    }

    let Some((email, password)) = prompt_credentials(true) else {
        print_cancelled();
        return Ok(Route::Home);
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        println!(
            "{}",
            format!("La contraseña debe tener al menos {} caracteres.", MIN_PASSWORD_LEN).red()
        );
        return Ok(Route::ClientSignup);
    }

    match app.auth.sign_up(&email, &password).await {
        Ok(SignUpOutcome::SignedIn(session)) => {
            println!("{}", format!("Cuenta creada. Sesión iniciada como {}", session.email()).green());
            Ok(Route::ClientDashboard)
        }
        Ok(SignUpOutcome::ConfirmationSent { email }) => {
            println!("{}", format!("✅ Enviamos un correo de verificación a {}.", email).green());
            println!("📧 Revisa tu bandeja de entrada y abre el enlace de verificación.");
            println!("✅ Después vuelve aquí e inicia sesión con ese correo y la contraseña que acabas de crear.");
            Ok(Route::ClientLogin { redirect: None })
        }
        Err(e) => {
            println!("{}", format!("Error: {}", e).red());
            Ok(Route::ClientSignup)
        }
    }
}

pub async fn client_logout(app: &App) -> Result<Route> {
    app.auth.sign_out().await?;
    info!("sesión de cliente cerrada");
    println!("{}", "Sesión cerrada.".green());
    Ok(Route::Home)
}

fn print_case_table(cases: &[CaseSummary]) {
    println!(
        "{:<10} {:<24} {:<16} {}",
        "ID".bold(),
        "Nombre".bold(),
        "Estado".bold(),
        "Enviado".bold()
    );
    for case in cases {
        println!(
            "{:<10} {:<24} {:<16} {}",
            short_id(&case.id),
            case.client_name,
            status_badge(case.status),
            format_timestamp(&case.created_at)
        );
    }
}

/// Panel de NDAs del cliente
pub async fn client_dashboard(app: &App) -> Result<Route> {
    let session = match app.require_session(&Route::ClientDashboard).await {
        Ok(session) => session,
        Err(login) => return Ok(login),
    };

    println!();
    println!("{}", "Mis NDAs".bold().blue());
    println!("{}", session.email());

    let mut options = Vec::new();
    match app.api.my_cases(&session.access_token).await {
        Ok(cases) if cases.is_empty() => {
            println!("{}", "Todavía no tienes NDAs. Crea el primero para empezar.".yellow());
        }
        Ok(cases) => {
            print_case_table(&cases);
            for case in &cases {
                options.push((
                    format!("Ver {} ({})", short_id(&case.id), case.status.as_str()),
                    Route::ClientCase {
                        id: case.id.clone(),
                    },
                ));
            }
        }
        Err(e) => print_api_error(&e),
    }

    options.push(("+ Nuevo NDA".to_string(), Route::FillNda));
    options.push(("Cerrar sesión".to_string(), Route::ClientLogout));
    options.push(("Volver al inicio".to_string(), Route::Home));

    Ok(choose_route("Selecciona una opción:", options))
}

pub fn print_case_detail(detail: &CaseDetail) {
    let case = &detail.case;
    println!("{} {}", "Caso".bold(), case.id);
    println!("Estado: {}", status_badge(case.status));
    println!("Cliente: {} <{}>", case.client_name, case.client_email);
    println!("Plantilla: {}", case.template_id);
    println!("Enviado: {}", format_timestamp(&case.created_at));
    println!("Actualizado: {}", format_timestamp(&case.updated_at));

    println!();
    println!("{}", "Detalle del NDA".bold());
    for answer in &detail.answers {
        println!("  {}: {}", humanize_key(&answer.key).dimmed(), answer.value);
    }
    println!();
}

/// Detalle de un caso del cliente, con descarga si ya fue aprobado
pub async fn client_case(app: &App, id: &str) -> Result<Route> {
    let route = Route::ClientCase { id: id.to_string() };
    let session = match app.require_session(&route).await {
        Ok(session) => session,
        Err(login) => return Ok(login),
    };

    let detail = match app.api.my_case_detail(id, &session.access_token).await {
        Ok(detail) => detail,
        Err(e) => {
            print_api_error(&e);
            return Ok(Route::ClientDashboard);
        }
    };

    println!();
    print_case_detail(&detail);

    match (detail.case.status, detail.download_url.as_deref()) {
        (CaseState::Approved, Some(url)) => {
            println!("{}", "Tu NDA fue aprobado. Ya puedes descargar el documento final.".green());
            println!("Descarga (DOCX): {}", url);
            if let Some(preview) = &detail.preview_url {
                println!("Vista previa: {}", preview);
            }
            println!("{}", "💡 Los enlaces de descarga vencen en 1 hora.".dimmed());
            offer_download(app, url, &format!("nda-{}.docx", short_id(id))).await?;
        }
        (CaseState::Approved, None) => {
            println!("{}", "Tu NDA fue aprobado; el enlace de descarga aún no está disponible.".yellow());
        }
        (CaseState::Submitted, _) => {
            println!(
                "{}",
                "Un abogado está revisando tu NDA. Podrás descargarlo cuando sea aprobado.".yellow()
            );
        }
    }

    Ok(choose_route(
        "¿Qué deseas hacer?",
        vec![
            ("Actualizar".to_string(), route.clone()),
            ("Volver al panel".to_string(), Route::ClientDashboard),
            ("Volver al inicio".to_string(), Route::Home),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_returns_to_requested_route() {
        assert_eq!(login_target(Some("/fill/nda")), Route::FillNda);
        assert_eq!(
            login_target(Some("/client/cases/c-1")),
            Route::ClientCase { id: "c-1".to_string() }
        );
    }

    #[test]
    fn login_defaults_to_dashboard() {
        assert_eq!(login_target(None), Route::ClientDashboard);
        assert_eq!(login_target(Some("/nowhere")), Route::ClientDashboard);
        assert_eq!(login_target(Some("/client/login?redirect=/fill/nda")), Route::ClientDashboard);
    }
}
