use anyhow::Result;
use colored::*;
use inquire::{Confirm, Password, PasswordDisplayMode, Select};
use reqwest::StatusCode;
use tracing::info;

use crate::app::App;
use crate::commands::{choose_route, print_api_error, print_case_detail, save_signed};
use crate::models::{CaseState, CaseSummary};
use crate::routes::Route;
use crate::utils::{format_timestamp, short_id};

/// Acceso al portal de abogados con la clave compartida
pub fn lawyer_login(app: &App) -> Result<Route> {
    println!();
    println!("{}", "Portal de abogados".bold().blue());
    println!("Revisa y aprueba solicitudes de NDA");

    let key = match Password::new("Clave de acceso de abogado:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Esta clave te permite ver y aprobar casos")
        .prompt()
    {
        Ok(key) => key,
        Err(_) => return Ok(Route::Home),
    };

    if !app.lawyer_keys.save(&key)? {
        println!("{}", "Ingresa tu clave de abogado.".red());
        return Ok(Route::LawyerLogin);
    }

    Ok(Route::LawyerCases)
}

pub fn lawyer_logout(app: &App) -> Result<Route> {
    app.lawyer_keys.clear()?;
    info!("clave de abogado eliminada");
    println!("{}", "Sesión de abogado cerrada.".green());
    Ok(Route::Home)
}

fn print_summary(cases: &[CaseSummary]) {
    let pending = cases
        .iter()
        .filter(|c| c.status == CaseState::Submitted)
        .count();
    let approved = cases.len() - pending;

    println!("- Total de casos: {}", cases.len());
    println!("- ⏳ En revisión: {}", pending);
    println!("- ✅ Aprobados: {}", approved);
    println!();
}

/// Listado de casos para revisión
pub async fn lawyer_cases(app: &App) -> Result<Route> {
    let key = match app.require_lawyer_key() {
        Ok(key) => key,
        Err(login) => return Ok(login),
    };

    println!();
    println!("{}", "Casos para revisión".bold().blue());

    let mut options = Vec::new();
    match app.api.lawyer_cases(&key).await {
        Ok(cases) if cases.is_empty() => println!("{}", "No hay casos.".yellow()),
        Ok(cases) => {
            print_summary(&cases);
            for case in &cases {
                options.push((
                    format!(
                        "{} {} - {} <{}> - {}",
                        short_id(&case.id),
                        case.status,
                        case.client_name,
                        case.client_email,
                        format_timestamp(&case.created_at)
                    ),
                    Route::LawyerCase {
                        id: case.id.clone(),
                    },
                ));
            }
        }
        Err(e) => {
            print_api_error(&e);
            if e.status() == Some(StatusCode::UNAUTHORIZED) {
                println!("{}", "La clave de abogado no es válida.".yellow());
                options.push(("Ingresar otra clave".to_string(), Route::LawyerLogin));
            }
        }
    }

    options.push(("Actualizar".to_string(), Route::LawyerCases));
    options.push(("Cerrar sesión de abogado".to_string(), Route::LawyerLogout));
    options.push(("Volver al inicio".to_string(), Route::Home));

    Ok(choose_route("Selecciona un caso:", options))
}

/// Revisión de un caso: vista previa, descarga y aprobación
pub async fn lawyer_case(app: &App, id: &str) -> Result<Route> {
    let key = match app.require_lawyer_key() {
        Ok(key) => key,
        Err(login) => return Ok(login),
    };
    let route = Route::LawyerCase { id: id.to_string() };

    let detail = match app.api.lawyer_case_detail(id, &key).await {
        Ok(detail) => detail,
        Err(e) => {
            print_api_error(&e);
            return Ok(Route::LawyerCases);
        }
    };

    println!();
    print_case_detail(&detail);

    // Acciones disponibles según el estado y los enlaces del backend
    const APPROVE: &str = "Aprobar NDA";
    const PREVIEW: &str = "Guardar vista previa (HTML)";
    const DOCX: &str = "Descargar documento (DOCX)";
    const BACK: &str = "Volver al listado";

    let mut actions = Vec::new();
    if detail.case.status == CaseState::Submitted {
        actions.push(APPROVE);
    }
    if detail.preview_html_url.is_some() {
        actions.push(PREVIEW);
    }
    if detail.docx_url.is_some() {
        actions.push(DOCX);
    }
    actions.push(BACK);

    let action = match Select::new("¿Qué deseas hacer?", actions).prompt() {
        Ok(action) => action,
        Err(_) => return Ok(Route::LawyerCases),
    };

    match action {
        APPROVE => {
            let confirmed = Confirm::new(
                "¿Seguro que deseas aprobar este NDA? El cliente podrá descargar el documento.",
            )
            .with_default(false)
            .prompt()
            .unwrap_or(false);

            if !confirmed {
                return Ok(route);
            }

            match app.api.approve_case(id, &key).await {
                Ok(approval) if approval.ok => {
                    info!(case_id = id, "caso aprobado");
                    println!(
                        "{}",
                        "¡Caso aprobado! El cliente ya puede descargar el documento.".green()
                    );
                    println!("Enlace del cliente: {}", approval.client_docx_url);
                }
                Ok(_) => println!("{}", "El backend no confirmó la aprobación.".yellow()),
                Err(e) => print_api_error(&e),
            }
            Ok(route)
        }
        PREVIEW => {
            if let Some(url) = &detail.preview_html_url {
                save_signed(app, url, &format!("nda-{}-preview.html", short_id(id))).await?;
            }
            Ok(route)
        }
        DOCX => {
            if let Some(url) = &detail.docx_url {
                save_signed(app, url, &format!("nda-{}.docx", short_id(id))).await?;
            }
            Ok(route)
        }
        _ => Ok(Route::LawyerCases),
    }
}
