use anyhow::Result;
use colored::*;
use inquire::Text;
use tracing::info;

use crate::app::App;
use crate::commands::{choose_route, print_api_error, print_cancelled};
use crate::form::{InquirePrompter, SmartForm};
use crate::models::CaseSubmission;
use crate::routes::Route;

/// Pide nombre y correo del cliente, precargados con los datos de la sesión
fn prompt_contact(default_name: &str, default_email: &str) -> Option<(String, String)> {
    let mut name = default_name.to_string();
    let mut email = default_email.to_string();

    loop {
        let entered_name = Text::new("Nombre completo *:")
            .with_initial_value(&name)
            .prompt()
            .ok()?;
        let entered_email = Text::new("Correo electrónico *:")
            .with_initial_value(&email)
            .prompt()
            .ok()?;
        name = entered_name;
        email = entered_email;

        if !name.trim().is_empty() && !email.trim().is_empty() {
            return Some((name.trim().to_string(), email.trim().to_string()));
        }
        println!("{}", "Ingresa tu nombre y correo electrónico.".red());
    }
}

/// Formulario de solicitud de NDA
pub async fn fill_nda(app: &App) -> Result<Route> {
    let route = Route::FillNda;
    let session = match app.require_session(&route).await {
        Ok(session) => session,
        Err(login) => return Ok(login),
    };

    println!();
    println!("{}", "Solicitar un NDA".bold().blue());
    println!("Completa el formulario. Un abogado revisará la solicitud antes de que puedas descargar el documento final.");

    // Se usa la primera plantilla disponible
    let templates = match app.api.templates().await {
        Ok(templates) => templates,
        Err(e) => {
            print_api_error(&e);
            return Ok(Route::Home);
        }
    };
    let Some(template) = templates.into_iter().next() else {
        println!("{}", "No hay plantillas disponibles.".red());
        return Ok(Route::Home);
    };

    let questions = match app.api.template_questions(&template.id).await {
        Ok(questions) => questions,
        Err(e) => {
            print_api_error(&e);
            return Ok(Route::Home);
        }
    };

    println!("{}", "Tus datos".blue());
    let Some((client_name, client_email)) = prompt_contact(session.full_name(), session.email())
    else {
        print_cancelled();
        return Ok(Route::Home);
    };

    println!("{}", format!("Datos del NDA ({})", template.name).blue());
    let mut form = SmartForm::new(&questions);
    let submission = match form.fill(&mut InquirePrompter, |answers| CaseSubmission {
        template_id: template.id.clone(),
        client_name,
        client_email,
        answers,
    }) {
        Ok(submission) => submission,
        Err(_) => {
            print_cancelled();
            return Ok(Route::Home);
        }
    };

    loop {
        // La sesión puede haber vencido mientras se completaba el formulario
        let session = match app.require_session(&route).await {
            Ok(session) => session,
            Err(login) => return Ok(login),
        };

        println!("{}", "Enviando solicitud...".blue());
        match app
            .api
            .submit_case(&submission, Some(&session.access_token))
            .await
        {
            Ok(created) => {
                info!(case_id = %created.case_id, status = created.status.as_str(), "caso enviado");
                if let Some(warning) = &created.warning {
                    println!("{}", format!("Aviso: {}", warning).yellow());
                }
                if !created.missing_tokens.is_empty() {
                    println!(
                        "{}",
                        format!("Campos sin completar en el documento: {}", created.missing_tokens.join(", "))
                            .yellow()
                    );
                }
                return Ok(Route::SubmitSuccess {
                    case_id: Some(created.case_id),
                });
            }
            Err(e) if e.is_quota_exceeded() => {
                println!(
                    "{}",
                    "Ya usaste tu NDA gratuito. Los NDAs adicionales requieren pago.".yellow()
                );
                println!("{}", "💡 ¡La integración de pagos llegará pronto!".yellow());
                return Ok(choose_route(
                    "¿Qué deseas hacer?",
                    vec![
                        ("Ver mis NDAs".to_string(), Route::ClientDashboard),
                        ("Volver al inicio".to_string(), Route::Home),
                    ],
                ));
            }
            Err(e) => {
                print_api_error(&e);
                let next = choose_route(
                    "¿Qué deseas hacer?",
                    vec![
                        ("Reintentar el envío".to_string(), Route::FillNda),
                        ("Volver al inicio".to_string(), Route::Home),
                    ],
                );
                if next != Route::FillNda {
                    return Ok(next);
                }
            }
        }
    }
}
