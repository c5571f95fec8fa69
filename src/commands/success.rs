use anyhow::Result;
use colored::*;

use crate::app::App;
use crate::commands::{choose_route, offer_download};
use crate::models::CaseState;
use crate::poller::{PollOutcome, PollState, StatusPoller, STATUS_POLL_INTERVAL};
use crate::routes::Route;
use crate::utils::short_id;

fn render(state: &PollState) {
    if let Some(error) = &state.error {
        println!("{}", format!("Error: {}", error).red());
    }
    match state.status {
        CaseState::Submitted => println!("{}", "⏳ Esperando la aprobación del abogado...".yellow()),
        CaseState::Approved if state.polling => {
            println!("{}", "✅ Aprobado, generando el enlace de descarga...".green())
        }
        CaseState::Approved => {}
    }
}

/// Se completa con Ctrl-C. Si no se puede instalar el handler, nunca se completa.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Pantalla posterior al envío: sigue el estado del caso hasta que se apruebe
pub async fn submission_success(app: &App, case_id: Option<&str>) -> Result<Route> {
    let Some(case_id) = case_id.map(str::trim).filter(|id| !id.is_empty()) else {
        println!("{}", "Error: No se indicó el ID del caso.".red());
        return Ok(Route::Home);
    };

    println!();
    println!("{}", "NDA enviado para revisión".bold().blue());
    println!("Tu solicitud se envió correctamente. Un abogado está revisando el documento.");
    println!("ID del caso: {}", case_id.cyan());
    println!("Guarda este ID para consultar el estado más tarde.");
    println!(
        "{}",
        format!(
            "Consultando cada {} segundos (Ctrl-C para dejar de esperar)...",
            STATUS_POLL_INTERVAL.as_secs()
        )
        .blue()
    );

    let poller = StatusPoller::new(app.api.clone());
    let mut state = PollState::default();
    render(&state);
    let outcome = poller
        .run(case_id, interrupted(), |update| {
            if state.apply(update) {
                render(&state);
            }
        })
        .await;

    match outcome {
        PollOutcome::Approved { download_url } => {
            println!();
            println!("{}", "¡NDA aprobado! 🎉".bold().green());
            println!("Tu NDA fue revisado y aprobado. Ya puedes descargar el documento.");
            println!("Descarga: {}", download_url);
            println!("{}", "El enlace de descarga vence en 1 hora.".dimmed());
            offer_download(app, &download_url, &format!("nda-{}.docx", short_id(case_id))).await?;
        }
        PollOutcome::Cancelled => {
            println!();
            println!(
                "{}",
                format!(
                    "Seguimiento detenido. Puedes retomarlo con `nda_portal status {}`.",
                    case_id
                )
                .yellow()
            );
        }
    }

    Ok(choose_route(
        "¿Qué deseas hacer?",
        vec![
            ("Volver al inicio".to_string(), Route::Home),
            ("Mis NDAs".to_string(), Route::ClientDashboard),
            ("Salir".to_string(), Route::Exit),
        ],
    ))
}
