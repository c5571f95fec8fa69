use anyhow::Result;
use colored::*;
use inquire::Text;

use crate::app::App;
use crate::commands::{choose_route, print_cancelled};
use crate::routes::Route;

/// Menú principal
pub async fn home_menu(app: &App) -> Result<Route> {
    println!();
    println!("{}", "Portal de NDAs".bold().blue());
    if let Some(session) = app.auth.current_session().await {
        println!("Sesión iniciada como {}", session.email().green());
    }

    let options = vec![
        ("Solicitar un NDA".to_string(), Route::FillNda),
        ("Consultar el estado de un caso".to_string(), Route::SubmitSuccess { case_id: None }),
        ("Mis NDAs".to_string(), Route::ClientDashboard),
        ("Iniciar sesión (clientes)".to_string(), Route::ClientLogin { redirect: None }),
        ("Portal de abogados".to_string(), Route::LawyerCases),
        ("Salir".to_string(), Route::Exit),
    ];

    let route = match choose_route("¿Qué deseas hacer?", options) {
        Route::SubmitSuccess { .. } => match Text::new("ID del caso:").prompt() {
            Ok(id) if !id.trim().is_empty() => Route::SubmitSuccess {
                case_id: Some(id.trim().to_string()),
            },
            Ok(_) => {
                println!("{}", "No se indicó el ID del caso.".red());
                Route::Home
            }
            Err(_) => {
                print_cancelled();
                Route::Home
            }
        },
        // Cancelar en el menú principal es salir
        Route::Home => Route::Exit,
        other => other,
    };

    Ok(route)
}
