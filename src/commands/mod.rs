pub mod client;
pub mod download;
pub mod fill;
pub mod home;
pub mod lawyer;
pub mod success;

pub use client::*;
pub use download::*;
pub use fill::*;
pub use home::*;
pub use lawyer::*;
pub use success::*;

use colored::*;
use inquire::Select;

use crate::error::ApiError;
use crate::routes::Route;

/// Menú de navegación: cada opción lleva a una ruta. Cancelar vuelve al inicio.
pub fn choose_route(message: &str, options: Vec<(String, Route)>) -> Route {
    let labels: Vec<String> = options.iter().map(|(label, _)| label.clone()).collect();

    match Select::new(message, labels).prompt() {
        Ok(chosen) => options
            .into_iter()
            .find(|(label, _)| *label == chosen)
            .map(|(_, route)| route)
            .unwrap_or(Route::Home),
        Err(_) => Route::Home,
    }
}

pub fn print_api_error(err: &ApiError) {
    println!("{}", format!("Error: {}", err).red());
}

pub fn print_cancelled() {
    println!("{}", "Operación cancelada.".yellow());
}
