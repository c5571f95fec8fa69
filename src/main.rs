use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod auth;
mod commands;
mod config;
mod error;
mod form;
mod models;
mod poller;
mod routes;
mod utils;

use app::App;
use config::Config;
use routes::Route;

#[derive(Parser)]
#[command(author, version, about = "Portal de NDAs: solicitud, revisión y descarga", long_about = None)]
struct Cli {
    /// URL base del backend de NDAs
    #[arg(long, env = "NDA_API_BASE", global = true)]
    api_base: Option<String>,

    /// Muestra los logs de depuración
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Completar y enviar una solicitud de NDA
    Fill,
    /// Seguir el estado de un caso hasta su aprobación
    Status {
        /// ID del caso
        case_id: String,
    },
    /// Iniciar sesión como cliente
    Login {
        /// Ruta a la que volver después del login
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Crear una cuenta de cliente
    Signup,
    /// Cerrar la sesión de cliente
    Logout,
    /// Ver mis NDAs
    Dashboard,
    /// Ver el detalle de uno de mis casos
    Case {
        /// ID del caso
        id: String,
    },
    /// Abrir una ruta del portal, p. ej. /client/cases/<id>
    Open {
        path: String,
    },
    /// Portal de abogados
    Lawyer {
        #[command(subcommand)]
        command: LawyerCommands,
    },
}

#[derive(Subcommand)]
enum LawyerCommands {
    /// Guardar la clave de acceso de abogado
    Login,
    /// Listar los casos para revisión
    Cases,
    /// Revisar un caso
    Case {
        /// ID del caso
        id: String,
    },
    /// Eliminar la clave guardada
    Logout,
}

/// Logs a stderr. `RUST_LOG` tiene prioridad sobre `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,nda_portal={}", level)));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar .env si existe
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env().with_api_base(cli.api_base.clone());
    let app = App::from_config(&config);
    info!(api_base = app.api.base(), data_dir = %config.data_dir.display(), "configuración cargada");

    let start = match cli.command {
        Some(Commands::Fill) => Route::FillNda,
        Some(Commands::Status { case_id }) => Route::SubmitSuccess {
            case_id: Some(case_id),
        },
        Some(Commands::Login { redirect }) => Route::ClientLogin { redirect },
        Some(Commands::Signup) => Route::ClientSignup,
        Some(Commands::Logout) => {
            app.navigate(Route::ClientLogout).await?;
            return Ok(());
        }
        Some(Commands::Dashboard) => Route::ClientDashboard,
        Some(Commands::Case { id }) => Route::ClientCase { id },
        Some(Commands::Open { path }) => match Route::parse(&path) {
            Ok(route) => route,
            Err(e) => {
                println!("{}", e.to_string().red());
                return Ok(());
            }
        },
        Some(Commands::Lawyer { command }) => match command {
            LawyerCommands::Login => Route::LawyerLogin,
            LawyerCommands::Cases => Route::LawyerCases,
            LawyerCommands::Case { id } => Route::LawyerCase { id },
            LawyerCommands::Logout => {
                app.navigate(Route::LawyerLogout).await?;
                return Ok(());
            }
        },
        // Menú interactivo si no se proporciona un comando
        None => Route::Home,
    };

    app.run(start).await
}
