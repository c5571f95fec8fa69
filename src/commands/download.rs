use std::path::Path;

use anyhow::Result;
use colored::*;
use inquire::{Confirm, InquireError, Text};

use crate::app::App;
use crate::commands::{print_api_error, print_cancelled};
use crate::utils::save_bytes;

/// Ruta elegida en el prompt de guardado. `None` si el usuario canceló.
fn download_target(answer: Result<String, InquireError>, default_path: &str) -> Option<String> {
    match answer {
        Ok(target) if !target.trim().is_empty() => Some(target.trim().to_string()),
        Ok(_) => Some(default_path.to_string()),
        Err(_) => None,
    }
}

/// Pregunta si descargar el documento aprobado y lo guarda
pub async fn offer_download(app: &App, url: &str, default_name: &str) -> Result<()> {
    let confirmed = Confirm::new("¿Descargar el documento ahora?")
        .with_default(true)
        .prompt()
        .unwrap_or(false);

    if confirmed {
        save_signed(app, url, default_name).await?;
    }
    Ok(())
}

/// Descarga una URL firmada a un archivo local elegido por el usuario
pub async fn save_signed(app: &App, url: &str, default_name: &str) -> Result<()> {
    let default_path = app.downloads_dir.join(default_name);
    let default_path = default_path.to_string_lossy();
    let answer = Text::new("Guardar como:")
        .with_initial_value(&default_path)
        .prompt();
    let Some(target) = download_target(answer, &default_path) else {
        print_cancelled();
        return Ok(());
    };

    println!("{}", "Descargando...".blue());
    match app.api.fetch_signed(url).await {
        Ok(bytes) => {
            save_bytes(Path::new(&target), &bytes)?;
            println!(
                "{}",
                format!("Documento guardado en {} ({} bytes)", target, bytes.len()).green()
            );
        }
        Err(e) => print_api_error(&e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_at_save_prompt_cancels_download() {
        assert_eq!(
            download_target(Err(InquireError::OperationCanceled), "./nda.docx"),
            None
        );
        assert_eq!(
            download_target(Err(InquireError::OperationInterrupted), "./nda.docx"),
            None
        );
    }

    #[test]
    fn blank_answer_uses_default_path() {
        assert_eq!(
            download_target(Ok("  ".to_string()), "./nda.docx").as_deref(),
            Some("./nda.docx")
        );
        assert_eq!(
            download_target(Ok(" /tmp/a.docx ".to_string()), "./nda.docx").as_deref(),
            Some("/tmp/a.docx")
        );
    }
}
