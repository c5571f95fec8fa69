use chrono::NaiveDate;
use inquire::{DateSelect, InquireError, Select, Text};

use crate::form::{FieldInput, FormField};

pub type PromptError = InquireError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NO_SELECTION: &str = "-- Sin selección --";

/// Pide al usuario el valor de un campo
pub trait FieldPrompter {
    fn prompt(&mut self, field: &FormField, current: Option<&str>) -> Result<String, PromptError>;
}

/// Implementación interactiva sobre `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl FieldPrompter for InquirePrompter {
    fn prompt(&mut self, field: &FormField, current: Option<&str>) -> Result<String, PromptError> {
        let label = field.prompt_label();

        match &field.input {
            FieldInput::Date => {
                let mut prompt = DateSelect::new(&label);
                if let Some(date) = current.and_then(|c| NaiveDate::parse_from_str(c, DATE_FORMAT).ok()) {
                    prompt = prompt.with_default(date);
                }

                // Los campos opcionales se pueden omitir con Esc
                let date = if field.required {
                    Some(prompt.prompt()?)
                } else {
                    prompt.prompt_skippable()?
                };
                Ok(date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default())
            }
            FieldInput::Select { options } if !options.is_empty() => {
                let mut choices: Vec<&str> = options.iter().map(String::as_str).collect();
                if !field.required {
                    choices.insert(0, NO_SELECTION);
                }
                let cursor = current
                    .and_then(|c| choices.iter().position(|choice| *choice == c))
                    .unwrap_or(0);

                let choice = Select::new(&label, choices)
                    .with_starting_cursor(cursor)
                    .prompt()?;
                if choice == NO_SELECTION {
                    Ok(String::new())
                } else {
                    Ok(choice.to_string())
                }
            }
            // Un select sin opciones se pide como texto libre
            FieldInput::Select { .. } | FieldInput::Text => {
                Text::new(&label)
                    .with_initial_value(current.unwrap_or_default())
                    .prompt()
            }
        }
    }
}

/// Respuestas programadas para pruebas: pares (clave, valor) en orden
#[cfg(test)]
pub struct ScriptedPrompter {
    script: std::collections::VecDeque<(String, String)>,
    asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(script: Vec<(&str, &str)>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> Vec<&str> {
        self.asked.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
impl FieldPrompter for ScriptedPrompter {
    fn prompt(&mut self, field: &FormField, _current: Option<&str>) -> Result<String, PromptError> {
        self.asked.push(field.key.clone());
        match self.script.pop_front() {
            Some((key, value)) if key == field.key => Ok(value),
            Some((key, _)) => panic!("se esperaba el campo {key}, se pidió {}", field.key),
            None => Err(InquireError::OperationCanceled),
        }
    }
}
