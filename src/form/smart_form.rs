//! Formulario dinámico generado a partir del esquema de preguntas de una plantilla.

use std::collections::BTreeMap;

use colored::*;
use tracing::debug;

use crate::form::{FieldPrompter, PromptError};
use crate::models::{Answers, Question, QuestionType};

/// Forma de la entrada que se muestra para una pregunta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Date,
    Select { options: Vec<String> },
}

/// Un campo renderizado, identificado por la clave de su pregunta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub input: FieldInput,
}

impl FormField {
    fn from_question(question: &Question) -> Self {
        let input = match question.kind {
            QuestionType::Date => FieldInput::Date,
            QuestionType::Select => FieldInput::Select {
                options: question.options().to_vec(),
            },
            QuestionType::Text | QuestionType::Other => FieldInput::Text,
        };

        FormField {
            key: question.key.clone(),
            label: question.label.clone(),
            required: question.required,
            input,
        }
    }

    /// Etiqueta con asterisco para los campos obligatorios
    pub fn prompt_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }
}

/// Errores por campo, indexados por clave
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct SmartForm {
    fields: Vec<FormField>,
    answers: Answers,
    errors: FieldErrors,
}

impl SmartForm {
    pub fn new(questions: &[Question]) -> Self {
        Self {
            fields: questions.iter().map(FormField::from_question).collect(),
            answers: Answers::new(),
            errors: FieldErrors::new(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Guarda una respuesta y limpia el error del campo
    pub fn set_answer(&mut self, key: &str, value: impl Into<String>) {
        self.answers.insert(key.to_string(), value.into());
        self.errors.remove(key);
    }

    /// Valida los campos obligatorios. Reemplaza los errores anteriores.
    pub fn validate(&mut self) -> bool {
        let errors: FieldErrors = self
            .fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| {
                self.answers
                    .get(&field.key)
                    .map_or(true, |value| value.trim().is_empty())
            })
            .map(|field| (field.key.clone(), format!("{} es obligatorio", field.label)))
            .collect();

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Entrega las respuestas al handler si el formulario es válido.
    ///
    /// Con errores no se llama al handler y se devuelven los errores por campo.
    pub fn submit<R, H>(&mut self, handler: H) -> Result<R, FieldErrors>
    where
        H: FnOnce(Answers) -> R,
    {
        if !self.validate() {
            debug!(errors = self.errors.len(), "formulario con campos incompletos");
            return Err(self.errors.clone());
        }
        Ok(handler(self.answers.clone()))
    }

    /// Pide cada campo al usuario y vuelve a pedir solo los que tengan error
    /// hasta que el formulario sea válido.
    pub fn fill<P, R, H>(&mut self, prompter: &mut P, handler: H) -> Result<R, PromptError>
    where
        P: FieldPrompter,
        H: FnOnce(Answers) -> R,
    {
        let mut pending: Vec<usize> = (0..self.fields().len()).collect();

        loop {
            for index in pending {
                let field = self.fields()[index].clone();
                let current = self.answers.get(&field.key).cloned();
                let value = prompter.prompt(&field, current.as_deref())?;
                self.set_answer(&field.key, value);
            }

            match self.submit(|answers| answers) {
                Ok(answers) => return Ok(handler(answers)),
                Err(errors) => {
                    for message in errors.values() {
                        println!("{}", message.red());
                    }
                    pending = self
                        .fields()
                        .iter()
                        .enumerate()
                        .filter(|(_, field)| errors.contains_key(&field.key))
                        .map(|(index, _)| index)
                        .collect();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ScriptedPrompter;
    use pretty_assertions::assert_eq;

    fn question(key: &str, kind: QuestionType, required: bool) -> Question {
        Question {
            key: key.to_string(),
            kind,
            label: key.replace('_', " "),
            required,
            options: match kind {
                QuestionType::Select => Some(vec!["1 year".to_string(), "2 years".to_string()]),
                _ => None,
            },
        }
    }

    fn questions() -> Vec<Question> {
        vec![
            question("PARTY1_NAME", QuestionType::Text, true),
            question("EFFECTIVE_DATE", QuestionType::Date, true),
            question("TERM", QuestionType::Select, false),
        ]
    }

    #[test]
    fn renders_one_field_per_question_keyed_by_key() {
        let form = SmartForm::new(&questions());

        let keys: Vec<&str> = form.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["PARTY1_NAME", "EFFECTIVE_DATE", "TERM"]);
        assert_eq!(form.fields()[0].input, FieldInput::Text);
        assert_eq!(form.fields()[1].input, FieldInput::Date);
        assert_eq!(
            form.fields()[2].input,
            FieldInput::Select {
                options: vec!["1 year".to_string(), "2 years".to_string()]
            }
        );
        assert_eq!(form.fields()[0].prompt_label(), "PARTY1 NAME *");
        assert_eq!(form.fields()[2].prompt_label(), "TERM");
    }

    #[test]
    fn empty_form_renders_nothing() {
        let mut form = SmartForm::new(&[]);
        assert!(form.fields().is_empty());
        assert_eq!(form.submit(|answers| answers.len()), Ok(0));
    }

    #[test]
    fn blank_required_field_blocks_submit() {
        let mut form = SmartForm::new(&questions());
        form.set_answer("PARTY1_NAME", "   ");
        form.set_answer("EFFECTIVE_DATE", "2025-10-21");

        let mut calls = 0;
        let result = form.submit(|_| calls += 1);

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["PARTY1_NAME"], "PARTY1 NAME es obligatorio");
        assert_eq!(calls, 0);
    }

    #[test]
    fn valid_form_submits_all_entered_keys_once() {
        let mut form = SmartForm::new(&questions());
        form.set_answer("PARTY1_NAME", "Acme");
        form.set_answer("EFFECTIVE_DATE", "2025-10-21");
        form.set_answer("TERM", "2 years");

        let mut received = Vec::new();
        form.submit(|answers| received.push(answers)).unwrap();

        assert_eq!(received.len(), 1);
        let keys: Vec<&str> = received[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["EFFECTIVE_DATE", "PARTY1_NAME", "TERM"]);
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = SmartForm::new(&questions());
        assert!(!form.validate());
        assert!(form.errors.contains_key("PARTY1_NAME"));

        form.set_answer("PARTY1_NAME", "Acme");
        assert!(!form.errors.contains_key("PARTY1_NAME"));
        assert!(form.errors.contains_key("EFFECTIVE_DATE"));
    }

    #[test]
    fn fill_reprompts_only_invalid_fields() {
        let mut form = SmartForm::new(&questions());
        let mut prompter = ScriptedPrompter::new(vec![
            ("PARTY1_NAME", ""),
            ("EFFECTIVE_DATE", "2025-10-21"),
            ("TERM", ""),
            ("PARTY1_NAME", "Acme"),
        ]);

        let mut calls = 0;
        let answers = form
            .fill(&mut prompter, |answers| {
                calls += 1;
                answers
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(answers["PARTY1_NAME"], "Acme");
        assert_eq!(answers["EFFECTIVE_DATE"], "2025-10-21");
        assert_eq!(
            prompter.asked(),
            vec!["PARTY1_NAME", "EFFECTIVE_DATE", "TERM", "PARTY1_NAME"]
        );
    }
}
