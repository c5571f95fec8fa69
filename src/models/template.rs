use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
}

/// Tipo de entrada de una pregunta. Las etiquetas desconocidas se tratan como texto libre.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Date,
    Select,
    #[serde(other)]
    Other,
}

/// Definición de un campo del formulario dinámico
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl Question {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_schema() {
        let json = r#"[
            {"key": "PARTY1_NAME", "type": "text", "label": "Disclosing party", "required": true},
            {"key": "EFFECTIVE_DATE", "type": "date", "label": "Effective date", "required": true},
            {"key": "TERM", "type": "select", "label": "Term", "required": false, "options": ["1 year", "2 years"]},
            {"key": "NOTES", "type": "textarea", "label": "Notes"}
        ]"#;

        let questions: Vec<Question> = serde_json::from_str(json).unwrap();

        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].kind, QuestionType::Text);
        assert_eq!(questions[1].kind, QuestionType::Date);
        assert_eq!(questions[2].options(), ["1 year", "2 years"]);
        assert_eq!(questions[3].kind, QuestionType::Other);
        assert!(!questions[3].required);
        assert!(questions[3].options().is_empty());
    }
}
