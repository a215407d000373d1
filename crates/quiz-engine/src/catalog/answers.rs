use crate::engine::likert::LikertAnswers;
use crate::engine::profile::ProfileAnswers;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum AnswerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidValue { question: String, value: String },
}

impl std::fmt::Display for AnswerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerImportError::Io(err) => write!(f, "failed to read answers: {}", err),
            AnswerImportError::Csv(err) => write!(f, "invalid answer CSV data: {}", err),
            AnswerImportError::Json(err) => write!(f, "invalid answer JSON data: {}", err),
            AnswerImportError::InvalidValue { question, value } => {
                write!(f, "answer '{}' for question '{}' is not usable", value, question)
            }
        }
    }
}

impl std::error::Error for AnswerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnswerImportError::Io(err) => Some(err),
            AnswerImportError::Csv(err) => Some(err),
            AnswerImportError::Json(err) => Some(err),
            AnswerImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for AnswerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AnswerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for AnswerImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFormat {
    /// `{"q1": 3, "q2": "a"}`
    Json,
    /// `question,answer` header followed by one row per answer.
    Csv,
}

impl AnswerFormat {
    /// `.csv` files are CSV; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => AnswerFormat::Csv,
            _ => AnswerFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    question: String,
    #[serde(default)]
    answer: String,
}

/// Raw answer text per question id. Blank CSV answers and JSON `null`s are
/// treated as unanswered.
pub fn parse_answers<R: Read>(
    reader: R,
    format: AnswerFormat,
) -> Result<BTreeMap<String, String>, AnswerImportError> {
    match format {
        AnswerFormat::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            let mut answers = BTreeMap::new();
            for record in csv_reader.deserialize::<AnswerRow>() {
                let row = record?;
                if !row.answer.is_empty() {
                    answers.insert(row.question, row.answer);
                }
            }
            Ok(answers)
        }
        AnswerFormat::Json => {
            let raw: BTreeMap<String, Value> = serde_json::from_reader(reader)?;
            let mut answers = BTreeMap::new();
            for (question, value) in raw {
                let text = match value {
                    Value::Null => continue,
                    Value::String(text) => text.trim().to_string(),
                    Value::Number(number) => number.to_string(),
                    other => {
                        return Err(AnswerImportError::InvalidValue {
                            question,
                            value: other.to_string(),
                        })
                    }
                };
                answers.insert(question, text);
            }
            Ok(answers)
        }
    }
}

pub fn parse_likert_answers<R: Read>(
    reader: R,
    format: AnswerFormat,
) -> Result<LikertAnswers, AnswerImportError> {
    parse_answers(reader, format)?
        .into_iter()
        .map(|(question, text)| match text.parse::<u8>() {
            Ok(value) => Ok((question, value)),
            Err(_) => Err(AnswerImportError::InvalidValue {
                question,
                value: text,
            }),
        })
        .collect()
}

pub fn parse_profile_answers<R: Read>(
    reader: R,
    format: AnswerFormat,
) -> Result<ProfileAnswers, AnswerImportError> {
    parse_answers(reader, format)
}

pub fn read_likert_answers(path: impl AsRef<Path>) -> Result<LikertAnswers, AnswerImportError> {
    let path = path.as_ref();
    parse_likert_answers(File::open(path)?, AnswerFormat::from_path(path))
}

pub fn read_profile_answers(path: impl AsRef<Path>) -> Result<ProfileAnswers, AnswerImportError> {
    let path = path.as_ref();
    parse_profile_answers(File::open(path)?, AnswerFormat::from_path(path))
}
