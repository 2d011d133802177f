mod normalizer;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Offer, OfferId, WorkMode};
use parser::OfferRow;

#[derive(Debug)]
pub enum OfferImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingField {
        line: usize,
        column: &'static str,
    },
    InvalidAmount {
        line: usize,
        column: &'static str,
        value: String,
    },
    InvalidWorkMode {
        line: usize,
        value: String,
    },
    InvalidFlag {
        line: usize,
        value: String,
    },
    DuplicateId {
        line: usize,
        id: String,
    },
}

impl std::fmt::Display for OfferImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferImportError::Io(err) => write!(f, "failed to read offer export: {}", err),
            OfferImportError::Csv(err) => write!(f, "invalid offer CSV data: {}", err),
            OfferImportError::MissingField { line, column } => {
                write!(f, "line {}: missing required column '{}'", line, column)
            }
            OfferImportError::InvalidAmount {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: '{}' is not a valid amount for '{}'",
                line, value, column
            ),
            OfferImportError::InvalidWorkMode { line, value } => write!(
                f,
                "line {}: unrecognized work mode '{}' (expected remote, hybrid or onsite)",
                line, value
            ),
            OfferImportError::InvalidFlag { line, value } => {
                write!(f, "line {}: '{}' is not a valid archived flag", line, value)
            }
            OfferImportError::DuplicateId { line, id } => {
                write!(f, "line {}: offer id '{}' appears more than once", line, id)
            }
        }
    }
}

impl std::error::Error for OfferImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OfferImportError::Io(err) => Some(err),
            OfferImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OfferImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OfferImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads offers from a spreadsheet export with the columns
/// `id,company,title,location,work_mode,base_salary,bonus,equity,benefits,archived,archive_reason`.
/// Only `id`, `company` and `base_salary` are required.
pub struct OfferImporter;

impl OfferImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Offer>, OfferImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Offer>, OfferImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut offers = Vec::new();

        for row in parser::parse_rows(reader)? {
            let line = row.line;
            let offer = offer_from_row(row)?;
            if !seen.insert(offer.id.0.clone()) {
                return Err(OfferImportError::DuplicateId {
                    line,
                    id: offer.id.0,
                });
            }
            offers.push(offer);
        }

        Ok(offers)
    }
}

fn offer_from_row(row: OfferRow) -> Result<Offer, OfferImportError> {
    let line = row.line;
    let required = |value: Option<String>, column: &'static str| {
        value
            .map(|raw| normalizer::normalize_text(&raw))
            .filter(|text| !text.is_empty())
            .ok_or(OfferImportError::MissingField { line, column })
    };

    let id = required(row.id, "id")?;
    let company = required(row.company, "company")?;
    let base_salary = amount(row.base_salary.as_deref(), "base_salary", line)?
        .ok_or(OfferImportError::MissingField {
            line,
            column: "base_salary",
        })?;

    let work_mode = match row.work_mode.as_deref() {
        Some(raw) => Some(WorkMode::parse(raw).ok_or_else(|| {
            OfferImportError::InvalidWorkMode {
                line,
                value: raw.to_string(),
            }
        })?),
        None => None,
    };

    let archived = match row.archived.as_deref() {
        Some(raw) => normalizer::parse_flag(raw).ok_or_else(|| OfferImportError::InvalidFlag {
            line,
            value: raw.to_string(),
        })?,
        None => false,
    };

    Ok(Offer {
        id: OfferId(id),
        company,
        title: row
            .title
            .map(|raw| normalizer::normalize_text(&raw))
            .unwrap_or_default(),
        location: row
            .location
            .map(|raw| normalizer::normalize_text(&raw))
            .unwrap_or_default(),
        work_mode,
        base_salary,
        bonus: amount(row.bonus.as_deref(), "bonus", line)?.unwrap_or_default(),
        equity: amount(row.equity.as_deref(), "equity", line)?.unwrap_or_default(),
        benefits: amount(row.benefits.as_deref(), "benefits", line)?,
        archived,
        archive_reason: row
            .archive_reason
            .map(|raw| normalizer::normalize_text(&raw)),
    })
}

fn amount(
    value: Option<&str>,
    column: &'static str,
    line: usize,
) -> Result<Option<f64>, OfferImportError> {
    match value {
        Some(raw) => normalizer::parse_amount(raw)
            .map(Some)
            .ok_or_else(|| OfferImportError::InvalidAmount {
                line,
                column,
                value: raw.to_string(),
            }),
        None => Ok(None),
    }
}
