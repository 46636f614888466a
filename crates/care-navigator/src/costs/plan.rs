use std::io::Write;

use serde::{Deserialize, Serialize};

use super::domain::{CostError, CostResult};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Encoding(std::string::FromUtf8Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write cost export: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode cost export: {}", err),
            ExportError::Encoding(err) => write!(f, "cost export is not valid UTF-8: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
            ExportError::Encoding(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCost {
    pub person: String,
    pub result: CostResult,
}

/// Costs for everyone in a plan, kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanCost {
    entries: Vec<PersonCost>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    person: &'a str,
    category: &'a str,
    line: &'a str,
    label: &'a str,
    amount: i64,
}

impl CarePlanCost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, person: impl Into<String>, result: CostResult) {
        self.entries.push(PersonCost {
            person: person.into(),
            result,
        });
    }

    pub fn entries(&self) -> &[PersonCost] {
        &self.entries
    }

    pub fn combined_total(&self) -> Result<i64, CostError> {
        self.entries
            .iter()
            .try_fold(0_i64, |sum, entry| sum.checked_add(entry.result.monthly_total))
            .ok_or_else(|| CostError::InvalidInput {
                field: "combined_total",
                reason: "plan total does not fit in a whole-dollar amount".to_string(),
            })
    }

    /// One row per breakdown line plus a `total` row per person.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            let category = entry.result.category.key();
            for line in &entry.result.breakdown {
                csv_writer.serialize(ExportRow {
                    person: &entry.person,
                    category,
                    line: line.kind.key(),
                    label: &line.label,
                    amount: line.amount,
                })?;
            }
            csv_writer.serialize(ExportRow {
                person: &entry.person,
                category,
                line: "total",
                label: "Monthly total",
                amount: entry.result.monthly_total,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(ExportError::Encoding)
    }
}
