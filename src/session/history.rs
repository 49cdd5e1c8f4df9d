use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    InvestmentInputs, InvestmentResult, LoanInputs, LoanResult, MortgageInputs, MortgageResult,
    RetirementInputs, RetirementResult,
};
use crate::error::SnapshotError;

/// A finished calculation, tagged by calculator kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Calculation {
    Loan {
        inputs: LoanInputs,
        results: LoanResult,
    },
    Mortgage {
        inputs: MortgageInputs,
        results: MortgageResult,
    },
    Investment {
        inputs: InvestmentInputs,
        results: InvestmentResult,
    },
    Retirement {
        inputs: RetirementInputs,
        results: RetirementResult,
    },
}

impl Calculation {
    pub fn kind(&self) -> &'static str {
        match self {
            Calculation::Loan { .. } => "loan",
            Calculation::Mortgage { .. } => "mortgage",
            Calculation::Investment { .. } => "investment",
            Calculation::Retirement { .. } => "retirement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSnapshot {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub calculation: Calculation,
}

/// Portable form of a snapshot: everything but the session-local id.
#[derive(Debug, Serialize, Deserialize)]
struct ExportedCalculation {
    date: DateTime<Utc>,
    #[serde(flatten)]
    calculation: Calculation,
}

/// In-memory list of calculations, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalculationHistory {
    entries: Vec<CalculationSnapshot>,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are the millisecond timestamp of `at`, suffixed when two
    /// calculations land in the same millisecond.
    pub fn record(&mut self, calculation: Calculation, at: DateTime<Utc>) -> &CalculationSnapshot {
        let base = at.timestamp_millis().to_string();
        let mut id = base.clone();
        let mut suffix = 1;
        while self.find(&id).is_some() {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }

        debug!(id = %id, kind = calculation.kind(), "recorded calculation");
        self.entries.insert(
            0,
            CalculationSnapshot {
                id,
                date: at,
                calculation,
            },
        );
        &self.entries[0]
    }

    pub fn entries(&self) -> &[CalculationSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CalculationSnapshot> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pretty JSON `{ type, date, inputs, results }` for one entry.
    pub fn export_json(&self, id: &str) -> Result<String, SnapshotError> {
        let entry = self
            .find(id)
            .ok_or_else(|| SnapshotError::NotFound(id.to_string()))?;
        let exported = ExportedCalculation {
            date: entry.date,
            calculation: entry.calculation.clone(),
        };
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    /// Records a previously exported document, keeping its original date.
    pub fn import_json(&mut self, json: &str) -> Result<&CalculationSnapshot, SnapshotError> {
        let exported: ExportedCalculation = serde_json::from_str(json)?;
        Ok(self.record(exported.calculation, exported.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute_loan;
    use chrono::TimeZone;

    fn loan() -> Calculation {
        let inputs = LoanInputs {
            principal: 20_000.0,
            annual_rate: 5.0,
            term_years: 5,
        };
        let results = compute_loan(&inputs).expect("valid loan");
        Calculation::Loan { inputs, results }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().expect("valid timestamp")
    }

    #[test]
    fn newest_entries_come_first() {
        let mut history = CalculationHistory::new();
        history.record(loan(), at(1_000));
        history.record(loan(), at(2_000));

        let ids: Vec<&str> = history.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2000", "1000"]);
    }

    #[test]
    fn same_millisecond_ids_stay_unique() {
        let mut history = CalculationHistory::new();
        history.record(loan(), at(5));
        history.record(loan(), at(5));
        history.record(loan(), at(5));

        let ids: Vec<&str> = history.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["5-2", "5-1", "5"]);
    }

    #[test]
    fn clear_empties_the_history() {
        let mut history = CalculationHistory::new();
        history.record(loan(), at(1));
        history.clear();
        assert!(history.is_empty());
        assert!(history.find("1").is_none());
    }

    #[test]
    fn snapshot_serializes_with_type_tag() {
        let mut history = CalculationHistory::new();
        let snapshot = history.record(loan(), at(1_700_000_000_000));
        let value = serde_json::to_value(snapshot).expect("serialize");

        assert_eq!(value["type"], "loan");
        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["inputs"]["principal"], 20_000.0);
        assert!(value["results"]["monthlyPayment"].is_number());
    }

    #[test]
    fn export_then_import_preserves_the_calculation() {
        let mut history = CalculationHistory::new();
        let id = history.record(loan(), at(42)).id.clone();
        let json = history.export_json(&id).expect("export");

        let document: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(document["type"], "loan");
        assert!(document.get("id").is_none());

        let mut other = CalculationHistory::new();
        let imported = other.import_json(&json).expect("import");
        assert_eq!(imported.date, at(42));
        let (Calculation::Loan { inputs, results }, Calculation::Loan { results: expected, .. }) =
            (&imported.calculation, loan())
        else {
            panic!("expected a loan, got {}", imported.calculation.kind());
        };
        assert_eq!(inputs.term_years, 5);
        assert!((results.monthly_payment - expected.monthly_payment).abs() < 1e-9);
        assert!((results.total_interest - expected.total_interest).abs() < 1e-9);
    }

    #[test]
    fn export_of_unknown_id_is_not_found() {
        let history = CalculationHistory::new();
        assert!(matches!(
            history.export_json("missing"),
            Err(SnapshotError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn import_rejects_unknown_type() {
        let mut history = CalculationHistory::new();
        let json = r#"{"type":"budget","date":"2024-01-01T00:00:00Z","inputs":{},"results":{}}"#;
        assert!(matches!(
            history.import_json(json),
            Err(SnapshotError::Serde(_))
        ));
        assert!(history.is_empty());
    }
}
