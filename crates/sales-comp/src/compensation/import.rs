use super::money::{parse_amount, CurrencyFormat, CurrencyParseError};
use super::pipeline::{Pipeline, PipelineError};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Outcome of loading a deal export into a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct DealRow {
    #[serde(alias = "Contract Value", alias = "Valor Contrato")]
    contract_value: String,
}

/// Appends every positive `contract_value` row to the pipeline.
///
/// Cells may hold a plain decimal (`35000.50`) or formatted currency (`R$ 35.000,50`).
/// Rows at or below zero are counted as skipped rather than failing the import; rows
/// above [`MAX_AMOUNT`](super::money::MAX_AMOUNT) abort it with their line number.
pub fn import_deals<R: Read>(
    reader: R,
    pipeline: &mut Pipeline,
    format: &CurrencyFormat,
) -> Result<ImportReport, DealImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut report = ImportReport::default();

    for (idx, record) in csv_reader.deserialize::<DealRow>().enumerate() {
        let row = record?;
        let amount = parse_amount(&row.contract_value, format).map_err(|source| {
            DealImportError::Amount {
                line: idx + 2,
                source,
            }
        })?;

        match pipeline.add(amount) {
            Ok(_) => report.imported += 1,
            Err(PipelineError::NonPositiveValue(_)) => report.skipped += 1,
            Err(source) => {
                return Err(DealImportError::Deal {
                    line: idx + 2,
                    source,
                })
            }
        }
    }

    Ok(report)
}

#[derive(Debug, thiserror::Error)]
pub enum DealImportError {
    #[error("invalid deal CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    Amount {
        line: usize,
        #[source]
        source: CurrencyParseError,
    },
    #[error("line {line}: {source}")]
    Deal {
        line: usize,
        #[source]
        source: PipelineError,
    },
}
