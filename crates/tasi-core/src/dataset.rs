//! Static fundamentals dataset loaded from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

use crate::{DatasetError, FundamentalRecord, Symbol};

/// Default location of the dataset relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "data/saudi_stocks_fundamentals.csv";

/// CSV row before symbol validation. The symbol is read as text so that
/// tickers with leading zeros are not coerced into integers.
#[derive(Debug, Deserialize)]
struct RawRow {
    symbol: String,
    name: String,
    sector: String,
    pe: f64,
    pb: f64,
    roe: f64,
    net_margin: f64,
    dividend_yield: f64,
    debt_equity: f64,
    current_ratio: f64,
    shariah_debt_ratio: f64,
    #[serde(deserialize_with = "flexible_bool")]
    shariah_compliant: bool,
    revenue_b: f64,
    net_income_b: f64,
    total_assets_b: f64,
    total_debt_b: f64,
}

impl RawRow {
    fn into_record(self, row: u64) -> Result<FundamentalRecord, DatasetError> {
        let symbol = Symbol::parse(&self.symbol)
            .map_err(|source| DatasetError::Validation { row, source })?;

        Ok(FundamentalRecord {
            symbol,
            name: self.name.trim().to_owned(),
            sector: self.sector.trim().to_owned(),
            pe: self.pe,
            pb: self.pb,
            roe: self.roe,
            net_margin: self.net_margin,
            dividend_yield: self.dividend_yield,
            debt_equity: self.debt_equity,
            current_ratio: self.current_ratio,
            shariah_debt_ratio: self.shariah_debt_ratio,
            shariah_compliant: self.shariah_compliant,
            revenue_b: self.revenue_b,
            net_income_b: self.net_income_b,
            total_assets_b: self.total_assets_b,
            total_debt_b: self.total_debt_b,
        })
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| D::Error::custom(format!("invalid boolean '{raw}'")))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// The immutable fundamentals table, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalsDataset {
    records: Vec<FundamentalRecord>,
}

impl FundamentalsDataset {
    pub fn new(records: Vec<FundamentalRecord>) -> Self {
        Self { records }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        let dataset = Self::from_reader(file)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            rows = dataset.len(),
            "loaded fundamentals dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<RawRow>().enumerate() {
            // Line 1 is the header.
            let line = index as u64 + 2;
            records.push(row?.into_record(line)?);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[FundamentalRecord] {
        &self.records
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.records
            .iter()
            .map(|record| record.symbol.clone())
            .collect()
    }

    pub fn find(&self, symbol: &Symbol) -> Option<&FundamentalRecord> {
        self.records.iter().find(|record| &record.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::ValidationError;

    const HEADER: &str = "symbol,name,sector,pe,pb,roe,net_margin,dividend_yield,debt_equity,current_ratio,shariah_debt_ratio,shariah_compliant,revenue_b,net_income_b,total_assets_b,total_debt_b";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn keeps_leading_zeros_and_file_order() {
        let text = csv_with(&[
            "2222,Saudi Aramco,Energy,16.2,4.1,26.4,24.9,6.1,0.15,1.4,8.5,true,1650,410,2450,320",
            "0100,Test Co,Materials,-3.0,0.9,-4.2,-6.0,0.0,1.1,0.8,41.0,no,2.1,-0.1,4.0,1.9",
        ]);

        let dataset = FundamentalsDataset::from_reader(text.as_bytes()).expect("load");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].symbol.as_str(), "2222");
        assert_eq!(dataset.records()[1].symbol.as_str(), "0100");
        assert!(dataset.records()[0].shariah_compliant);
        assert!(!dataset.records()[1].shariah_compliant);
    }

    #[test]
    fn accepts_flag_spellings() {
        for (raw, expected) in [
            ("TRUE", true),
            ("1", true),
            ("Yes", true),
            ("false", false),
            ("0", false),
            ("NO", false),
        ] {
            assert_eq!(parse_flag(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn rejects_unknown_flag_as_csv_error() {
        let text = csv_with(&[
            "2222,Saudi Aramco,Energy,16.2,4.1,26.4,24.9,6.1,0.15,1.4,8.5,maybe,1650,410,2450,320",
        ]);

        let error = FundamentalsDataset::from_reader(text.as_bytes()).expect_err("bad flag");
        assert!(matches!(error, DatasetError::Csv(_)));
    }

    #[test]
    fn reports_row_of_invalid_symbol() {
        let text = csv_with(&[
            "2222,Saudi Aramco,Energy,16.2,4.1,26.4,24.9,6.1,0.15,1.4,8.5,true,1650,410,2450,320",
            "22/22,Broken,Energy,1,1,1,1,1,1,1,1,true,1,1,1,1",
        ]);

        let error = FundamentalsDataset::from_reader(text.as_bytes()).expect_err("bad symbol");
        match error {
            DatasetError::Validation { row, source } => {
                assert_eq!(row, 3);
                assert_eq!(source, ValidationError::SymbolInvalidChar { ch: '/', index: 2 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "{}",
            csv_with(&["1120,Al Rajhi Bank,Banks,19.5,3.9,21.0,58.0,3.2,0.4,1.1,0.0,true,32,19.7,900,60"])
        )
        .expect("write");

        let dataset = FundamentalsDataset::from_path(file.path()).expect("load");
        let symbol = Symbol::parse("1120").expect("symbol");
        assert_eq!(dataset.find(&symbol).map(|r| r.sector.as_str()), Some("Banks"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = FundamentalsDataset::from_path("/definitely/not/here.csv").expect_err("missing");
        assert!(matches!(error, DatasetError::Io(_)));
    }
}
