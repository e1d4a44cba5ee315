use serde::Serialize;
use tasi_core::metrics::{change_color, format_magnitude};
use tasi_core::{Direction, Sector};

use super::{PageOutput, Session};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SectorRow {
    code: String,
    name: String,
    name_ar: Option<&'static str>,
    avg_change_pct: Option<f64>,
    direction: Direction,
    color: &'static str,
    volume: String,
    num_stocks: Option<u64>,
}

impl From<&Sector> for SectorRow {
    fn from(sector: &Sector) -> Self {
        let pct = sector.avg_change_pct();
        Self {
            code: sector.id.clone(),
            name: sector.display_name().to_owned(),
            name_ar: sector.code().map(|code| code.name_ar()),
            avg_change_pct: pct,
            direction: sector.direction(),
            color: change_color(pct.unwrap_or(0.0)).hex(),
            volume: format_magnitude(sector.volume, "", ""),
            num_stocks: sector.num_stocks,
        }
    }
}

#[derive(Debug, Serialize)]
struct SectorsData {
    sectors: Option<Vec<SectorRow>>,
}

/// Best performers first.
pub async fn run(session: &Session) -> Result<PageOutput, CliError> {
    let sectors = session.client().sectors().await.map(|mut sectors| {
        sectors.sort_by(|a, b| {
            let a = a.avg_change_percent.unwrap_or(0.0);
            let b = b.avg_change_percent.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        sectors.iter().map(SectorRow::from).collect::<Vec<_>>()
    });

    let unknown: Vec<String> = sectors
        .iter()
        .flatten()
        .filter(|row| row.name_ar.is_none())
        .map(|row| row.code.clone())
        .collect();

    let mut output = PageOutput::live(SectorsData { sectors })?;
    if !unknown.is_empty() {
        output = output.with_warning(format!("unrecognized sector codes: {}", unknown.join(",")));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::testing::{session, RoutedHttpClient};

    #[tokio::test]
    async fn sorts_descending_and_keeps_unknown_codes() {
        let http = RoutedHttpClient::default().route(
            "/market/sectors/",
            json!({ "sectors": [
                {
                    "id": "TBNI",
                    "avg_change_percent": -0.004,
                    "volume": 48_250_000.0,
                    "num_stocks": 10
                },
                { "id": "TNEW", "avg_change_percent": 0.02 },
                { "id": "TENI", "avg_change_percent": 0.0 }
            ] }),
        );
        let (session, _) = session(http);

        let output = run(&session).await.expect("page");
        let rows = &output.data["sectors"];

        assert_eq!(rows[0]["name"], "TNEW");
        assert_eq!(rows[0]["direction"], "positive");
        assert_eq!(rows[1]["name"], "Energy");
        assert_eq!(rows[1]["direction"], "flat");
        assert_eq!(rows[2]["name"], "Banks");
        assert_eq!(rows[2]["name_ar"], "البنوك");
        assert_eq!(rows[2]["volume"], "48.25M");
        assert_eq!(rows[0]["volume"], "N/A");
        assert_eq!(output.warnings, ["unrecognized sector codes: TNEW"]);
    }
}
