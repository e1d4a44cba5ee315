use serde::Serialize;
use tasi_core::{MoversKind, ValidationError};

use super::rows::QuoteRow;
use super::{PageOutput, Session};
use crate::cli::{MoversArgs, MOVERS_LIMIT_MAX, MOVERS_LIMIT_MIN};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct MoversData {
    kind: MoversKind,
    title: &'static str,
    limit: usize,
    rows: Option<Vec<QuoteRow>>,
}

pub async fn run(session: &Session, args: &MoversArgs) -> Result<PageOutput, CliError> {
    let limit = validate_limit(args.limit)?;
    let kind = MoversKind::from(args.kind);

    let rows = session
        .client()
        .movers(kind, limit)
        .await
        .map(|quotes| quotes.iter().map(QuoteRow::from).collect());

    PageOutput::live(MoversData {
        kind,
        title: kind.title(),
        limit,
        rows,
    })
}

fn validate_limit(limit: usize) -> Result<usize, ValidationError> {
    if (MOVERS_LIMIT_MIN..=MOVERS_LIMIT_MAX).contains(&limit) {
        Ok(limit)
    } else {
        Err(ValidationError::LimitOutOfRange {
            value: limit,
            min: MOVERS_LIMIT_MIN,
            max: MOVERS_LIMIT_MAX,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cli::MoversKindArg;
    use crate::commands::testing::{session, RoutedHttpClient};

    #[test]
    fn limit_bounds_are_inclusive() {
        assert!(validate_limit(5).is_ok());
        assert!(validate_limit(50).is_ok());
        assert_eq!(
            validate_limit(51),
            Err(ValidationError::LimitOutOfRange {
                value: 51,
                min: 5,
                max: 50
            })
        );
        assert!(validate_limit(4).is_err());
    }

    #[tokio::test]
    async fn value_leaders_read_stocks_key() {
        let http = RoutedHttpClient::default().route(
            "/market/value/",
            json!({ "stocks": [{ "symbol": "1120", "name": "الراجحي", "value": 1_250_000_000.0 }] }),
        );
        let (session, _) = session(http);
        let args = MoversArgs {
            kind: MoversKindArg::Value,
            limit: 20,
        };

        let output = run(&session, &args).await.expect("page");

        assert_eq!(output.data["kind"], "value");
        assert_eq!(output.data["rows"][0]["value"], "1.25B SAR");
        assert_eq!(output.data["rows"][0]["name"], "الراجحي");
    }

    #[tokio::test]
    async fn out_of_range_limit_never_calls_api() {
        let (session, http) = session(RoutedHttpClient::default());
        let args = MoversArgs {
            kind: MoversKindArg::Gainers,
            limit: 100,
        };

        let error = run(&session, &args).await.err().expect("rejected");
        assert_eq!(error.exit_code(), 2);
        assert!(http.requests.lock().expect("lock").is_empty());
    }
}
