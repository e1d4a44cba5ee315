//! Interactive session: one [`Session`] shared by every page typed in, so
//! the response cache survives between pages until `refresh`.

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::{OutputFormat, Page, ShellLine};
use crate::commands::{self, Session};
use crate::error::CliError;
use crate::output;

const PROMPT: &str = "tasi> ";
const HELP: &str = "pages: overview | movers [--kind K] [--limit N] | sectors | lookup SYMBOL | \
watchlist [SYMBOLS] | fundamentals summary|valuation|solvency|profitability|stock SYMBOL\n\
controls: refresh | help | quit";

enum Action {
    Render(Page),
    Refresh,
    Help,
    Quit,
    Skip,
}

fn parse_line(line: &str, out: &mut impl Write) -> Result<Action, CliError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let action = match words.as_slice() {
        [] => Action::Skip,
        ["quit" | "exit"] => Action::Quit,
        ["refresh"] => Action::Refresh,
        ["help"] => Action::Help,
        _ => match ShellLine::try_parse_from(words) {
            Ok(parsed) => Action::Render(parsed.page),
            Err(error) => {
                write!(out, "{}", error.render())?;
                Action::Skip
            }
        },
    };
    Ok(action)
}

pub async fn run(
    session: &Session,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let mut lines = input.lines();
    let mut last_page: Option<Page> = None;

    writeln!(out, "{HELP}")?;
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let page = match parse_line(&line, out)? {
            Action::Quit => break,
            Action::Skip => continue,
            Action::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Action::Render(page) => page,
            Action::Refresh => {
                session.refresh().await;
                match &last_page {
                    Some(page) => page.clone(),
                    None => {
                        writeln!(out, "caches cleared")?;
                        continue;
                    }
                }
            }
        };

        match commands::run(session, &page).await {
            Ok(envelope) => output::render_to(out, &envelope, format, pretty)?,
            // A bad page never ends the session.
            Err(error) => writeln!(out, "error: {error}")?,
        }
        last_page = Some(page);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::testing::{session, RoutedHttpClient};

    async fn transcript(script: &str, http: RoutedHttpClient) -> (String, usize) {
        let (session, http) = session(http);
        let mut out = Vec::new();
        run(&session, script.as_bytes(), &mut out, OutputFormat::Json, false)
            .await
            .expect("shell");
        let calls = http.requests.lock().expect("lock").len();
        (String::from_utf8(out).expect("utf8"), calls)
    }

    fn sectors() -> RoutedHttpClient {
        RoutedHttpClient::default().route(
            "/market/sectors/",
            json!({ "sectors": [{ "id": "TENI", "avg_change_percent": 0.4 }] }),
        )
    }

    #[tokio::test]
    async fn refresh_rerenders_last_page_from_network() {
        let (text, calls) = transcript("sectors\nsectors\nrefresh\nquit\nsectors\n", sectors()).await;

        assert_eq!(calls, 2);
        assert_eq!(text.matches("\"cache_hit\":true").count(), 1);
        assert_eq!(text.matches("\"cache_hit\":false").count(), 2);
    }

    #[tokio::test]
    async fn bad_lines_do_not_end_the_session() {
        let (text, calls) = transcript("bogus\nlookup $$\nsectors\n", sectors()).await;

        assert!(text.contains("error:"));
        assert_eq!(calls, 1);
        assert!(text.contains("\"schema_version\""));
    }

    #[tokio::test]
    async fn refresh_before_any_page_only_clears() {
        let (text, calls) = transcript("refresh\n", RoutedHttpClient::default()).await;

        assert!(text.contains("caches cleared"));
        assert_eq!(calls, 0);
    }
}
