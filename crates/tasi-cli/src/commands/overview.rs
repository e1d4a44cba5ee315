use serde::Serialize;
use tasi_core::metrics::{change_color, format_magnitude, mood_gauge_score};
use tasi_core::{Breadth, MarketSummary, Mood};

use super::rows::QuoteRow;
use super::{PageOutput, Session};
use crate::error::CliError;

const PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
struct OverviewData {
    summary: Option<SummaryView>,
    top_gainers: Option<Vec<QuoteRow>>,
    top_losers: Option<Vec<QuoteRow>>,
}

/// Market header shared with the fundamentals summary page.
#[derive(Debug, Serialize)]
pub(super) struct SummaryView {
    updated_at: String,
    index_value: Option<f64>,
    index_change: Option<f64>,
    index_change_percent: Option<f64>,
    index_color: &'static str,
    mood: MoodView,
    total_volume: String,
    total_value: String,
    breadth: Breadth,
}

#[derive(Debug, Serialize)]
struct MoodView {
    key: Option<String>,
    label: &'static str,
    label_ar: &'static str,
    icon: &'static str,
    color: &'static str,
    gauge: u8,
}

impl MoodView {
    fn new(summary: &MarketSummary) -> Self {
        let mood = summary.mood();
        match mood {
            Some(mood) => Self {
                key: Some(mood.key().to_owned()),
                label: mood.label(),
                label_ar: mood.label_ar(),
                icon: mood.icon(),
                color: mood.color(),
                gauge: mood_gauge_score(Some(mood)),
            },
            None => Self {
                key: summary.market_mood.clone(),
                label: "Unknown",
                label_ar: "غير معروف",
                icon: "⚪",
                color: "#999999",
                gauge: mood_gauge_score(None),
            },
        }
    }
}

impl SummaryView {
    pub(super) fn new(summary: &MarketSummary) -> Self {
        Self {
            updated_at: summary.timestamp.clone().unwrap_or_else(|| String::from("N/A")),
            index_value: summary.index_value,
            index_change: summary.index_change,
            index_change_percent: summary.index_change_percent,
            index_color: change_color(summary.index_change.unwrap_or(0.0)).hex(),
            mood: MoodView::new(summary),
            total_volume: format_magnitude(summary.total_volume, "", ""),
            total_value: format_magnitude(summary.total_value, "", " SAR"),
            breadth: summary.breadth(),
        }
    }
}

pub async fn run(session: &Session) -> Result<PageOutput, CliError> {
    let client = session.client();
    let summary = client.market_summary().await;
    let gainers = client.gainers(PREVIEW_LIMIT).await;
    let losers = client.losers(PREVIEW_LIMIT).await;

    let data = OverviewData {
        summary: summary.as_ref().map(SummaryView::new),
        top_gainers: gainers.map(|quotes| quotes.iter().map(QuoteRow::from).collect()),
        top_losers: losers.map(|quotes| quotes.iter().map(QuoteRow::from).collect()),
    };

    let mut output = PageOutput::live(data)?;
    if let Some(raw) = summary.as_ref().and_then(|s| s.market_mood.as_deref()) {
        if Mood::from_key(raw).is_none() {
            output = output.with_warning(format!("unknown market mood '{raw}'"));
        }
    }
    Ok(output)
}
