use serde::Serialize;
use tasi_core::metrics::{change_color, format_magnitude};
use tasi_core::Quote;

/// One line of a movers or watchlist table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub symbol: String,
    pub name: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: String,
    pub value: String,
    pub color: &'static str,
}

impl From<&Quote> for QuoteRow {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            name: truncate(quote.display_name(), 24),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: format_magnitude(quote.volume, "", ""),
            value: format_magnitude(quote.value, "", " SAR"),
            color: change_color(quote.change_percent.unwrap_or(0.0)).hex(),
        }
    }
}

/// Cut to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("أرامكو السعودية", 6), "أرامك…");
        assert_eq!(truncate("Aramco", 24), "Aramco");
    }

    #[test]
    fn row_formats_magnitudes() {
        let quote: Quote = serde_json::from_value(serde_json::json!({
            "symbol": "2222",
            "name_en": "Saudi Aramco",
            "price": 27.45,
            "change_percent": -0.8,
            "volume": 12_500_000.0
        }))
        .expect("quote");

        let row = QuoteRow::from(&quote);

        assert_eq!(row.name, "Saudi Aramco");
        assert_eq!(row.volume, "12.50M");
        assert_eq!(row.value, "N/A");
        assert_eq!(row.color, "#FF1744");
    }
}
