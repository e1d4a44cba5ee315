use serde::{Deserialize, Serialize};

/// Index-level snapshot from `/market/summary/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    #[serde(default)]
    pub index_value: Option<f64>,
    #[serde(default)]
    pub index_change: Option<f64>,
    #[serde(default)]
    pub index_change_percent: Option<f64>,
    /// Raw mood key; see [`MarketSummary::mood`].
    #[serde(default)]
    pub market_mood: Option<String>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub advancing: Option<u64>,
    #[serde(default)]
    pub declining: Option<u64>,
    #[serde(default)]
    pub unchanged: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MarketSummary {
    pub fn mood(&self) -> Option<Mood> {
        self.market_mood.as_deref().and_then(Mood::from_key)
    }

    pub fn breadth(&self) -> Breadth {
        Breadth::new(
            self.advancing.unwrap_or(0),
            self.declining.unwrap_or(0),
            self.unchanged.unwrap_or(0),
        )
    }
}

/// Advancing / declining / unchanged counts.
///
/// The total is shown as-is; it is not checked against the listed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breadth {
    pub advancing: u64,
    pub declining: u64,
    pub unchanged: u64,
    pub total: u64,
}

impl Breadth {
    pub fn new(advancing: u64, declining: u64, unchanged: u64) -> Self {
        Self {
            advancing,
            declining,
            unchanged,
            total: advancing + declining + unchanged,
        }
    }
}

/// Seven-level ordinal market sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryBearish,
    Bearish,
    ModeratelyBearish,
    Neutral,
    ModeratelyBullish,
    Bullish,
    VeryBullish,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::VeryBearish,
        Mood::Bearish,
        Mood::ModeratelyBearish,
        Mood::Neutral,
        Mood::ModeratelyBullish,
        Mood::Bullish,
        Mood::VeryBullish,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.key().eq_ignore_ascii_case(key))
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::VeryBearish => "very_bearish",
            Self::Bearish => "bearish",
            Self::ModeratelyBearish => "moderately_bearish",
            Self::Neutral => "neutral",
            Self::ModeratelyBullish => "moderately_bullish",
            Self::Bullish => "bullish",
            Self::VeryBullish => "very_bullish",
        }
    }

    /// Position on the 0..=6 gauge.
    pub const fn score(self) -> u8 {
        match self {
            Self::VeryBearish => 0,
            Self::Bearish => 1,
            Self::ModeratelyBearish => 2,
            Self::Neutral => 3,
            Self::ModeratelyBullish => 4,
            Self::Bullish => 5,
            Self::VeryBullish => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryBearish => "Very Bearish",
            Self::Bearish => "Bearish",
            Self::ModeratelyBearish => "Moderately Bearish",
            Self::Neutral => "Neutral",
            Self::ModeratelyBullish => "Moderately Bullish",
            Self::Bullish => "Bullish",
            Self::VeryBullish => "Very Bullish",
        }
    }

    pub const fn label_ar(self) -> &'static str {
        match self {
            Self::VeryBearish => "هبوط حاد",
            Self::Bearish => "هبوط",
            Self::ModeratelyBearish => "هبوط معتدل",
            Self::Neutral => "محايد",
            Self::ModeratelyBullish => "صعود معتدل",
            Self::Bullish => "صعود",
            Self::VeryBullish => "صعود قوي",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryBearish => "#C62828",
            Self::Bearish => "#EF5350",
            Self::ModeratelyBearish => "#FF8A65",
            Self::Neutral => "#FFD54F",
            Self::ModeratelyBullish => "#A5D6A7",
            Self::Bullish => "#66BB6A",
            Self::VeryBullish => "#00C853",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::VeryBearish | Self::Bearish => "🔴",
            Self::ModeratelyBearish => "🟠",
            Self::Neutral | Self::ModeratelyBullish => "🟡",
            Self::Bullish | Self::VeryBullish => "🟢",
        }
    }
}
