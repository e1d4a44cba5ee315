use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Live quote as returned by `/quote/{symbol}/`, `/quotes/` and the movers lists.
///
/// Every market field is optional: the upstream schema is externally owned
/// and fields come and go between endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    /// Flattened net flow reported by the batch endpoint.
    #[serde(default)]
    pub net_liquidity: Option<f64>,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
}

impl Quote {
    /// English name when present, else the local name, else the ticker.
    pub fn display_name(&self) -> &str {
        [self.name_en.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or(self.symbol.as_str())
    }

    /// Net flow from the nested liquidity block, falling back to the flat field.
    pub fn net_flow(&self) -> Option<f64> {
        self.liquidity
            .as_ref()
            .and_then(|liquidity| liquidity.net_value)
            .or(self.net_liquidity)
    }
}

/// Money flow breakdown for a single security.
///
/// `net_value` is the producer's figure; [`Liquidity::computed_net`] is ours.
/// They are displayed side by side and never reconciled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Liquidity {
    #[serde(default)]
    pub inflow_value: Option<f64>,
    #[serde(default)]
    pub outflow_value: Option<f64>,
    #[serde(default)]
    pub net_value: Option<f64>,
    #[serde(default)]
    pub inflow_trades: Option<f64>,
    #[serde(default)]
    pub outflow_trades: Option<f64>,
    #[serde(default)]
    pub inflow_volume: Option<f64>,
    #[serde(default)]
    pub outflow_volume: Option<f64>,
}

impl Liquidity {
    /// Inflow minus outflow, treating missing sides as zero.
    pub fn computed_net(&self) -> f64 {
        crate::metrics::net_liquidity(
            self.inflow_value.unwrap_or(0.0),
            self.outflow_value.unwrap_or(0.0),
        )
    }

    /// True when the producer's net figure disagrees with inflow minus outflow.
    pub fn is_inconsistent(&self) -> bool {
        match self.net_value {
            Some(reported) => (reported - self.computed_net()).abs() > 0.5,
            None => false,
        }
    }
}

/// Company profile from `/company/{symbol}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub symbol: Option<Symbol>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CompanyProfile {
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or("SAR")
    }
}
