use serde::{Deserialize, Serialize};

/// Sector row from `/market/sectors/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    /// Average change as a fraction (0.012 means +1.2%).
    #[serde(default)]
    pub avg_change_percent: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub num_stocks: Option<u64>,
}

impl Sector {
    pub fn code(&self) -> Option<SectorCode> {
        SectorCode::parse(&self.id)
    }

    /// English display name; unknown codes are shown verbatim.
    pub fn display_name(&self) -> &str {
        match self.code() {
            Some(code) => code.name(),
            None => &self.id,
        }
    }

    pub fn avg_change_pct(&self) -> Option<f64> {
        self.avg_change_percent.map(|fraction| fraction * 100.0)
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.avg_change_pct().unwrap_or(0.0))
    }
}

/// Sign of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    Flat,
}

impl Direction {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Flat
        }
    }
}

/// TASI sector index codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectorCode {
    Teni,
    Tmti,
    Tcpi,
    Tcsi,
    Ttsi,
    Tcgi,
    Tssi,
    Tmdi,
    Trli,
    Tfsi,
    Tfbi,
    Thei,
    Tpbi,
    Tbni,
    Tdfi,
    Tisi,
    Trti,
    Tuti,
    Trmi,
    Tdai,
}

impl SectorCode {
    pub const ALL: [SectorCode; 20] = [
        SectorCode::Teni,
        SectorCode::Tmti,
        SectorCode::Tcpi,
        SectorCode::Tcsi,
        SectorCode::Ttsi,
        SectorCode::Tcgi,
        SectorCode::Tssi,
        SectorCode::Tmdi,
        SectorCode::Trli,
        SectorCode::Tfsi,
        SectorCode::Tfbi,
        SectorCode::Thei,
        SectorCode::Tpbi,
        SectorCode::Tbni,
        SectorCode::Tdfi,
        SectorCode::Tisi,
        SectorCode::Trti,
        SectorCode::Tuti,
        SectorCode::Trmi,
        SectorCode::Tdai,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(code))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teni => "TENI",
            Self::Tmti => "TMTI",
            Self::Tcpi => "TCPI",
            Self::Tcsi => "TCSI",
            Self::Ttsi => "TTSI",
            Self::Tcgi => "TCGI",
            Self::Tssi => "TSSI",
            Self::Tmdi => "TMDI",
            Self::Trli => "TRLI",
            Self::Tfsi => "TFSI",
            Self::Tfbi => "TFBI",
            Self::Thei => "THEI",
            Self::Tpbi => "TPBI",
            Self::Tbni => "TBNI",
            Self::Tdfi => "TDFI",
            Self::Tisi => "TISI",
            Self::Trti => "TRTI",
            Self::Tuti => "TUTI",
            Self::Trmi => "TRMI",
            Self::Tdai => "TDAI",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Teni => "Energy",
            Self::Tmti => "Materials",
            Self::Tcpi => "Capital Goods",
            Self::Tcsi => "Commercial & Professional Services",
            Self::Ttsi => "Transportation",
            Self::Tcgi => "Consumer Durables & Apparel",
            Self::Tssi => "Consumer Services",
            Self::Tmdi => "Media & Entertainment",
            Self::Trli => "Retailing",
            Self::Tfsi => "Food & Staples Retailing",
            Self::Tfbi => "Food & Beverages",
            Self::Thei => "Health Care Equipment & Services",
            Self::Tpbi => "Pharma & Biotech",
            Self::Tbni => "Banks",
            Self::Tdfi => "Financial Services",
            Self::Tisi => "Insurance",
            Self::Trti => "Real Estate Management",
            Self::Tuti => "Utilities",
            Self::Trmi => "REITs",
            Self::Tdai => "Software & Services",
        }
    }

    pub const fn name_ar(self) -> &'static str {
        match self {
            Self::Teni => "الطاقة",
            Self::Tmti => "المواد الأساسية",
            Self::Tcpi => "السلع الرأسمالية",
            Self::Tcsi => "الخدمات التجارية",
            Self::Ttsi => "النقل",
            Self::Tcgi => "السلع المعمرة",
            Self::Tssi => "الخدمات الاستهلاكية",
            Self::Tmdi => "الإعلام والترفيه",
            Self::Trli => "التجزئة",
            Self::Tfsi => "الأغذية والمواد الغذائية",
            Self::Tfbi => "إنتاج الأغذية",
            Self::Thei => "المعدات الصحية",
            Self::Tpbi => "الأدوية",
            Self::Tbni => "البنوك",
            Self::Tdfi => "الخدمات المالية",
            Self::Tisi => "التأمين",
            Self::Trti => "إدارة العقارات",
            Self::Tuti => "المرافق العامة",
            Self::Trmi => "صناديق الريت",
            Self::Tdai => "البرمجيات والخدمات",
        }
    }
}
