use serde::Serialize;

/// Render a magnitude with a K/M/B scale suffix and thousands separators.
///
/// `None` and non-finite values render as `N/A`. Scale is chosen from the
/// absolute value so negative flows format like their positive twins.
pub fn format_magnitude(value: Option<f64>, prefix: &str, suffix: &str) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return String::from("N/A");
    };

    let magnitude = value.abs();
    let (number, scale) = if magnitude >= 1e9 {
        (format!("{:.2}", value / 1e9), "B")
    } else if magnitude >= 1e6 {
        (format!("{:.2}", value / 1e6), "M")
    } else if magnitude >= 1e3 {
        (format!("{:.1}", value / 1e3), "K")
    } else {
        (format!("{value:.2}"), "")
    };

    format!("{prefix}{}{scale}{suffix}", group_thousands(&number))
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Tri-state color for a signed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeColor {
    Positive,
    Negative,
    Neutral,
}

impl ChangeColor {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Positive => "#00C853",
            Self::Negative => "#FF1744",
            Self::Neutral => "#FFD54F",
        }
    }
}

/// Exact comparison against zero; there is no epsilon band.
pub fn change_color(value: f64) -> ChangeColor {
    if value > 0.0 {
        ChangeColor::Positive
    } else if value < 0.0 {
        ChangeColor::Negative
    } else {
        ChangeColor::Neutral
    }
}

/// P/E for display: loss-making companies have no meaningful multiple.
pub fn pe_display(pe: f64) -> String {
    if pe > 0.0 {
        format!("{pe:.1}")
    } else {
        String::from("loss")
    }
}
