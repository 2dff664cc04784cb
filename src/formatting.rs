//! Number formatting for presentation surfaces.
//!
//! The engine emits unrounded figures; everything user-facing goes
//! through these helpers so JSON output stays full-precision while
//! worksheets, terminals, and emails show `$382,872.34` style values.

/// Group the absolute value of an already-rounded figure with thousands
/// separators. Callers that render negative figures own the sign.
pub fn thousands(value: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

pub fn currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", thousands(-value, 2))
    } else {
        format!("${}", thousands(value, 2))
    }
}

/// Whole-dollar currency for assumption rows.
pub fn currency_whole(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", thousands(-value, 0))
    } else {
        format!("${}", thousands(value, 0))
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn count(value: f64) -> String {
    thousands(value, 0)
}

pub fn months(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn hours(value: f64) -> String {
    if value == value.trunc() {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
