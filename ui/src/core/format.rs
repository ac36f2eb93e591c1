//! Formatting helpers for presenting metrics.

pub fn format_ms(value: f64) -> String {
    format!("{value:.0}ms")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.0}%")
}

/// Short count: `950`, `12.4k`, `3.1M`. A value that rounds up to 1000 of
/// one unit is shown in the next (`999_950` is `1M`, not `1000k`).
pub fn format_compact(count: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "k")];

    let mut shown: Option<(u128, &str)> = None;
    for (size, suffix) in UNITS.into_iter().rev() {
        let settled = match shown {
            Some((tenths, _)) => tenths < 10_000,
            None => count < size,
        };
        if settled {
            break;
        }
        // Rounded to the nearest tenth of a unit.
        let tenths = (u128::from(count) * 10 + u128::from(size) / 2) / u128::from(size);
        shown = Some((tenths, suffix));
    }

    match shown {
        Some((tenths, suffix)) if tenths % 10 == 0 => format!("{}{suffix}", tenths / 10),
        Some((tenths, suffix)) => format!("{}.{}{suffix}", tenths / 10, tenths % 10),
        None => count.to_string(),
    }
}

/// Axis tick label: integers without decimals, everything else with one.
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
