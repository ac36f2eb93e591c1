#![cfg(test)]
//! Selector lint for the shared theme.
//!
//! Components in `ui` reference these classes by name; a rename on one side
//! without the other silently drops styling in packaged builds. When you
//! rename a class, update the markup and this list together.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global
    ":root",
    "body {",
    ".visually-hidden",
    // Buttons
    ".button {",
    ".button--accent",
    ".button--ghost",
    // Navbar
    ".navbar {",
    ".navbar__title",
    ".navbar__subtitle",
    ".navbar__actions",
    ".navbar__locale",
    // Dashboard
    ".dashboard {",
    ".dashboard__tiles",
    ".dashboard__grid",
    ".dashboard__about",
    ".tile__label",
    ".tile__value",
    ".tile__note",
    // Charts
    ".chart-card",
    ".chart-card--wide",
    ".chart-card__title",
    ".chart-card__note",
    ".chart__svg",
    ".chart-legend",
    ".chart-legend__swatch",
    // Flow modal
    ".flow-modal {",
    ".flow-modal__panel",
    ".flow-modal__close",
    ".flow-modal__error",
    ".flow-modal__prior",
    ".flow-modal__restore",
    ".flow-modal__hint",
    ".flow-form__actions",
    ".flow-entry__fields",
    "@media (max-width: 720px)",
];

/// Modifier classes built from `TileKind::tone` in `ui::metrics`.
const TONES: &[&str] = &["green", "blue", "purple", "amber", "cyan"];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    assert!(
        missing.is_empty(),
        "Missing {} required CSS selectors/tokens in unified theme:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn every_tone_has_a_value_and_dot_colour() {
    for tone in TONES {
        for block in ["tile__value", "chart-card__dot"] {
            let selector = format!(".{block}--{tone}");
            assert!(THEME_CSS.contains(&selector), "missing {selector}");
        }
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}
