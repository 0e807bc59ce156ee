//! Field schema and validation, shared by the wizard and the API layer.
//!
//! The wizard pre-validates on the client path and the API re-validates as
//! the authoritative check; both call [`validate`] so the rules cannot drift.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// What kind of input a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain single-line text, presence check only.
    Text,
    /// Non-negative decimal; a comma decimal separator is accepted.
    Number,
    /// Free-form single line, presence check only.
    Line,
    /// Free-form multi-line text, presence check only.
    Multiline,
    Email,
    Url,
}

/// A single wizard field descriptor. The ordered step list doubles as the
/// renderer's schema, so labels and placeholders live here too.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub placeholder: &'static str,
}

/// The free-analysis wizard steps, in progression order.
pub const FREE_ANALYSIS_STEPS: &[FieldDef] = &[
    FieldDef {
        key: "name",
        label: "Ime i prezime",
        required: true,
        kind: FieldKind::Text,
        placeholder: "Petar Petrović",
    },
    FieldDef {
        key: "email",
        label: "Email za izveštaj",
        required: true,
        kind: FieldKind::Email,
        placeholder: "founder@firma.com",
    },
    FieldDef {
        key: "goal90",
        label: "Glavni cilj u narednih 90 dana",
        required: true,
        kind: FieldKind::Line,
        placeholder: "npr. +30% kvalifikovanih leadova / ROAS ≥ 3.0 / smanjiti CAC za 20%",
    },
    FieldDef {
        key: "unitProfit",
        label: "Prosečna zarada po kupovini / klijentu (neto)",
        required: true,
        kind: FieldKind::Number,
        placeholder: "npr. 35 (EUR)",
    },
    FieldDef {
        key: "budget",
        label: "Mesečni budžet po kanalima (opciono)",
        required: false,
        kind: FieldKind::Multiline,
        placeholder: "Meta 2.000€, Google 1.500€, TikTok 500€…",
    },
    FieldDef {
        key: "tracking",
        label: "Tehnički izazovi (opciono)",
        required: false,
        kind: FieldKind::Multiline,
        placeholder: "Ne znam kako da pratim potencijalne klijente.",
    },
    FieldDef {
        key: "url",
        label: "URL sajta / glavnog landinga",
        required: false,
        kind: FieldKind::Url,
        placeholder: "https://...",
    },
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Check the `local@domain.tld` email shape.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Validate a candidate value against a field definition.
///
/// Returns `None` when the value is acceptable, otherwise the message to
/// show next to the field. Pure and deterministic — safe on every keystroke.
pub fn validate(def: &FieldDef, raw: &str) -> Option<String> {
    let v = raw.trim();

    if def.required && v.is_empty() {
        return Some("Ovo polje je obavezno.".to_string());
    }
    if v.is_empty() {
        return None;
    }

    match def.kind {
        FieldKind::Email => {
            if !is_email(v) {
                return Some("Unesite važeću email adresu.".to_string());
            }
        }
        FieldKind::Url => match url::Url::parse(v) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(_) => return Some("URL mora počinjati sa http(s)://".to_string()),
            Err(_) => return Some("Unesite važeći URL (npr. https://primer.com).".to_string()),
        },
        FieldKind::Number => {
            // Accept a comma decimal separator ("3,5").
            let normalized = v.replacen(',', ".", 1);
            match normalized.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    if n < 0.0 {
                        return Some("Vrednost ne može biti negativna.".to_string());
                    }
                }
                _ => return Some("Unesite broj (npr. 35).".to_string()),
            }
        }
        FieldKind::Text | FieldKind::Line | FieldKind::Multiline => {}
    }

    None
}
