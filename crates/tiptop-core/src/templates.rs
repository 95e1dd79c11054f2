//! Bundled instrument templates.

/// Template name → dialect text, embedded at build time.
const TEMPLATES: &[(&str, &str)] = &[
    ("ERIS", include_str!("../templates/ERIS.ini")),
    ("MICADO_SCAO", include_str!("../templates/MICADO_SCAO.ini")),
];

/// Sorted list of available instrument template names.
pub fn list_instruments() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATES.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Look up a template by name, case-insensitively; a trailing `.ini` is
/// tolerated.
pub fn find_instrument(name: &str) -> Option<&'static str> {
    let wanted = name.strip_suffix(".ini").unwrap_or(name);
    TEMPLATES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(wanted))
        .map(|(_, text)| *text)
}
