use std::fmt::Write;

use crate::composer::selection::DateTimeSelection;
use crate::i18n;
use crate::services::show_api::MovieCandidate;

/// Compact vote count: `950` -> `"950"`, `1500` -> `"1.5k"`.
pub fn format_votes(count: u64) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

pub fn format_rating(rating: Option<f64>, lang: &str) -> String {
    match rating {
        Some(r) if r.is_finite() => format!("{:.1}", r),
        _ => i18n::tr(Some(lang), "rating.unavailable", None),
    }
}

pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> String {
    format!("{}{}", image_base_url, poster_path.unwrap_or_default())
}

/// One picker row for a candidate movie.
pub fn render_candidate(
    candidate: &MovieCandidate,
    selected: bool,
    image_base_url: &str,
    lang: &str,
) -> String {
    let marker = if selected { "[x]" } else { "[ ]" };
    let votes = format_votes(candidate.vote_count.unwrap_or(0));
    let votes_label = i18n::tr(Some(lang), "votes.label", Some(&[("count", votes.as_str())]));

    let mut line = format!(
        "{} {}  {}",
        marker,
        candidate.id,
        candidate.title.as_deref().unwrap_or_default()
    );
    if let Some(release_date) = candidate.release_date.as_deref() {
        let _ = write!(line, " ({})", release_date);
    }
    let _ = write!(
        line,
        "  * {}  {}  {}",
        format_rating(candidate.vote_average, lang),
        votes_label,
        poster_url(image_base_url, candidate.poster_path.as_deref())
    );
    line
}

/// Grouped listing of the selected show times.
pub fn render_selection(selection: &DateTimeSelection, lang: &str) -> String {
    let mut out = i18n::tr(Some(lang), "selection.heading", None);
    if selection.is_empty() {
        let _ = write!(out, "\n  {}", i18n::tr(Some(lang), "selection.empty", None));
        return out;
    }
    for (date, times) in selection.iter() {
        let times: Vec<&str> = times.iter().map(String::as_str).collect();
        let _ = write!(out, "\n  {}: {}", date, times.join(", "));
    }
    out
}

pub fn format_price_label(currency: &str, price: &str, lang: &str) -> String {
    let label = i18n::tr(Some(lang), "price.label", None);
    if price.trim().is_empty() {
        format!(
            "{}: {} {}",
            label,
            currency,
            i18n::tr(Some(lang), "price.unset", None)
        )
    } else {
        format!("{}: {} {}", label, currency, price.trim())
    }
}
