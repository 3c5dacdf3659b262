use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::analysis::{with_commas, Analysis};
use crate::provider::CandidateLocation;
use crate::scoring::{Ranked, ScoreLabel, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Label padded to the widest label, colored green/yellow/red when enabled.
fn format_label(label: ScoreLabel, use_colors: bool) -> String {
    let padded = format!("{:<16}", label.as_str());
    if !use_colors {
        return padded;
    }
    match label {
        ScoreLabel::VeryPromising => padded.green().to_string(),
        ScoreLabel::Moderate => padded.yellow().to_string(),
        ScoreLabel::NeedsValidation => padded.red().to_string(),
    }
}

fn format_coords(location: &CandidateLocation) -> String {
    format!(
        "{:.4}, {:.4}",
        location.coordinates.lat, location.coordinates.lon
    )
}

fn format_money(amount: f64) -> String {
    format!("${}", with_commas(amount.max(0.0).round() as u64))
}

/// Format ranked candidates as a table with columns: Rank, Score, Label, Name, Coordinates
/// No headers. Rank column: 3 chars (fits "99."), score column 4 chars (fits "100%").
pub fn format_ranked_table(locations: &[Ranked<CandidateLocation>], use_colors: bool) -> String {
    if locations.is_empty() {
        return "No candidate locations found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";
    let rank_width = 3;
    let score_width = 4;
    let label_width = 16;

    locations
        .iter()
        .map(|ranked| {
            let rank_str = format!("{:>2}.", ranked.rank);
            let score_str = format!("{:>width$}", format!("{}%", ranked.score), width = score_width);
            let coords = format_coords(&ranked.item);

            let fixed_width = rank_width
                + 1
                + score_width
                + label_width
                + coords.len()
                + separator.len() * 3;
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&ranked.item.name, width - fixed_width)
                }
                Some(_) => truncate_name(&ranked.item.name, 20),
                None => ranked.item.name.clone(),
            };

            let label = format_label(ranked.label, use_colors);
            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    label,
                    separator,
                    name,
                    separator,
                    coords.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str, score_str, separator, label, separator, name, separator, coords
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line view of one candidate: metrics and every sub-score.
pub fn format_location_detail(ranked: &Ranked<CandidateLocation>, use_colors: bool) -> String {
    let location = &ranked.item;
    let m = &location.metrics;

    let title = format!("{}. {}", ranked.rank, location.name);
    let headline = format!("{}% ({})", ranked.score, ranked.label);
    let traffic = match m.foot_traffic_index {
        Some(t) if m.foot_traffic_is_default => format!("{:.0} (simulated)", t),
        Some(t) => format!("{:.0}", t),
        None => "unknown".to_string(),
    };
    let optional = |v: Option<f64>, precision: usize| match v {
        Some(x) => format!("{:.*}", precision, x),
        None => "unknown".to_string(),
    };

    let mut lines = vec![
        if use_colors {
            title.bold().to_string()
        } else {
            title
        },
        format!(
            "  Score: {}",
            if use_colors {
                headline.bold().to_string()
            } else {
                headline
            }
        ),
        format!("  Coordinates: {}", format_coords(location)),
        format!(
            "  Competitors: {} (nearest {} mi)",
            m.competitor_count,
            optional(m.nearest_competitor_miles, 1)
        ),
        format!("  Population: {}", with_commas(m.population)),
        format!("  Median income: {}", format_money(m.median_income)),
        format!("  Foot traffic: {}", traffic),
        format!("  Vacancy: {}", optional(m.vacancy_index, 0)),
        format!("  Category fit: {}", optional(m.category_fit, 2)),
        format!("  Price tier: {}", m.price_tier),
        "  Sub-scores:".to_string(),
    ];
    for (name, value) in ranked.result.subscores.as_pairs() {
        lines.push(format!("    {:<13}{:.2}", name, value));
    }
    lines.join("\n")
}

/// Summary lines printed above the ranked table.
pub fn format_analysis_header(analysis: &Analysis, use_colors: bool) -> String {
    let title = format!(
        "{} in {} ({})",
        analysis.business, analysis.location, analysis.business_category
    );
    let mut lines = vec![
        if use_colors {
            title.bold().to_string()
        } else {
            title
        },
        format!(
            "  Radius: {} | Price tier: {} | Hours: {}",
            analysis.radius, analysis.price_tier, analysis.daypart
        ),
        format!("  Confidence: {}", analysis.confidence),
    ];

    if let Some(caution) = &analysis.caution {
        let line = format!("  Caution: {}", caution);
        lines.push(if use_colors {
            line.yellow().to_string()
        } else {
            line
        });
    }

    if !analysis.insights.is_empty() {
        lines.push("  Insights:".to_string());
        for insight in &analysis.insights {
            lines.push(format!("    - {}", insight));
        }
    }

    lines.join("\n")
}

/// Format candidates as tab-separated values for scripting
/// Columns: rank, score, label, name, lat, lon (no headers, no colors)
pub fn format_tsv(locations: &[Ranked<CandidateLocation>]) -> String {
    locations
        .iter()
        .map(|ranked| {
            format!(
                "{}\t{}\t{}\t{}\t{:.6}\t{:.6}",
                ranked.rank,
                ranked.score,
                ranked.label,
                ranked.item.name,
                ranked.item.coordinates.lat,
                ranked.item.coordinates.lon
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable form of a single score.
pub fn format_score_result(result: &ScoreResult) -> String {
    let label = ScoreLabel::from_pct(result.opportunity_pct);
    let breakdown = &result.breakdown;

    let mut lines = vec![
        format!("Opportunity: {}% ({})", result.opportunity_pct, label),
        format!("Raw score: {:.2}", result.raw_score),
        "Sub-scores:".to_string(),
    ];
    for (name, value) in result.subscores.as_pairs() {
        lines.push(format!("  {:<13}{:.2}", name, value));
    }

    let weights = breakdown
        .weights
        .as_pairs()
        .iter()
        .map(|(name, w)| format!("{} {:.3}", name, w))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Weights: {}", weights));
    lines.push(format!(
        "Price tier multiplier: {:.2}",
        breakdown.tier_multiplier
    ));

    if breakdown.low_demand_penalty {
        lines.push(format!(
            "Low-demand penalty applied ({}% before penalty)",
            breakdown.pre_penalty_pct
        ));
    }

    lines.join("\n")
}
