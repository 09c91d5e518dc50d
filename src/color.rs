//! Card colors.
//!
//! - Background: the first keyword filter matching the job title, scratchpad
//!   filters before enabled groups, otherwise a fallback chain
//! - Text: black or white, whichever reads better on the background
//! - Team accent: a stable palette entry derived from the team name

use serde::Serialize;

use crate::view::{NodeFilter, ViewState, split_keywords};
use crate::view::state::WHITE;

pub const BLACK_TEXT: &str = "#000000";
pub const WHITE_TEXT: &str = "#ffffff";

/// Accent used for nodes without a team.
pub const NO_TEAM: TeamColor = TeamColor {
    token: "border-slate-200",
    hex: "#e2e8f0",
};

/// Team accent palette.
pub const TEAM_PALETTE: [TeamColor; 7] = [
    TeamColor { token: "border-blue-400", hex: "#60a5fa" },
    TeamColor { token: "border-emerald-400", hex: "#34d399" },
    TeamColor { token: "border-violet-400", hex: "#a78bfa" },
    TeamColor { token: "border-amber-400", hex: "#fbbf24" },
    TeamColor { token: "border-rose-400", hex: "#fb7185" },
    TeamColor { token: "border-cyan-400", hex: "#22d3ee" },
    TeamColor { token: "border-indigo-400", hex: "#818cf8" },
];

/// A team accent: renderer style token plus hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamColor {
    pub token: &'static str,
    pub hex: &'static str,
}

/// Filter chain resolved once per view.
pub struct ColorRules {
    filters: Vec<(Vec<String>, String)>,
    fallback: String,
}

impl ColorRules {
    pub fn new(view: &ViewState) -> Self {
        let enabled = view.filter_groups.iter().filter(|g| g.enabled);

        let filters = view
            .node_filters
            .iter()
            .chain(enabled.clone().flat_map(|g| g.filters.iter()))
            .map(|f: &NodeFilter| (split_keywords(&f.pattern), f.color.clone()))
            .collect();

        let fallback = enabled
            .clone()
            .next()
            .map(|g| g.fallback_color.as_str())
            .filter(|c| !c.is_empty())
            .or_else(|| Some(view.default_fallback_color.as_str()).filter(|c| !c.is_empty()))
            .unwrap_or(WHITE)
            .to_string();

        Self { filters, fallback }
    }

    /// Background color for a job title.
    pub fn color_for(&self, job_title: &str) -> &str {
        let title = job_title.to_lowercase();
        self.filters
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k.as_str())))
            .map_or(self.fallback.as_str(), |(_, color)| color.as_str())
    }

    /// Color used when no filter matches.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Black or white text for a background color.
///
/// Accepts `#rgb` and `#rrggbb`; anything else is treated as white.
pub fn contrast_text_color(background: &str) -> &'static str {
    let (r, g, b) = parse_hex(background).unwrap_or((255, 255, 255));
    let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
    if luminance > 0.5 { BLACK_TEXT } else { WHITE_TEXT }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// Stable accent color for a team name.
///
/// The hash is `h = c + (h << 5) - h` over UTF-16 code units, where only the
/// shift truncates to 32 bits, so colors match the ones the web client has
/// always shown.
pub fn team_color(team: &str) -> TeamColor {
    if team.is_empty() {
        return NO_TEAM;
    }
    let mut hash: i64 = 0;
    for unit in team.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + (shifted - hash);
    }
    let slot = (hash.unsigned_abs() % TEAM_PALETTE.len() as u64) as usize;
    TEAM_PALETTE[slot]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FilterGroup;

    fn group(id: &str, enabled: bool, filters: Vec<NodeFilter>, fallback: &str) -> FilterGroup {
        FilterGroup {
            id: id.into(),
            name: id.into(),
            enabled,
            filters,
            fallback_color: fallback.into(),
        }
    }

    #[test]
    fn test_scratchpad_beats_groups() {
        let view = ViewState {
            node_filters: vec![NodeFilter::new("f1", "engineer", "#111111")],
            filter_groups: vec![group(
                "g",
                true,
                vec![NodeFilter::new("f2", "senior", "#222222")],
                "",
            )],
            ..Default::default()
        };
        let rules = ColorRules::new(&view);
        assert_eq!(rules.color_for("Senior Engineer"), "#111111");
        assert_eq!(rules.color_for("Senior Designer"), "#222222");
    }

    #[test]
    fn test_disabled_groups_are_ignored() {
        let view = ViewState {
            filter_groups: vec![
                group("off", false, vec![NodeFilter::new("f", "engineer", "#333333")], "#444444"),
                group("on", true, vec![], "#555555"),
            ],
            ..Default::default()
        };
        let rules = ColorRules::new(&view);
        assert_eq!(rules.color_for("Engineer"), "#555555");
    }

    #[test]
    fn test_fallback_chain() {
        let mut view = ViewState {
            filter_groups: vec![group("g", true, vec![], "")],
            default_fallback_color: "#abcdef".into(),
            ..Default::default()
        };
        assert_eq!(ColorRules::new(&view).fallback(), "#abcdef");

        view.default_fallback_color.clear();
        assert_eq!(ColorRules::new(&view).fallback(), "#ffffff");
    }

    #[test]
    fn test_comma_keywords() {
        let view = ViewState {
            node_filters: vec![NodeFilter::new("f", " qa , Tester", "#ff0000")],
            ..Default::default()
        };
        let rules = ColorRules::new(&view);
        assert_eq!(rules.color_for("Senior QA Analyst"), "#ff0000");
        assert_eq!(rules.color_for("Test Lead"), "#ffffff");
        assert_eq!(rules.color_for("Software Tester"), "#ff0000");
    }

    #[test]
    fn test_contrast() {
        assert_eq!(contrast_text_color("#ffffff"), BLACK_TEXT);
        assert_eq!(contrast_text_color("#fff"), BLACK_TEXT);
        assert_eq!(contrast_text_color("#000000"), WHITE_TEXT);
        assert_eq!(contrast_text_color("#1e3a8a"), WHITE_TEXT);
        assert_eq!(contrast_text_color("#fbbf24"), BLACK_TEXT);
        assert_eq!(contrast_text_color("not-a-color"), BLACK_TEXT);
        assert_eq!(contrast_text_color("#12345"), BLACK_TEXT);
    }

    #[test]
    fn test_team_color() {
        assert_eq!(team_color(""), NO_TEAM);
        // "a": hash = 97, 97 % 7 = 6
        assert_eq!(team_color("a").hex, "#818cf8");
        // "ab": hash = 98 + 97 * 31 = 3105, 3105 % 7 = 4
        assert_eq!(team_color("ab").hex, "#fb7185");
        assert_eq!(team_color("Platform"), team_color("Platform"));
    }
}
