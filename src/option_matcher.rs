use crate::bet::BetOption;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// How an option was picked out of user input
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    Id,
    Label,
    Fuzzy(f64),
}

pub struct OptionMatcher {
    similarity_threshold: f64,
}

impl Default for OptionMatcher {
    fn default() -> Self {
        Self::new(0.85)
    }
}

impl OptionMatcher {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn normalize_text(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn calculate_similarity(&self, input: &str, label: &str) -> f64 {
        strsim::jaro_winkler(&self.normalize_text(input), &self.normalize_text(label))
    }

    /// Resolve user input to an option: exact id, then label, then the
    /// closest label above the similarity threshold.
    pub fn resolve<'a>(&self, input: &str, options: &'a [BetOption]) -> Option<(&'a BetOption, MatchKind)> {
        let input = input.trim();

        if let Some(option) = options.iter().find(|o| o.id == input) {
            return Some((option, MatchKind::Id));
        }

        if let Some(option) = options.iter().find(|o| o.label.eq_ignore_ascii_case(input)) {
            return Some((option, MatchKind::Label));
        }

        let mut best_match: Option<(&BetOption, f64)> = None;
        for option in options {
            let similarity = self.calculate_similarity(input, &option.label);
            if best_match.map_or(true, |(_, best)| similarity > best) {
                best_match = Some((option, similarity));
            }
        }

        match best_match {
            Some((option, score)) if score >= self.similarity_threshold => {
                Some((option, MatchKind::Fuzzy(score)))
            }
            _ => None,
        }
    }

    /// Parse a user-supplied expiry with multiple format support
    pub fn parse_expiry(&self, date_str: &str) -> Option<DateTime<Utc>> {
        let date_str = date_str.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
            return Some(dt.with_timezone(&Utc));
        }

        let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
        for format in &datetime_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
                return Some(dt.and_utc());
            }
        }

        let date_formats = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];
        for format in &date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
                return date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
            }
        }

        None
    }
}
