use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteTarget {
    Bet(String),
    Group(String),
}

fn invite_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?:^|/)(bet|group)/([A-Za-z0-9_-]+)/?(?:[?#].*)?$").ok())
        .as_ref()
}

pub fn bet_link(base_url: &str, bet_id: &str) -> String {
    format!("{}/bet/{}", base_url.trim_end_matches('/'), bet_id)
}

pub fn group_link(base_url: &str, group_id: &str) -> String {
    format!("{}/group/{}", base_url.trim_end_matches('/'), group_id)
}

/// Accepts a full link or a bare path such as `bet/1` or `/group/abc`.
pub fn parse_invite(link: &str) -> Option<InviteTarget> {
    let caps = invite_pattern()?.captures(link.trim())?;
    let id = caps[2].to_string();
    match &caps[1] {
        "bet" => Some(InviteTarget::Bet(id)),
        _ => Some(InviteTarget::Group(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_strip_trailing_slash() {
        assert_eq!(bet_link("http://localhost:8080/", "42"), "http://localhost:8080/bet/42");
        assert_eq!(group_link("https://betmoment.app", "g-1"), "https://betmoment.app/group/g-1");
    }

    #[test]
    fn test_parse_invite() {
        let id = "0f8fad5b-d9cb-469f-a165-70867728950e";
        assert_eq!(
            parse_invite(&format!("https://betmoment.app/bet/{}", id)),
            Some(InviteTarget::Bet(id.to_string()))
        );
        assert_eq!(
            parse_invite("https://betmoment.app/group/abc?ref=qr"),
            Some(InviteTarget::Group("abc".to_string()))
        );
        assert_eq!(parse_invite("bet/featured-bet-1/"), Some(InviteTarget::Bet("featured-bet-1".to_string())));
        assert_eq!(parse_invite("https://betmoment.app/profile"), None);
        assert_eq!(parse_invite("https://betmoment.app/bet/"), None);
    }
}
