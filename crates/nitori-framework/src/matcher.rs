//! Command matching.
//!
//! The matcher tokenizes the normalized text on whitespace and walks the
//! fields left to right. For every field it scans the routes in registration
//! order:
//!
//! - a field equal to a pattern or alias wins immediately;
//! - a field that is a prefix of a primary pattern becomes a fuzzy candidate,
//!   replacing the current one only when it is strictly longer.
//!
//! Aliases never match fuzzily. The returned fields start at the field that
//! produced the match, so handlers see the command token at `fields[0]`.

use crate::route::{Route, RouteTable};

/// A matched route and the fields handed to its handler.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub fields: Vec<String>,
}

impl RouteTable {
    /// Matches normalized command text against the registered routes.
    pub fn match_route(&self, text: &str) -> Option<RouteMatch<'_>> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.is_empty() {
            return None;
        }

        // (route, field index, field length)
        let mut best: Option<(&Route, usize, usize)> = None;

        for (index, field) in fields.iter().enumerate() {
            for route in self.routes() {
                if route.matches_exactly(field) {
                    return Some(RouteMatch {
                        route,
                        fields: owned(&fields[index..]),
                    });
                }

                if route.pattern().starts_with(field)
                    && best.is_none_or(|(_, _, len)| field.len() > len)
                {
                    best = Some((route, index, field.len()));
                }
            }
        }

        best.map(|(route, index, _)| RouteMatch {
            route,
            fields: owned(&fields[index..]),
        })
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| (*f).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Context;
    use crate::error::HandlerResult;
    use crate::route::categories::{AUDIO, MODERATION, SYSTEM};

    async fn noop(_ctx: Arc<Context>) -> HandlerResult {
        Ok(())
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table
            .register(Route::new("play", AUDIO, noop).alias("pl"))
            .unwrap();
        table.register(Route::new("pause", AUDIO, noop)).unwrap();
        table
            .register(Route::new("ban", MODERATION, noop).alias("hammer"))
            .unwrap();
        table.register(Route::new("ping", SYSTEM, noop)).unwrap();
        table
    }

    fn matched(table: &RouteTable, text: &str) -> Option<(String, Vec<String>)> {
        table
            .match_route(text)
            .map(|m| (m.route.pattern().to_owned(), m.fields))
    }

    #[test]
    fn test_exact_pattern() {
        let (route, fields) = matched(&table(), "ping").unwrap();
        assert_eq!(route, "ping");
        assert_eq!(fields, ["ping"]);
    }

    #[test]
    fn test_alias_is_exact() {
        let (route, fields) = matched(&table(), "hammer someone").unwrap();
        assert_eq!(route, "ban");
        assert_eq!(fields, ["hammer", "someone"]);
    }

    #[test]
    fn test_exact_beats_earlier_fuzzy_candidate() {
        // "pa" fuzzily matches "pause", but the exact "ban" later wins.
        let (route, fields) = matched(&table(), "pa ban x").unwrap();
        assert_eq!(route, "ban");
        assert_eq!(fields, ["ban", "x"]);
    }

    #[test]
    fn test_single_letter_alias_is_exact() {
        let mut table = RouteTable::new();
        table.register(Route::new("pause", AUDIO, noop)).unwrap();
        table
            .register(Route::new("play", AUDIO, noop).alias("p"))
            .unwrap();

        let (route, fields) = matched(&table, "p never gonna give you up").unwrap();
        assert_eq!(route, "play");
        assert_eq!(fields, ["p", "never", "gonna", "give", "you", "up"]);
    }

    #[test]
    fn test_fuzzy_keeps_all_fields_from_match() {
        let (route, fields) = matched(&table(), "p never gonna give you up").unwrap();
        assert_eq!(route, "play");
        assert_eq!(fields, ["p", "never", "gonna", "give", "you", "up"]);
    }

    #[test]
    fn test_fuzzy_remainder_starts_at_matched_field() {
        // "pau" is the longest candidate and sits at index 1.
        let (route, fields) = matched(&table(), "p pau now").unwrap();
        assert_eq!(route, "pause");
        assert_eq!(fields, ["pau", "now"]);
    }

    #[test]
    fn test_longest_fuzzy_wins() {
        let (route, _) = matched(&table(), "pin").unwrap();
        assert_eq!(route, "ping");
    }

    #[test]
    fn test_fuzzy_tie_keeps_first_registered() {
        // "p" prefixes play, pause and ping; play was registered first.
        let (route, _) = matched(&table(), "p").unwrap();
        assert_eq!(route, "play");
    }

    #[test]
    fn test_equal_length_later_field_does_not_replace() {
        // "pi" and "pa" both have length 2; the first one found stays.
        let (route, fields) = matched(&table(), "pi pa").unwrap();
        assert_eq!(route, "ping");
        assert_eq!(fields, ["pi", "pa"]);
    }

    #[test]
    fn test_aliases_do_not_match_fuzzily() {
        assert!(matched(&table(), "ham").is_none());
    }

    #[test]
    fn test_no_match() {
        assert!(matched(&table(), "xyzzy nonsense").is_none());
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(matched(&table(), "").is_none());
        assert!(matched(&table(), "   \t ").is_none());
    }

    #[test]
    fn test_fields_collapse_whitespace() {
        let (_, fields) = matched(&table(), "  ping \t  a   b ").unwrap();
        assert_eq!(fields, ["ping", "a", "b"]);
    }
}
