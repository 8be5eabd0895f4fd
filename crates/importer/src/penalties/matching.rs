//! Fuzzy matching of steward report text against league sessions and
//! roster names.

use storage::models::{RosterMember, Session};

/// Scores at or below this are not considered a match.
pub const MIN_MATCH_SCORE: f64 = 30.0;

/// Lowercased alphanumeric words of `text`.
pub fn normalize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Word-overlap similarity in percent: 2 per exact word pair, 1 per pair
/// where one word contains the other, over the total word count.
pub fn word_overlap_score(left: &[String], right: &[String]) -> f64 {
    let total = left.len() + right.len();
    if total == 0 {
        return 0.0;
    }

    let mut matching = 0usize;
    for a in left {
        for b in right {
            if a == b {
                matching += 2;
            } else if a.contains(b.as_str()) || b.contains(a.as_str()) {
                matching += 1;
            }
        }
    }

    matching as f64 / total as f64 * 100.0
}

/// Best roster match for a driver name, with its score. A case-insensitive
/// exact name scores 100.
pub fn match_driver<'a>(
    name: &str,
    roster: &'a [RosterMember],
) -> Option<(&'a RosterMember, f64)> {
    let wanted = name.trim().to_lowercase();
    let wanted_words: Vec<String> = wanted.split_whitespace().map(str::to_string).collect();

    let mut best: Option<(&RosterMember, f64)> = None;
    for member in roster {
        let candidate = member.display_name.trim().to_lowercase();
        if candidate.is_empty() {
            continue;
        }

        let score = if candidate == wanted {
            100.0
        } else {
            let candidate_words: Vec<String> =
                candidate.split_whitespace().map(str::to_string).collect();
            word_overlap_score(&wanted_words, &candidate_words)
        };

        tracing::debug!(
            "Comparing \"{}\" vs \"{}\": {:.1}",
            name,
            member.display_name,
            score
        );
        if score > MIN_MATCH_SCORE && best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((member, score));
        }
    }

    best
}

/// Whether `needle` appears as a contiguous run of words in `haystack`.
fn contains_words(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// The session a race label refers to. Only sessions with a subsession id are
/// candidates. Exact or containment matches on the session or track name win
/// outright; otherwise the best word overlap above the threshold.
pub fn match_session<'a>(race: &str, sessions: &'a [Session]) -> Option<&'a Session> {
    let wanted = normalize(race);
    if wanted.is_empty() {
        return None;
    }

    let candidates = sessions.iter().filter(|s| s.subsession_id.is_some());

    let mut best: Option<(&Session, f64)> = None;
    for session in candidates {
        for label in [&session.session_name, &session.track_name] {
            let words = normalize(label);
            if words.is_empty() {
                continue;
            }
            if contains_words(&words, &wanted) || contains_words(&wanted, &words) {
                return Some(session);
            }

            let score = word_overlap_score(&wanted, &words);
            if score > MIN_MATCH_SCORE && best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((session, score));
            }
        }
    }

    best.map(|(session, _)| session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(cust_id: i64, display_name: &str) -> RosterMember {
        RosterMember {
            cust_id,
            display_name: display_name.to_string(),
            car_number: None,
            nick_name: None,
        }
    }

    fn session(subsession_id: Option<i64>, session_name: &str, track_name: &str) -> Session {
        Session {
            subsession_id,
            session_name: session_name.to_string(),
            track_name: track_name.to_string(),
            launch_at: None,
            start_time: None,
        }
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(
            normalize("Round 3: Spa-Francorchamps!"),
            vec!["round", "3", "spa", "francorchamps"]
        );
    }

    #[test]
    fn test_exact_driver_name_wins() {
        let roster = [member(1, "Sam Smith"), member(2, "Samuel Smith")];
        let (found, score) = match_driver("sam smith", &roster).unwrap();
        assert_eq!(found.cust_id, 1);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_partial_driver_name_matches() {
        let roster = [member(1, "Jonathan Price"), member(2, "Alex Turner")];
        let (found, _) = match_driver("Jon Price", &roster).unwrap();
        assert_eq!(found.cust_id, 1);
    }

    #[test]
    fn test_unrelated_driver_name_is_rejected() {
        let roster = [member(1, "Jonathan Price")];
        assert!(match_driver("Maria Lopez", &roster).is_none());
    }

    #[test]
    fn test_session_matched_by_track_containment() {
        let sessions = [
            session(Some(10), "Round 1", "Brands Hatch - Indy"),
            session(Some(11), "Round 2", "Silverstone Circuit"),
        ];
        let found = |race: &str| match_session(race, &sessions).and_then(|s| s.subsession_id);
        assert_eq!(found("silverstone"), Some(11));
        assert_eq!(found("Round 1"), Some(10));
    }

    #[test]
    fn test_round_number_is_matched_as_a_word() {
        let sessions = [
            session(Some(10), "Round 10", "Zandvoort"),
            session(Some(1), "Round 1", "Imola"),
        ];
        let found = match_session("round 1", &sessions).and_then(|s| s.subsession_id);
        assert_eq!(found, Some(1));
    }

    #[test]
    fn test_unscheduled_sessions_are_not_candidates() {
        let sessions = [session(None, "Round 5", "Monza")];
        assert!(match_session("Monza", &sessions).is_none());
        assert!(match_session("   ", &sessions).is_none());
    }
}
