//! Call/put pairing
//!
//! Relies on the exchange naming convention: a call and a put on the same
//! expiry and strike differ only in the trailing type tag, so after sorting
//! by identifier they sit next to each other.

use market_data::OptionQuote;

use crate::types::OptionPair;

fn split_tag(inst_id: &str) -> Option<(&str, char)> {
    let tag = inst_id.chars().next_back()?;
    Some((&inst_id[..inst_id.len() - tag.len_utf8()], tag))
}

/// Match adjacent calls and puts.
///
/// Quotes are sorted by identifier, then swept with a cursor: when quote
/// `i` and `i + 1` share everything but a differing last character they
/// form a candidate and the cursor skips both. Only a `C`/`P` candidate is
/// emitted (call first). Anything else advances by one. A trailing quote
/// without a neighbour is dropped.
pub fn pair_options(mut quotes: Vec<OptionQuote>) -> Vec<OptionPair> {
    quotes.sort_by(|a, b| a.inst_id.cmp(&b.inst_id));

    let mut pairs = Vec::new();
    let mut i = 0;

    while i + 1 < quotes.len() {
        let candidate = match (split_tag(&quotes[i].inst_id), split_tag(&quotes[i + 1].inst_id)) {
            (Some((stem_a, tag_a)), Some((stem_b, tag_b))) if stem_a == stem_b && tag_a != tag_b => {
                Some((tag_a, tag_b))
            }
            _ => None,
        };

        match candidate {
            Some((tag_a, tag_b)) => {
                match (tag_a, tag_b) {
                    ('C', 'P') => pairs.push(OptionPair {
                        call: quotes[i].clone(),
                        put: quotes[i + 1].clone(),
                    }),
                    ('P', 'C') => pairs.push(OptionPair {
                        call: quotes[i + 1].clone(),
                        put: quotes[i].clone(),
                    }),
                    _ => {}
                }
                i += 2;
            }
            None => i += 1,
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str) -> OptionQuote {
        OptionQuote::new(id, Some(0.01), Some(0.009))
    }

    fn ids(pairs: &[OptionPair]) -> Vec<(&str, &str)> {
        pairs
            .iter()
            .map(|p| (p.call.inst_id.as_str(), p.put.inst_id.as_str()))
            .collect()
    }

    #[test]
    fn test_adjacent_call_put() {
        let pairs = pair_options(vec![
            q("BTC-USD-250328-60000-P"),
            q("BTC-USD-250328-60000-C"),
        ]);
        assert_eq!(
            ids(&pairs),
            vec![("BTC-USD-250328-60000-C", "BTC-USD-250328-60000-P")]
        );
    }

    #[test]
    fn test_multiple_strikes_and_expiries() {
        let pairs = pair_options(vec![
            q("BTC-USD-250627-70000-P"),
            q("BTC-USD-250328-60000-C"),
            q("BTC-USD-250328-65000-P"),
            q("BTC-USD-250627-70000-C"),
            q("BTC-USD-250328-60000-P"),
            q("BTC-USD-250328-65000-C"),
        ]);
        assert_eq!(
            ids(&pairs),
            vec![
                ("BTC-USD-250328-60000-C", "BTC-USD-250328-60000-P"),
                ("BTC-USD-250328-65000-C", "BTC-USD-250328-65000-P"),
                ("BTC-USD-250627-70000-C", "BTC-USD-250627-70000-P"),
            ]
        );
    }

    #[test]
    fn test_unmatched_quotes_are_skipped() {
        let pairs = pair_options(vec![
            q("BTC-USD-250328-55000-C"),
            q("BTC-USD-250328-60000-C"),
            q("BTC-USD-250328-60000-P"),
            q("BTC-USD-250328-65000-P"),
        ]);
        assert_eq!(
            ids(&pairs),
            vec![("BTC-USD-250328-60000-C", "BTC-USD-250328-60000-P")]
        );
    }

    #[test]
    fn test_trailing_quote_dropped() {
        assert!(pair_options(vec![q("BTC-USD-250328-60000-C")]).is_empty());

        let pairs = pair_options(vec![
            q("BTC-USD-250328-60000-C"),
            q("BTC-USD-250328-60000-P"),
            q("BTC-USD-250328-70000-C"),
        ]);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(pair_options(Vec::new()).is_empty());
    }

    #[test]
    fn test_non_cp_candidate_consumes_both() {
        // C/D is a candidate without a call/put combination: both are
        // skipped, leaving P without a neighbour.
        let pairs = pair_options(vec![
            q("BTC-USD-250328-60000-P"),
            q("BTC-USD-250328-60000-D"),
            q("BTC-USD-250328-60000-C"),
            q("BTC-USD-250328-61000-C"),
            q("BTC-USD-250328-61000-P"),
        ]);
        assert_eq!(
            ids(&pairs),
            vec![("BTC-USD-250328-61000-C", "BTC-USD-250328-61000-P")]
        );
    }

    #[test]
    fn test_no_wraparound() {
        // First and last share a stem only through wraparound
        let pairs = pair_options(vec![
            q("A-USD-250328-1-C"),
            q("B-USD-250328-1-C"),
            q("C-USD-250328-1-C"),
        ]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_identical_identifiers_not_paired() {
        let pairs = pair_options(vec![
            q("BTC-USD-250328-60000-C"),
            q("BTC-USD-250328-60000-C"),
        ]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_quotability() {
        let pair = OptionPair {
            call: q("BTC-USD-250328-60000-C"),
            put: OptionQuote::new("BTC-USD-250328-60000-P", None, Some(0.02)),
        };
        assert!(!pair.is_quotable());

        let pair = OptionPair {
            call: q("BTC-USD-250328-60000-C"),
            put: q("BTC-USD-250328-60000-P"),
        };
        assert!(pair.is_quotable());
    }
}
