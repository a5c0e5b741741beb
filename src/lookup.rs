use crate::trie::{Lexicon, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One input character with the reading the longest match assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharReading {
    pub character: char,
    pub jyutping: Option<String>,
}

/// One input character with every reading any match offered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCandidates {
    pub character: char,
    pub candidates: Vec<String>,
}

/// Greedy longest-match segmentation.
///
/// From each position, walk the trie as far as the input allows and keep the
/// deepest node that has readings; its preferred reading is split across the
/// characters it covers and scanning resumes right after it. Characters no key
/// starts at get `None`.
pub fn longest_match<L: Lexicon + ?Sized>(lexicon: &L, text: &str) -> Vec<CharReading> {
    let chars: Vec<char> = text.chars().collect();
    let mut readings = Vec::with_capacity(chars.len());
    let mut start = 0;

    while start < chars.len() {
        let mut node = NodeId::ROOT;
        let mut best: Option<(usize, &str)> = None;
        for (end, &ch) in chars.iter().enumerate().skip(start) {
            match lexicon.child(node, ch) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(preferred) = lexicon.candidates(node).and_then(<[String]>::first) {
                best = Some((end, preferred.as_str()));
            }
        }

        match best {
            None => {
                readings.push(CharReading {
                    character: chars[start],
                    jyutping: None,
                });
                start += 1;
            }
            Some((end, preferred)) => {
                let mut syllables = preferred.split(' ');
                for &character in &chars[start..=end] {
                    readings.push(CharReading {
                        character,
                        jyutping: syllables.next().map(str::to_string),
                    });
                }
                start = end + 1;
            }
        }
    }

    readings
}

/// Collect every reading offered for each character by any key covering it.
///
/// Readings are grouped by the length of the match that produced them and
/// flattened longest match first, keeping the first occurrence of each.
pub fn all_candidates<L: Lexicon + ?Sized>(lexicon: &L, text: &str) -> Vec<CharCandidates> {
    let chars: Vec<char> = text.chars().collect();
    // per position: match length - 1 -> readings in discovery order
    let mut by_length: Vec<BTreeMap<usize, Vec<&str>>> = vec![BTreeMap::new(); chars.len()];

    for start in 0..chars.len() {
        let mut node = NodeId::ROOT;
        for (end, &ch) in chars.iter().enumerate().skip(start) {
            let Some(next) = lexicon.child(node, ch) else {
                break;
            };
            node = next;
            let Some(candidates) = lexicon.candidates(node) else {
                continue;
            };
            let span = end - start;
            for candidate in candidates {
                for (offset, syllable) in candidate.split(' ').take(span + 1).enumerate() {
                    let seen = by_length[start + offset].entry(span).or_default();
                    if !seen.contains(&syllable) {
                        seen.push(syllable);
                    }
                }
            }
        }
    }

    chars
        .into_iter()
        .zip(by_length)
        .map(|(character, lengths)| {
            let mut candidates: Vec<String> = Vec::new();
            for syllable in lengths.into_values().rev().flatten() {
                if !candidates.iter().any(|known| known == syllable) {
                    candidates.push(syllable.to_string());
                }
            }
            CharCandidates {
                character,
                candidates,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn trie() -> Trie {
        Trie::from_entries([
            ("好", "hou2"),
            ("好", "hou3"),
            ("好學", "hou3 hok6"),
            ("學", "hok6"),
            ("生", "saang1"),
            ("生", "sang1"),
            ("學生", "hok6 saang1"),
            ("卅", "saa1aa6"),
            ("香港人", "hoeng1 gong2 jan4"),
        ])
    }

    fn pairs(readings: &[CharReading]) -> Vec<(char, Option<&str>)> {
        readings
            .iter()
            .map(|r| (r.character, r.jyutping.as_deref()))
            .collect()
    }

    #[test]
    fn longest_match_prefers_longer_keys() {
        let trie = trie();
        assert_eq!(pairs(&longest_match(&trie, "好學生")), [
            ('好', Some("hou3")),
            ('學', Some("hok6")),
            ('生', Some("saang1")),
        ]);
    }

    #[test]
    fn unknown_characters_and_empty_input() {
        let trie = trie();
        assert!(longest_match(&trie, "").is_empty());
        assert_eq!(pairs(&longest_match(&trie, "a好!")), [
            ('a', None),
            ('好', Some("hou2")),
            ('!', None),
        ]);
    }

    #[test]
    fn prefix_without_reading_falls_back_per_character() {
        // 香 and 香港 are only path nodes; nothing ends there
        let trie = trie();
        assert_eq!(pairs(&longest_match(&trie, "香港")), [('香', None), ('港', None)]);
        assert_eq!(pairs(&longest_match(&trie, "香港人")), [
            ('香', Some("hoeng1")),
            ('港', Some("gong2")),
            ('人', Some("jan4")),
        ]);
    }

    #[test]
    fn short_reading_leaves_trailing_characters_absent() {
        let mut trie = trie();
        trie.insert("學好", "hok6");
        assert_eq!(pairs(&longest_match(&trie, "學好")), [
            ('學', Some("hok6")),
            ('好', None),
        ]);
    }

    #[test]
    fn multi_syllable_character_stays_whole() {
        let trie = trie();
        assert_eq!(pairs(&longest_match(&trie, "卅")), [('卅', Some("saa1aa6"))]);
    }

    #[test]
    fn all_candidates_orders_longest_match_first() {
        let trie = trie();
        let all = all_candidates(&trie, "好學生");
        assert_eq!(all[0].candidates, ["hou3", "hou2"]);
        assert_eq!(all[1].candidates, ["hok6"]);
        assert_eq!(all[2].candidates, ["saang1", "sang1"]);
    }

    #[test]
    fn all_candidates_covers_every_character() {
        let trie = trie();
        let all = all_candidates(&trie, "x好");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].character, 'x');
        assert!(all[0].candidates.is_empty());
        assert_eq!(all[1].candidates, ["hou2", "hou3"]);
        assert!(all_candidates(&trie, "").is_empty());
    }

    #[test]
    fn longest_match_readings_are_among_all_candidates() {
        let trie = trie();
        for text in ["好學生", "學生好", "香港人好", "生學好卅", "港人"] {
            let best = longest_match(&trie, text);
            let all = all_candidates(&trie, text);
            for (reading, candidates) in best.iter().zip(&all) {
                if let Some(jyutping) = &reading.jyutping {
                    assert!(candidates.candidates.contains(jyutping), "{text}: {jyutping}");
                }
            }
        }
    }
}
