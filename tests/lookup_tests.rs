use std::collections::HashSet;
use yue_annotator::{
    codec, customize, get, get_all, loader, trie::DEFAULT_DICTIONARY, CharReading, Dictionary,
    Lexicon, NodeId, Override, Trie,
};

fn pairs(readings: Vec<CharReading>) -> Vec<(char, Option<String>)> {
    readings
        .into_iter()
        .map(|r| (r.character, r.jyutping))
        .collect()
}

fn some(reading: &str) -> Option<String> {
    Some(reading.to_string())
}

/// Every key in the bundled dictionary together with its candidates.
fn bundled_entries() -> Vec<(String, Vec<String>)> {
    fn walk(trie: &Trie, node: NodeId, key: &mut String, out: &mut Vec<(String, Vec<String>)>) {
        let Some(current) = trie.node(node) else {
            return;
        };
        if let Some(candidates) = current.candidates.as_ref().filter(|c| !c.is_empty()) {
            out.push((key.clone(), candidates.clone()));
        }
        for (&ch, &child) in &current.children {
            key.push(ch);
            walk(trie, child, key, out);
            key.pop();
        }
    }
    let trie = loader::parse(DEFAULT_DICTIONARY).expect("bundled dictionary parses");
    let mut out = Vec::new();
    walk(&trie, NodeId::ROOT, &mut String::new(), &mut out);
    out
}

#[test]
fn single_characters_read_as_their_first_candidate() {
    for (key, candidates) in bundled_entries() {
        if key.chars().count() != 1 {
            continue;
        }
        let readings = get(&key);
        assert_eq!(readings.len(), 1, "{key}");
        assert_eq!(readings[0].jyutping.as_ref(), Some(&candidates[0]), "{key}");
    }
}

#[test]
fn phrases_read_as_their_preferred_candidate() {
    for (key, candidates) in bundled_entries() {
        if key.chars().count() < 2 {
            continue;
        }
        let expected: Vec<(char, Option<String>)> = key
            .chars()
            .zip(candidates[0].split(' '))
            .map(|(ch, syllable)| (ch, some(syllable)))
            .collect();
        assert_eq!(pairs(get(&key)), expected, "{key}");
    }
}

#[test]
fn repeated_character_without_phrase_entry() {
    assert_eq!(
        pairs(get("哥哥")),
        [('哥', some("go1")), ('哥', some("go1"))]
    );
}

#[test]
fn longer_phrase_wins_over_single_characters() {
    // 行 alone prefers hang4; inside 銀行 it must read hong4
    assert_eq!(pairs(get("行")), [('行', some("hang4"))]);
    assert_eq!(
        pairs(get("銀行")),
        [('銀', some("ngan4")), ('行', some("hong4"))]
    );
    assert_eq!(
        pairs(get("我係香港人")),
        [
            ('我', some("ngo5")),
            ('係', some("hai6")),
            ('香', some("hoeng1")),
            ('港', some("gong2")),
            ('人', some("jan4")),
        ]
    );
    assert_eq!(
        pairs(get("好學生")),
        [('好', some("hou3")), ('學', some("hok6")), ('生', some("saang1"))]
    );
}

#[test]
fn text_outside_the_dictionary_is_absent() {
    assert!(get("").is_empty());
    assert!(get_all("").is_empty());
    assert_eq!(
        pairs(get("abc，好")),
        [
            ('a', None),
            ('b', None),
            ('c', None),
            ('，', None),
            ('好', some("hou2")),
        ]
    );
    assert!(get("😀\u{0}").iter().all(|r| r.jyutping.is_none()));
}

#[test]
fn get_all_for_a_single_character() {
    let all = get_all("好");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].character, '好');
    assert_eq!(all[0].candidates, ["hou2", "hou3"]);
}

#[test]
fn get_all_puts_longest_match_readings_first() {
    let all = get_all("音樂");
    assert_eq!(all[1].candidates, ["ngok6", "lok6"]);
    let all = get_all("快樂");
    assert_eq!(all[1].candidates, ["lok6", "ngok6"]);
}

#[test]
fn get_all_contains_every_get_reading() {
    for text in [
        "我係香港人",
        "好學生",
        "佢去銀行食飯",
        "重要嘅廣東話",
        "大家講粵語乜嘢",
        "行人行",
    ] {
        let best = get(text);
        let all = get_all(text);
        assert_eq!(best.len(), all.len());
        for (reading, candidates) in best.iter().zip(&all) {
            assert_eq!(reading.character, candidates.character);
            if let Some(jyutping) = &reading.jyutping {
                let set: HashSet<&String> = candidates.candidates.iter().collect();
                assert!(set.contains(jyutping), "{text}: {jyutping}");
            }
        }
    }
}

#[test]
fn customization_leaves_the_shared_dictionary_alone() {
    let custom = customize([("好", "hou3")]);
    assert_eq!(
        pairs(custom.get("你好")),
        [('你', some("nei5")), ('好', some("hou3"))]
    );
    assert_eq!(
        pairs(get("你好")),
        [('你', some("nei5")), ('好', some("hou2"))]
    );
    assert_eq!(
        pairs(Dictionary::global().get("你好")),
        [('你', some("nei5")), ('好', some("hou2"))]
    );
}

#[test]
fn suppressed_key_reads_as_absent() {
    let custom = customize([("好", Override::Suppressed)]);
    assert_eq!(pairs(custom.get("好")), [('好', None)]);
    assert!(custom.get_all("好")[0].candidates.is_empty());
    assert_eq!(pairs(get("好")), [('好', some("hou2"))]);

    // suppressing a phrase exposes the single-character readings underneath
    let custom = customize([("銀行", Override::Suppressed)]);
    assert_eq!(
        pairs(custom.get("銀行")),
        [('銀', some("ngan4")), ('行', some("hang4"))]
    );
}

#[test]
fn customized_phrase_takes_part_in_longest_match() {
    let custom = customize([("好耐", vec!["hou2 noi6".to_string()])]);
    assert_eq!(
        pairs(custom.get("好耐冇見")),
        [
            ('好', some("hou2")),
            ('耐', some("noi6")),
            ('冇', None),
            ('見', None),
        ]
    );
    let stacked = custom.customize([("冇見", "mou5 gin3")]);
    assert_eq!(
        pairs(stacked.get("好耐冇見")),
        [
            ('好', some("hou2")),
            ('耐', some("noi6")),
            ('冇', some("mou5")),
            ('見', some("gin3")),
        ]
    );
    assert_eq!(pairs(custom.get("冇見")), [('冇', None), ('見', None)]);
}

#[test]
fn isolated_tries_do_not_touch_the_global_one() {
    let own = Dictionary::from(Trie::from_entries([("好", "hou3")]));
    assert_eq!(pairs(own.get("好")), [('好', some("hou3"))]);
    assert_eq!(pairs(get("好")), [('好', some("hou2"))]);
}

#[test]
fn codec_round_trip_over_the_whole_range() {
    assert_eq!(codec::decode(0), "aa1");
    for id in 0..codec::ID_LIMIT {
        let syllable = codec::decode(id);
        assert_eq!(
            syllable.chars().filter(|c| ('1'..='6').contains(c)).count(),
            1
        );
        assert_eq!(codec::encode(&syllable), Some(id));
    }
}
