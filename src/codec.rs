//! Packing between Jyutping syllables and the integer ids stored in the dictionary file.
//!
//! An id encodes `onset * 402 + final * 6 + (tone - 1)`. Finals below 54 are a
//! nucleus/coda pair (`final / 9`, `final % 9`); finals 54..67 index the
//! irregular rhyme table.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const ONSETS: [&str; 20] = [
    "", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "ng", "h", "gw", "kw", "w", "z", "c",
    "s", "j",
];
pub const NUCLEI: [&str; 6] = ["aa", "a", "e", "i", "o", "u"];
pub const CODAS: [&str; 9] = ["", "i", "u", "m", "n", "ng", "p", "t", "k"];
pub const IRREGULAR_RHYMES: [&str; 13] = [
    "oe", "oen", "oeng", "oet", "oek", "eoi", "eon", "eot", "yu", "yun", "yut", "m", "ng",
];

const TONES: u16 = 6;
const REGULAR_FINALS: u16 = (NUCLEI.len() * CODAS.len()) as u16;
const FINALS: u16 = REGULAR_FINALS + IRREGULAR_RHYMES.len() as u16;
const ONSET_STRIDE: u16 = FINALS * TONES;

/// One past the largest valid syllable id.
pub const ID_LIMIT: u16 = ONSETS.len() as u16 * ONSET_STRIDE;

/// Base and first code point of the digits that spell an id in the dictionary stream.
pub const DIGIT_BASE: u16 = 90;
pub const DIGIT_OFFSET: u32 = 33;

/// Expand a packed id into its romanized syllable, e.g. `0` into `"aa1"`.
///
/// `id` must be below [`ID_LIMIT`].
pub fn decode(id: u16) -> String {
    debug_assert!(id < ID_LIMIT, "syllable id {id} out of range");
    let tone = id % TONES + 1;
    let final_index = (id % ONSET_STRIDE) / TONES;
    let onset = ONSETS[usize::from(id / ONSET_STRIDE)];

    let mut syllable = String::with_capacity(8);
    syllable.push_str(onset);
    if final_index >= REGULAR_FINALS {
        syllable.push_str(IRREGULAR_RHYMES[usize::from(final_index - REGULAR_FINALS)]);
    } else {
        let per_nucleus = CODAS.len() as u16;
        syllable.push_str(NUCLEI[usize::from(final_index / per_nucleus)]);
        syllable.push_str(CODAS[usize::from(final_index % per_nucleus)]);
    }
    syllable.push(char::from(b'0' + tone as u8));
    syllable
}

/// Like [`decode`], but rejects ids outside the valid range.
pub fn try_decode(id: u16) -> Option<String> {
    (id < ID_LIMIT).then(|| decode(id))
}

/// Pack a syllable back into its id. Returns `None` for anything `decode` cannot produce.
pub fn encode(syllable: &str) -> Option<u16> {
    static IDS: OnceLock<HashMap<String, u16>> = OnceLock::new();
    IDS.get_or_init(|| {
        let mut ids = HashMap::with_capacity(usize::from(ID_LIMIT));
        for id in 0..ID_LIMIT {
            ids.entry(decode(id)).or_insert(id);
        }
        ids
    })
    .get(syllable)
    .copied()
}

/// Value of one stream digit, or `None` if `ch` is not a digit.
pub fn digit_value(ch: char) -> Option<u16> {
    let code = u32::from(ch);
    (DIGIT_OFFSET..DIGIT_OFFSET + u32::from(DIGIT_BASE))
        .contains(&code)
        .then(|| (code - DIGIT_OFFSET) as u16)
}

/// Spell an id as its two stream digits, high digit first.
pub fn to_digits(id: u16) -> [char; 2] {
    let digit = |value: u16| char::from((u32::from(value) + DIGIT_OFFSET) as u8);
    [digit(id / DIGIT_BASE), digit(id % DIGIT_BASE)]
}
