// Runs as its own process: choosing a path races the first use of the shared trie.
use std::io::Write;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::NamedTempFile;
use yue_annotator::{encoder, DictionaryError, Lexicon, Trie};

#[test]
fn accepted_path_is_the_one_the_shared_trie_uses() {
    let mut file = NamedTempFile::new().expect("temp file");
    let encoded = encoder::serialize(&Trie::from_entries([("好", "hou3")])).expect("encodes");
    file.write_all(encoded.as_bytes()).expect("write dictionary");
    let path = file.path().to_path_buf();

    let barrier = Arc::new(Barrier::new(2));
    let reader = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            Trie::global().entry_count()
        })
    };
    let chooser = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            Trie::init_custom_path(path)
        })
    };
    reader.join().expect("reader panicked");
    let chosen = chooser.join().expect("chooser panicked");

    let preferred = Trie::global().entry("好").map(|c| c[0].clone());
    match chosen {
        Ok(()) => {
            assert_eq!(preferred.as_deref(), Some("hou3"));
            assert_eq!(Trie::global().entry_count(), 1);
        }
        Err(DictionaryError::AlreadyInitialized) => {
            assert_eq!(preferred.as_deref(), Some("hou2"));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}
