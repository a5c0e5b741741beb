use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use tracing_subscriber::EnvFilter;
use yue_annotator::{encoder, loader, Trie};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("dict-encoder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Encode a key/reading TSV into the compact Jyutping dictionary format")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("TSV")
                .default_value("data/jyutping.tsv")
                .help("Lines of `key<TAB>reading`; the first reading per key is preferred"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .default_value("data/jyutping.txt")
                .help("Where to write the compact dictionary"),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .context("missing --input")?;
    let output = matches
        .get_one::<String>("output")
        .context("missing --output")?;

    println!("Dictionary Encoder - Creating compact dictionary");
    println!("Loading {input}...");

    let file = File::open(input).with_context(|| format!("Failed to open {input}"))?;
    let trie = read_entries(BufReader::new(file))
        .with_context(|| format!("Failed to read entries from {input}"))?;

    println!("Encoding {} entries...", trie.entry_count());
    let encoded = encoder::serialize(&trie).context("Failed to encode dictionary")?;

    // the loader must see exactly what we built
    let reloaded = loader::parse(&encoded).context("Encoded dictionary does not parse")?;
    if reloaded.entry_count() != trie.entry_count() {
        bail!(
            "Encoded dictionary reloads with {} entries, expected {}",
            reloaded.entry_count(),
            trie.entry_count()
        );
    }

    fs::write(output, &encoded).with_context(|| format!("Failed to write {output}"))?;

    println!("\nEncoding Complete!");
    println!("Statistics:");
    println!("  Keys with readings: {}", trie.entry_count());
    println!("  Trie nodes: {}", trie.len());
    println!("  Maximum key length: {}", trie.max_key_length());
    println!("  Encoded size: {} bytes", encoded.len());
    println!("\nGenerated files:");
    println!("  - {output}");

    Ok(())
}

fn read_entries(reader: impl BufRead) -> Result<Trie> {
    let mut trie = Trie::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, reading)) = line.split_once('\t') else {
            bail!("line {}: expected `key<TAB>reading`", number + 1);
        };
        trie.insert(key, reading.trim());
    }
    Ok(trie)
}
