use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::io::{self, Read};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yue_annotator::annotator::{AnnotationConfig, Annotator};
use yue_annotator::{loader, parse_custom_mapping, Dictionary};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("yue-annotator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cantonese text annotator with Jyutping pronunciations")
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Chinese text to annotate")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("File containing Chinese text to annotate")
                .conflicts_with("text"),
        )
        .arg(
            Arg::new("stdin")
                .long("stdin")
                .help("Read text from standard input")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with_all(["text", "file"]),
        )
        .arg(
            Arg::new("dict")
                .short('d')
                .long("dict")
                .value_name("PATH")
                .help("Compact dictionary file to use instead of the bundled one"),
        )
        .arg(
            Arg::new("custom")
                .short('c')
                .long("custom")
                .value_name("FILE")
                .help("JSON file of overrides: {\"key\": \"reading\" | [readings] | null}"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .default_value("inline")
                .help("Output format: inline, json, brackets, ruby, table"),
        )
        .arg(
            Arg::new("show-alternatives")
                .long("show-alternatives")
                .help("Show alternative pronunciations")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("candidates")
                .long("candidates")
                .help("List every candidate reading per character instead of annotating")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("examples")
                .long("examples")
                .help("Show usage examples")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("examples") {
        show_examples();
        return Ok(());
    }

    let config = parse_config(&matches);
    let dictionary = load_dictionary(&matches)?;
    let annotator = Annotator::new(dictionary, config);

    let input_text = get_input_text(&matches)?;
    if input_text.trim().is_empty() {
        eprintln!("❌ Error: No input text provided");
        eprintln!("Use --help for usage information");
        return Ok(());
    }

    if matches.get_flag("candidates") {
        print!("{}", annotator.candidates(input_text.trim_end()));
        return Ok(());
    }

    let annotated = annotator.annotate(input_text.trim_end());
    println!("{}", annotator.format_output(&annotated));

    let annotated_count = annotated.iter().filter(|c| c.jyutping.is_some()).count();
    info!(
        characters = annotated.len(),
        annotated = annotated_count,
        "annotation finished"
    );

    Ok(())
}

fn parse_config(matches: &ArgMatches) -> AnnotationConfig {
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("inline");
    let defaults = AnnotationConfig::default();
    let output_format = format.parse().unwrap_or_else(|err| {
        warn!(%err, fallback = ?defaults.output_format, "unrecognized output format");
        defaults.output_format
    });

    AnnotationConfig {
        output_format,
        show_alternatives: matches.get_flag("show-alternatives"),
    }
}

fn load_dictionary(matches: &ArgMatches) -> Result<Dictionary> {
    let base = match matches.get_one::<String>("dict") {
        Some(path) => {
            info!(path = %path, "loading dictionary");
            Dictionary::from(loader::load_path(Path::new(path)))
        }
        None => Dictionary::global(),
    };

    let Some(custom_path) = matches.get_one::<String>("custom") else {
        return Ok(base);
    };
    let json = std::fs::read_to_string(custom_path)
        .with_context(|| format!("Failed to read customization file: {custom_path}"))?;
    let mapping = parse_custom_mapping(&json)
        .with_context(|| format!("Failed to parse customization file: {custom_path}"))?;
    info!(overrides = mapping.len(), "applying customization");
    Ok(base.customize(mapping))
}

fn get_input_text(matches: &ArgMatches) -> Result<String> {
    if let Some(text) = matches.get_one::<String>("text") {
        Ok(text.clone())
    } else if let Some(file_path) = matches.get_one::<String>("file") {
        std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read input file: {file_path}"))
    } else {
        // --stdin, or interactive when nothing else was given
        if !matches.get_flag("stdin") {
            eprintln!("💬 Enter Chinese text to annotate (Ctrl+D to finish):");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

fn show_examples() {
    println!("Cantonese Text Annotator - Usage Examples");
    println!("=========================================\n");

    println!("📝 Basic Usage:");
    println!("  yue-annotator -t \"我係香港人\"");
    println!("  # Output: 我(ngo5)係(hai6)香(hoeng1)港(gong2)人(jan4)\n");

    println!("🎯 Different Output Formats:");
    println!("  yue-annotator -t \"廣東話\" --format json");
    println!("  yue-annotator -t \"廣東話\" --format brackets");
    println!("  yue-annotator -t \"廣東話\" --format ruby");
    println!("  yue-annotator -f input.txt --format table > output.tsv\n");

    println!("🔤 Candidates:");
    println!("  yue-annotator -t \"銀行\" --show-alternatives");
    println!("  # Output: 銀(ngan4)行(hong4|hang4|haang4|hong6)");
    println!("  yue-annotator -t \"行\" --candidates\n");

    println!("⚙️  Customization:");
    println!("  echo '{{\"好\": \"hou3\", \"行\": null}}' > custom.json");
    println!("  yue-annotator -t \"好行\" --custom custom.json\n");

    println!("📚 Dictionaries:");
    println!("  dict-encoder -i words.tsv -o words.txt");
    println!("  yue-annotator -t \"你好\" --dict words.txt\n");

    println!("📄 File Processing:");
    println!("  cat text.txt | yue-annotator --stdin");
    println!("  RUST_LOG=info yue-annotator -f text.txt");
}
