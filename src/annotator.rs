// Renders lookup results as annotated text
use crate::customize::Dictionary;
use crate::lookup::{CharCandidates, CharReading};
use crate::trie::Lexicon;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    pub output_format: OutputFormat,
    pub show_alternatives: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Inline,   // 我(ngo5)係(hai6)
    Json,     // {"characters": [{"character": "我", "jyutping": "ngo5"}]}
    Brackets, // 我[ngo5]係[hai6]
    Ruby,     // <ruby>我<rt>ngo5</rt></ruby>
    Table,    // Tabular format for analysis
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(OutputFormat::Inline),
            "json" => Ok(OutputFormat::Json),
            "brackets" => Ok(OutputFormat::Brackets),
            "ruby" => Ok(OutputFormat::Ruby),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Inline,
            show_alternatives: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedChar {
    pub character: char,
    pub jyutping: Option<String>,
    /// Other readings offered for this character, excluding `jyutping`.
    pub alternatives: Vec<String>,
    pub position: usize,
}

pub struct Annotator {
    dictionary: Dictionary,
    config: AnnotationConfig,
}

impl Annotator {
    pub fn new(dictionary: Dictionary, config: AnnotationConfig) -> Self {
        Self { dictionary, config }
    }

    pub fn annotate(&self, text: &str) -> Vec<AnnotatedChar> {
        let readings = self.dictionary.get(text);
        let alternatives: Vec<Vec<String>> = if self.config.show_alternatives {
            self.dictionary
                .get_all(text)
                .into_iter()
                .map(|c| c.candidates)
                .collect()
        } else {
            vec![Vec::new(); readings.len()]
        };

        readings
            .into_iter()
            .zip(alternatives)
            .enumerate()
            .map(|(position, (CharReading { character, jyutping }, mut others))| {
                if let Some(chosen) = &jyutping {
                    others.retain(|candidate| candidate != chosen);
                }
                AnnotatedChar {
                    character,
                    jyutping,
                    alternatives: others,
                    position,
                }
            })
            .collect()
    }

    /// Per-character candidate lists, one line each.
    pub fn candidates(&self, text: &str) -> String {
        let mut result = String::new();
        for CharCandidates {
            character,
            candidates,
        } in self.dictionary.get_all(text)
        {
            if candidates.is_empty() {
                result.push_str(&format!("{character}\t-\n"));
            } else {
                result.push_str(&format!("{character}\t{}\n", candidates.join(" ")));
            }
        }
        result
    }

    pub fn format_output(&self, chars: &[AnnotatedChar]) -> String {
        match self.config.output_format {
            OutputFormat::Inline => self.format_inline(chars),
            OutputFormat::Json => self.format_json(chars),
            OutputFormat::Brackets => self.format_brackets(chars),
            OutputFormat::Ruby => self.format_ruby(chars),
            OutputFormat::Table => self.format_table(chars),
        }
    }

    fn format_inline(&self, chars: &[AnnotatedChar]) -> String {
        let mut result = String::new();

        for annotated in chars {
            result.push(annotated.character);
            let Some(jyutping) = &annotated.jyutping else {
                continue;
            };
            result.push('(');
            result.push_str(jyutping);
            if self.config.show_alternatives && !annotated.alternatives.is_empty() {
                result.push('|');
                result.push_str(&annotated.alternatives.join("|"));
            }
            result.push(')');
        }

        result
    }

    fn format_json(&self, chars: &[AnnotatedChar]) -> String {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            characters: &'a [AnnotatedChar],
            metadata: JsonMetadata,
        }

        #[derive(Serialize)]
        struct JsonMetadata {
            total_characters: usize,
            annotated_characters: usize,
        }

        let output = JsonOutput {
            characters: chars,
            metadata: JsonMetadata {
                total_characters: chars.len(),
                annotated_characters: chars.iter().filter(|c| c.jyutping.is_some()).count(),
            },
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_brackets(&self, chars: &[AnnotatedChar]) -> String {
        let mut result = String::new();

        for annotated in chars {
            result.push(annotated.character);
            if let Some(jyutping) = &annotated.jyutping {
                result.push('[');
                result.push_str(jyutping);
                result.push(']');
            }
        }

        result
    }

    fn format_ruby(&self, chars: &[AnnotatedChar]) -> String {
        let mut result = String::new();

        for annotated in chars {
            match &annotated.jyutping {
                Some(jyutping) => {
                    result.push_str("<ruby>");
                    result.push(annotated.character);
                    result.push_str("<rt>");
                    result.push_str(jyutping);
                    result.push_str("</rt></ruby>");
                }
                None => result.push(annotated.character),
            }
        }

        result
    }

    fn format_table(&self, chars: &[AnnotatedChar]) -> String {
        let mut result = String::new();
        result.push_str("Position\tCharacter\tJyutping\tAlternatives\n");

        for annotated in chars {
            result.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                annotated.position,
                annotated.character,
                annotated.jyutping.as_deref().unwrap_or("-"),
                annotated.alternatives.join("|")
            ));
        }

        result
    }
}
