use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, Utc};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use reading_tutor_rs::{
    build_report, compute_turn_report, split_sentences, EspeakPhonemizer, LexiconPhonemizer, Meta,
    Phonemizer, ReadingScorer, ReadingScorerBuilder, ScoringConfig, SessionReport, SessionStats,
    TurnReport, TurnSource,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[path = "reading_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "reading_report/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    /// Plain-text feedback per turn followed by the session summary.
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "reading_report")]
#[command(about = "Score read-aloud turns against their expected text and summarize the session")]
struct Args {
    /// Pre-split turns (JSON array of `{id, expected_text, recognized_phonemes, elapsed_ms}`).
    #[arg(
        long,
        env = "READING_REPORT_TURNS",
        required_unless_present = "story",
        conflicts_with = "story"
    )]
    turns: Option<PathBuf>,
    /// Plain-text story, split into one turn per sentence.
    #[arg(long, env = "READING_REPORT_STORY", requires = "readings")]
    story: Option<PathBuf>,
    /// One `{recognized_phonemes, elapsed_ms}` entry per story sentence (JSON array).
    #[arg(long, env = "READING_REPORT_READINGS")]
    readings: Option<PathBuf>,
    /// Word-to-phoneme lexicon (JSON object). Without it espeak-ng is used.
    #[arg(long, env = "READING_REPORT_LEXICON")]
    lexicon: Option<PathBuf>,
    #[arg(
        long,
        env = "READING_REPORT_LANGUAGE",
        default_value = ScoringConfig::DEFAULT_LANGUAGE
    )]
    language: String,
    #[arg(long, env = "READING_REPORT_SUBSTITUTIONS")]
    substitutions: Option<PathBuf>,
    #[arg(
        long,
        env = "READING_REPORT_THRESHOLD",
        default_value_t = ScoringConfig::DEFAULT_CORRECT_THRESHOLD
    )]
    threshold: f32,
    #[arg(long, env = "READING_REPORT_NO_FINAL_WORD_FLAG", default_value_t = false)]
    no_final_word_flag: bool,
    #[arg(long, env = "READING_REPORT_STUDENT_ID", default_value = "anonymous")]
    student_id: String,
    #[arg(
        long,
        env = "READING_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    #[arg(long, env = "READING_REPORT_OUT")]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct Turn {
    id: String,
    expected_text: String,
    recognized_phonemes: String,
    #[serde(default)]
    elapsed_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Reading {
    recognized_phonemes: String,
    #[serde(default)]
    elapsed_ms: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let turns = match (args.turns.as_ref(), args.story.as_ref(), args.readings.as_ref()) {
        (Some(turns_path), _, _) => load_turns(&resolve_path(&repo_root, turns_path))?,
        (None, Some(story_path), Some(readings_path)) => load_story_turns(
            &resolve_path(&repo_root, story_path),
            &resolve_path(&repo_root, readings_path),
        )?,
        _ => return Err("Either --turns or --story with --readings is required.".to_string()),
    };
    if turns.is_empty() {
        return Err("No turns to score.".to_string());
    }

    let scorer = build_scorer(&args, &repo_root)?;
    let mut session = scorer.start_session();
    let mut turn_reports: Vec<TurnReport> = Vec::with_capacity(turns.len());

    let progress = ProgressBar::new(turns.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    for turn in &turns {
        progress.set_message(turn.id.clone());
        let elapsed = Duration::from_millis(turn.elapsed_ms.unwrap_or(0));
        let result = scorer
            .score_turn(
                &mut session,
                &turn.expected_text,
                &turn.recognized_phonemes,
                elapsed,
            )
            .map_err(|err| format!("{}: scoring failed: {err}", turn.id))?;
        let review = scorer
            .review_queue(&result.assessments)
            .map_err(|err| format!("{}: review queue failed: {err}", turn.id))?;
        let source = TurnSource {
            id: &turn.id,
            expected_text: &turn.expected_text,
            recognized_phonemes: &turn.recognized_phonemes,
            elapsed_ms: turn.elapsed_ms,
        };
        let report = compute_turn_report(&source, &result, review, scorer.correct_threshold())
            .map_err(|err| format!("{}: {err}", turn.id))?;
        turn_reports.push(report);
        progress.inc(1);
    }
    progress.finish_with_message("scoring pass complete");

    let summary = session.finish();
    let encouragement = summary.encouragement(&mut rand::thread_rng()).to_string();
    let stats = SessionStats::from_summary(
        args.student_id.clone(),
        &summary,
        Local::now().date_naive(),
    );
    let report = build_report(
        Meta {
            generated_at: Utc::now().to_rfc3339(),
            phonemizer: scorer.phonemizer_name().to_string(),
            correct_threshold: scorer.correct_threshold(),
            flag_final_word: scorer.flag_final_word(),
            turn_count: turn_reports.len(),
        },
        turn_reports,
        SessionReport {
            summary,
            encouragement,
            stats,
        },
    );

    match args.output_format {
        OutputFormat::Json => {
            let out_path = resolve_out_path(&repo_root, args.out.as_ref());
            json_report_formatter::write_report(&out_path, &report)?;
            println!("{}", out_path.display());
        }
        OutputFormat::Text => {
            let text = text_report_formatter::render_report(&report);
            match args.out.as_ref() {
                Some(path) => {
                    let out_path = resolve_path(&repo_root, path);
                    text_report_formatter::write_text(&out_path, &text)?;
                    println!("{}", out_path.display());
                }
                None => print!("{text}"),
            }
        }
    }
    Ok(())
}

fn build_scorer(args: &Args, repo_root: &Path) -> Result<ReadingScorer, String> {
    let substitution_table_path = match args.substitutions.as_ref() {
        Some(path) => {
            let path = resolve_path(repo_root, path);
            require_path_exists(&path, "Missing substitution table.")?;
            path.to_string_lossy().into_owned()
        }
        None => String::new(),
    };
    let config = ScoringConfig {
        correct_threshold: args.threshold,
        flag_final_word: !args.no_final_word_flag,
        language: args.language.clone(),
        substitution_table_path,
        ..ScoringConfig::default()
    };

    let phonemizer: Box<dyn Phonemizer> = match args.lexicon.as_ref() {
        Some(path) => {
            let path = resolve_path(repo_root, path);
            require_path_exists(&path, "Missing pronunciation lexicon.")?;
            Box::new(
                LexiconPhonemizer::load(&path)
                    .map_err(|err| format!("Failed to load lexicon: {err}"))?,
            )
        }
        None => Box::new(EspeakPhonemizer::new(args.language.clone())),
    };

    ReadingScorerBuilder::new(config)
        .with_phonemizer(phonemizer)
        .build()
        .map_err(|err| format!("Failed to build ReadingScorer: {err}"))
}

fn load_turns(path: &Path) -> Result<Vec<Turn>, String> {
    require_path_exists(path, "Missing turns file.")?;
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read turns file '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("Failed to parse turns file '{}': {err}", path.display()))
}

fn load_story_turns(story_path: &Path, readings_path: &Path) -> Result<Vec<Turn>, String> {
    require_path_exists(story_path, "Missing story file.")?;
    require_path_exists(readings_path, "Missing readings file.")?;
    let story = fs::read_to_string(story_path)
        .map_err(|err| format!("Failed to read story '{}': {err}", story_path.display()))?;
    let raw = fs::read_to_string(readings_path).map_err(|err| {
        format!(
            "Failed to read readings file '{}': {err}",
            readings_path.display()
        )
    })?;
    let readings: Vec<Reading> = serde_json::from_str(&raw).map_err(|err| {
        format!(
            "Failed to parse readings file '{}': {err}",
            readings_path.display()
        )
    })?;
    story_turns(&story, readings)
}

/// Pairs every sentence of the story with the reading recorded for it.
fn story_turns(story: &str, readings: Vec<Reading>) -> Result<Vec<Turn>, String> {
    let sentences = split_sentences(story);
    if sentences.len() != readings.len() {
        return Err(format!(
            "Story has {} sentence(s) but {} reading(s) were given.",
            sentences.len(),
            readings.len()
        ));
    }
    Ok(sentences
        .into_iter()
        .zip(readings)
        .enumerate()
        .map(|(idx, (sentence, reading))| Turn {
            id: format!("sentence-{}", idx + 1),
            expected_text: sentence.to_string(),
            recognized_phonemes: reading.recognized_phonemes,
            elapsed_ms: reading.elapsed_ms,
        })
        .collect())
}

fn resolve_out_path(repo_root: &Path, out: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = out {
        return resolve_path(repo_root, path);
    }

    let run_id = Utc::now().format("%Y%m%dT%H%M%SZ");
    repo_root
        .join("target")
        .join("reading_reports")
        .join(format!("reading-report-{run_id}.json"))
}

fn resolve_path(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(recognized: &str) -> Reading {
        Reading {
            recognized_phonemes: recognized.to_string(),
            elapsed_ms: Some(2000),
        }
    }

    #[test]
    fn story_becomes_one_turn_per_sentence() {
        let turns = story_turns(
            "The cat sat.  I can see the dog!\n",
            vec![reading("ðəkætsæt"), reading("aɪkænsiːðədɔɡ")],
        )
        .unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].id, "sentence-1");
        assert_eq!(turns[0].expected_text, "The cat sat.");
        assert_eq!(turns[1].expected_text, "I can see the dog!");
        assert_eq!(turns[1].recognized_phonemes, "aɪkænsiːðədɔɡ");
    }

    #[test]
    fn story_reading_count_must_match_sentences() {
        let err = story_turns("One. Two.", vec![reading("wʌn")]).unwrap_err();
        assert!(err.contains("2 sentence(s) but 1 reading(s)"));
    }
}
