use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use reading_tutor_rs::{Report, TurnReport};

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    for turn in &report.turns {
        render_turn(&mut out, turn);
    }

    let summary = &report.session.summary;
    let stats = &report.session.stats;
    let _ = writeln!(out, "== session ==");
    let _ = writeln!(
        out,
        "accuracy: {:.1}% ({}/{} words)",
        summary.accuracy_percent, summary.total_correct_words, summary.total_expected_words
    );
    let _ = writeln!(out, "speed: {:.1} words per minute", summary.words_per_minute);
    let _ = writeln!(
        out,
        "stars: {}{}",
        "*".repeat(summary.stars as usize),
        "-".repeat(5usize.saturating_sub(summary.stars as usize))
    );
    let _ = writeln!(out, "{}", report.session.encouragement);
    let _ = writeln!(
        out,
        "stats: student={} speed={:.1} accuracy={:.1} date={}",
        stats.student_id, stats.average_speed_wpm, stats.average_accuracy, stats.date
    );
    out
}

fn render_turn(out: &mut String, turn: &TurnReport) {
    let _ = writeln!(out, "== {} ==", turn.id);
    let _ = writeln!(out, "{}", turn.markup);
    if !turn.feedback.is_empty() {
        let _ = writeln!(out, "{}", turn.feedback);
    }
    for item in &turn.review {
        let _ = writeln!(out, "  practise '{}' /{}/", item.word, item.expected_phonemes);
    }
    for note in &turn.notes {
        let _ = writeln!(out, "  note: {note}");
    }
    let _ = writeln!(out);
}

pub fn write_text(path: &Path, text: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    fs::write(path, text)
        .map_err(|err| format!("Failed to write text report '{}': {err}", path.display()))
}
