//! Grapheme-to-phoneme backends.
//!
//! Every backend implements [`Phonemizer`](crate::pipeline::traits::Phonemizer)
//! and returns one whitespace-delimited phoneme group per spoken word, with
//! stress marks and punctuation removed.

pub mod espeak;
pub mod lexicon;

pub use espeak::EspeakPhonemizer;
pub use lexicon::LexiconPhonemizer;

/// Primary and secondary stress, tie bars and linking marks.
const STRIPPED_MARKS: [char; 5] = ['ˈ', 'ˌ', '\u{0361}', '\u{035C}', '‿'];

fn is_stripped(c: char) -> bool {
    c.is_ascii_punctuation()
        || STRIPPED_MARKS.contains(&c)
        || matches!(c, '“' | '”' | '‘' | '’' | '—' | '–' | '…' | '«' | '»' | '¡' | '¿')
}

/// Removes stress and punctuation from raw phonemizer output, keeping one
/// space between word groups and dropping groups left empty.
pub fn clean_phoneme_output(raw: &str) -> String {
    raw.split_whitespace()
        .map(|group| group.chars().filter(|&c| !is_stripped(c)).collect::<String>())
        .filter(|group| !group.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_stress_and_punctuation() {
        assert_eq!(clean_phoneme_output("ðə kˈæt sˈæt."), "ðə kæt sæt");
        assert_eq!(clean_phoneme_output("hɛlˈoʊ, wˈɜːld!"), "hɛloʊ wɜːld");
    }

    #[test]
    fn joins_lines_and_drops_empty_groups() {
        assert_eq!(clean_phoneme_output(" ðə kˈæt\n , sˈæt \n"), "ðə kæt sæt");
    }

    #[test]
    fn strips_tie_bars() {
        assert_eq!(clean_phoneme_output("t\u{0361}ʃɜːtʃ"), "tʃɜːtʃ");
    }

    #[test]
    fn keeps_length_marks() {
        assert_eq!(clean_phoneme_output("sˈiː"), "siː");
    }
}
