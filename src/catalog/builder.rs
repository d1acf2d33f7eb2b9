use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::catalog::corpus::Corpus;
use crate::catalog::{Category, Exercise, Level, Track};

const HOME_ROW_CHARS: &[char] = &['f', 'j', 'd', 'k', 's', 'l', 'a', ';'];

const SIMPLE_WORDS: &[&str] = &[
    "the", "and", "for", "but", "can", "get", "big", "red", "hot", "run", "eat", "sit", "dog",
    "cat", "sun", "man", "day", "yes", "no",
];

/// Target length of a problem-key drill, in characters.
const DRILL_TARGET_CHARS: usize = 150;

/// Cap on snippet concatenation so a degenerate corpus cannot loop forever.
const MAX_SNIPPET_APPENDS: usize = 100;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Every exercise is generated from an RNG seeded by its track name and
/// index, so "Advanced: Exercise 37" is the same text on every run and a
/// milestone marks a specific text as completed, not a roll of the dice.
fn exercise_rng(track: Track, index: usize) -> SmallRng {
    let mut hasher = DefaultHasher::new();
    track.name().hash(&mut hasher);
    index.hash(&mut hasher);
    SmallRng::seed_from_u64(hasher.finish())
}

/// Builds practice texts from the embedded corpus.
pub struct ExerciseBuilder<'a> {
    corpus: &'a Corpus,
}

impl<'a> ExerciseBuilder<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    pub fn level_exercise(&self, level: Level, index: usize) -> Exercise {
        let track = Track::Level(level);
        let mut rng = exercise_rng(track, index);
        let min_words = level.min_words();

        let text = if level == Level::Beginner && index < 10 {
            home_row_drill(&mut rng, min_words)
        } else if level == Level::Beginner && index < 20 {
            simple_word_text(&mut rng, min_words)
        } else if level.is_programmer() {
            concatenated_text(&mut rng, self.corpus.programmer(), min_words)
        } else {
            concatenated_text(&mut rng, self.corpus.general(), min_words)
        };

        Exercise { track, index, text }
    }

    pub fn category_exercise(&self, category: Category, index: usize) -> Exercise {
        let track = Track::Category(category);
        let mut rng = exercise_rng(track, index);
        let text = concatenated_text(&mut rng, self.corpus.general(), track.min_words());
        Exercise { track, index, text }
    }

    /// Prose for a timed test: enough words that the text outlasts the
    /// timer even for a very fast typist (twice a 150 WPM pace).
    pub fn timed_test_text(&self, minutes: u32) -> String {
        let mut rng = SmallRng::from_entropy();
        let target_words = 150 * minutes as usize * 2;
        concatenated_text(&mut rng, self.corpus.general(), target_words)
    }

    /// Drill built from the user's most-missed keys, grouped in fives so
    /// the text reads as "words" of the problem characters.
    pub fn problem_key_drill(&self, keys: &[char]) -> String {
        if keys.is_empty() {
            return String::new();
        }
        let mut rng = SmallRng::from_entropy();
        let mut text = String::new();
        while text.len() < DRILL_TARGET_CHARS {
            for _ in 0..5 {
                text.push(keys[rng.gen_range(0..keys.len())]);
            }
            text.push(' ');
        }
        text.trim_end().to_string()
    }
}

/// Home-row character groups, five keys then a space.
fn home_row_drill(rng: &mut SmallRng, min_words: usize) -> String {
    let total_chars = min_words * 6;
    let mut text = String::new();
    for j in 0..total_chars {
        text.push(HOME_ROW_CHARS[rng.gen_range(0..HOME_ROW_CHARS.len())]);
        if j % 5 == 4 && j < total_chars - 1 {
            text.push(' ');
        }
    }
    text
}

fn simple_word_text(rng: &mut SmallRng, min_words: usize) -> String {
    let mut text = String::new();
    while word_count(&text) < min_words {
        text.push_str(SIMPLE_WORDS[rng.gen_range(0..SIMPLE_WORDS.len())]);
        text.push(' ');
    }
    text.trim_end().to_string()
}

/// Concatenate random source texts until the minimum word count is met.
/// Snippets ending in a newline keep it as the separator; otherwise a space.
fn concatenated_text(rng: &mut SmallRng, source: &[String], min_words: usize) -> String {
    if source.is_empty() {
        return String::new();
    }
    let mut text = String::new();
    let mut appends = 0;
    while word_count(&text) < min_words && appends < MAX_SNIPPET_APPENDS {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push(' ');
        }
        text.push_str(&source[rng.gen_range(0..source.len())]);
        appends += 1;
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_corpus() -> Corpus {
        Corpus::load()
    }

    #[test]
    fn test_level_exercises_are_deterministic() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let first = builder.level_exercise(Level::Advanced, 37);
        let second = builder.level_exercise(Level::Advanced, 37);
        assert_eq!(first.text, second.text);
        // Different indexes must produce different texts
        let other = builder.level_exercise(Level::Advanced, 38);
        assert_ne!(first.text, other.text);
    }

    #[test]
    fn test_levels_with_same_index_differ() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let pro = builder.level_exercise(Level::Pro, 50);
        let master = builder.level_exercise(Level::Master, 50);
        assert_ne!(pro.text, master.text);
    }

    #[test]
    fn test_exercises_meet_minimum_word_count() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        for level in Level::GENERAL.iter().chain(Level::PROGRAMMER.iter()) {
            let exercise = builder.level_exercise(*level, 25);
            assert!(
                word_count(&exercise.text) >= level.min_words(),
                "{level} exercise too short"
            );
        }
    }

    #[test]
    fn test_beginner_first_ten_are_home_row_drills() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        for index in 0..10 {
            let exercise = builder.level_exercise(Level::Beginner, index);
            assert!(
                exercise
                    .text
                    .chars()
                    .all(|c| c == ' ' || HOME_ROW_CHARS.contains(&c)),
                "unexpected char in drill {index}"
            );
            // Groups of five
            assert!(exercise.text.split(' ').all(|group| group.len() == 5));
        }
    }

    #[test]
    fn test_beginner_second_ten_use_simple_words() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        for index in 10..20 {
            let exercise = builder.level_exercise(Level::Beginner, index);
            assert!(word_count(&exercise.text) >= 40);
            assert!(
                exercise
                    .text
                    .split_whitespace()
                    .all(|w| SIMPLE_WORDS.contains(&w))
            );
        }
    }

    #[test]
    fn test_beginner_later_exercises_are_prose() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let exercise = builder.level_exercise(Level::Beginner, 20);
        assert!(exercise.text.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_programmer_exercises_draw_from_snippets() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let exercise = builder.level_exercise(Level::SqlAndGit, 5);
        assert!(exercise.text.contains("//") || exercise.text.contains(';'));
    }

    #[test]
    fn test_category_exercises_are_deterministic_prose() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let first = builder.category_exercise(Category::HistoryCulture, 12);
        let second = builder.category_exercise(Category::HistoryCulture, 12);
        assert_eq!(first.text, second.text);
        assert!(word_count(&first.text) >= 40);
    }

    #[test]
    fn test_timed_test_text_outlasts_the_timer() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        for minutes in [1, 3, 5] {
            let text = builder.timed_test_text(minutes);
            assert!(word_count(&text) >= 150 * minutes as usize * 2);
        }
    }

    #[test]
    fn test_problem_key_drill_uses_only_given_keys() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        let drill = builder.problem_key_drill(&['q', 'z', 'x']);
        // 25 groups of five plus separating spaces
        assert_eq!(drill.len(), 149);
        assert!(
            drill
                .chars()
                .all(|c| c == ' ' || c == 'q' || c == 'z' || c == 'x')
        );
        assert!(drill.split(' ').all(|group| group.len() == 5));
    }

    #[test]
    fn test_problem_key_drill_empty_keys() {
        let corpus = builder_corpus();
        let builder = ExerciseBuilder::new(&corpus);
        assert!(builder.problem_key_drill(&[]).is_empty());
    }
}
