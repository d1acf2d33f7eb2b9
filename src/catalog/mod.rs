use std::fmt;

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod corpus;

pub use builder::ExerciseBuilder;
pub use corpus::Corpus;

/// Every level and category offers the same fixed number of exercises.
pub const EXERCISES_PER_LEVEL: usize = 100;

/// Skill levels. The first five are prose levels; the last four form the
/// programmer track and draw from the code-snippet corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Pro,
    Master,
    BasicSyntax,
    DataStructures,
    WebDevSnippets,
    SqlAndGit,
}

impl Level {
    pub const GENERAL: [Level; 5] = [
        Level::Beginner,
        Level::Intermediate,
        Level::Advanced,
        Level::Pro,
        Level::Master,
    ];

    pub const PROGRAMMER: [Level; 4] = [
        Level::BasicSyntax,
        Level::DataStructures,
        Level::WebDevSnippets,
        Level::SqlAndGit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Pro => "Pro",
            Level::Master => "Master",
            Level::BasicSyntax => "Basic Syntax",
            Level::DataStructures => "Data Structures",
            Level::WebDevSnippets => "Web Dev Snippets",
            Level::SqlAndGit => "SQL & Git",
        }
    }

    /// Minimum word count per exercise; the difficulty knob.
    pub fn min_words(self) -> usize {
        match self {
            Level::Beginner | Level::BasicSyntax => 40,
            Level::Intermediate | Level::DataStructures => 50,
            Level::Advanced | Level::WebDevSnippets => 60,
            Level::Pro | Level::SqlAndGit => 70,
            Level::Master => 80,
        }
    }

    pub fn is_programmer(self) -> bool {
        matches!(
            self,
            Level::BasicSyntax | Level::DataStructures | Level::WebDevSnippets | Level::SqlAndGit
        )
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Topic categories. All draw from the prose corpus at the base difficulty;
/// the split exists for browsing and separate progress tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ScienceTechnology,
    HistoryCulture,
    NatureEnvironment,
    LiteratureArts,
    RandomFacts,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ScienceTechnology,
        Category::HistoryCulture,
        Category::NatureEnvironment,
        Category::LiteratureArts,
        Category::RandomFacts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::ScienceTechnology => "Science & Technology",
            Category::HistoryCulture => "History & Culture",
            Category::NatureEnvironment => "Nature & Environment",
            Category::LiteratureArts => "Literature & Arts",
            Category::RandomFacts => "Random Facts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A progress-tracked exercise source: either a skill level or a topic
/// category. The name doubles as the key in the progress file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Level(Level),
    Category(Category),
}

impl Track {
    pub fn name(self) -> &'static str {
        match self {
            Track::Level(level) => level.name(),
            Track::Category(category) => category.name(),
        }
    }

    pub fn min_words(self) -> usize {
        match self {
            Track::Level(level) => level.min_words(),
            Track::Category(_) => 40,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable practice text selected before a session starts.
#[derive(Clone, Debug)]
pub struct Exercise {
    pub track: Track,
    pub index: usize,
    pub text: String,
}

impl Exercise {
    pub fn title(&self) -> String {
        format!("{}: Exercise {}", self.track, self.index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names_round_trip_as_track_keys() {
        for level in Level::GENERAL.iter().chain(Level::PROGRAMMER.iter()) {
            assert!(!Track::Level(*level).name().is_empty());
        }
        assert_eq!(Track::Level(Level::SqlAndGit).name(), "SQL & Git");
        assert_eq!(
            Track::Category(Category::ScienceTechnology).name(),
            "Science & Technology"
        );
    }

    #[test]
    fn test_min_words_scale_with_difficulty() {
        let general: Vec<usize> = Level::GENERAL.iter().map(|l| l.min_words()).collect();
        assert_eq!(general, vec![40, 50, 60, 70, 80]);
        let programmer: Vec<usize> = Level::PROGRAMMER.iter().map(|l| l.min_words()).collect();
        assert_eq!(programmer, vec![40, 50, 60, 70]);
        for category in Category::ALL {
            assert_eq!(Track::Category(category).min_words(), 40);
        }
    }

    #[test]
    fn test_exercise_title_is_one_based() {
        let exercise = Exercise {
            track: Track::Level(Level::Beginner),
            index: 0,
            text: String::new(),
        };
        assert_eq!(exercise.title(), "Beginner: Exercise 1");
    }
}
