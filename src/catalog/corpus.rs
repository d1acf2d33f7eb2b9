const GENERAL_TEXTS: &str = include_str!("../../assets/texts/general.json");
const PROGRAMMER_SNIPPETS: &str = include_str!("../../assets/texts/programmer.json");

/// Practice texts embedded in the binary: prose passages for the general
/// levels and categories, code snippets (with literal newlines and tabs)
/// for the programmer track.
pub struct Corpus {
    general: Vec<String>,
    programmer: Vec<String>,
}

impl Corpus {
    pub fn load() -> Self {
        let general: Vec<String> = serde_json::from_str(GENERAL_TEXTS).unwrap_or_default();
        let programmer: Vec<String> = serde_json::from_str(PROGRAMMER_SNIPPETS).unwrap_or_default();
        Self {
            general,
            programmer,
        }
    }

    pub fn general(&self) -> &[String] {
        &self.general
    }

    pub fn programmer(&self) -> &[String] {
        &self.programmer
    }
}
