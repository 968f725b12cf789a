//! Picking a font for a string by its script

/// Maps text to a two-letter language code
pub trait LanguageClassifier {
    fn detect(&self, text: &str) -> String;
}

/// Classifies by Unicode block: any Hangul makes a string Korean
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptClassifier;

fn is_hangul(ch: char) -> bool {
    matches!(ch,
        '\u{AC00}'..='\u{D7A3}'   // syllables
        | '\u{1100}'..='\u{11FF}' // jamo
        | '\u{3130}'..='\u{318F}' // compatibility jamo
        | '\u{A960}'..='\u{A97F}' // jamo extended-A
        | '\u{D7B0}'..='\u{D7FF}' // jamo extended-B
    )
}

impl LanguageClassifier for ScriptClassifier {
    fn detect(&self, text: &str) -> String {
        if text.chars().any(is_hangul) {
            "ko".to_string()
        } else {
            "en".to_string()
        }
    }
}

/// Chooses between a Latin and a Korean font for each string
#[derive(Debug, Clone)]
pub struct FontChooser<C = ScriptClassifier> {
    pub latin: String,
    pub korean: String,
    classifier: C,
}

impl FontChooser<ScriptClassifier> {
    pub fn new(latin: impl Into<String>, korean: impl Into<String>) -> Self {
        Self::with_classifier(latin, korean, ScriptClassifier)
    }
}

impl<C: LanguageClassifier> FontChooser<C> {
    pub fn with_classifier(latin: impl Into<String>, korean: impl Into<String>, classifier: C) -> Self {
        Self {
            latin: latin.into(),
            korean: korean.into(),
            classifier,
        }
    }

    pub fn font_for(&self, text: &str) -> &str {
        if self.classifier.detect(text) == "ko" {
            &self.korean
        } else {
            &self.latin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_classifier() {
        let classifier = ScriptClassifier;
        assert_eq!(classifier.detect("Sunday Worship"), "en");
        assert_eq!(classifier.detect("주일 예배"), "ko");
        assert_eq!(classifier.detect("Choir 찬양대"), "ko");
        assert_eq!(classifier.detect("ㅎ"), "ko");
        assert_eq!(classifier.detect(""), "en");
        // Han ideographs alone are not Korean
        assert_eq!(classifier.detect("日本語"), "en");
    }

    #[test]
    fn test_font_chooser() {
        let chooser = FontChooser::new("Helvetica", "Korean");
        assert_eq!(chooser.font_for("Ministries"), "Helvetica");
        assert_eq!(chooser.font_for("사역자"), "Korean");
    }

    struct AlwaysKorean;

    impl LanguageClassifier for AlwaysKorean {
        fn detect(&self, _text: &str) -> String {
            "ko".into()
        }
    }

    #[test]
    fn test_custom_classifier() {
        let chooser = FontChooser::with_classifier("Helvetica", "Korean", AlwaysKorean);
        assert_eq!(chooser.font_for("Ministries"), "Korean");
    }
}
