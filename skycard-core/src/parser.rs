//! Parsing of loosely formatted generative-text answers into structured data.
//!
//! The model is asked to answer with labelled sections (`PLACES:`, `WEAR:`...)
//! but nothing guarantees it does. Every function here is total: malformed
//! input yields emptier documents, never an error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Places,
    Nearby,
    Wear,
    Eat,
    Alert,
}

impl Section {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "PLACES" => Some(Self::Places),
            "NEARBY" => Some(Self::Nearby),
            "WEAR" => Some(Self::Wear),
            "EAT" => Some(Self::Eat),
            "ALERT" => Some(Self::Alert),
            _ => None,
        }
    }
}

/// A named place with an optional one-line description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceDocument {
    pub places: Vec<Place>,
    pub nearby: Vec<Place>,
    pub wear: String,
    pub eat: String,
    /// Raw ALERT text, including literal "None" answers.
    pub alert: String,
}

impl AdviceDocument {
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
            && self.nearby.is_empty()
            && self.wear.is_empty()
            && self.eat.is_empty()
            && self.alert.is_empty()
    }
}

/// Lines collected per section, in the order they appeared.
#[derive(Debug, Default)]
struct SectionLines {
    places: Vec<String>,
    nearby: Vec<String>,
    wear: Vec<String>,
    eat: Vec<String>,
    alert: Vec<String>,
}

impl SectionLines {
    fn lines_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Places => &mut self.places,
            Section::Nearby => &mut self.nearby,
            Section::Wear => &mut self.wear,
            Section::Eat => &mut self.eat,
            Section::Alert => &mut self.alert,
        }
    }
}

pub fn parse_advice(raw: &str) -> AdviceDocument {
    let mut collected = SectionLines::default();
    let mut current: Option<Section> = None;

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some((section, rest)) = split_label(line) {
            current = Some(section);
            let rest = strip_emphasis(rest);
            if !rest.is_empty() {
                collected.lines_mut(section).push(rest);
            }
        } else if let Some(section) = current {
            collected.lines_mut(section).push(line.to_owned());
        }
        // Text before the first label is preamble and dropped.
    }

    AdviceDocument {
        places: collected.places.iter().filter_map(|l| parse_place(l)).collect(),
        nearby: collected.nearby.iter().filter_map(|l| parse_place(l)).collect(),
        wear: join_free_text(&collected.wear),
        eat: join_free_text(&collected.eat),
        alert: join_free_text(&collected.alert),
    }
}

/// Recognises `KEY: rest` where KEY is a known section label, tolerating
/// markdown decoration such as `**PLACES:**` or `## WEAR:`.
fn split_label(line: &str) -> Option<(Section, &str)> {
    let (head, rest) = line.split_once(':')?;
    let label = head.trim_matches(|c: char| c == '*' || c == '#' || c.is_whitespace());
    Section::from_label(label).map(|section| (section, rest))
}

fn strip_emphasis(text: &str) -> String {
    text.replace('*', "").trim().to_owned()
}

fn join_free_text(lines: &[String]) -> String {
    let joined = lines.join(" ");
    strip_emphasis(&joined)
}

/// Parses `N. Name - description` (hyphen or en dash). Lines without that
/// shape become a bare name; lines that clean up to nothing are dropped.
fn parse_place(line: &str) -> Option<Place> {
    let cleaned = strip_emphasis(line);

    let place = match strip_number_prefix(&cleaned) {
        Some(body) => match split_description(body) {
            Some((name, description)) => Place {
                name: name.trim().to_owned(),
                description: description.trim().to_owned(),
            },
            None => bare(body),
        },
        None => bare(&cleaned),
    };

    match (place.name.is_empty(), place.description.is_empty()) {
        (true, true) => None,
        (true, false) => Some(Place {
            name: place.description,
            description: String::new(),
        }),
        _ => Some(place),
    }
}

fn bare(name: &str) -> Place {
    Place {
        name: name.trim().to_owned(),
        description: String::new(),
    }
}

/// `"12. Louvre"` -> `Some("Louvre")`.
fn strip_number_prefix(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim_start)
}

/// Splits on the first dash that touches whitespace, so hyphenated names
/// like "Saint-Germain" stay intact.
fn split_description(body: &str) -> Option<(&str, &str)> {
    let chars: Vec<(usize, char)> = body.char_indices().collect();
    for (pos, &(idx, c)) in chars.iter().enumerate() {
        if c != '-' && c != '–' {
            continue;
        }
        let before = pos
            .checked_sub(1)
            .and_then(|p| chars.get(p))
            .is_some_and(|&(_, b)| b.is_whitespace());
        let after = chars.get(pos + 1).is_some_and(|&(_, a)| a.is_whitespace());
        if before || after {
            let (name, rest) = body.split_at(idx);
            return Some((name, &rest[c.len_utf8()..]));
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipKind {
    Wear,
    Eat,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub kind: TipKind,
    pub text: String,
}

/// Display tips for the free-text sections. An ALERT of "none" is the model
/// saying there is nothing to warn about and is left out.
pub fn advice_tips(advice: &AdviceDocument) -> Vec<Tip> {
    let candidates = [
        (TipKind::Wear, &advice.wear),
        (TipKind::Eat, &advice.eat),
        (TipKind::Alert, &advice.alert),
    ];

    candidates
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .filter(|(kind, text)| *kind != TipKind::Alert || !is_none_alert(text))
        .map(|(kind, text)| Tip {
            kind,
            text: text.clone(),
        })
        .collect()
}

fn is_none_alert(text: &str) -> bool {
    let t = text.trim().to_ascii_lowercase();
    t == "none" || t == "none."
}

/// City comparison answer: COMPARISON, WINNER and REASON regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictDocument {
    pub comparison: Option<String>,
    pub winner: Option<String>,
    pub reason: Option<String>,
}

impl VerdictDocument {
    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

const VERDICT_LABELS: [&str; 3] = ["comparison", "winner", "reason"];

/// Locates `label` followed by a colon, allowing the same `*`/`#` markup and
/// spacing as the advice labels (`**Winner**:`, `WINNER :`). Returns the
/// label start and the offset just past the colon.
fn find_label(lower: &str, label: &str) -> Option<(usize, usize)> {
    lower.match_indices(label).find_map(|(idx, _)| {
        let at_boundary = lower[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        if !at_boundary {
            return None;
        }

        let after = &lower[idx + label.len()..];
        let rest = after.trim_start_matches(|c: char| c == '*' || c == '#' || c == ' ' || c == '\t');
        rest.starts_with(':')
            .then(|| idx + label.len() + (after.len() - rest.len()) + 1)
            .map(|content| (idx, content))
    })
}

/// Each label captures text up to the next label or the end of input.
pub fn parse_verdict(raw: &str) -> VerdictDocument {
    // ASCII lowercasing keeps byte offsets aligned with `raw`.
    let lower = raw.to_ascii_lowercase();
    let found: Vec<Option<(usize, usize)>> =
        VERDICT_LABELS.iter().map(|l| find_label(&lower, l)).collect();

    let region = |i: usize| -> Option<String> {
        let (_, start) = found[i]?;
        let end = found
            .iter()
            .flatten()
            .map(|&(label_start, _)| label_start)
            .filter(|&s| s >= start)
            .min()
            .unwrap_or(raw.len());
        let text = collapse_whitespace(&strip_emphasis(&raw[start..end]));
        // Heading markers of the next label land at the end of this region.
        let text = text.trim_end_matches('#').trim_end();
        (!text.is_empty()).then(|| text.to_owned())
    };

    VerdictDocument {
        comparison: region(0),
        winner: region(1)
            .map(|w| w.trim_end_matches('.').trim().to_owned())
            .filter(|w| !w.is_empty()),
        reason: region(2),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, description: &str) -> Place {
        Place {
            name: name.into(),
            description: description.into(),
        }
    }

    const PARIS: &str = "PLACES:\n1. Eiffel Tower - Iconic landmark\nNEARBY:\n1. Versailles - 20km, royal palace\nWEAR: Light jacket\nEAT: Croissant at a cafe\nALERT: None";

    #[test]
    fn parses_well_formed_advice() {
        let doc = parse_advice(PARIS);

        assert_eq!(doc.places, vec![place("Eiffel Tower", "Iconic landmark")]);
        assert_eq!(doc.nearby, vec![place("Versailles", "20km, royal palace")]);
        assert_eq!(doc.wear, "Light jacket");
        assert_eq!(doc.eat, "Croissant at a cafe");
        assert_eq!(doc.alert, "None");
    }

    #[test]
    fn none_alert_is_not_a_tip() {
        let tips = advice_tips(&parse_advice(PARIS));
        let kinds: Vec<TipKind> = tips.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TipKind::Wear, TipKind::Eat]);

        for alert in ["none.", "NONE", "  None.  "] {
            let doc = AdviceDocument {
                alert: alert.into(),
                ..Default::default()
            };
            assert!(advice_tips(&doc).is_empty(), "{alert:?}");
        }
    }

    #[test]
    fn real_alert_is_a_tip() {
        let doc = parse_advice("ALERT: Heavy fog in the morning");
        assert_eq!(
            advice_tips(&doc),
            vec![Tip {
                kind: TipKind::Alert,
                text: "Heavy fog in the morning".into()
            }]
        );
    }

    #[test]
    fn unstructured_text_yields_empty_document() {
        let doc = parse_advice("Sure! Paris is lovely this time of year.\nEnjoy your trip.");
        assert!(doc.is_empty());
        assert_eq!(doc, AdviceDocument::default());
    }

    #[test]
    fn empty_input() {
        assert!(parse_advice("").is_empty());
        assert!(parse_advice("\n\n   \n").is_empty());
    }

    #[test]
    fn labels_are_case_insensitive_and_decorated() {
        let raw = "Here you go:\n**Places:**\n1. **Louvre** – World's largest art museum\n2. Montmartre\n## wear:\nLayers\nand a scarf";
        let doc = parse_advice(raw);

        assert_eq!(
            doc.places,
            vec![
                place("Louvre", "World's largest art museum"),
                place("Montmartre", ""),
            ]
        );
        assert_eq!(doc.wear, "Layers and a scarf");
    }

    #[test]
    fn unknown_labels_are_content() {
        let doc = parse_advice("EAT: Crepes\nNote: try the market");
        assert_eq!(doc.eat, "Crepes Note: try the market");
    }

    #[test]
    fn list_lines_without_shape_become_names() {
        let raw = "NEARBY:\n- Giverny\n3. Saint-Germain-en-Laye\n4. ***\n5.";
        let doc = parse_advice(raw);

        assert_eq!(
            doc.nearby,
            vec![place("- Giverny", ""), place("Saint-Germain-en-Laye", "")]
        );
    }

    #[test]
    fn hyphenated_name_keeps_its_hyphen() {
        let doc = parse_advice("PLACES:\n1. Saint-Chapelle - Gothic chapel");
        assert_eq!(doc.places, vec![place("Saint-Chapelle", "Gothic chapel")]);
    }

    #[test]
    fn later_label_reopens_section() {
        let doc = parse_advice("WEAR: Hat\nEAT: Soup\nWEAR: Gloves");
        assert_eq!(doc.wear, "Hat Gloves");
        assert_eq!(doc.eat, "Soup");
    }

    #[test]
    fn parses_full_verdict() {
        let raw = "COMPARISON: Paris is mild while Oslo is freezing.\nWINNER: Paris\nREASON: Warmer and drier.";
        let verdict = parse_verdict(raw);

        assert_eq!(
            verdict.comparison.as_deref(),
            Some("Paris is mild while Oslo is freezing.")
        );
        assert_eq!(verdict.winner.as_deref(), Some("Paris"));
        assert_eq!(verdict.reason.as_deref(), Some("Warmer and drier."));
        assert!(verdict.has_winner());
    }

    #[test]
    fn verdict_tolerates_markup_and_case() {
        let raw = "**Comparison:** Both are wet.\n\n**Winner:** Rome.\n**Reason:** Less wind";
        let verdict = parse_verdict(raw);

        assert_eq!(verdict.comparison.as_deref(), Some("Both are wet."));
        assert_eq!(verdict.winner.as_deref(), Some("Rome"));
        assert_eq!(verdict.reason.as_deref(), Some("Less wind"));
    }

    #[test]
    fn verdict_tolerates_markup_before_colon_and_spacing() {
        let raw = "**Comparison**: Both wet.\n**Winner**: Rome\n**Reason**: Less wind";
        let verdict = parse_verdict(raw);

        assert_eq!(verdict.comparison.as_deref(), Some("Both wet."));
        assert_eq!(verdict.winner.as_deref(), Some("Rome"));
        assert_eq!(verdict.reason.as_deref(), Some("Less wind"));

        let spaced = parse_verdict("COMPARISON : x\nWINNER : Rome\nREASON : y");
        assert_eq!(spaced.comparison.as_deref(), Some("x"));
        assert_eq!(spaced.winner.as_deref(), Some("Rome"));
        assert_eq!(spaced.reason.as_deref(), Some("y"));

        let headings = parse_verdict("## Comparison: x\n## Winner : Rome\n## Reason: y");
        assert_eq!(headings.comparison.as_deref(), Some("x"));
        assert_eq!(headings.winner.as_deref(), Some("Rome"));
    }

    #[test]
    fn verdict_label_words_in_prose_are_not_labels() {
        let raw = "COMPARISON: For that reason Oslo loses; the winner is clear.\nWINNER: Lisbon\nREASON: Sun";
        let verdict = parse_verdict(raw);

        assert_eq!(
            verdict.comparison.as_deref(),
            Some("For that reason Oslo loses; the winner is clear.")
        );
        assert_eq!(verdict.winner.as_deref(), Some("Lisbon"));
        assert_eq!(verdict.reason.as_deref(), Some("Sun"));
    }

    #[test]
    fn advice_labels_with_markup_before_colon() {
        let doc = parse_advice("**PLACES**:\n1. Louvre - museum\nWEAR : coat");

        assert_eq!(doc.places, vec![place("Louvre", "museum")]);
        assert_eq!(doc.wear, "coat");
    }

    #[test]
    fn verdict_without_winner() {
        let verdict = parse_verdict("COMPARISON: hard to say\nWINNER:\nREASON: tie");
        assert!(!verdict.has_winner());
        assert_eq!(verdict.reason.as_deref(), Some("tie"));

        let unstructured = parse_verdict("I think both cities are fine.");
        assert_eq!(unstructured, VerdictDocument::default());
    }

    mod properties {
        use crate::parser::*;
        use proptest::prelude::*;

        /// Text built from label fragments, list markers and non-ASCII
        /// characters, so the generator hits the interesting branches.
        fn advice_like() -> impl Strategy<Value = String> {
            let fragment = prop::sample::select(vec![
                "PLACES:", "**Nearby**:", "WEAR :", "ALERT: None", "**Winner:** ",
                "comparison:", "Reason", "\n", "1. ", " - ", " – ",
            ])
            .prop_map(str::to_owned);

            proptest::collection::vec(
                prop_oneof![fragment, "[a-zA-Z0-9 .:*#éü中–-]{0,12}"],
                0..40,
            )
            .prop_map(|parts| parts.concat())
        }

        fn check_advice(raw: &str) -> Result<(), TestCaseError> {
            let doc = parse_advice(raw);
            for place in doc.places.iter().chain(&doc.nearby) {
                prop_assert!(!place.name.is_empty());
                prop_assert!(!place.name.contains('*'));
            }
            for tip in advice_tips(&doc) {
                prop_assert!(!tip.text.is_empty());
                prop_assert!(tip.kind != TipKind::Alert || !is_none_alert(&tip.text));
            }
            Ok(())
        }

        fn check_verdict(raw: &str) -> Result<(), TestCaseError> {
            let verdict = parse_verdict(raw);
            for text in [&verdict.comparison, &verdict.winner, &verdict.reason]
                .into_iter()
                .flatten()
            {
                prop_assert!(!text.is_empty());
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn arbitrary_text_never_panics(raw in any::<String>()) {
                check_advice(&raw)?;
                check_verdict(&raw)?;
            }

            #[test]
            fn label_heavy_text_never_panics(raw in advice_like()) {
                check_advice(&raw)?;
                check_verdict(&raw)?;
            }
        }
    }
}
