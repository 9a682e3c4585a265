use std::sync::OnceLock;

use poster_core::{Classification, DiscardedLine, Field, FieldRecord, Placement};
use regex::Regex;
use tracing::debug;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_email, r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}");
re!(re_website, r"www\.|http");
re!(re_phone, r"\A\d{10}\z");
re!(re_prize, r"(?i)₹|\$|prize|award|cash");
re!(re_date,
    r"(?i)\d{1,2}\s*(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)");
re!(re_institution, r"(?i)institute|university|government|dept|foundation");

/// Minimum length (in characters) an all-caps line needs to count as a title.
const EVENT_NAME_MIN_CHARS: usize = 11;

// ── Rule table ────────────────────────────────────────────────────────────────

/// One classification rule: a predicate over a trimmed line and the field a
/// matching line goes to.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub field: Field,
    predicate: fn(&str) -> bool,
}

impl Rule {
    pub fn matches(&self, line: &str) -> bool {
        (self.predicate)(line)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("field", &self.field)
            .finish()
    }
}

/// Evaluated top to bottom; the first matching rule decides the field.
/// Lines matching none of them go to [`Field::OtherInfo`].
pub static RULES: [Rule; 7] = [
    Rule { name: "email", field: Field::Emails, predicate: is_email },
    Rule { name: "website", field: Field::Websites, predicate: is_website },
    Rule { name: "phone", field: Field::Phones, predicate: is_phone },
    Rule { name: "prize", field: Field::Prizes, predicate: is_prize },
    Rule { name: "date", field: Field::ImportantDates, predicate: is_date },
    Rule { name: "organizer", field: Field::Organizer, predicate: is_institution },
    Rule { name: "event_name", field: Field::EventName, predicate: is_title },
];

fn is_email(line: &str) -> bool {
    re_email().is_match(line)
}

fn is_website(line: &str) -> bool {
    re_website().is_match(line)
}

fn is_phone(line: &str) -> bool {
    re_phone().is_match(line)
}

fn is_prize(line: &str) -> bool {
    re_prize().is_match(line)
}

fn is_date(line: &str) -> bool {
    re_date().is_match(line)
}

fn is_institution(line: &str) -> bool {
    re_institution().is_match(line)
}

/// All-caps banner text: at least one cased letter, and every cased letter
/// upper-case. Title-case letters such as `ǅ` count as cased but not upper.
fn is_title(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() || is_titlecase(c) {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased && line.chars().count() >= EVENT_NAME_MIN_CHARS
}

fn is_titlecase(c: char) -> bool {
    !c.is_lowercase() && !c.is_uppercase() && !c.to_uppercase().eq([c])
}

/// Strips Unicode whitespace plus the ASCII separators U+001C..=U+001F,
/// which OCR output occasionally carries at line edges.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

// ── Classifier ────────────────────────────────────────────────────────────────

/// Buckets recognized poster lines into a [`FieldRecord`] using [`RULES`].
#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier {
    rules: &'static [Rule],
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldClassifier {
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// First rule matching the already-trimmed `line`, if any.
    pub fn find_matching_rule(&self, line: &str) -> Option<&'static Rule> {
        self.rules.iter().find(|r| r.matches(line))
    }

    /// Field the line is routed to. Surrounding whitespace is ignored.
    pub fn target(&self, line: &str) -> Field {
        self.find_matching_rule(trim_line(line))
            .map_or(Field::OtherInfo, |r| r.field)
    }

    pub fn classify<I, S>(&self, lines: I) -> FieldRecord
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.classify_detailed(lines).record
    }

    /// Classify and also report candidates dropped because their
    /// single-valued field was already taken.
    pub fn classify_detailed<I, S>(&self, lines: I) -> Classification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut record = FieldRecord::new();
        let mut discarded = Vec::new();

        for line in lines {
            let text = trim_line(line.as_ref());
            let field = self.target(text);
            match record.place(field, text) {
                Placement::Stored => debug!(%field, line = text, "classified line"),
                Placement::Discarded => {
                    debug!(%field, line = text, "discarded duplicate candidate");
                    discarded.push(DiscardedLine { field, line: text.to_string() });
                }
            }
        }

        Classification { record, discarded }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
