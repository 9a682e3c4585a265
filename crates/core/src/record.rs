use serde::Serialize;

use crate::field::Field;

/// Outcome of placing one line into a [`FieldRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Stored,
    /// The target was a single-valued field that already held a line.
    Discarded,
}

/// Structured metadata extracted from one poster.
///
/// Built empty, filled line by line through [`FieldRecord::place`], then handed
/// out by value. `event_name` and `organizer` keep the first line placed into
/// them; every other field keeps all of its lines in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    event_name: Option<String>,
    organizer: Option<String>,
    prizes: Vec<String>,
    important_dates: Vec<String>,
    websites: Vec<String>,
    emails: Vec<String>,
    phones: Vec<String>,
    other_info: Vec<String>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, field: Field, line: impl Into<String>) -> Placement {
        let slot = match field {
            Field::EventName => &mut self.event_name,
            Field::Organizer => &mut self.organizer,
            Field::Prizes => return push(&mut self.prizes, line),
            Field::ImportantDates => return push(&mut self.important_dates, line),
            Field::Websites => return push(&mut self.websites, line),
            Field::Emails => return push(&mut self.emails, line),
            Field::Phones => return push(&mut self.phones, line),
            Field::OtherInfo => return push(&mut self.other_info, line),
        };
        if slot.is_some() {
            return Placement::Discarded;
        }
        *slot = Some(line.into());
        Placement::Stored
    }

    /// Lines held by `field`, in input order. Single-valued fields yield zero or one entry.
    pub fn values(&self, field: Field) -> &[String] {
        match field {
            Field::EventName => self.event_name.as_slice(),
            Field::Organizer => self.organizer.as_slice(),
            Field::Prizes => &self.prizes,
            Field::ImportantDates => &self.important_dates,
            Field::Websites => &self.websites,
            Field::Emails => &self.emails,
            Field::Phones => &self.phones,
            Field::OtherInfo => &self.other_info,
        }
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn organizer(&self) -> Option<&str> {
        self.organizer.as_deref()
    }

    pub fn prizes(&self) -> &[String] {
        &self.prizes
    }

    pub fn important_dates(&self) -> &[String] {
        &self.important_dates
    }

    pub fn websites(&self) -> &[String] {
        &self.websites
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    pub fn other_info(&self) -> &[String] {
        &self.other_info
    }

    /// Total number of lines stored across all fields.
    pub fn stored_lines(&self) -> usize {
        Field::ALL.iter().map(|f| self.values(*f).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stored_lines() == 0
    }
}

fn push(bucket: &mut Vec<String>, line: impl Into<String>) -> Placement {
    bucket.push(line.into());
    Placement::Stored
}

/// A candidate line that lost to an earlier line for a single-valued field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardedLine {
    pub field: Field,
    pub line: String,
}

/// Full result of a classification pass: the record plus anything it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub record: FieldRecord,
    pub discarded: Vec<DiscardedLine>,
}

impl Classification {
    /// Number of input lines this pass accounted for.
    pub fn lines_seen(&self) -> usize {
        self.record.stored_lines() + self.discarded.len()
    }
}
