use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic bucket a recognized poster line ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EventName,
    Organizer,
    Prizes,
    ImportantDates,
    Websites,
    Emails,
    Phones,
    OtherInfo,
}

impl Field {
    /// All fields, in export column order.
    pub const ALL: [Field; 8] = [
        Field::EventName,
        Field::Organizer,
        Field::Prizes,
        Field::ImportantDates,
        Field::Websites,
        Field::Emails,
        Field::Phones,
        Field::OtherInfo,
    ];

    /// Column heading used in the flat exported row.
    pub fn column(self) -> &'static str {
        match self {
            Field::EventName => "Event Name",
            Field::Organizer => "Organizer",
            Field::Prizes => "Prizes",
            Field::ImportantDates => "Dates",
            Field::Websites => "Website",
            Field::Emails => "Email",
            Field::Phones => "Phone",
            Field::OtherInfo => "Other Info",
        }
    }

    /// Single-valued fields keep the first line placed into them.
    pub fn is_single_valued(self) -> bool {
        matches!(self, Field::EventName | Field::Organizer)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::EventName => write!(f, "event_name"),
            Field::Organizer => write!(f, "organizer"),
            Field::Prizes => write!(f, "prizes"),
            Field::ImportantDates => write!(f, "important_dates"),
            Field::Websites => write!(f, "websites"),
            Field::Emails => write!(f, "emails"),
            Field::Phones => write!(f, "phones"),
            Field::OtherInfo => write!(f, "other_info"),
        }
    }
}
