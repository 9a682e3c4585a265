use poster_core::{Field, FieldRecord};
use serde::{Deserialize, Serialize};

/// Separator placed between the lines of a multi-valued field.
pub const MULTI_VALUE_DELIMITER: &str = " | ";

/// Flat, single-row projection of a [`FieldRecord`] with the fixed export
/// column names. Field order here is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterRow {
    #[serde(rename = "Event Name")]
    pub event_name: String,
    #[serde(rename = "Organizer")]
    pub organizer: String,
    #[serde(rename = "Prizes")]
    pub prizes: String,
    #[serde(rename = "Dates")]
    pub dates: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Other Info")]
    pub other_info: String,
}

impl PosterRow {
    pub fn from_record(record: &FieldRecord) -> Self {
        let render = |field: Field| record.values(field).join(MULTI_VALUE_DELIMITER);
        Self {
            event_name: render(Field::EventName),
            organizer: render(Field::Organizer),
            prizes: render(Field::Prizes),
            dates: render(Field::ImportantDates),
            website: render(Field::Websites),
            email: render(Field::Emails),
            phone: render(Field::Phones),
            other_info: render(Field::OtherInfo),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::EventName => &self.event_name,
            Field::Organizer => &self.organizer,
            Field::Prizes => &self.prizes,
            Field::ImportantDates => &self.dates,
            Field::Websites => &self.website,
            Field::Emails => &self.email,
            Field::Phones => &self.phone,
            Field::OtherInfo => &self.other_info,
        }
    }

    /// `(column name, value)` pairs in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f.column(), self.get(f)))
    }
}

impl From<&FieldRecord> for PosterRow {
    fn from(record: &FieldRecord) -> Self {
        Self::from_record(record)
    }
}
