use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct OfferRow {
    /// 1-based line in the source file, header included.
    pub(crate) line: usize,
    pub(crate) id: Option<String>,
    pub(crate) company: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) work_mode: Option<String>,
    pub(crate) base_salary: Option<String>,
    pub(crate) bonus: Option<String>,
    pub(crate) equity: Option<String>,
    pub(crate) benefits: Option<String>,
    pub(crate) archived: Option<String>,
    pub(crate) archive_reason: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<OfferRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawOfferRow>().enumerate() {
        let raw = record?;
        rows.push(raw.into_row(index + 2));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawOfferRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    work_mode: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    base_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bonus: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    equity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    benefits: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    archived: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    archive_reason: Option<String>,
}

impl RawOfferRow {
    fn into_row(self, line: usize) -> OfferRow {
        OfferRow {
            line,
            id: self.id,
            company: self.company,
            title: self.title,
            location: self.location,
            work_mode: self.work_mode,
            base_salary: self.base_salary,
            bonus: self.bonus,
            equity: self.equity,
            benefits: self.benefits,
            archived: self.archived,
            archive_reason: self.archive_reason,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
