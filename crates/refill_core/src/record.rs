use std::collections::BTreeMap;

/// One successful extraction: extracted-key name to extracted value.
pub type Record = BTreeMap<String, String>;

/// A record committed to the persisted history, tagged with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub position: usize,
    pub record: Record,
}

pub fn reports_from_records(records: Vec<Record>) -> Vec<Report> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| Report { position, record })
        .collect()
}
