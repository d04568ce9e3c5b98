use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: Option<Date>,
    pub place: Option<String>,
}

impl Event {
    pub fn year(&self) -> Option<i32> {
        self.date.as_ref().and_then(|date| date.year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birth: Option<Event>,
    #[serde(default)]
    pub death: Option<Event>,
    /// Box fill; any SVG paint value.
    #[serde(default)]
    pub color: Option<String>,
    /// Family in which this person is a child.
    #[serde(default)]
    pub famc: Option<String>,
    /// Families in which this person is a spouse, in marriage order.
    #[serde(default)]
    pub fams: Vec<String>,
}

impl Individual {
    pub fn first_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or("")
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_deref().unwrap_or("")
    }

    pub fn full_name(&self) -> String {
        [self.first_name(), self.last_name()].join(" ")
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth.as_ref().and_then(Event::year)
    }

    pub fn death_year(&self) -> Option<i32> {
        self.death.as_ref().and_then(Event::year)
    }

    /// `"<birth> – <death>"` with missing ends left blank, or `""` when
    /// neither year is known.
    pub fn years(&self) -> String {
        let birth = self.birth_year();
        let death = self.death_year();
        if birth.is_none() && death.is_none() {
            return String::new();
        }
        let fmt = |year: Option<i32>| year.map(|y| y.to_string()).unwrap_or_default();
        format!("{} – {}", fmt(birth), fmt(death))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    #[serde(default)]
    pub husb: Option<String>,
    #[serde(default)]
    pub wife: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

impl Family {
    /// The other spouse of `id` in this family, if recorded.
    pub fn spouse_of(&self, id: &str) -> Option<&str> {
        if self.husb.as_deref() == Some(id) {
            self.wife.as_deref()
        } else if self.wife.as_deref() == Some(id) {
            self.husb.as_deref()
        } else {
            None
        }
    }
}

/// Read-only lookup of individuals and families.
pub trait DataProvider {
    fn indi(&self, id: &str) -> Option<&Individual>;
    fn fam(&self, id: &str) -> Option<&Family>;
}

/// On-disk genealogy document: `{ "indis": [...], "fams": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenealogyData {
    #[serde(default)]
    pub indis: Vec<Individual>,
    #[serde(default)]
    pub fams: Vec<Family>,
}

#[derive(Debug, Clone, Default)]
pub struct JsonDataProvider {
    indis: HashMap<String, Individual>,
    fams: HashMap<String, Family>,
}

impl JsonDataProvider {
    pub fn new(data: GenealogyData) -> Self {
        let indis = data
            .indis
            .into_iter()
            .map(|indi| (indi.id.clone(), indi))
            .collect();
        let fams = data
            .fams
            .into_iter()
            .map(|fam| (fam.id.clone(), fam))
            .collect();
        Self { indis, fams }
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        let data: GenealogyData = serde_json::from_str(input)?;
        Ok(Self::new(data))
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.indis.len(), self.fams.len())
    }
}

impl DataProvider for JsonDataProvider {
    fn indi(&self, id: &str) -> Option<&Individual> {
        self.indis.get(id)
    }

    fn fam(&self, id: &str) -> Option<&Family> {
        self.fams.get(id)
    }
}

pub fn load_data(path: &Path) -> anyhow::Result<JsonDataProvider> {
    let contents = std::fs::read_to_string(path)?;
    let provider = JsonDataProvider::from_json(&contents)?;
    let (indis, fams) = provider.counts();
    tracing::debug!(indis, fams, path = %path.display(), "loaded genealogy data");
    Ok(provider)
}

#[cfg(test)]
pub(crate) fn doe_family() -> JsonDataProvider {
    JsonDataProvider::from_json(include_str!("../tests/fixtures/doe.json"))
        .expect("fixture parses")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(birth: Option<i32>, death: Option<i32>) -> Individual {
        let event = |year: Option<i32>| {
            year.map(|y| Event {
                date: Some(Date {
                    year: Some(y),
                    ..Default::default()
                }),
                place: None,
            })
        };
        Individual {
            id: "I1".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            birth: event(birth),
            death: event(death),
            ..Default::default()
        }
    }

    #[test]
    fn years_label_forms() {
        assert_eq!(person(Some(1900), Some(1980)).years(), "1900 – 1980");
        assert_eq!(person(Some(1900), None).years(), "1900 – ");
        assert_eq!(person(None, Some(1980)).years(), " – 1980");
        assert_eq!(person(None, None).years(), "");
    }

    #[test]
    fn birth_without_date_has_no_year() {
        let mut indi = person(None, None);
        indi.birth = Some(Event {
            date: None,
            place: Some("Paris".to_string()),
        });
        assert_eq!(indi.years(), "");
    }

    #[test]
    fn parses_camel_case_document() {
        let input = r##"{
            "indis": [
                {"id": "I1", "firstName": "Jane", "lastName": "Doe",
                 "birth": {"date": {"year": 1900}}, "fams": ["F1"], "color": "#abc"},
                {"id": "I2", "firstName": "John"}
            ],
            "fams": [{"id": "F1", "husb": "I2", "wife": "I1", "children": []}]
        }"##;
        let data = JsonDataProvider::from_json(input).unwrap();
        let jane = data.indi("I1").unwrap();
        assert_eq!(jane.first_name(), "Jane");
        assert_eq!(jane.birth_year(), Some(1900));
        assert_eq!(jane.color.as_deref(), Some("#abc"));
        assert_eq!(data.indi("I2").unwrap().last_name(), "");
        assert_eq!(data.fam("F1").unwrap().spouse_of("I1"), Some("I2"));
        assert!(data.indi("missing").is_none());
    }

    #[test]
    fn fixture_indexes_everyone() {
        assert_eq!(doe_family().counts(), (13, 7));
    }
}
