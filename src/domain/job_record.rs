use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::normalize::non_empty;

/// Workflow status every freshly extracted listing starts in
pub const DEFAULT_STATUS: &str = "to process";

/// Canonical listing record returned to callers.
///
/// Every field is always serialized, even when the page supplied nothing for it.
/// `secteur`, `taille_entreprise` and `experience_demandee` have no producer yet
/// and always stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub date: String,
    pub source: String,
    pub entreprise: String,
    pub localisation: String,
    pub secteur: String,
    pub taille_entreprise: String,
    pub experience_demandee: String,
    pub poste: String,
    pub competences: Vec<String>,
    pub score: i64,
    pub pitch: String,
    pub statut: String,
    pub date_candidature: String,
    pub date_reponse: String,
    pub delai_reponse: String,
    pub commentaires: String,
}

/// Composite identity used for deduplication
pub type RecordKey = (String, String, String, String);

impl JobRecord {
    fn blank(source: String, date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            source,
            entreprise: String::new(),
            localisation: String::new(),
            secteur: String::new(),
            taille_entreprise: String::new(),
            experience_demandee: String::new(),
            poste: String::new(),
            competences: Vec::new(),
            score: 0,
            pitch: String::new(),
            statut: DEFAULT_STATUS.to_string(),
            date_candidature: String::new(),
            date_reponse: String::new(),
            delai_reponse: String::new(),
            commentaires: String::new(),
        }
    }

    /// Substitute record standing in for a URL whose processing failed.
    ///
    /// `commentaires` carries `ERROR: <kind>: <message>`; everything else stays at its default.
    #[must_use]
    pub fn failure(url: &str, kind: &str, message: &str) -> Self {
        let mut record = Self::blank(url.to_string(), Local::now().date_naive());
        record.commentaires = format!("ERROR: {kind}: {message}");
        record
    }

    /// True for records produced by [`JobRecord::failure`]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.commentaires.starts_with("ERROR:")
    }

    #[must_use]
    pub fn identity_key(&self) -> RecordKey {
        (
            self.poste.clone(),
            self.entreprise.clone(),
            self.localisation.clone(),
            self.commentaires.clone(),
        )
    }
}

/// Values collected for one card before the record shape is fixed.
///
/// Fields are optional until [`JobDraft::finalize`]; finalization normalizes
/// every value and refuses drafts without a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    pub source: String,
    pub poste: Option<String>,
    pub entreprise: Option<String>,
    pub localisation: Option<String>,
    pub link: Option<String>,
}

impl JobDraft {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.poste = title;
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.entreprise = company;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.localisation = location;
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    /// Fix the record shape, dated today.
    #[must_use]
    pub fn finalize(self) -> Option<JobRecord> {
        self.finalize_on(Local::now().date_naive())
    }

    /// Fix the record shape with an explicit creation date.
    ///
    /// Returns `None` when the normalized title is empty.
    #[must_use]
    pub fn finalize_on(self, date: NaiveDate) -> Option<JobRecord> {
        let poste = self.poste.as_deref().and_then(non_empty)?;
        let mut record = JobRecord::blank(self.source, date);
        record.poste = poste;
        record.entreprise = self.entreprise.as_deref().and_then(non_empty).unwrap_or_default();
        record.localisation = self.localisation.as_deref().and_then(non_empty).unwrap_or_default();
        record.commentaires = self.link.as_deref().and_then(non_empty).unwrap_or_default();
        Some(record)
    }
}
