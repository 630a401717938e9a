//! End-to-end batch behaviour through the page source seam, with a scripted renderer
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobscrape_lib::JobRecord;
use jobscrape_lib::application::{AdapterRouter, AdapterSet, BatchOrchestrator};
use jobscrape_lib::infrastructure::extract_error::{ExtractError, ExtractResult};
use jobscrape_lib::infrastructure::page_source::{LoadHints, LoadedPage, PageSource};

const HELLOWORK_SEARCH: &str = "https://www.hellowork.com/fr-fr/emploi/recherche.html?k=ingenieur";
const MAKESENSE_SEARCH: &str = "https://jobs.makesense.org/fr/s/jobs/all";
const JUNGLE_SEARCH: &str = "https://www.welcometothejungle.com/fr/jobs?query=rust";

/// Serves canned pages per URL and records every load
#[derive(Default)]
struct ScriptedSource {
    pages: HashMap<String, String>,
    loads: Mutex<Vec<(String, LoadHints)>>,
}

impl ScriptedSource {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn loads(&self) -> Vec<(String, LoadHints)> {
        self.loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn load(&self, url: &str, hints: LoadHints) -> ExtractResult<LoadedPage> {
        self.loads.lock().unwrap().push((url.to_string(), hints));
        match self.pages.get(url) {
            Some(html) => Ok(LoadedPage {
                final_url: url.to_string(),
                html: html.clone(),
            }),
            None => Err(ExtractError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: 45,
            }),
        }
    }
}

fn orchestrator(static_source: Arc<ScriptedSource>, renderer: Arc<ScriptedSource>) -> BatchOrchestrator {
    let adapters = AdapterSet::from_sources(static_source, renderer).unwrap();
    BatchOrchestrator::new(AdapterRouter::new(["welcometothejungle.com"]), adapters)
}

fn assert_default_fields(record: &JobRecord) {
    assert_eq!(record.secteur, "");
    assert_eq!(record.taille_entreprise, "");
    assert_eq!(record.experience_demandee, "");
    assert!(record.competences.is_empty());
    assert_eq!(record.score, 0);
    assert_eq!(record.pitch, "");
    assert_eq!(record.statut, "to process");
    assert_eq!(record.date_candidature, "");
    assert_eq!(record.date_reponse, "");
    assert_eq!(record.delai_reponse, "");
    assert_eq!(record.date.len(), 10);
}

#[tokio::test]
async fn empty_batch_yields_empty_output() {
    let orchestrator = orchestrator(Arc::default(), Arc::default());
    assert!(orchestrator.run_batch(&[]).await.is_empty());
}

#[tokio::test]
async fn hellowork_card_without_company() {
    let renderer = Arc::new(ScriptedSource::default().with_page(
        HELLOWORK_SEARCH,
        r#"<main><ul>
             <li data-id-storage-target="item"><article>
               <a href="/fr-fr/emplois/61234567.html"><h3>Ingénieur</h3></a>
             </article></li>
           </ul></main>"#,
    ));
    let static_source = Arc::new(ScriptedSource::default());

    let records = orchestrator(static_source.clone(), renderer.clone())
        .run_batch(&[HELLOWORK_SEARCH.to_string()])
        .await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.poste, "Ingénieur");
    assert_eq!(record.entreprise, "");
    assert_eq!(record.source, "hellowork");
    assert_eq!(record.commentaires, "https://www.hellowork.com/fr-fr/emplois/61234567.html");
    assert_default_fields(record);

    assert!(static_source.loads().is_empty());
    assert_eq!(renderer.loads()[0].1.scroll_cycles, Some(12));
}

#[tokio::test]
async fn makesense_listing_backfills_location() {
    let renderer = Arc::new(ScriptedSource::default().with_page(
        MAKESENSE_SEARCH,
        r#"<div>
             <a href="/fr/s/jobs/responsable-partenariats-x1"><p>Responsable partenariats</p><p>CDI</p></a>
             <a href="/fr/s/jobs/responsable-partenariats-x1"><p>Responsable partenariats</p><p>CDI</p></a>
             <a href="/fr/s/jobs/developpeuse-web-y2"><h3>Développeuse web</h3><span class="location">Lille</span></a>
           </div>"#,
    ));

    let records = orchestrator(Arc::default(), renderer.clone())
        .run_batch(&[MAKESENSE_SEARCH.to_string()])
        .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].poste, "Responsable partenariats");
    assert_eq!(records[0].localisation, "France");
    assert_eq!(records[1].poste, "Développeuse web");
    assert_eq!(records[1].localisation, "Lille");
    assert!(records.iter().all(|r| r.source == "makesense"));
    assert_eq!(renderer.loads()[0].1.scroll_cycles, Some(8));
}

#[tokio::test]
async fn allow_listed_domain_uses_generic_rendered_extraction() {
    let renderer = Arc::new(ScriptedSource::default().with_page(
        JUNGLE_SEARCH,
        r#"<ul>
             <li data-testid="job-card"><h4>Rust Engineer</h4><a href="/fr/companies/acme/jobs/rust">Voir</a></li>
           </ul>"#,
    ));

    let records = orchestrator(Arc::default(), renderer.clone())
        .run_batch(&[JUNGLE_SEARCH.to_string()])
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].poste, "Rust Engineer");
    assert_eq!(records[0].source, JUNGLE_SEARCH);
    assert_eq!(
        records[0].commentaires,
        "https://www.welcometothejungle.com/fr/companies/acme/jobs/rust"
    );
    assert_eq!(renderer.loads()[0].1.scroll_cycles, None);
}

#[tokio::test]
async fn one_failing_url_among_successes() {
    let static_source = Arc::new(
        ScriptedSource::default()
            .with_page("https://a.example.com/jobs", r#"<article><h2>Comptable</h2></article>"#)
            .with_page("https://c.example.com/jobs", r#"<article><h2>Juriste</h2></article>"#),
    );

    let urls = [
        "https://a.example.com/jobs".to_string(),
        "https://b.example.com/jobs".to_string(),
        "https://c.example.com/jobs".to_string(),
    ];
    let records = orchestrator(static_source, Arc::default()).run_batch(&urls).await;

    let titles: Vec<_> = records.iter().map(|r| r.poste.as_str()).collect();
    assert_eq!(titles, vec!["Comptable", "", "Juriste"]);

    let failure = &records[1];
    assert!(failure.is_failure());
    assert_eq!(failure.source, "https://b.example.com/jobs");
    assert!(failure.commentaires.starts_with("ERROR: FetchError: navigation to https://b.example.com/jobs"));
    assert_default_fields(failure);
}

#[tokio::test]
async fn rendered_failure_is_not_retried() {
    let renderer = Arc::new(ScriptedSource::default());
    let static_source = Arc::new(ScriptedSource::default());

    let records = orchestrator(static_source.clone(), renderer.clone())
        .run_batch(&[JUNGLE_SEARCH.to_string()])
        .await;

    assert_eq!(records.len(), 1);
    assert!(records[0].is_failure());
    assert_eq!(records[0].source, JUNGLE_SEARCH);
    assert!(records[0].commentaires.starts_with("ERROR: FetchError:"));
    assert_eq!(renderer.loads().len(), 1);
    assert!(static_source.loads().is_empty());
}

#[tokio::test]
async fn records_serialize_with_every_field() {
    let static_source =
        Arc::new(ScriptedSource::default().with_page("https://a.example.com/", r#"<article><h2>Comptable</h2></article>"#));
    let records = orchestrator(static_source, Arc::default())
        .run_batch(&["https://a.example.com/".to_string()])
        .await;

    let json = serde_json::to_value(&records).unwrap();
    let object = json[0].as_object().unwrap();
    for key in [
        "date",
        "source",
        "entreprise",
        "localisation",
        "secteur",
        "taille_entreprise",
        "experience_demandee",
        "poste",
        "competences",
        "score",
        "pitch",
        "statut",
        "date_candidature",
        "date_reponse",
        "delai_reponse",
        "commentaires",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert_eq!(object.len(), 16);
}
