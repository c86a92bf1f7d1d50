//! Integration tests for batch import, statistics and RDF export.

mod common;

use std::fs;

use serde_json::json;

use common::{lexeme, Fixture};
use framenet_lexicon::batch::{add_lus, add_lus_from_json, EntryOutcome, LuEntry};
use framenet_lexicon::{check_consistency, get_luid, rdf, stats, AddLuRequest, LexiconContext};

fn entry(lu_name: &str, frame: &str, status: &str) -> serde_json::Value {
    let lemma = lu_name.rsplit_once('.').map(|(l, _)| l).unwrap_or(lu_name);
    json!({
        "lu_name": lu_name,
        "lexemes": [{"order": "1", "headword": "false", "breakBefore": "false", "POS": "N", "name": lemma}],
        "definition": format!("definition of {}", lemma),
        "status": status,
        "pos": "N",
        "frame": frame,
        "provenance": "manual",
        "lu_type": "singleton",
        "incorporated_fe": null,
        "timestamp": [2020, 3, 1],
        "agent": "MartenPostma"
    })
}

// ============================================================================
// Batch import
// ============================================================================

mod batch {
    use super::*;

    #[test]
    fn test_batch_tallies_added_and_failed() {
        let fixture = Fixture::new();
        let json_path = fixture.target.parent().unwrap().join("lus.json");
        let document = json!({"lus": [
            entry("president.n", "Appellations", "Created"),
            entry("president.n", "Appellations", "Created"),
            entry("Mexicaan.n", "People_by_origin", "new"),
            entry("verkiezing.n", "Change_of_leadership", "Created"),
        ]});
        fs::write(&json_path, document.to_string()).unwrap();

        let summary = add_lus_from_json(&fixture.target, &fixture.context, &json_path).unwrap();
        assert_eq!(summary.added, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), 4);

        let lexicon = fixture.load();
        assert_eq!(lexicon.lu_count(), 2);
        assert_eq!(
            lexicon.lu(1).unwrap().created_date.as_deref(),
            Some("03/01/2020 00:00:00 UTC Sun")
        );
        assert!(check_consistency(&fixture.target).unwrap().is_consistent());
    }

    #[test]
    fn test_batch_reports_each_outcome() {
        let fixture = Fixture::new();
        let entries: Vec<LuEntry> = [
            entry("president.n", "Appellations", "Created"),
            entry("president.n", "Appellations", "Created"),
            entry("koning.n", "Nowhere", "Created"),
        ]
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();

        let mut outcomes = Vec::new();
        add_lus(&fixture.target, &fixture.context, &entries, |entry, outcome| {
            outcomes.push((entry.lu_name.clone(), outcome.clone()));
        })
        .unwrap();

        assert_eq!(outcomes[0].1, EntryOutcome::Added);
        assert_eq!(outcomes[1].1, EntryOutcome::Duplicate);
        assert!(matches!(outcomes[2].1, EntryOutcome::Failed(ref reason) if reason.contains("Nowhere")));
    }

    #[test]
    fn test_missing_batch_file() {
        let fixture = Fixture::new();
        let missing = fixture.target.join("nope.json");
        assert!(add_lus_from_json(&fixture.target, &fixture.context, &missing).is_err());
    }
}

// ============================================================================
// Statistics
// ============================================================================

mod statistics {
    use super::*;

    fn populated() -> Fixture {
        let fixture = Fixture::new();
        fixture.add_singleton("president", "N", "Appellations");
        fixture.add_singleton("Mexicaan", "N", "People_by_origin");
        fixture.add_singleton("Mexicaan", "N", "Giving");
        fixture
    }

    #[test]
    fn test_frame_and_lu_tables() {
        let fixture = populated();
        let lexicon = fixture.load();

        let frames = stats::frame_stats(&lexicon);
        assert_eq!(frames.get("total number of frames"), Some("6"));
        assert_eq!(frames.get("number of lexical frames"), Some("3"));
        assert_eq!(frames.get("number of non-lexical frames"), Some("3"));

        let lus = stats::lu_stats(&lexicon);
        assert_eq!(lus.get("total number of LUs"), Some("3"));
        assert_eq!(lus.get("LUs per lexical frame"), Some("1.0"));

        let per_pos = stats::lu_per_pos_stats(&lexicon);
        assert_eq!(per_pos.rows, vec![("N".to_string(), "3".to_string())]);

        let lexemes = stats::lexeme_stats(&lexicon);
        assert_eq!(lexemes.get("1"), Some("3"));
    }

    #[test]
    fn test_ambiguity() {
        let fixture = populated();
        let ambiguity = stats::ambiguity_stats(&fixture.load());
        assert_eq!(ambiguity.get("Minimum ambiguity"), Some("1"));
        assert_eq!(ambiguity.get("Mean ambiguity"), Some("1.5"));
        assert_eq!(ambiguity.get("Maximum ambiguity"), Some("2"));
    }

    #[test]
    fn test_html_report() {
        let fixture = populated();
        let html = stats::stats_html(&fixture.load());
        assert!(html.starts_with("<html>\n<body>\n"));
        for title in ["Frame", "LUs", "LUs per POS", "Lexemes per LU", "Ambiguity"] {
            assert!(html.contains(&format!("<h2>{}</h2>", title)), "{}", title);
        }
        assert!(html.ends_with("</body>\n</html>"));
    }
}

// ============================================================================
// RDF export
// ============================================================================

mod rdf_export {
    use super::*;

    const LEXICON: &str = "http://rdf.cltl.nl/dfn/fn_nld-lexicon-0.1";

    fn export(fixture: &Fixture) -> String {
        let lexicon = fixture.load();
        let context = LexiconContext::new(fixture.context.config().clone(), lexicon.clone());
        rdf::export_ntriples(&lexicon, &context).unwrap()
    }

    #[test]
    fn test_lu_uri_requires_existing_lu() {
        let fixture = Fixture::new();
        let id = fixture.add_singleton("president", "N", "Appellations");
        let lexicon = fixture.load();
        let config = &fixture.context.config().rdf;

        assert_eq!(
            rdf::lu_uri(&lexicon, config, id).unwrap(),
            format!("{}-lu-{}", LEXICON, id)
        );
        assert!(rdf::lu_uri(&lexicon, config, 999).is_err());
    }

    #[test]
    fn test_export_describes_entries_and_senses() {
        let fixture = Fixture::new();
        let timestamp = framenet_lexicon::timestamp::from_ymd(2019, 2, 21).unwrap();
        let request = common::singleton("president", "N", "Appellations").with_timestamp(timestamp);
        assert!(framenet_lexicon::add_lu(&fixture.target, &fixture.context, &request).unwrap());

        let triples = export(&fixture);
        let le = format!("{}-le-1", LEXICON);
        let lu = format!("{}-lu-1", LEXICON);

        assert!(triples.contains(&format!(
            "<{LEXICON}> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/lemon/lime#Lexicon> ."
        )));
        assert!(triples.contains(&format!(
            "<{le}-form> <http://www.w3.org/ns/lemon/ontolex#writtenRep> \"president\"@nl ."
        )));
        assert!(triples.contains(&format!(
            "<{le}> <http://www.lexinfo.net/ontology/2.0/lexinfo#partOfSpeech> <http://www.lexinfo.net/ontology/2.0/lexinfo#noun> ."
        )));
        assert!(triples.contains(&format!(
            "<{le}> <http://www.w3.org/ns/lemon/ontolex#evokes> <http://premon.fbk.eu/resource/fn17-appellations> ."
        )));
        assert!(triples.contains(&format!(
            "<{lu}> <http://purl.org/dc/terms/created> \"2019-02-21T00:00:00Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> ."
        )));
        assert!(triples.contains(&format!(
            "<{lu}> <http://www.w3.org/2004/02/skos/core#definition> \"definition of president\"@nl ."
        )));
    }

    #[test]
    fn test_compound_subterms() {
        let fixture = Fixture::new();
        let president = fixture.add_singleton("president", "N", "Appellations");
        let verkiezing = fixture.add_singleton("verkiezing", "N", "Change_of_leadership");

        let mut first = lexeme("1", "president", "N");
        first.insert("lu_id".to_string(), json!(president.to_string()));
        let mut third = lexeme("3", "verkiezing", "N");
        third.insert("lu_id".to_string(), json!(verkiezing.to_string()));
        let request = AddLuRequest::new(
            "presidentsverkiezing.n",
            "Change_of_leadership",
            "N",
            vec![first, lexeme("2", "s", "I"), third],
        )
        .with_lu_type("endocentric compound");
        assert!(framenet_lexicon::add_lu(&fixture.target, &fixture.context, &request).unwrap());

        let compound = get_luid(&fixture.load(), "Change_of_leadership", "presidentsverkiezing", "N")
            .id()
            .unwrap();
        let compound_le = fixture.load().lu(compound).unwrap().lemma_id.unwrap();

        let triples = export(&fixture);
        for component_le in [1, 2] {
            assert!(triples.contains(&format!(
                "<{LEXICON}-le-{compound_le}> <http://www.w3.org/ns/lemon/decomp#subterm> <{LEXICON}-le-{component_le}> ."
            )));
        }
    }
}
