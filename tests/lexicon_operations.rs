//! Integration tests for adding, removing and looking up lexical units.
//!
//! Every test runs against a fresh lexicon initialized from the miniature
//! English source lexicon in `common`.

mod common;

use std::fs;

use serde_json::json;

use common::{lexeme, raw, singleton, Fixture};
use framenet_lexicon::{
    add_lu, check_consistency, get_luid, remove_lu, AddLuRequest, DuplicatePolicy, LexiconConfig,
    LexiconError, LuidLookup, ValidationError,
};

fn assert_consistent(fixture: &Fixture) {
    let report = check_consistency(&fixture.target).unwrap();
    assert!(report.is_consistent(), "{:?}", report.issues);
}

// ============================================================================
// Initialization
// ============================================================================

mod initialize {
    use super::*;

    #[test]
    fn test_target_keeps_frames_without_lus() {
        let fixture = Fixture::new();
        let lexicon = fixture.load();

        assert_eq!(lexicon.frames().count(), 6);
        assert_eq!(lexicon.lu_count(), 0);
        assert!(lexicon.lu_ids_and_names().is_empty());

        let frame = lexicon.frame_by_name("People_by_origin").unwrap();
        assert!(frame.has_fe("Origin"));
        assert!(!frame.is_lexical());
    }

    #[test]
    fn test_static_files_copied() {
        let fixture = Fixture::new();
        for file in [
            "frRelation.xml",
            "frameIndex.xml",
            "frameIndex.xsl",
            "luIndex.xsl",
            "semTypes.xml",
            "frame/frame.xsl",
            "lu/lexUnit.xsl",
        ] {
            assert!(fixture.target.join(file).exists(), "{}", file);
        }
        let lu_files: Vec<_> = fs::read_dir(fixture.target.join("lu"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "xml"))
            .collect();
        assert!(lu_files.is_empty());
    }

    #[test]
    fn test_initialize_replaces_existing_directory() {
        let fixture = Fixture::new();
        fixture.add_singleton("president", "N", "Appellations");

        let source = framenet_lexicon::Lexicon::load(&fixture.source).unwrap();
        framenet_lexicon::initialize(&fixture.target, &source).unwrap();

        assert_eq!(fixture.load().lu_count(), 0);
        assert_consistent(&fixture);
    }
}

// ============================================================================
// Adding LUs
// ============================================================================

mod add {
    use super::*;

    #[test]
    fn test_round_trip_add_and_lookup() {
        let fixture = Fixture::new();
        let request = AddLuRequest::new(
            "president.n",
            "Appellations",
            "N",
            vec![lexeme("1", "president", "N")],
        )
        .with_status("Created")
        .with_provenance("manual");

        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());

        let lexicon = fixture.load();
        let lookup = get_luid(&lexicon, "Appellations", "president", "N");
        assert_eq!(lookup, LuidLookup::Found(1));
        assert_eq!(lookup.reason(), "success");

        let lu = lexicon.lu(1).unwrap();
        assert_eq!(lu.name, "president.n");
        assert_eq!(lu.frame_name, "Appellations");
        assert_eq!(lu.created_by.as_deref(), Some("manual"));
        assert_eq!(lu.lemma_id, Some(1));
        assert_consistent(&fixture);
    }

    #[test]
    fn test_lu_file_cloned_from_template() {
        let fixture = Fixture::new();
        let id = fixture.add_singleton("Mexicaan", "N", "People_by_origin");

        let content = fs::read_to_string(fixture.target.join(format!("lu/lu{}.xml", id))).unwrap();
        assert!(content.starts_with("<?xml"));
        assert!(content.contains("name=\"Mexicaan.n\""));
        assert!(content.contains("totalAnnotated=\"0\""));
        assert!(content.contains("frame=\"People_by_origin\""));
        assert!(!content.contains("subCorpus"));
        assert!(!content.contains("British National Corpus"));
        assert!(!content.contains("name=\"American\""));
    }

    #[test]
    fn test_duplicate_is_refused() {
        let fixture = Fixture::new();
        let request = singleton("Mexicaan", "N", "People_by_origin");

        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());
        let before = fixture.snapshot();

        assert!(!add_lu(&fixture.target, &fixture.context, &request).unwrap());
        assert_eq!(fixture.load().lu_count(), 1);
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn test_duplicate_abort_policy() {
        let fixture = Fixture::with_config(
            LexiconConfig::default().with_duplicate_policy(DuplicatePolicy::Abort),
        );
        let request = singleton("Mexicaan", "N", "People_by_origin");

        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());
        let err = add_lu(&fixture.target, &fixture.context, &request).unwrap_err();
        assert!(matches!(err, LexiconError::Duplicate { ref frame, .. } if frame == "People_by_origin"));
    }

    #[test]
    fn test_same_lemma_in_other_frame_is_allowed() {
        let fixture = Fixture::new();
        let first = fixture.add_singleton("leider", "N", "Leadership");
        let second = fixture.add_singleton("leider", "N", "Appellations");

        assert_ne!(first, second);
        let lexicon = fixture.load();
        assert_eq!(lexicon.frames_by_lemma("leider.n").len(), 2);
        assert_eq!(lexicon.lu(first).unwrap().lemma_id, lexicon.lu(second).unwrap().lemma_id);
        assert_consistent(&fixture);
    }

    #[test]
    fn test_incorporated_fe_and_extra_attributes_written() {
        let fixture = Fixture::new();
        let request = singleton("Duitser", "N", "People_by_origin")
            .with_incorporated_fe("Origin")
            .with_extra(framenet_lexicon::ExtraAttributes::new().with("rbn_sense", "r_n-11800"));

        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());

        let lexicon = fixture.load();
        let lu = lexicon.lu(1).unwrap();
        assert_eq!(lu.incorporated_fe.as_deref(), Some("Origin"));
        assert_eq!(lu.extra.get("rbn_sense"), Some("r_n-11800"));

        let lu_index = fs::read_to_string(fixture.target.join("luIndex.xml")).unwrap();
        assert!(lu_index.contains("rbn_sense=\"r_n-11800\""));
        let lu_file = fs::read_to_string(fixture.target.join("lu/lu1.xml")).unwrap();
        assert!(lu_file.contains("incorporatedFE=\"Origin\""));
    }

    #[test]
    fn test_timestamp_recorded_as_cdate() {
        let fixture = Fixture::new();
        let timestamp = framenet_lexicon::timestamp::from_ymd(2019, 2, 21).unwrap();
        let request = singleton("president", "N", "Appellations").with_timestamp(timestamp);
        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());

        let lexicon = fixture.load();
        assert_eq!(
            lexicon.lu(1).unwrap().created_date.as_deref(),
            Some("02/21/2019 00:00:00 UTC Thu")
        );
    }

    #[test]
    fn test_phrasal_verb_particle_without_pos() {
        let fixture = Fixture::new();
        let request = AddLuRequest::new(
            "aanbieden.v",
            "Giving",
            "V",
            vec![
                raw(json!({"order": "1", "headword": "false", "breakBefore": "false", "name": "aan"})),
                raw(json!({"order": "2", "headword": "true", "breakBefore": "true", "POS": "V", "name": "bieden"})),
            ],
        )
        .with_lu_type("phrasal");

        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());
        let lexicon = fixture.load();
        let lu = lexicon.lu(1).unwrap();
        assert_eq!(lu.lexemes.len(), 2);
        assert_eq!(lu.lexemes[0].pos, None);
    }

    #[test]
    fn test_frame_without_template_lu() {
        let fixture = Fixture::new();
        let request = singleton("toeter", "N", "Sound_makers");
        let before = fixture.snapshot();

        let err = add_lu(&fixture.target, &fixture.context, &request).unwrap_err();
        assert!(matches!(err, LexiconError::MissingTemplate { .. }));
        assert_eq!(fixture.snapshot(), before);
    }
}

// ============================================================================
// Validation before any write
// ============================================================================

mod validation {
    use super::*;

    fn validation_errors(request: &AddLuRequest) -> Vec<ValidationError> {
        let fixture = Fixture::new();
        let before = fixture.snapshot();
        let err = add_lu(&fixture.target, &fixture.context, request).unwrap_err();
        assert_eq!(fixture.snapshot(), before, "a rejected request touched the lexicon");
        match err {
            LexiconError::Validation(errors) => errors,
            other => panic!("expected a validation error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_frame_with_suggestion() {
        let errors = validation_errors(&singleton("geven", "V", "Givin"));
        assert_eq!(
            errors,
            vec![ValidationError::UnknownFrame {
                name: "Givin".to_string(),
                suggestion: Some("Giving".to_string()),
            }]
        );
    }

    #[test]
    fn test_enum_errors_are_aggregated() {
        let request = singleton("geven", "V", "Giving")
            .with_status("new")
            .with_lu_type("blabla");
        let errors = validation_errors(&request);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::EnumMismatch { .. })));
    }

    #[test]
    fn test_lu_name_pos_must_match() {
        let request = AddLuRequest::new(
            "geven.n",
            "Giving",
            "V",
            vec![lexeme("1", "geven", "V")],
        );
        let errors = validation_errors(&request);
        assert!(matches!(errors[0], ValidationError::LemmaPosMismatch { .. }));
    }

    #[test]
    fn test_incorporated_fe_must_belong_to_frame() {
        let request = singleton("Duitser", "N", "People_by_origin").with_incorporated_fe("Donor");
        let errors = validation_errors(&request);
        assert!(matches!(
            errors[0],
            ValidationError::IncorporatedFeNotInFrame { .. }
        ));
    }

    #[test]
    fn test_singleton_needs_one_lexeme() {
        let request = AddLuRequest::new(
            "give up.v",
            "Giving",
            "V",
            vec![lexeme("1", "give", "V"), lexeme("2", "up", "PREP")],
        );
        let errors = validation_errors(&request);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::CardinalityViolation { .. })));
    }

    #[test]
    fn test_broken_lexeme_order() {
        let request = AddLuRequest::new(
            "presidentsverkiezing.n",
            "Change_of_leadership",
            "N",
            vec![lexeme("1", "president", "N"), lexeme("1", "verkiezing", "N")],
        )
        .with_lu_type("endocentric compound");
        let errors = validation_errors(&request);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::OrderIntegrityViolation { .. })));
    }

    #[test]
    fn test_zero_padded_order_is_rejected() {
        let request = AddLuRequest::new(
            "presidentsverkiezing.n",
            "Change_of_leadership",
            "N",
            vec![lexeme("01", "president", "N"), lexeme("2", "verkiezing", "N")],
        )
        .with_lu_type("endocentric compound");
        let errors = validation_errors(&request);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::OrderIntegrityViolation { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::LexemeSchemaViolation { index: 0, .. })));
    }

    #[test]
    fn test_dangling_lu_id_backref() {
        let mut first = lexeme("1", "president", "N");
        first.insert("lu_id".to_string(), json!("12345"));
        let request = AddLuRequest::new(
            "presidentsverkiezing.n",
            "Change_of_leadership",
            "N",
            vec![first, lexeme("2", "s", "I"), lexeme("3", "verkiezing", "N")],
        )
        .with_lu_type("endocentric compound");
        let errors = validation_errors(&request);
        assert!(matches!(
            errors[0],
            ValidationError::LexemeSchemaViolation { index: 0, .. }
        ));
    }
}

// ============================================================================
// Compounds and removal
// ============================================================================

mod compounds {
    use super::*;

    struct Compound {
        fixture: Fixture,
        president: u64,
        verkiezing: u64,
        compound: u64,
    }

    fn compound_request(lu_name: &str, president: u64, verkiezing: u64) -> AddLuRequest {
        let lexemes = vec![
            raw(json!({
                "order": "1", "headword": "false", "breakBefore": "false", "POS": "N",
                "name": "president", "incorporatedFE": "Function", "lu_id": president.to_string()
            })),
            lexeme("2", "s", "I"),
            raw(json!({
                "order": "3", "headword": "true", "breakBefore": "false", "POS": "N",
                "name": "verkiezing", "lu_id": verkiezing.to_string()
            })),
        ];
        AddLuRequest::new(lu_name, "Change_of_leadership", "N", lexemes)
            .with_definition("het proces van het kiezen van een president.")
            .with_lu_type("endocentric compound")
            .with_incorporated_fe("Function")
    }

    fn setup() -> Compound {
        let fixture = Fixture::new();
        let president = fixture.add_singleton("president", "N", "Appellations");
        let verkiezing = fixture.add_singleton("verkiezing", "N", "Change_of_leadership");

        let request = compound_request("presidentsverkiezing.n", president, verkiezing);
        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());
        let compound = get_luid(&fixture.load(), "Change_of_leadership", "presidentsverkiezing", "N")
            .id()
            .unwrap();

        Compound {
            fixture,
            president,
            verkiezing,
            compound,
        }
    }

    #[test]
    fn test_compound_keeps_backrefs() {
        let setup = setup();
        let lexicon = setup.fixture.load();
        let lu = lexicon.lu(setup.compound).unwrap();

        let backrefs: Vec<_> = lu.lexemes.iter().filter_map(|l| l.lu_id).collect();
        assert_eq!(backrefs, vec![setup.president, setup.verkiezing]);
        assert_eq!(lu.lu_type.as_deref(), Some("endocentric compound"));
        assert_consistent(&setup.fixture);
    }

    #[test]
    fn test_compound_name_must_concatenate() {
        let setup = setup();
        let request = compound_request("presidentverkiezing.n", setup.president, setup.verkiezing);
        let err = add_lu(&setup.fixture.target, &setup.fixture.context, &request).unwrap_err();
        match err {
            LexiconError::Validation(errors) => assert!(matches!(
                errors[0],
                ValidationError::LemmaReconstructionMismatch { .. }
            )),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_referenced_lu_cannot_be_removed() {
        let setup = setup();
        let before = setup.fixture.snapshot();

        let err = remove_lu(&setup.fixture.target, &LexiconConfig::default(), setup.president)
            .unwrap_err();
        match err {
            LexiconError::ReferentialIntegrity {
                lu_id,
                referenced_by,
            } => {
                assert_eq!(lu_id, setup.president);
                assert_eq!(referenced_by, vec![setup.compound]);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(setup.fixture.snapshot(), before);
    }

    #[test]
    fn test_remove_compound_then_components() {
        let setup = setup();
        let config = LexiconConfig::default();
        let target = &setup.fixture.target;

        assert!(remove_lu(target, &config, setup.compound).unwrap());
        assert_consistent(&setup.fixture);
        assert!(remove_lu(target, &config, setup.president).unwrap());
        assert!(remove_lu(target, &config, setup.verkiezing).unwrap());
        assert_consistent(&setup.fixture);

        let lexicon = setup.fixture.load();
        assert_eq!(lexicon.lu_count(), 0);
        assert!(!target.join(format!("lu/lu{}.xml", setup.compound)).exists());
        assert_eq!(
            get_luid(&lexicon, "Appellations", "president", "N"),
            LuidLookup::NotFound
        );
    }
}

mod remove {
    use super::*;

    #[test]
    fn test_remove_unknown_id() {
        let fixture = Fixture::new();
        let err = remove_lu(&fixture.target, &LexiconConfig::default(), 77).unwrap_err();
        assert!(matches!(err, LexiconError::NotFound { .. }));
    }

    #[test]
    fn test_drifted_lexicon_is_not_touched() {
        let fixture = Fixture::new();
        let id = fixture.add_singleton("president", "N", "Appellations");
        fs::remove_file(fixture.target.join(format!("lu/lu{}.xml", id))).unwrap();

        let report = check_consistency(&fixture.target).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].lu_id, id);
        assert_eq!(report.issues[0].occurrences.lu_files, 0);

        let before = fixture.snapshot();
        let err = remove_lu(&fixture.target, &LexiconConfig::default(), id).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::ConsistencyViolation { expected: 1, found: 0, .. }
        ));
        assert_eq!(fixture.snapshot(), before);
    }
}

// ============================================================================
// Lookup and locking
// ============================================================================

mod lookup {
    use super::*;

    #[test]
    fn test_ambiguous_lookup_is_reported() {
        let fixture = Fixture::new();
        let source = framenet_lexicon::Lexicon::load(&fixture.source).unwrap();

        let lookup = get_luid(&source, "Appellations", "title", "N");
        assert_eq!(lookup, LuidLookup::Ambiguous([101, 106].into_iter().collect()));
        assert_eq!(lookup.id(), None);

        assert_eq!(
            get_luid(&source, "Change_of_leadership", "election", "N"),
            LuidLookup::Found(10900)
        );
        assert_eq!(
            get_luid(&source, "Leadership", "election", "N"),
            LuidLookup::NotFound
        );
    }
}

mod locking {
    use super::*;
    use framenet_lexicon::writer::LexiconLock;

    #[test]
    fn test_locked_lexicon_rejects_writers() {
        let fixture = Fixture::with_config(LexiconConfig::default().with_lock(true));
        let lock = LexiconLock::acquire(&fixture.target.join(".lexicon.lock")).unwrap();

        let request = singleton("president", "N", "Appellations");
        let err = add_lu(&fixture.target, &fixture.context, &request).unwrap_err();
        assert!(matches!(err, LexiconError::Locked(_)));

        drop(lock);
        assert!(add_lu(&fixture.target, &fixture.context, &request).unwrap());
        assert_consistent(&fixture);
    }
}

// ============================================================================
// Document fidelity
// ============================================================================

mod document_fidelity {
    use super::*;

    const SCHEMA_LOCATION: &str = "xsi:schemaLocation=";
    const XSI_DECLARATION: &str = r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#;

    fn read(fixture: &Fixture, file: &str) -> String {
        fs::read_to_string(fixture.target.join(file)).unwrap()
    }

    fn assert_schema_kept(content: &str, location: &str) {
        assert!(content.contains(XSI_DECLARATION), "{}", content);
        assert!(
            content.contains(&format!(r#"{SCHEMA_LOCATION}"{location}""#)),
            "{}",
            content
        );
    }

    #[test]
    fn test_initialize_keeps_schema_location() {
        let fixture = Fixture::new();

        let giving = read(&fixture, "frame/Giving.xml");
        assert_schema_kept(&giving, "../schema/frame.xsd");
        assert!(giving.contains(r#"<?xml-stylesheet type="text/xsl" href="frame.xsl"?>"#));
        assert!(giving.contains("&lt;def-root&gt;The Giving frame.&lt;/def-root&gt;"));
        assert!(!giving.contains("lexUnit"));

        assert_schema_kept(&read(&fixture, "luIndex.xml"), "schema/luIndex.xsd");
    }

    #[test]
    fn test_add_keeps_schema_location() {
        let fixture = Fixture::new();
        let id = fixture.add_singleton("geven", "V", "Giving");

        assert_schema_kept(&read(&fixture, "frame/Giving.xml"), "../schema/frame.xsd");
        assert_schema_kept(&read(&fixture, "luIndex.xml"), "schema/luIndex.xsd");

        let lu_file = read(&fixture, &format!("lu/lu{}.xml", id));
        assert_schema_kept(&lu_file, "../schema/lexUnit.xsd");
        assert!(lu_file.contains(r#"<?xml-stylesheet type="text/xsl" href="lexUnit.xsl"?>"#));
        assert!(!lu_file.contains("schemaLocation=\"../schema/frame.xsd\""));
        assert_consistent(&fixture);
    }

    #[test]
    fn test_remove_keeps_schema_location() {
        let fixture = Fixture::new();
        let id = fixture.add_singleton("geven", "V", "Giving");
        assert!(remove_lu(&fixture.target, &LexiconConfig::default(), id).unwrap());

        assert_schema_kept(&read(&fixture, "frame/Giving.xml"), "../schema/frame.xsd");
        assert_schema_kept(&read(&fixture, "luIndex.xml"), "schema/luIndex.xsd");
        assert_eq!(fixture.load().lu_count(), 0);
    }
}
