//! Shared fixtures: a miniature English source lexicon and an initialized
//! (empty) target lexicon, both inside a temp dir.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use framenet_lexicon::{
    initialize, AddLuRequest, LexiconConfig, LexiconContext, Lexicon, RawLexeme,
};

const NS: &str = "http://framenet.icsi.berkeley.edu";
const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

struct SourceFrame {
    id: u64,
    name: &'static str,
    fes: &'static [&'static str],
    /// (LU id, lemma, POS, lemma id)
    lus: &'static [(u64, &'static str, &'static str, u64)],
}

const SOURCE_FRAMES: &[SourceFrame] = &[
    SourceFrame {
        id: 1,
        name: "Appellations",
        fes: &["Title", "Name", "Type"],
        // title.n is lexicalized twice on purpose
        lus: &[(101, "title", "N", 501), (106, "title", "N", 501)],
    },
    SourceFrame {
        id: 2,
        name: "People_by_origin",
        fes: &["Origin", "Person"],
        lus: &[(102, "American", "N", 502)],
    },
    SourceFrame {
        id: 3,
        name: "Change_of_leadership",
        fes: &["Function", "New_leader", "Old_leader"],
        lus: &[(10900, "election", "N", 503)],
    },
    SourceFrame {
        id: 4,
        name: "Giving",
        fes: &["Donor", "Recipient", "Theme"],
        lus: &[(104, "give", "V", 504)],
    },
    SourceFrame {
        id: 5,
        name: "Leadership",
        fes: &["Leader", "Governed"],
        lus: &[(105, "leader", "N", 505)],
    },
    SourceFrame {
        id: 6,
        name: "Sound_makers",
        fes: &["Sound_maker", "Sound"],
        lus: &[],
    },
];

fn fe_elements(frame: &SourceFrame) -> String {
    frame
        .fes
        .iter()
        .enumerate()
        .map(|(i, fe)| {
            format!(
                r#"  <FE bgColor="FF0000" fgColor="FFFFFF" coreType="Core" cBy="MLC" abbrev="{abbrev}" name="{fe}" ID="{id}"><definition>The {fe}.</definition></FE>"#,
                abbrev = &fe[..3],
                id = frame.id * 100 + i as u64,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_frame(root: &Path, frame: &SourceFrame) {
    let lexunits: String = frame
        .lus
        .iter()
        .map(|(id, lemma, pos, lemma_id)| {
            format!(
                r#"  <lexUnit status="Finished_Initial" POS="{pos}" name="{lemma}.{lower}" ID="{id}" lemmaID="{lemma_id}" cBy="MLC" cDate="02/21/2001 10:24:08 PST Wed">
    <definition>COD: {lemma}</definition>
    <sentenceCount annotated="10" total="12"/>
    <lexeme order="1" headword="false" breakBefore="false" POS="{pos}" name="{lemma}"/>
  </lexUnit>"#,
                lower = pos.to_lowercase(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="frame.xsl"?>
<frame xmlns="{NS}" xmlns:xsi="{XSI}" xsi:schemaLocation="../schema/frame.xsd" cBy="MLC" cDate="01/01/2001 00:00:00 PST Mon" name="{name}" ID="{id}">
  <definition>&lt;def-root&gt;The {name} frame.&lt;/def-root&gt;</definition>
{fes}
{lexunits}
</frame>
"#,
        name = frame.name,
        id = frame.id,
        fes = fe_elements(frame),
    );
    fs::write(root.join("frame").join(format!("{}.xml", frame.name)), content).unwrap();
}

fn write_lu_file(root: &Path, frame: &SourceFrame, id: u64, lemma: &str, pos: &str) {
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="lexUnit.xsl"?>
<lexUnit xmlns="{NS}" xmlns:xsi="{XSI}" xsi:schemaLocation="../schema/lexUnit.xsd" status="Finished_Initial" POS="{pos}" name="{lemma}.{lower}" ID="{id}" frame="{frame_name}" frameID="{frame_id}" totalAnnotated="10">
  <header>
    <corpus description="British National Corpus" name="BNC" ID="1"/>
    <frame>
{fes}
    </frame>
  </header>
  <definition>COD: {lemma}</definition>
  <lexeme order="1" headword="false" breakBefore="false" POS="{pos}" name="{lemma}"/>
  <semType name="Human" ID="5"/>
  <valences>
    <FERealization total="3"/>
  </valences>
  <subCorpus name="N-other"/>
</lexUnit>
"#,
        lower = pos.to_lowercase(),
        frame_name = frame.name,
        frame_id = frame.id,
        fes = fe_elements(frame),
    );
    fs::write(root.join("lu").join(format!("lu{}.xml", id)), content).unwrap();
}

/// Writes the English source lexicon under `root`.
pub fn write_source_lexicon(root: &Path) {
    fs::create_dir_all(root.join("frame")).unwrap();
    fs::create_dir_all(root.join("lu")).unwrap();

    for (file, content) in [
        ("frRelation.xml", format!(r#"<?xml version="1.0" encoding="UTF-8"?><frameRelations xmlns="{NS}"/>"#)),
        ("semTypes.xml", format!(r#"<?xml version="1.0" encoding="UTF-8"?><semTypes xmlns="{NS}"><semType name="Human" ID="5"/></semTypes>"#)),
        ("frameIndex.xsl", "<xsl/>".to_string()),
        ("luIndex.xsl", "<xsl/>".to_string()),
        ("frame/frame.xsl", "<xsl/>".to_string()),
        ("fulltextIndex.xsl", "<xsl/>".to_string()),
        ("fulltextIndex.xml", format!(r#"<?xml version="1.0" encoding="UTF-8"?>
<fulltextIndex xmlns="{NS}" xmlns:xsi="{XSI}" xsi:schemaLocation="schema/fulltextIndex.xsd">
  <corpus description="American National Corpus Texts" name="ANC" ID="195">
    <document description="110CYL067" name="110CYL067" ID="23890"/>
  </corpus>
</fulltextIndex>
"#)),
        ("lu/lexUnit.xsl", "<xsl/>".to_string()),
    ] {
        fs::write(root.join(file), content).unwrap();
    }

    let frame_rows: String = SOURCE_FRAMES
        .iter()
        .map(|f| format!(r#"  <frame cDate="01/01/2001 00:00:00 PST Mon" name="{}" ID="{}"/>"#, f.name, f.id))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(
        root.join("frameIndex.xml"),
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<frameIndex xmlns=\"{NS}\">\n{frame_rows}\n</frameIndex>\n"
        ),
    )
    .unwrap();

    let mut lu_rows = Vec::new();
    for frame in SOURCE_FRAMES {
        write_frame(root, frame);
        for (id, lemma, pos, _) in frame.lus {
            write_lu_file(root, frame, *id, lemma, pos);
            lu_rows.push(format!(
                r#"  <lu status="Finished_Initial" name="{lemma}.{lower}" ID="{id}" frameName="{name}" frameID="{frame_id}" hasAnnotation="true" numAnnotInstances="10"/>"#,
                lower = pos.to_lowercase(),
                name = frame.name,
                frame_id = frame.id,
            ));
        }
    }
    fs::write(
        root.join("luIndex.xml"),
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<luIndex xmlns=\"{NS}\" xmlns:xsi=\"{XSI}\" xsi:schemaLocation=\"schema/luIndex.xsd\">\n  <legend><statusType name=\"Created\"/></legend>\n{}\n</luIndex>\n",
            lu_rows.join("\n")
        ),
    )
    .unwrap();
}

/// A source lexicon plus an empty target initialized from it.
pub struct Fixture {
    _temp_dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
    pub context: LexiconContext,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(LexiconConfig::default())
    }

    pub fn with_config(config: LexiconConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("fn_en");
        let target = temp_dir.path().join("fn_nl");

        write_source_lexicon(&source);
        let source_lexicon = Lexicon::load(&source).expect("Failed to load source lexicon");
        initialize(&target, &source_lexicon).expect("Failed to initialize target lexicon");

        Self {
            _temp_dir: temp_dir,
            source,
            target,
            context: LexiconContext::new(config, source_lexicon),
        }
    }

    pub fn load(&self) -> Lexicon {
        Lexicon::load(&self.target).expect("Failed to load target lexicon")
    }

    /// Adds a single-lexeme LU and returns its id.
    pub fn add_singleton(&self, lemma: &str, pos: &str, frame: &str) -> u64 {
        let request = singleton(lemma, pos, frame);
        assert!(framenet_lexicon::add_lu(&self.target, &self.context, &request).unwrap());
        framenet_lexicon::get_luid(&self.load(), frame, lemma, pos)
            .id()
            .expect("added LU not found")
    }

    /// Contents of every file under the target lexicon.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect_files(&self.target, &mut files);
        files
    }
}

fn collect_files(dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            files.insert(path.clone(), fs::read(&path).unwrap());
        }
    }
}

pub fn lexeme(order: &str, name: &str, pos: &str) -> RawLexeme {
    raw(json!({
        "order": order,
        "headword": "false",
        "breakBefore": "false",
        "POS": pos,
        "name": name,
    }))
}

pub fn raw(value: serde_json::Value) -> RawLexeme {
    value.as_object().cloned().expect("lexeme must be a JSON object")
}

pub fn singleton(lemma: &str, pos: &str, frame: &str) -> AddLuRequest {
    AddLuRequest::new(
        format!("{}.{}", lemma, pos.to_lowercase()),
        frame,
        pos,
        vec![lexeme("1", lemma, pos)],
    )
    .with_definition(format!("definition of {}", lemma))
}
