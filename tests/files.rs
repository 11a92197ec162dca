//! Loading fixture files from disk, querying them, and writing them back out.

use std::path::{Path, PathBuf};

use gedtree::{
    domain::CharSet,
    load,
    storage::{json, writer},
    Config, Document, ErrorKind, LoadError, Xref,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn family() -> Document {
    load(&fixture("family.ged"), &Config::default()).unwrap()
}

fn names(document: &Document, generations: &gedtree::Generations) -> Vec<Vec<String>> {
    generations
        .iter()
        .map(|generation| {
            generation
                .iter()
                .map(|&id| document.individual(id).unwrap().full_name())
                .collect()
        })
        .collect()
}

fn person(document: &Document, xref: &str) -> gedtree::IndividualId {
    document
        .individual_by_xref(&Xref::new(xref).unwrap())
        .unwrap()
}

#[test]
fn minimal_fixture_loads() {
    let document = load(&fixture("minimal.ged"), &Config::default()).unwrap();

    assert_eq!(document.header.encoding, Some(CharSet::Ascii));
    assert_eq!(document.submitter().unwrap().xref().as_str(), "@SUBMITTER@");
    assert!(document.individuals().is_empty());
}

#[test]
fn family_fixture_loads_header_and_submitter() {
    let document = family();

    assert_eq!(document.header.source, "FamilyTreeMaker");
    assert!((document.header.version - 5.5).abs() < f32::EPSILON);
    assert_eq!(document.header.fields.len(), 1);

    let submitter = document.header_submitter().unwrap();
    assert_eq!(submitter.name, "Ada Archivist");
    assert_eq!(
        submitter.address_lines().collect::<Vec<_>>(),
        ["12 Elm Row", "Dublin"]
    );
}

#[test]
fn family_fixture_loads_records() {
    let document = family();
    assert_eq!(document.individuals().len(), 6);
    assert_eq!(document.families().len(), 2);

    let thomas = document.individual(person(&document, "@I1@")).unwrap();
    assert_eq!(thomas.full_name(), "Thomas Walsh");
    assert_eq!(thomas.events.len(), 2);
    assert_eq!(thomas.events[0].place.as_deref(), Some("Cork"));
    assert_eq!(thomas.events[1].date.as_deref(), Some("1921"));
    assert_eq!(thomas.events[1].place, None);

    let marriage = &document.families()[0].events[0];
    assert_eq!(marriage.kind, "MARR");
    assert_eq!(marriage.date.as_deref(), Some("1875"));
}

#[test]
fn descendants_by_generation() {
    let document = family();
    let thomas = person(&document, "@I1@");

    assert_eq!(
        names(&document, &document.descendants(thomas, 5)),
        [
            vec!["Patrick Walsh".to_string(), "Bridget Walsh".to_string()],
            vec!["Sean Walsh".to_string()],
        ]
    );
    assert_eq!(names(&document, &document.descendants(thomas, 1)).len(), 1);
}

#[test]
fn ancestors_by_generation() {
    let document = family();
    let sean = person(&document, "@I6@");

    assert_eq!(
        names(&document, &document.ancestors(sean, 5)),
        [
            vec!["Patrick Walsh".to_string(), "Nora Kelly".to_string()],
            vec!["Thomas Walsh".to_string(), "Mary Byrne".to_string()],
        ]
    );
}

#[test]
fn line_endings_do_not_matter() {
    let text = std::fs::read_to_string(fixture("family.ged")).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("crlf.ged");
    std::fs::write(&path, text.replace('\n', "\r\n")).unwrap();

    assert_eq!(load(&path, &Config::default()).unwrap(), family());
}

#[test]
fn written_file_loads_back_unchanged() {
    let document = family();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("copy.ged");

    writer::save(&document, &path).unwrap();

    assert_eq!(load(&path, &Config::default()).unwrap(), document);
}

#[test]
fn generations_render_as_json() {
    let document = family();
    let sean = person(&document, "@I6@");

    assert_eq!(
        json::generations_to_json(&document, &document.ancestors(sean, 1)),
        r#"[[{"givenName":"Patrick","surname":"Walsh"},{"givenName":"Nora","surname":"Kelly"}]]"#
    );
}

#[test]
fn missing_file_is_a_file_access_error() {
    let error = load(&fixture("absent.ged"), &Config::default()).unwrap_err();

    assert!(matches!(error, LoadError::NotFound(_)));
    assert_eq!(error.kind(), ErrorKind::FileAccess);
}

#[test]
fn truncated_file_fails_without_a_line() {
    let text = std::fs::read_to_string(fixture("family.ged")).unwrap();
    let truncated = text.replace("0 TRLR\n", "");
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("truncated.ged");
    std::fs::write(&path, truncated).unwrap();

    let error = load(&path, &Config::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);
    assert_eq!(error.line(), None);
}
