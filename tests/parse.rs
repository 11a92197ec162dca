//! Parsing documents through the public API: header gating, level rules,
//! reference resolution, and generation queries.

use std::sync::atomic::{AtomicUsize, Ordering};

use gedtree::{
    domain::{Capabilities, List},
    parse, Config, Document, ErrorKind, IndividualId, Xref,
};
use test_case::test_case;

const HEADER: &str = "0 HEAD\n1 SOUR test\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n1 SUBM @U1@\n";
const SUBMITTER: &str = "0 @U1@ SUBM\n1 NAME Tester\n";

fn with_body(body: &str) -> String {
    format!("{HEADER}{SUBMITTER}{body}0 TRLR\n")
}

fn parse_body(body: &str) -> Document {
    parse(&with_body(body), &Config::default()).unwrap()
}

fn id(document: &Document, xref: &str) -> IndividualId {
    document
        .individual_by_xref(&Xref::new(xref).unwrap())
        .unwrap()
}

fn xrefs(document: &Document, generations: &gedtree::Generations) -> Vec<Vec<String>> {
    generations
        .iter()
        .map(|generation| {
            generation
                .iter()
                .map(|&id| document.individual(id).unwrap().xref().to_string())
                .collect()
        })
        .collect()
}

#[test]
fn minimal_document_has_no_records() {
    let document = parse_body("");

    assert!(document.individuals().is_empty());
    assert!(document.families().is_empty());
    assert_eq!(document.header_submitter().unwrap().name, "Tester");
    assert_eq!(document.validate(), Ok(()));
}

#[test_case("INDI")]
#[test_case("FAM")]
#[test_case("SUBM")]
fn body_record_before_complete_header_fails(record: &str) {
    let text = format!("0 HEAD\n1 SOUR test\n1 CHAR UTF-8\n0 @X1@ {record}\n0 TRLR\n");
    let error = parse(&text, &Config::default()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::HeaderValidation);
    assert_eq!(error.line(), Some(4));
}

#[test]
fn body_record_without_header_fails() {
    let error = parse("0 @I1@ INDI\n0 TRLR\n", &Config::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::HeaderValidation);
}

#[test]
fn level_jump_fails_at_that_line() {
    let text = with_body("0 @I1@ INDI\n1 BIRT\n3 DATE 1900\n");
    let error = parse(&text, &Config::default()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Structural);
    assert_eq!(error.line(), Some(11));
}

#[test]
fn levels_may_return_to_any_shallower_level() {
    let document = parse_body(
        "0 @I1@ INDI\n1 BIRT\n2 DATE 1900\n2 SOUR @S1@\n3 PAGE 12\n1 NAME Ann /Lee/\n0 @I2@ INDI\n",
    );
    assert_eq!(document.individuals().len(), 2);
    assert_eq!(document.individuals()[0].surname, "Lee");
}

#[test_case("0 @I1@ INDI\n1 FAMC @F9@\n"; "famc")]
#[test_case("0 @I1@ INDI\n1 FAMS @F9@\n"; "fams")]
#[test_case("0 @F1@ FAM\n1 HUSB @I9@\n"; "husb")]
#[test_case("0 @F1@ FAM\n1 WIFE @I9@\n"; "wife")]
#[test_case("0 @F1@ FAM\n1 CHIL @I9@\n"; "chil")]
fn dangling_reference_fails_after_reading(body: &str) {
    let error = parse(&with_body(body), &Config::default()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::GraphConsistency);
    assert_eq!(error.line(), Some(10));
}

#[test]
fn input_without_trailer_fails() {
    let text = format!("{HEADER}{SUBMITTER}0 @I1@ INDI\n");
    let error = parse(&text, &Config::default()).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Structural);
    assert_eq!(error.line(), None);
}

#[test]
fn one_generation_each_way() {
    let document = parse_body(
        "0 @H@ INDI\n0 @W@ INDI\n0 @C1@ INDI\n0 @C2@ INDI\n0 @F1@ FAM\n1 HUSB @H@\n1 WIFE @W@\n1 CHIL @C1@\n1 CHIL @C2@\n",
    );
    let children = vec![vec!["@C1@".to_string(), "@C2@".to_string()]];
    let parents = vec![vec!["@H@".to_string(), "@W@".to_string()]];

    let husband = id(&document, "@H@");
    let wife = id(&document, "@W@");
    let child = id(&document, "@C1@");

    assert_eq!(xrefs(&document, &document.descendants(husband, 1)), children);
    assert_eq!(xrefs(&document, &document.descendants(wife, 1)), children);
    assert_eq!(xrefs(&document, &document.ancestors(child, 1)), parents);
}

#[test]
fn overlapping_child_appears_once() {
    let document = parse_body(
        "0 @P@ INDI\n0 @A@ INDI\n0 @B@ INDI\n0 @K@ INDI\n0 @L@ INDI\n\
         0 @F1@ FAM\n1 HUSB @P@\n1 WIFE @A@\n1 CHIL @K@\n\
         0 @F2@ FAM\n1 HUSB @P@\n1 WIFE @B@\n1 CHIL @K@\n1 CHIL @L@\n",
    );
    let person = id(&document, "@P@");

    assert_eq!(
        xrefs(&document, &document.descendants(person, 1)),
        vec![vec!["@K@".to_string(), "@L@".to_string()]]
    );
}

#[test]
fn membership_roles_follow_tags() {
    let document = parse_body(
        "0 @I1@ INDI\n1 FAMS @F1@\n0 @I2@ INDI\n1 FAMC @F1@\n0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n",
    );
    let family = document.family_by_xref(&Xref::new("@F1@").unwrap()).unwrap();

    let parent = document.individual(id(&document, "@I1@")).unwrap();
    let child = document.individual(id(&document, "@I2@")).unwrap();
    assert_eq!(parent.spouse_families().collect::<Vec<_>>(), [family]);
    assert_eq!(child.child_families().collect::<Vec<_>>(), [family]);
}

#[test]
fn clearing_destroys_each_element_once() {
    static DESTROYED: AtomicUsize = AtomicUsize::new(0);

    let mut list = List::new(Capabilities {
        stringify: |n: &u64| n.to_string(),
        destroy: |_| {
            DESTROYED.fetch_add(1, Ordering::SeqCst);
        },
        compare: Ord::cmp,
    });
    for n in 0..5 {
        list.insert_back(n);
    }

    list.clear();

    assert_eq!(DESTROYED.load(Ordering::SeqCst), 5);
    assert_eq!(list.len(), 0);
    assert!(list.front().is_none());
    assert!(list.back().is_none());
}
