//! Linking collected cross-references into handles.
//!
//! Individuals are linked to their families first, then families to their
//! members, then the header to the submitter. The first reference that names
//! no record aborts the whole document.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    domain::{Document, Membership, Xref},
    storage::{
        error::{Cause, ParseError},
        parser::{Reference, Unresolved},
    },
};

/// Turns every pending reference into a handle.
///
/// # Errors
///
/// Returns a graph consistency error for the first reference that does not
/// name a record of the expected kind.
#[instrument(skip_all, fields(
    individuals = unresolved.individuals.len(),
    families = unresolved.families.len(),
))]
pub(crate) fn resolve(unresolved: Unresolved) -> Result<Document, ParseError> {
    let Unresolved {
        mut document,
        individuals,
        families,
        individual_index,
        family_index,
        header_submitter,
    } = unresolved;

    for (individual, pending) in document.individuals.iter_mut().zip(&individuals) {
        for link in &pending.families {
            let family = lookup(&family_index, &link.reference)?;
            individual.families.insert_back(Membership {
                family,
                role: link.role,
            });
        }
    }
    debug!("linked individuals to families");

    for (family, pending) in document.families.iter_mut().zip(&families) {
        family.husband = pending
            .husband
            .as_ref()
            .map(|reference| lookup(&individual_index, reference))
            .transpose()?;
        family.wife = pending
            .wife
            .as_ref()
            .map(|reference| lookup(&individual_index, reference))
            .transpose()?;
        for reference in &pending.children {
            family
                .children
                .insert_back(lookup(&individual_index, reference)?);
        }
    }
    debug!("linked families to members");

    if let Some(reference) = header_submitter {
        let matches = document
            .submitter
            .as_ref()
            .is_some_and(|submitter| submitter.xref == reference.xref);
        if !matches {
            return Err(ParseError::at(
                reference.line,
                Cause::UnmatchedSubmitter(reference.xref),
            ));
        }
        document.header.has_submitter = true;
    }

    Ok(document)
}

fn lookup<Id: Copy>(index: &BTreeMap<Xref, Id>, reference: &Reference) -> Result<Id, ParseError> {
    index.get(&reference.xref).copied().ok_or_else(|| {
        ParseError::at(
            reference.line,
            Cause::DanglingReference {
                tag: reference.tag,
                xref: reference.xref.clone(),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Config, FamilyId, IndividualId, Role},
        storage::parser::read,
        ErrorKind,
    };

    const HEADER: &str = "0 HEAD\n1 SOUR PAF\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n1 SUBM @U1@\n0 @U1@ SUBM\n1 NAME Jo\n";

    fn resolve_text(body: &str) -> Result<Document, ParseError> {
        let text = format!("{HEADER}{body}0 TRLR\n");
        resolve(read(&text, &Config::default())?)
    }

    #[test]
    fn links_both_directions() {
        let document = resolve_text(
            "0 @I1@ INDI\n1 FAMS @F1@\n0 @I2@ INDI\n1 FAMS @F1@\n0 @I3@ INDI\n1 FAMC @F1@\n0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n1 CHIL @I3@\n",
        )
        .unwrap();

        let family = &document.families()[0];
        assert_eq!(family.husband(), Some(IndividualId(0)));
        assert_eq!(family.wife(), Some(IndividualId(1)));
        assert_eq!(family.children().iter().copied().collect::<Vec<_>>(), [IndividualId(2)]);

        let child = &document.individuals()[2];
        assert_eq!(child.child_families().collect::<Vec<_>>(), [FamilyId(0)]);
        assert_eq!(child.spouse_families().count(), 0);
        assert!(document.header.has_submitter());
    }

    #[test]
    fn memberships_keep_the_role_of_each_reference() {
        let document = resolve_text(
            "0 @I1@ INDI\n1 FAMC @F1@\n1 FAMS @F2@\n0 @F1@ FAM\n0 @F2@ FAM\n",
        )
        .unwrap();

        let memberships: Vec<_> = document.individuals()[0].families().iter().copied().collect();
        assert_eq!(
            memberships,
            [
                Membership {
                    family: FamilyId(0),
                    role: Role::Child,
                },
                Membership {
                    family: FamilyId(1),
                    role: Role::Spouse,
                },
            ]
        );
    }

    #[test]
    fn forward_references_resolve() {
        let document =
            resolve_text("0 @F1@ FAM\n1 CHIL @I1@\n0 @I1@ INDI\n1 FAMC @F1@\n").unwrap();
        assert_eq!(document.families()[0].children().len(), 1);
    }

    #[test]
    fn dangling_family_reference_fails() {
        let error = resolve_text("0 @I1@ INDI\n1 FAMS @F9@\n").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::GraphConsistency);
        assert_eq!(error.line(), Some(10));
        assert_eq!(
            error.cause(),
            &Cause::DanglingReference {
                tag: "FAMS",
                xref: Xref::new("@F9@").unwrap(),
            }
        );
    }

    #[test]
    fn dangling_member_reference_fails() {
        let error = resolve_text("0 @F1@ FAM\n1 WIFE @I7@\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::GraphConsistency);
        assert_eq!(error.line(), Some(10));
    }

    #[test]
    fn family_xref_does_not_satisfy_individual_reference() {
        let error = resolve_text("0 @F1@ FAM\n1 CHIL @F1@\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::GraphConsistency);
    }

    #[test]
    fn unmatched_header_submitter_fails() {
        let text = "0 HEAD\n1 SOUR PAF\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n1 SUBM @U2@\n0 @U1@ SUBM\n1 NAME Jo\n0 TRLR\n";
        let error = resolve(read(text, &Config::default()).unwrap()).unwrap_err();

        assert_eq!(error.cause(), &Cause::UnmatchedSubmitter(Xref::new("@U2@").unwrap()));
        assert_eq!(error.line(), Some(6));
    }

    #[test]
    fn missing_submitter_record_fails() {
        let text = "0 HEAD\n1 SOUR PAF\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n1 SUBM @U1@\n0 TRLR\n";
        let error = resolve(read(text, &Config::default()).unwrap()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::GraphConsistency);
    }
}
