//! Generation-bounded ancestor and descendant queries.
//!
//! Both queries build one bucket per generation, nearest first. A bucket holds
//! each individual at most once, but the same individual may appear in more
//! than one bucket when the tree reaches them at several distances. Traversal
//! stops at the generation limit or at the first empty generation, so it
//! terminates even if the graph contains a cycle.

use crate::domain::{
    list::{Capabilities, List},
    record::{individual_refs, Family, IndividualId},
    Document,
};

/// Individuals at one distance from the starting individual.
pub type Generation = List<IndividualId>;

/// Generations ordered nearest first.
pub type Generations = List<Generation>;

fn generations() -> Generations {
    List::new(Capabilities {
        stringify: |generation: &Generation| format!("[{}]", generation.stringify()),
        destroy: drop,
        compare: |a: &Generation, b: &Generation| a.len().cmp(&b.len()),
    })
}

/// Children of every family in which `person` is a spouse, then their
/// children, up to `max_generations` generations.
#[must_use]
pub fn descendants(document: &Document, person: IndividualId, max_generations: usize) -> Generations {
    collect(document, person, max_generations, |family, member, bucket| {
        if family.has_spouse(member) {
            for &child in family.children() {
                push_unique(bucket, child);
            }
        }
    })
}

/// Husband and wife of every family in which `person` is a child, then their
/// parents, up to `max_generations` generations.
#[must_use]
pub fn ancestors(document: &Document, person: IndividualId, max_generations: usize) -> Generations {
    collect(document, person, max_generations, |family, member, bucket| {
        if family.children().contains(&member) {
            for parent in family.parents() {
                push_unique(bucket, parent);
            }
        }
    })
}

/// Builds generations level by level.
///
/// `step` adds to the bucket being built every relative that one family
/// contributes for one member of the previous generation.
fn collect<F>(
    document: &Document,
    person: IndividualId,
    max_generations: usize,
    mut step: F,
) -> Generations
where
    F: FnMut(&Family, IndividualId, &mut Generation),
{
    let mut result = generations();
    let mut seeds = individual_refs();
    seeds.insert_back(person);

    while result.len() < max_generations {
        let mut bucket = individual_refs();
        for &member in &seeds {
            for family in document.families() {
                step(family, member, &mut bucket);
            }
        }

        if bucket.is_empty() {
            break;
        }

        tracing::trace!(
            generation = result.len(),
            size = bucket.len(),
            "collected generation"
        );
        seeds = bucket.clone();
        result.insert_back(bucket);
    }

    result
}

fn push_unique(bucket: &mut Generation, person: IndividualId) {
    if !bucket.contains(&person) {
        bucket.insert_back(person);
    }
}
