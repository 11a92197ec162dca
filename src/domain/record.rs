//! Individual, family, and event records.
//!
//! Records own their events and opaque fields. Links between individuals and
//! families are held as [`IndividualId`]/[`FamilyId`] handles into the
//! [`Document`](crate::Document)'s collections, never as a second owner.

use std::{cmp::Ordering, fmt};

use crate::domain::{
    list::{Capabilities, List},
    Xref,
};

/// Tags that open a standard event on an individual or family.
pub const EVENT_TAGS: [&str; 5] = ["BIRT", "DEAT", "MARR", "CHR", "BURI"];

/// Tag of the generic event.
pub const GENERIC_EVENT_TAG: &str = "EVEN";

/// Whether `tag` opens an event record.
#[must_use]
pub fn is_event_tag(tag: &str) -> bool {
    tag == GENERIC_EVENT_TAG || EVENT_TAGS.contains(&tag)
}

/// Handle to an [`Individual`] owned by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndividualId(pub(crate) usize);

impl IndividualId {
    /// Position of the individual in the document's individual collection.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "individual #{}", self.0)
    }
}

/// Handle to a [`Family`] owned by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FamilyId(pub(crate) usize);

impl FamilyId {
    /// Position of the family in the document's family collection.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "family #{}", self.0)
    }
}

/// An uninterpreted `(tag, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The GEDCOM tag.
    pub tag: String,
    /// Everything after the tag on the line.
    pub value: String,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// An empty field collection.
    #[must_use]
    pub fn list() -> List<Self> {
        List::new(Capabilities {
            stringify: |field: &Self| format!("- {}: {}\n", field.tag, field.value),
            destroy: drop,
            compare: |a: &Self, b: &Self| a.tag.cmp(&b.tag).then_with(|| a.value.cmp(&b.value)),
        })
    }
}

/// A dated, placed occurrence such as a birth or marriage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The tag that opened the event, e.g. `BIRT` or `EVEN`.
    pub kind: String,
    /// Free-text date.
    pub date: Option<String>,
    /// Free-text place.
    pub place: Option<String>,
    /// Subtags not otherwise interpreted.
    pub fields: List<Field>,
}

impl Event {
    /// Creates an event with no date, place, or fields.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            date: None,
            place: None,
            fields: Field::list(),
        }
    }

    /// An empty event collection.
    #[must_use]
    pub fn list() -> List<Self> {
        List::new(Capabilities {
            stringify: ToString::to_string,
            destroy: drop,
            compare: |a: &Self, b: &Self| {
                a.kind
                    .cmp(&b.kind)
                    .then_with(|| a.date.cmp(&b.date))
                    .then_with(|| a.place.cmp(&b.place))
            },
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "type = {}", self.kind)?;
        if let Some(date) = &self.date {
            writeln!(f, "date = {date}")?;
        }
        if let Some(place) = &self.place {
            writeln!(f, "place = {place}")?;
        }
        for field in &self.fields {
            writeln!(f, "- {}: {}", field.tag, field.value)?;
        }
        Ok(())
    }
}

/// How an individual belongs to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Husband or wife (`FAMS`).
    Spouse,
    /// Child (`FAMC`).
    Child,
}

impl Role {
    /// The individual-side tag recording this membership.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Spouse => "FAMS",
            Self::Child => "FAMC",
        }
    }

    /// The role recorded by an individual-side tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FAMS" => Some(Self::Spouse),
            "FAMC" => Some(Self::Child),
            _ => None,
        }
    }
}

/// A resolved family membership of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Membership {
    /// The family.
    pub family: FamilyId,
    /// The individual's role in it.
    pub role: Role,
}

impl Membership {
    /// An empty membership collection.
    #[must_use]
    pub fn list() -> List<Self> {
        List::new(Capabilities {
            stringify: |membership: &Self| format!("{} {}\n", membership.role.tag(), membership.family),
            destroy: drop,
            compare: Ord::cmp,
        })
    }
}

/// A person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub(crate) xref: Xref,
    /// Given name; empty when unknown.
    pub given_name: String,
    /// Surname; empty when unknown.
    pub surname: String,
    /// Events such as birth and death.
    pub events: List<Event>,
    /// Subtags not otherwise interpreted.
    pub fields: List<Field>,
    pub(crate) families: List<Membership>,
}

impl Individual {
    /// Creates an individual with no events, fields, or family links.
    #[must_use]
    pub fn new(xref: Xref, given_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            xref,
            given_name: given_name.into(),
            surname: surname.into(),
            events: Event::list(),
            fields: Field::list(),
            families: Membership::list(),
        }
    }

    /// The record identifier.
    #[must_use]
    pub const fn xref(&self) -> &Xref {
        &self.xref
    }

    /// Every family this individual belongs to, in record order.
    #[must_use]
    pub const fn families(&self) -> &List<Membership> {
        &self.families
    }

    /// Families in which this individual is a spouse.
    pub fn spouse_families(&self) -> impl Iterator<Item = FamilyId> + '_ {
        self.families_with_role(Role::Spouse)
    }

    /// Families in which this individual is a child.
    pub fn child_families(&self) -> impl Iterator<Item = FamilyId> + '_ {
        self.families_with_role(Role::Child)
    }

    fn families_with_role(&self, role: Role) -> impl Iterator<Item = FamilyId> + '_ {
        self.families
            .iter()
            .filter(move |membership| membership.role == role)
            .map(|membership| membership.family)
    }

    /// Given name and surname separated by a space, skipping empty parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.given_name.is_empty(), self.surname.is_empty()) {
            (false, false) => format!("{} {}", self.given_name, self.surname),
            (false, true) => self.given_name.clone(),
            (true, false) => self.surname.clone(),
            (true, true) => String::new(),
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Given name: {}", self.given_name)?;
        writeln!(f, "Surname: {}", self.surname)?;
        writeln!(f, "Events:")?;
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        for field in &self.fields {
            writeln!(f, "- {}: {}", field.tag, field.value)?;
        }
        Ok(())
    }
}

/// A couple and their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub(crate) xref: Xref,
    pub(crate) husband: Option<IndividualId>,
    pub(crate) wife: Option<IndividualId>,
    pub(crate) children: List<IndividualId>,
    /// Events such as marriage.
    pub events: List<Event>,
    /// Subtags not otherwise interpreted.
    pub fields: List<Field>,
}

impl Family {
    /// Creates a family with no members, events, or fields.
    #[must_use]
    pub fn new(xref: Xref) -> Self {
        Self {
            xref,
            husband: None,
            wife: None,
            children: individual_refs(),
            events: Event::list(),
            fields: Field::list(),
        }
    }

    /// The record identifier.
    #[must_use]
    pub const fn xref(&self) -> &Xref {
        &self.xref
    }

    /// The husband, if recorded.
    #[must_use]
    pub const fn husband(&self) -> Option<IndividualId> {
        self.husband
    }

    /// The wife, if recorded.
    #[must_use]
    pub const fn wife(&self) -> Option<IndividualId> {
        self.wife
    }

    /// The husband and wife that are present, husband first.
    pub fn parents(&self) -> impl Iterator<Item = IndividualId> {
        self.husband.into_iter().chain(self.wife)
    }

    /// The children, in record order.
    #[must_use]
    pub const fn children(&self) -> &List<IndividualId> {
        &self.children
    }

    /// Whether `person` is the husband or the wife.
    #[must_use]
    pub fn has_spouse(&self, person: IndividualId) -> bool {
        self.husband == Some(person) || self.wife == Some(person)
    }
}

/// An empty collection of non-owning individual references.
#[must_use]
pub fn individual_refs() -> List<IndividualId> {
    List::new(Capabilities::ordered())
}

/// Orders records by identifier.
pub(crate) fn compare_xrefs(a: &Xref, b: &Xref) -> Ordering {
    a.cmp(b)
}
