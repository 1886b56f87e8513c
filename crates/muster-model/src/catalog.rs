// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Unit Catalog
//!
//! Unit type identifiers and their mapping to combat classes.
//!
//! The objective function reasons about four combat classes, but which raw
//! unit type belongs to which class is **configuration, not logic**: the host
//! supplies a `UnitCatalog` that maps its own opaque `UnitTypeId`s onto the
//! classes. This keeps the solver independent of any particular game's unit
//! roster.

use rustc_hash::FxHashMap;

/// An opaque unit type identifier supplied by the host.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct UnitTypeId(u32);

impl UnitTypeId {
    /// Creates a new `UnitTypeId` from a raw identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The combat class of a unit, as seen by the objective function.
///
/// The discriminant doubles as a dense array index for per-class counters.
#[repr(usize)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnitClass {
    /// Core line units (e.g. marines).
    Infantry = 0,
    /// Secondary-damage units (e.g. marauders).
    Grenadier = 1,
    /// Support units that keep others alive (e.g. medivacs).
    Medic = 2,
    /// Heavy siege units (e.g. siege tanks).
    Artillery = 3,
}

impl UnitClass {
    /// The number of distinct combat classes.
    pub const COUNT: usize = 4;

    /// All combat classes in discriminant order.
    pub const ALL: [UnitClass; Self::COUNT] = [
        UnitClass::Infantry,
        UnitClass::Grenadier,
        UnitClass::Medic,
        UnitClass::Artillery,
    ];

    /// Returns the dense array index of this class.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for UnitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitClass::Infantry => write!(f, "infantry"),
            UnitClass::Grenadier => write!(f, "grenadier"),
            UnitClass::Medic => write!(f, "medic"),
            UnitClass::Artillery => write!(f, "artillery"),
        }
    }
}

/// A mapping from host unit types to combat classes.
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    classes: FxHashMap<UnitTypeId, UnitClass>,
}

impl UnitCatalog {
    /// Creates a new, empty `UnitCatalog`.
    #[inline]
    pub fn new() -> Self {
        Self {
            classes: FxHashMap::default(),
        }
    }

    /// Registers a unit type under the given combat class.
    ///
    /// Re-registering an already known type overwrites its class and returns
    /// the previous one.
    #[inline]
    pub fn register(&mut self, unit_type: UnitTypeId, class: UnitClass) -> Option<UnitClass> {
        self.classes.insert(unit_type, class)
    }

    /// Returns the combat class of a unit type, or `None` if the type is not
    /// in the catalog.
    #[inline]
    pub fn class_of(&self, unit_type: UnitTypeId) -> Option<UnitClass> {
        self.classes.get(&unit_type).copied()
    }

    /// Returns the number of registered unit types.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the catalog contains no unit types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<(UnitTypeId, UnitClass)> for UnitCatalog {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (UnitTypeId, UnitClass)>,
    {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = UnitCatalog::new();
        assert!(catalog.is_empty());

        catalog.register(UnitTypeId::new(48), UnitClass::Infantry);
        catalog.register(UnitTypeId::new(54), UnitClass::Medic);

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.class_of(UnitTypeId::new(48)),
            Some(UnitClass::Infantry)
        );
        assert_eq!(
            catalog.class_of(UnitTypeId::new(54)),
            Some(UnitClass::Medic)
        );
        assert_eq!(catalog.class_of(UnitTypeId::new(33)), None);
    }

    #[test]
    fn test_register_overwrites_previous_class() {
        let mut catalog = UnitCatalog::new();
        assert_eq!(
            catalog.register(UnitTypeId::new(1), UnitClass::Grenadier),
            None
        );
        assert_eq!(
            catalog.register(UnitTypeId::new(1), UnitClass::Artillery),
            Some(UnitClass::Grenadier)
        );
        assert_eq!(
            catalog.class_of(UnitTypeId::new(1)),
            Some(UnitClass::Artillery)
        );
    }

    #[test]
    fn test_from_iterator() {
        let catalog: UnitCatalog = [
            (UnitTypeId::new(10), UnitClass::Infantry),
            (UnitTypeId::new(11), UnitClass::Artillery),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.class_of(UnitTypeId::new(11)),
            Some(UnitClass::Artillery)
        );
    }

    #[test]
    fn test_class_indices_are_dense() {
        for (expected, class) in UnitClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), expected);
        }
    }
}
