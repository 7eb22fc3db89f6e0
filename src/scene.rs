use glam::Vec3;
use log::debug;

use crate::element;
use crate::error::{Result, ViewerError};

/// Pairs closer than this are treated as overlapping duplicates, not bonds.
const MIN_BOND_DISTANCE: f32 = 0.4;
const BOND_TOLERANCE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub position: Vec3,
    pub atomic_number: u32,
    pub radius: f32,
}

impl Atom {
    pub fn new(position: Vec3, atomic_number: u32, radius: f32) -> Self {
        Self {
            position,
            atomic_number,
            radius,
        }
    }

    /// Atom drawn at its element's covalent radius.
    pub fn with_element(position: Vec3, atomic_number: u32) -> Self {
        Self::new(
            position,
            atomic_number,
            element::covalent_radius(atomic_number),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
}

impl Bond {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

/// The molecular system being viewed. Owned by the caller; the viewer only
/// ever borrows it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    pub fn from_parts(name: impl Into<String>, atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self {
            name: name.into(),
            atoms,
            bonds,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn push_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn push_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    /// Mean of all atom positions.
    pub fn centroid(&self) -> Result<Vec3> {
        if self.atoms.is_empty() {
            return Err(ViewerError::InvalidScene(
                "cannot compute the centroid of a scene without atoms".to_string(),
            ));
        }
        let sum = self
            .atoms
            .iter()
            .fold(Vec3::ZERO, |acc, atom| acc + atom.position);
        Ok(sum / self.atoms.len() as f32)
    }

    /// Checks that every bond references existing atoms.
    pub fn validate_bonds(&self) -> Result<()> {
        let count = self.atoms.len();
        for (index, bond) in self.bonds.iter().enumerate() {
            if bond.a >= count || bond.b >= count {
                return Err(ViewerError::InvalidScene(format!(
                    "bond {index} references atoms {}-{} but the scene has {count} atoms",
                    bond.a, bond.b
                )));
            }
        }
        Ok(())
    }

    /// Connects every pair of atoms whose separation is within tolerance of
    /// the sum of their covalent radii. Returns the number of bonds added.
    pub fn perceive_bonds(&mut self) -> usize {
        let before = self.bonds.len();
        for i in 0..self.atoms.len() {
            let a = self.atoms[i];
            let radius_a = element::covalent_radius(a.atomic_number);
            for j in (i + 1)..self.atoms.len() {
                let b = self.atoms[j];
                let cutoff = (radius_a + element::covalent_radius(b.atomic_number)) * BOND_TOLERANCE;
                let distance = a.position.distance(b.position);
                if distance > MIN_BOND_DISTANCE && distance <= cutoff {
                    self.bonds.push(Bond::new(i, j));
                }
            }
        }
        let added = self.bonds.len() - before;
        debug!("perceived {added} bonds among {} atoms", self.atoms.len());
        added
    }
}
