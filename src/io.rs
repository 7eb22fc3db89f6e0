//! Structure file readers: XYZ and the PDB family (PDB, PQR, PDBQT).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::{debug, info, warn};

use crate::element;
use crate::error::{Result, ViewerError};
use crate::scene::{Atom, Bond, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Xyz,
    Pdb,
    /// PDB with per-atom charge and radius columns.
    Pqr,
    /// PDB with charge and AutoDock atom type columns.
    Pdbqt,
}

impl StructureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xyz" => Some(Self::Xyz),
            "pdb" | "ent" => Some(Self::Pdb),
            "pqr" => Some(Self::Pqr),
            "pdbqt" => Some(Self::Pdbqt),
            _ => None,
        }
    }
}

/// Reads a structure file, choosing the parser from its extension.
pub fn load_scene(path: &Path) -> Result<Scene> {
    let format = StructureFormat::from_path(path).ok_or_else(|| ViewerError::Parse {
        path: path.to_path_buf(),
        line: 0,
        message: "unrecognised structure file extension (expected xyz, pdb, pqr or pdbqt)"
            .to_string(),
    })?;
    let contents = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = path.display().to_string();
    let scene = parse_structure(&contents, format, &source)?;
    info!(
        "loaded {} ({:?}): {} atoms, {} bonds",
        source,
        format,
        scene.atom_count(),
        scene.bond_count()
    );
    Ok(scene)
}

pub fn parse_structure(contents: &str, format: StructureFormat, source: &str) -> Result<Scene> {
    match format {
        StructureFormat::Xyz => read_xyz(contents, source),
        _ => read_pdb(contents, format, source),
    }
}

pub fn parse_xyz(contents: &str) -> Result<Scene> {
    read_xyz(contents, "<xyz>")
}

pub fn parse_pdb(contents: &str) -> Result<Scene> {
    read_pdb(contents, StructureFormat::Pdb, "<pdb>")
}

fn parse_error(source: &str, line: usize, message: impl Into<String>) -> ViewerError {
    ViewerError::Parse {
        path: PathBuf::from(source),
        line,
        message: message.into(),
    }
}

fn read_xyz(contents: &str, source: &str) -> Result<Scene> {
    let mut lines = contents.lines();
    let count_line = lines
        .next()
        .ok_or_else(|| parse_error(source, 1, "missing atom count"))?;
    let atom_count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| parse_error(source, 1, "invalid atom count"))?;

    let comment_line = lines
        .next()
        .ok_or_else(|| parse_error(source, 2, "missing comment line"))?;

    let mut scene = Scene::new(comment_line.trim());
    for (index, line) in lines.enumerate() {
        if scene.atom_count() >= atom_count {
            break;
        }
        let line_number = index + 3;
        let mut parts = line.split_whitespace();
        let label = parts
            .next()
            .ok_or_else(|| parse_error(source, line_number, "missing element"))?;
        let atomic_number = label
            .parse::<u32>()
            .ok()
            .or_else(|| element::atomic_number(label))
            .ok_or_else(|| parse_error(source, line_number, format!("unknown element {label:?}")))?;
        let mut coordinate = |axis: &str| -> Result<f32> {
            parts
                .next()
                .ok_or_else(|| parse_error(source, line_number, format!("missing {axis}")))?
                .parse()
                .map_err(|_| parse_error(source, line_number, format!("invalid {axis}")))
        };
        let x = coordinate("x")?;
        let y = coordinate("y")?;
        let z = coordinate("z")?;
        scene.push_atom(Atom::with_element(Vec3::new(x, y, z), atomic_number));
    }

    if scene.atom_count() != atom_count {
        return Err(parse_error(
            source,
            0,
            format!(
                "atom count {atom_count} does not match {} data lines",
                scene.atom_count()
            ),
        ));
    }

    scene.perceive_bonds();
    Ok(scene)
}

/// Slice of a fixed-column record, tolerant of short lines.
fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

fn autodock_element(atom_type: &str) -> &str {
    match atom_type {
        "A" => "C",
        "OA" | "OS" => "O",
        "NA" | "NS" => "N",
        "HD" | "HS" => "H",
        "SA" => "S",
        other => other,
    }
}

/// Element implied by the atom name field (columns 13-16) and residue name.
///
/// Two-letter elements are left-justified into column 13 ("ZN  ", "CL  ")
/// while one-letter elements start in column 14 (" CA " is an alpha carbon).
/// Ions whose residue repeats the atom name are two-letter as well, which
/// covers files that do not keep the alignment. Four-character names starting
/// in column 13 with `H` are hydrogens ("HG21").
fn element_from_name(raw_name: &str, residue: &str) -> Option<u32> {
    let name = raw_name.trim();
    let letters: String = name
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect();
    let left_justified = raw_name.starts_with(|c: char| c.is_ascii_alphabetic());
    let long_hydrogen = name.len() == 4 && name.starts_with(['H', 'h']);
    let is_ion = letters.eq_ignore_ascii_case(residue.trim());

    if letters.len() >= 2 && ((left_justified && !long_hydrogen) || is_ion) {
        if let Some(number) = letters.get(..2).and_then(element::atomic_number) {
            return Some(number);
        }
    }
    let letter = letters.chars().find(|c| c.is_ascii_alphabetic())?;
    element::atomic_number(&letter.to_string())
}

fn read_pdb(contents: &str, format: StructureFormat, source: &str) -> Result<Scene> {
    let mut scene = Scene::new(source);
    let mut serial_to_index: HashMap<u32, usize> = HashMap::new();
    let mut connections: Vec<(usize, u32, u32)> = Vec::new();
    let mut title = String::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let record = column(line, 0, 6).trim();
        match record {
            "TITLE" => {
                if !title.is_empty() {
                    title.push(' ');
                }
                title.push_str(column(line, 10, line.len()).trim());
            }
            "ATOM" | "HETATM" => {
                let atom = read_atom_record(line, line_number, format, source)?;
                let atom_index = scene.push_atom(atom);
                if let Ok(serial) = column(line, 6, 11).trim().parse::<u32>() {
                    serial_to_index.insert(serial, atom_index);
                }
            }
            "CONECT" => {
                let Ok(from) = column(line, 6, 11).trim().parse::<u32>() else {
                    return Err(parse_error(source, line_number, "invalid CONECT serial"));
                };
                for start in (11..31).step_by(5) {
                    if let Ok(to) = column(line, start, start + 5).trim().parse::<u32>() {
                        connections.push((line_number, from, to));
                    }
                }
            }
            "ENDMDL" | "END" => break,
            _ => {}
        }
    }

    if !title.is_empty() {
        scene.name = title;
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for (line_number, from, to) in connections {
        let (Some(&a), Some(&b)) = (serial_to_index.get(&from), serial_to_index.get(&to)) else {
            return Err(parse_error(
                source,
                line_number,
                format!("CONECT references unknown atom serial {from} or {to}"),
            ));
        };
        if a != b && seen.insert((a.min(b), a.max(b))) {
            scene.push_bond(Bond::new(a.min(b), a.max(b)));
        }
    }

    if scene.bond_count() == 0 {
        scene.perceive_bonds();
    } else {
        debug!("{source}: {} bonds from CONECT records", scene.bond_count());
    }
    Ok(scene)
}

fn read_atom_record(
    line: &str,
    line_number: usize,
    format: StructureFormat,
    source: &str,
) -> Result<Atom> {
    let coordinate = |start: usize, axis: &str| -> Result<f32> {
        column(line, start, start + 8)
            .trim()
            .parse()
            .map_err(|_| parse_error(source, line_number, format!("invalid {axis} coordinate")))
    };
    let position = Vec3::new(coordinate(30, "x")?, coordinate(38, "y")?, coordinate(46, "z")?);
    let raw_name = column(line, 12, 16);
    let name = raw_name.trim();
    let residue = column(line, 17, 20);
    let extra: Vec<&str> = column(line, 54, line.len()).split_whitespace().collect();

    let (atomic_number, radius) = match format {
        StructureFormat::Pqr => {
            let radius = extra
                .last()
                .and_then(|value| value.parse::<f32>().ok())
                .ok_or_else(|| parse_error(source, line_number, "missing PQR radius"))?;
            (element_from_name(raw_name, residue), Some(radius))
        }
        StructureFormat::Pdbqt => {
            let atom_type = extra
                .last()
                .ok_or_else(|| parse_error(source, line_number, "missing PDBQT atom type"))?;
            (element::atomic_number(autodock_element(atom_type)), None)
        }
        _ => {
            let symbol = column(line, 76, 78).trim();
            let atomic_number = if symbol.is_empty() {
                element_from_name(raw_name, residue)
            } else {
                element::atomic_number(symbol).or_else(|| element_from_name(raw_name, residue))
            };
            (atomic_number, None)
        }
    };

    let atomic_number = atomic_number.unwrap_or_else(|| {
        warn!("{source}: line {line_number}: unknown element for atom {name:?}, drawing it gray");
        0
    });
    Ok(match radius {
        Some(radius) if radius > 0.0 => Atom::new(position, atomic_number, radius),
        _ => Atom::with_element(position, atomic_number),
    })
}
