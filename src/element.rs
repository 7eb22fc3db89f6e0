//! Per-element lookup tables: symbols, covalent radii and display colors.

/// Element symbols indexed by atomic number minus one (H through U).
const SYMBOLS: [&str; 92] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U",
];

pub const HYDROGEN: u32 = 1;
pub const CARBON: u32 = 6;
pub const NITROGEN: u32 = 7;
pub const OXYGEN: u32 = 8;
pub const SULFUR: u32 = 16;

pub const HYDROGEN_COLOR: [f32; 3] = [0.9, 0.9, 0.9];
pub const CARBON_COLOR: [f32; 3] = [0.1, 0.5, 0.5];
pub const NITROGEN_COLOR: [f32; 3] = [0.1, 0.3, 0.9];
pub const OXYGEN_COLOR: [f32; 3] = [0.9, 0.2, 0.1];
pub const SULFUR_COLOR: [f32; 3] = [1.0, 0.83, 0.36];
pub const DEFAULT_COLOR: [f32; 3] = [0.1, 0.1, 0.1];

const DEFAULT_COVALENT_RADIUS: f32 = 1.2;

/// Display color for an atomic number. Total over all inputs.
pub fn element_color(atomic_number: u32) -> [f32; 3] {
    match atomic_number {
        HYDROGEN => HYDROGEN_COLOR,
        CARBON => CARBON_COLOR,
        NITROGEN => NITROGEN_COLOR,
        OXYGEN => OXYGEN_COLOR,
        SULFUR => SULFUR_COLOR,
        _ => DEFAULT_COLOR,
    }
}

/// Resolves an element symbol case-insensitively ("CL", "cl" and "Cl" all
/// give 17).
pub fn atomic_number(symbol: &str) -> Option<u32> {
    let symbol = symbol.trim();
    SYMBOLS
        .iter()
        .position(|known| known.eq_ignore_ascii_case(symbol))
        .map(|index| index as u32 + 1)
}

pub fn symbol(atomic_number: u32) -> Option<&'static str> {
    let index = (atomic_number as usize).checked_sub(1)?;
    SYMBOLS.get(index).copied()
}

/// Covalent radius in angstroms, used for bond perception and as the display
/// radius when a structure file carries none.
pub fn covalent_radius(atomic_number: u32) -> f32 {
    match atomic_number {
        1 => 0.31,
        2 => 0.28,
        3 => 1.28,
        4 => 0.96,
        5 => 0.84,
        6 => 0.76,
        7 => 0.71,
        8 => 0.66,
        9 => 0.57,
        10 => 0.58,
        11 => 1.66,
        12 => 1.41,
        13 => 1.21,
        14 => 1.11,
        15 => 1.07,
        16 => 1.05,
        17 => 1.02,
        18 => 1.06,
        19 => 2.03,
        20 => 1.76,
        26 => 1.32,
        29 => 1.32,
        30 => 1.22,
        34 => 1.20,
        35 => 1.20,
        53 => 1.39,
        _ => DEFAULT_COVALENT_RADIUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_color_mapping() {
        assert_eq!(element_color(1), [0.9, 0.9, 0.9]);
        assert_eq!(element_color(6), [0.1, 0.5, 0.5]);
        assert_eq!(element_color(7), [0.1, 0.3, 0.9]);
        assert_eq!(element_color(8), [0.9, 0.2, 0.1]);
        assert_eq!(element_color(16), [1.0, 0.83, 0.36]);
    }

    #[test]
    fn unknown_elements_fall_back_to_gray() {
        assert_eq!(element_color(999), DEFAULT_COLOR);
        assert_eq!(element_color(0), DEFAULT_COLOR);
        assert_eq!(element_color(26), DEFAULT_COLOR);
    }

    #[test]
    fn color_lookup_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(element_color(CARBON), CARBON_COLOR);
            assert_eq!(element_color(999), DEFAULT_COLOR);
        }
    }

    #[test]
    fn symbols_resolve_case_insensitively() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("cl"), Some(17));
        assert_eq!(atomic_number(" FE "), Some(26));
        assert_eq!(atomic_number("Xe"), Some(54));
        assert_eq!(atomic_number("HG"), Some(80));
        assert_eq!(atomic_number("Pt"), Some(78));
        assert_eq!(atomic_number("u"), Some(92));
        assert_eq!(atomic_number("Zz"), None);
        assert_eq!(symbol(8), Some("O"));
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(79), Some("Au"));
        assert_eq!(symbol(93), None);
        assert_eq!(symbol(200), None);
    }

    #[test]
    fn covalent_radius_has_default() {
        assert_eq!(covalent_radius(6), 0.76);
        assert_eq!(covalent_radius(999), DEFAULT_COVALENT_RADIUS);
    }
}
