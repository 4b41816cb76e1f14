// src/model/elements.rs
// Per-element reference data: display colors (Jmol, VESTA), radii, common oxidation states

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Channels in [0, 1], clamped and rounded
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// "#rrggbb"
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElementData {
    pub symbol: &'static str,
    pub atomic_number: u8,
    pub jmol: Rgb,
    pub vesta: Rgb,
    pub covalent_radius: f64,
    pub average_ionic_radius: Option<f64>,
    pub van_der_waals_radius: Option<f64>,
    /// Most common first
    pub oxidation_states: &'static [i8],
}

macro_rules! el {
    ($sym:expr, $z:expr, $jmol:expr, $vesta:expr, $cov:expr, $ion:expr, $vdw:expr, $oxi:expr) => {
        ElementData {
            symbol: $sym,
            atomic_number: $z,
            jmol: Rgb::from_hex($jmol),
            vesta: Rgb::from_hex($vesta),
            covalent_radius: $cov,
            average_ionic_radius: $ion,
            van_der_waals_radius: $vdw,
            oxidation_states: $oxi,
        }
    };
}

// Covalent radii: Cordero et al. (2008), Pyykko (2009) past Cm. vdW radii: Bondi / Alvarez.
// Average ionic radii: mean of Shannon radii over tabulated oxidation states.
#[rustfmt::skip]
static ELEMENTS: &[ElementData] = &[
    // --- Period 1 ---
    el!("H",  1,   0xFFFFFF, 0xFFCCCC, 0.31, None,        Some(1.20), &[1, -1]),
    el!("He", 2,   0xD9FFFF, 0xFCE8CE, 0.28, None,        Some(1.40), &[]),
    // --- Period 2 ---
    el!("Li", 3,   0xCC80FF, 0x86E074, 1.28, Some(0.90),  Some(1.82), &[1]),
    el!("Be", 4,   0xC2FF00, 0x5ED77B, 0.96, Some(0.59),  Some(1.53), &[2]),
    el!("B",  5,   0xFFB5B5, 0x1FA20F, 0.84, Some(0.41),  Some(1.92), &[3]),
    el!("C",  6,   0x909090, 0x4C4C4C, 0.76, Some(0.30),  Some(1.70), &[4, -4]),
    el!("N",  7,   0x3050F8, 0xB0B9E6, 0.71, Some(1.32),  Some(1.55), &[-3, 5, 3]),
    el!("O",  8,   0xFF0D0D, 0xFE0300, 0.66, Some(1.26),  Some(1.52), &[-2]),
    el!("F",  9,   0x90E050, 0xB0B9E6, 0.57, Some(1.19),  Some(1.47), &[-1]),
    el!("Ne", 10,  0xB3E3F5, 0xFE37B5, 0.58, None,        Some(1.54), &[]),
    // --- Period 3 ---
    el!("Na", 11,  0xAB5CF2, 0xF9DC3C, 1.66, Some(1.16),  Some(2.27), &[1]),
    el!("Mg", 12,  0x8AFF00, 0xFB7B15, 1.41, Some(0.86),  Some(1.73), &[2]),
    el!("Al", 13,  0xBFA6A6, 0x81B2D6, 1.21, Some(0.675), Some(1.84), &[3]),
    el!("Si", 14,  0xF0C8A0, 0x1B3BFA, 1.11, Some(0.54),  Some(2.10), &[4, -4]),
    el!("P",  15,  0xFF8000, 0xC09CC2, 1.07, Some(0.58),  Some(1.80), &[5, -3]),
    el!("S",  16,  0xFFFF30, 0xFFFA00, 1.05, Some(1.00),  Some(1.80), &[-2, 6]),
    el!("Cl", 17,  0x1FF01F, 0x31FC02, 1.02, Some(1.67),  Some(1.75), &[-1]),
    el!("Ar", 18,  0x80D1E3, 0xCFFEC4, 1.06, None,        Some(1.88), &[]),
    // --- Period 4 ---
    el!("K",  19,  0x8F40D4, 0xA121F6, 2.03, Some(1.52),  Some(2.75), &[1]),
    el!("Ca", 20,  0x3DFF00, 0x5A96BD, 1.76, Some(1.14),  Some(2.31), &[2]),
    el!("Sc", 21,  0xE6E6E6, 0xB563AB, 1.70, Some(0.885), Some(2.11), &[3]),
    el!("Ti", 22,  0xBFC2C7, 0x78CAFF, 1.60, Some(0.77),  None,       &[4, 3]),
    el!("V",  23,  0xA6A6AB, 0xE51900, 1.53, Some(0.69),  None,       &[5, 3, 4]),
    el!("Cr", 24,  0x8A99C7, 0x00009E, 1.39, Some(0.70),  None,       &[3, 6]),
    el!("Mn", 25,  0x9C7AC7, 0xA8089E, 1.39, Some(0.71),  None,       &[2, 4, 3]),
    el!("Fe", 26,  0xE06633, 0xB57100, 1.32, Some(0.74),  None,       &[3, 2]),
    el!("Co", 27,  0xF090A0, 0x0000AF, 1.26, Some(0.75),  None,       &[2, 3]),
    el!("Ni", 28,  0x50D050, 0xB7BBBD, 1.24, Some(0.77),  Some(1.63), &[2]),
    el!("Cu", 29,  0xC88033, 0x2247DC, 1.32, Some(0.80),  Some(1.40), &[2, 1]),
    el!("Zn", 30,  0x7D80B0, 0x8F8F81, 1.22, Some(0.88),  Some(1.39), &[2]),
    el!("Ga", 31,  0xC28F8F, 0x9EE373, 1.22, Some(0.76),  Some(1.87), &[3]),
    el!("Ge", 32,  0x668F8F, 0x7E6EA6, 1.20, Some(0.67),  Some(2.11), &[4]),
    el!("As", 33,  0xBD80E3, 0x74D057, 1.19, Some(0.60),  Some(1.85), &[5, -3]),
    el!("Se", 34,  0xFFA100, 0x9AEF0F, 1.20, Some(1.00),  Some(1.90), &[-2]),
    el!("Br", 35,  0xA62929, 0x7E3102, 1.20, Some(1.82),  Some(1.85), &[-1]),
    el!("Kr", 36,  0x5CB8D1, 0xFAC1F3, 1.16, None,        Some(2.02), &[]),
    // --- Period 5 ---
    el!("Rb", 37,  0x702EB0, 0xFF0099, 2.20, Some(1.66),  Some(3.03), &[1]),
    el!("Sr", 38,  0x00FF00, 0x00FF27, 1.95, Some(1.32),  Some(2.49), &[2]),
    el!("Y",  39,  0x94FFFF, 0x66988E, 1.90, Some(1.04),  None,       &[3]),
    el!("Zr", 40,  0x94E0E0, 0x00FF00, 1.75, Some(0.86),  None,       &[4]),
    el!("Nb", 41,  0x73C2C9, 0x4CB276, 1.64, Some(0.78),  None,       &[5]),
    el!("Mo", 42,  0x54B5B5, 0xB386AF, 1.54, Some(0.73),  None,       &[6, 4]),
    el!("Tc", 43,  0x3B9E9E, 0xCDAFCA, 1.47, Some(0.785), None,       &[7, 4]),
    el!("Ru", 44,  0x248F8F, 0xCFFEC4, 1.46, Some(0.72),  None,       &[4]),
    el!("Rh", 45,  0x0A7D8C, 0xCDD1AB, 1.42, Some(0.74),  None,       &[3]),
    el!("Pd", 46,  0x006985, 0xC1C4B9, 1.39, Some(0.90),  Some(1.63), &[2]),
    el!("Ag", 47,  0xC0C0C0, 0xB7BBBD, 1.45, Some(1.15),  Some(1.72), &[1]),
    el!("Cd", 48,  0xFFD98F, 0xF21EDC, 1.44, Some(1.09),  Some(1.58), &[2]),
    el!("In", 49,  0xA67573, 0xD780BB, 1.42, Some(0.94),  Some(1.93), &[3]),
    el!("Sn", 50,  0x668080, 0x9A8EB9, 1.39, Some(0.83),  Some(2.17), &[4, 2]),
    el!("Sb", 51,  0x9E63B5, 0xD7834F, 1.39, Some(0.80),  Some(2.06), &[5, 3]),
    el!("Te", 52,  0xD47A00, 0xADA251, 1.38, Some(1.07),  Some(2.06), &[-2]),
    el!("I",  53,  0x940094, 0x8E1F8A, 1.39, Some(1.20),  Some(1.98), &[-1]),
    el!("Xe", 54,  0x429EB0, 0x9AA1F8, 1.40, None,        Some(2.16), &[]),
    // --- Period 6 ---
    el!("Cs", 55,  0x57178F, 0x0EFEB9, 2.44, Some(1.81),  Some(3.43), &[1]),
    el!("Ba", 56,  0x00C900, 0x1EEF2C, 2.15, Some(1.49),  Some(2.68), &[2]),
    el!("La", 57,  0x70D4FF, 0x5AC449, 2.07, Some(1.17),  None,       &[3]),
    el!("Ce", 58,  0xFFFFC7, 0xD1FC06, 2.04, Some(1.08),  None,       &[3, 4]),
    el!("Pr", 59,  0xD9FFC7, 0xFCE105, 2.03, Some(1.13),  None,       &[3]),
    el!("Nd", 60,  0xC7FFC7, 0xFB8D06, 2.01, Some(1.12),  None,       &[3]),
    el!("Pm", 61,  0xA3FFC7, 0x0000F4, 1.99, Some(1.11),  None,       &[3]),
    el!("Sm", 62,  0x8FFFC7, 0xFC067D, 1.98, Some(1.098), None,       &[3]),
    el!("Eu", 63,  0x61FFC7, 0xFA07D5, 1.98, Some(1.20),  None,       &[3, 2]),
    el!("Gd", 64,  0x45FFC7, 0xC003FF, 1.96, Some(1.08),  None,       &[3]),
    el!("Tb", 65,  0x30FFC7, 0x7104FE, 1.94, Some(1.063), None,       &[3]),
    el!("Dy", 66,  0x1FFFC7, 0x3106FC, 1.92, Some(1.052), None,       &[3]),
    el!("Ho", 67,  0x00FF9C, 0x0741FB, 1.92, Some(1.041), None,       &[3]),
    el!("Er", 68,  0x00E675, 0x49723B, 1.89, Some(1.03),  None,       &[3]),
    el!("Tm", 69,  0x00D452, 0x0000E0, 1.90, Some(1.02),  None,       &[3]),
    el!("Yb", 70,  0x00BF38, 0x27FCF4, 1.87, Some(1.008), None,       &[3]),
    el!("Lu", 71,  0x00AB24, 0x26FDB5, 1.87, Some(1.001), None,       &[3]),
    el!("Hf", 72,  0x4DC2FF, 0xB4B359, 1.75, Some(0.85),  None,       &[4]),
    el!("Ta", 73,  0x4DA6FF, 0xB79A56, 1.70, Some(0.76),  None,       &[5]),
    el!("W",  74,  0x2194D6, 0x8D8A7F, 1.62, Some(0.70),  None,       &[6]),
    el!("Re", 75,  0x267DAB, 0xB3B08E, 1.51, Some(0.67),  None,       &[7]),
    el!("Os", 76,  0x266696, 0xC8B178, 1.44, Some(0.66),  None,       &[4]),
    el!("Ir", 77,  0x175487, 0xC9CE72, 1.41, Some(0.73),  None,       &[4]),
    el!("Pt", 78,  0xD0D0E0, 0xCBC5BF, 1.36, Some(0.75),  Some(1.75), &[4, 2]),
    el!("Au", 79,  0xFFD123, 0xFEB238, 1.36, Some(1.00),  Some(1.66), &[3, 1]),
    el!("Hg", 80,  0xB8B8D0, 0xD3B7CB, 1.32, Some(1.16),  Some(1.55), &[2]),
    el!("Tl", 81,  0xA6544D, 0x96896C, 1.45, Some(1.23),  Some(1.96), &[1]),
    el!("Pb", 82,  0x575961, 0x52535B, 1.46, Some(1.08),  Some(2.02), &[2, 4]),
    el!("Bi", 83,  0x9E4FB5, 0xD22FF7, 1.48, Some(1.17),  Some(2.07), &[3]),
    el!("Po", 84,  0xAB5C00, 0x0000FF, 1.40, Some(1.08),  Some(1.97), &[4, 2]),
    el!("At", 85,  0x754F45, 0x0000FF, 1.50, None,        Some(2.02), &[-1]),
    el!("Rn", 86,  0x428296, 0xFFFF00, 1.50, None,        Some(2.20), &[]),
    // --- Period 7 ---
    el!("Fr", 87,  0x420066, 0x000000, 2.60, Some(1.94),  Some(3.48), &[1]),
    el!("Ra", 88,  0x007D00, 0x6DA958, 2.21, Some(1.62),  Some(2.83), &[2]),
    el!("Ac", 89,  0x70ABFA, 0x649E72, 2.15, Some(1.26),  None,       &[3]),
    el!("Th", 90,  0x00BAFF, 0x25FD78, 2.06, Some(1.08),  None,       &[4]),
    el!("Pa", 91,  0x00A1FF, 0x29FA35, 2.00, Some(1.04),  None,       &[5]),
    el!("U",  92,  0x008FFF, 0x79A1AA, 1.96, Some(0.96),  Some(1.86), &[4, 6]),
    el!("Np", 93,  0x0080FF, 0x4C4C4C, 1.90, Some(1.01),  None,       &[5]),
    el!("Pu", 94,  0x006BFF, 0x4C4C4C, 1.87, Some(1.00),  None,       &[4]),
    el!("Am", 95,  0x545CF2, 0x4C4C4C, 1.80, Some(1.115), None,       &[3]),
    el!("Cm", 96,  0x785CE3, 0x4C4C4C, 1.69, Some(1.11),  None,       &[3]),
    el!("Bk", 97,  0x8A4FE3, 0x4C4C4C, 1.68, Some(1.10),  None,       &[3]),
    el!("Cf", 98,  0xA136D4, 0x4C4C4C, 1.68, Some(1.09),  None,       &[3]),
    el!("Es", 99,  0xB31FD4, 0x4C4C4C, 1.65, None,        None,       &[3]),
    el!("Fm", 100, 0xB31FBA, 0x4C4C4C, 1.67, None,        None,       &[3]),
    el!("Md", 101, 0xB30DA6, 0x4C4C4C, 1.73, None,        None,       &[3]),
    el!("No", 102, 0xBD0D87, 0x4C4C4C, 1.76, None,        None,       &[2]),
    el!("Lr", 103, 0xC70066, 0x4C4C4C, 1.61, None,        None,       &[3]),
];

// Shannon (1976) effective ionic radii, six-fold coordination
#[rustfmt::skip]
static IONIC_RADII: &[(&str, i8, f64)] = &[
    ("Li", 1, 0.90), ("Na", 1, 1.16), ("K", 1, 1.52), ("Rb", 1, 1.66), ("Cs", 1, 1.81),
    ("Be", 2, 0.59), ("Mg", 2, 0.86), ("Ca", 2, 1.14), ("Sr", 2, 1.32), ("Ba", 2, 1.49),
    ("B", 3, 0.41), ("Al", 3, 0.675), ("Ga", 3, 0.76), ("In", 3, 0.94), ("Tl", 1, 1.64),
    ("C", 4, 0.30), ("Si", 4, 0.54), ("Ge", 4, 0.67), ("Sn", 4, 0.83), ("Pb", 2, 1.33), ("Pb", 4, 0.915),
    ("N", 5, 0.27), ("N", -3, 1.32), ("P", 5, 0.52), ("As", 5, 0.60), ("Sb", 5, 0.74), ("Bi", 3, 1.17),
    ("O", -2, 1.26), ("S", -2, 1.70), ("S", 6, 0.43), ("Se", -2, 1.84), ("Te", -2, 2.07),
    ("F", -1, 1.19), ("Cl", -1, 1.67), ("Br", -1, 1.82), ("I", -1, 2.06),
    ("Sc", 3, 0.885), ("Y", 3, 1.04), ("La", 3, 1.172), ("Ce", 3, 1.15), ("Ce", 4, 1.01),
    ("Pr", 3, 1.13), ("Nd", 3, 1.123), ("Pm", 3, 1.11), ("Sm", 3, 1.098), ("Eu", 2, 1.31), ("Eu", 3, 1.087),
    ("Gd", 3, 1.078), ("Tb", 3, 1.063), ("Dy", 3, 1.052), ("Ho", 3, 1.041), ("Er", 3, 1.03),
    ("Tm", 3, 1.02), ("Yb", 3, 1.008), ("Lu", 3, 1.001),
    ("Ti", 3, 0.81), ("Ti", 4, 0.745), ("V", 3, 0.78), ("V", 4, 0.72), ("V", 5, 0.68),
    ("Cr", 3, 0.755), ("Cr", 6, 0.58), ("Mn", 2, 0.97), ("Mn", 3, 0.785), ("Mn", 4, 0.67),
    ("Fe", 2, 0.92), ("Fe", 3, 0.785), ("Co", 2, 0.885), ("Co", 3, 0.685), ("Ni", 2, 0.83),
    ("Cu", 1, 0.91), ("Cu", 2, 0.87), ("Zn", 2, 0.88),
    ("Zr", 4, 0.86), ("Nb", 5, 0.78), ("Mo", 4, 0.79), ("Mo", 6, 0.73), ("Ru", 4, 0.76),
    ("Rh", 3, 0.805), ("Pd", 2, 1.00), ("Ag", 1, 1.29), ("Cd", 2, 1.09),
    ("Hf", 4, 0.85), ("Ta", 5, 0.78), ("W", 6, 0.74), ("Re", 7, 0.67), ("Os", 4, 0.77),
    ("Ir", 4, 0.765), ("Pt", 2, 0.94), ("Pt", 4, 0.765), ("Au", 1, 1.51), ("Au", 3, 0.99),
    ("Tc", 4, 0.785), ("Hg", 2, 1.16), ("Po", 4, 1.08), ("Ra", 2, 1.62), ("Ac", 3, 1.26),
    ("Th", 4, 1.08), ("U", 4, 1.03), ("U", 6, 0.87), ("Np", 4, 1.01), ("Pu", 4, 1.00), ("Am", 3, 1.115),
];

static ELEMENT_INDEX: OnceLock<FxHashMap<&'static str, &'static ElementData>> = OnceLock::new();

fn element_index() -> &'static FxHashMap<&'static str, &'static ElementData> {
    ELEMENT_INDEX.get_or_init(|| ELEMENTS.iter().map(|e| (e.symbol, e)).collect())
}

pub fn element_data(symbol: &str) -> Option<&'static ElementData> {
    element_index().get(symbol).copied()
}

pub fn get_atomic_number(symbol: &str) -> Option<u8> {
    element_data(symbol).map(|e| e.atomic_number)
}

pub fn jmol_color(symbol: &str) -> Option<Rgb> {
    element_data(symbol).map(|e| e.jmol)
}

pub fn vesta_color(symbol: &str) -> Option<Rgb> {
    element_data(symbol).map(|e| e.vesta)
}

pub fn covalent_radius(symbol: &str) -> Option<f64> {
    element_data(symbol).map(|e| e.covalent_radius)
}

pub fn average_ionic_radius(symbol: &str) -> Option<f64> {
    element_data(symbol).and_then(|e| e.average_ionic_radius)
}

pub fn van_der_waals_radius(symbol: &str) -> Option<f64> {
    element_data(symbol).and_then(|e| e.van_der_waals_radius)
}

/// Effective ionic radius for a given oxidation state
pub fn ionic_radius(symbol: &str, oxidation_state: i8) -> Option<f64> {
    IONIC_RADII
        .iter()
        .find(|(s, oxi, _)| *s == symbol && *oxi == oxidation_state)
        .map(|(_, _, r)| *r)
}

/// Common oxidation states, most likely first. Empty for unknown or inert elements.
pub fn common_oxidation_states(symbol: &str) -> &'static [i8] {
    element_data(symbol).map(|e| e.oxidation_states).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::from_hex(0xFF0D0D).to_hex(), "#ff0d0d");
        assert_eq!(Rgb::from_unit(0.0, 0.5, 1.0), Rgb(0, 128, 255));
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(get_atomic_number("Fe"), Some(26));
        assert_eq!(jmol_color("O"), Some(Rgb(255, 13, 13)));
        assert_eq!(vesta_color("O"), Some(Rgb(254, 3, 0)));
        assert!((covalent_radius("C").unwrap() - 0.76).abs() < 1e-10);
        assert_eq!(van_der_waals_radius("Fe"), None);
        assert!((ionic_radius("Fe", 3).unwrap() - 0.785).abs() < 1e-10);
        assert_eq!(ionic_radius("Fe", 6), None);
        assert_eq!(common_oxidation_states("O"), &[-2]);
        assert!(common_oxidation_states("Xx").is_empty());
        assert!(element_data("Xx").is_none());
    }

    #[test]
    fn test_unique_symbols() {
        let index = element_index();
        assert_eq!(index.len(), ELEMENTS.len());
    }

    #[test]
    fn test_table_covers_hydrogen_to_lawrencium() {
        assert_eq!(ELEMENTS.len(), 103);
        for (i, e) in ELEMENTS.iter().enumerate() {
            assert_eq!(e.atomic_number as usize, i + 1, "{} out of order", e.symbol);
            assert!(e.covalent_radius > 0.0);
        }
        assert_eq!(jmol_color("Eu"), Some(Rgb(0x61, 0xFF, 0xC7)));
        assert_eq!(vesta_color("Sm"), Some(Rgb(0xFC, 0x06, 0x7D)));
        assert!(covalent_radius("Pu").is_some());
    }
}
