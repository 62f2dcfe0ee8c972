//! Key signature resolution via the circle of fifths

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The twelve chromatic scale degrees, spelled with sharps.
///
/// Flat keys resolve to their enharmonic sharp spelling, so D-flat major
/// reports [`ScaleDegree::CSharp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScaleDegree {
    /// C
    C,
    /// C sharp / D flat
    CSharp,
    /// D
    D,
    /// D sharp / E flat
    DSharp,
    /// E / F flat
    E,
    /// F
    F,
    /// F sharp / G flat
    FSharp,
    /// G
    G,
    /// G sharp / A flat
    GSharp,
    /// A
    A,
    /// A sharp / B flat
    ASharp,
    /// B / C flat
    B,
}

/// The chromatic degrees in semitone order, for table lookups
const DEGREES: [ScaleDegree; 12] = [
    ScaleDegree::C,
    ScaleDegree::CSharp,
    ScaleDegree::D,
    ScaleDegree::DSharp,
    ScaleDegree::E,
    ScaleDegree::F,
    ScaleDegree::FSharp,
    ScaleDegree::G,
    ScaleDegree::GSharp,
    ScaleDegree::A,
    ScaleDegree::ASharp,
    ScaleDegree::B,
];

/// Major or minor mode of a key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyMode {
    /// Major key
    Major,
    /// Minor key
    Minor,
}

impl From<u8> for KeyMode {
    fn from(value: u8) -> Self {
        match value {
            0 => KeyMode::Major,
            _ => KeyMode::Minor,
        }
    }
}

/// Resolves a signed sharps (positive) or flats (negative) count to the
/// key it denotes.
///
/// Each sharp steps a fifth up from C major, each flat a fifth down; a
/// minor key sits on the relative minor of the major key with the same
/// signature, three semitones below its tonic.
pub fn key_from_sharps_or_flats(sharps_or_flats: i8, mode: KeyMode) -> (ScaleDegree, KeyMode) {
    let mut semitones = (i32::from(sharps_or_flats) * 7).rem_euclid(12);

    if mode == KeyMode::Minor {
        semitones = (semitones + 9) % 12;
    }

    (DEGREES[semitones as usize], mode)
}

#[cfg(test)]
mod tests {
    use super::{key_from_sharps_or_flats, KeyMode, ScaleDegree};

    /// Asserts a sharps/flats count and mode resolve to the expected key
    macro_rules! key_test {
        ($name:ident, $count:expr, $mode:expr, $degree:expr) => {
            #[test]
            fn $name() {
                assert_eq!(key_from_sharps_or_flats($count, $mode), ($degree, $mode));
            }
        };
    }

    key_test!(c_major, 0, KeyMode::Major, ScaleDegree::C);
    key_test!(a_minor, 0, KeyMode::Minor, ScaleDegree::A);

    // Sharps
    key_test!(g_major, 1, KeyMode::Major, ScaleDegree::G);
    key_test!(e_minor, 1, KeyMode::Minor, ScaleDegree::E);
    key_test!(d_major, 2, KeyMode::Major, ScaleDegree::D);
    key_test!(b_minor, 2, KeyMode::Minor, ScaleDegree::B);
    key_test!(a_major, 3, KeyMode::Major, ScaleDegree::A);
    key_test!(f_sharp_minor, 3, KeyMode::Minor, ScaleDegree::FSharp);
    key_test!(e_major, 4, KeyMode::Major, ScaleDegree::E);
    key_test!(c_sharp_minor, 4, KeyMode::Minor, ScaleDegree::CSharp);
    key_test!(b_major, 5, KeyMode::Major, ScaleDegree::B);
    key_test!(g_sharp_minor, 5, KeyMode::Minor, ScaleDegree::GSharp);
    key_test!(f_sharp_major, 6, KeyMode::Major, ScaleDegree::FSharp);
    key_test!(d_sharp_minor, 6, KeyMode::Minor, ScaleDegree::DSharp);
    key_test!(c_sharp_major, 7, KeyMode::Major, ScaleDegree::CSharp);
    key_test!(a_sharp_minor, 7, KeyMode::Minor, ScaleDegree::ASharp);

    // Flats, spelled enharmonically
    key_test!(f_major, -1, KeyMode::Major, ScaleDegree::F);
    key_test!(d_minor, -1, KeyMode::Minor, ScaleDegree::D);
    key_test!(b_flat_major, -2, KeyMode::Major, ScaleDegree::ASharp);
    key_test!(g_minor, -2, KeyMode::Minor, ScaleDegree::G);
    key_test!(e_flat_major, -3, KeyMode::Major, ScaleDegree::DSharp);
    key_test!(c_minor, -3, KeyMode::Minor, ScaleDegree::C);
    key_test!(a_flat_major, -4, KeyMode::Major, ScaleDegree::GSharp);
    key_test!(f_minor, -4, KeyMode::Minor, ScaleDegree::F);
    key_test!(d_flat_major, -5, KeyMode::Major, ScaleDegree::CSharp);
    key_test!(b_flat_minor, -5, KeyMode::Minor, ScaleDegree::ASharp);
    key_test!(g_flat_major, -6, KeyMode::Major, ScaleDegree::FSharp);
    key_test!(e_flat_minor, -6, KeyMode::Minor, ScaleDegree::DSharp);
    key_test!(c_flat_major, -7, KeyMode::Major, ScaleDegree::B);
    key_test!(a_flat_minor, -7, KeyMode::Minor, ScaleDegree::GSharp);

    #[test]
    fn mode_byte_maps_zero_to_major() {
        assert_eq!(KeyMode::from(0), KeyMode::Major);
        assert_eq!(KeyMode::from(1), KeyMode::Minor);
    }
}
