//! SI units and their prefixed forms.
//!
//! Every unit is registered under its full name and its symbol; each of
//! those also gets every SI prefix in its short form (`mV`, `mvolt`,
//! `nS`, `nsiemens`, `kohm`). Lengths additionally get squared and cubed
//! forms (`cm2`, `um2`, `metre3`, `mm3`). Magnitudes are stored in SI base
//! units, so `mV` is `0.001` with the dimension of a volt.

use modelcode_core::{Dimension, Value};

use crate::registry::UnitRegistry;

/// SI prefixes, short form and scale.
pub const PREFIXES: [(&str, f64); 20] = [
    ("y", 1e-24),
    ("z", 1e-21),
    ("a", 1e-18),
    ("f", 1e-15),
    ("p", 1e-12),
    ("n", 1e-9),
    ("u", 1e-6),
    ("m", 1e-3),
    ("c", 1e-2),
    ("d", 1e-1),
    ("da", 1e1),
    ("h", 1e2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
    ("Z", 1e21),
    ("Y", 1e24),
];

/// A named unit before prefixing.
struct BaseUnit {
    /// Every spelling that takes prefixes.
    names: &'static [&'static str],
    /// Magnitude in SI base units.
    scale: f64,
    dim: Dimension,
    /// Whether squared and cubed forms are registered.
    powers: bool,
}

const BASE_UNITS: &[BaseUnit] = &[
    BaseUnit {
        names: &["metre", "meter", "m"],
        scale: 1.0,
        dim: Dimension::LENGTH,
        powers: true,
    },
    BaseUnit {
        names: &["gram", "gramme", "g"],
        scale: 1e-3,
        dim: Dimension::MASS,
        powers: false,
    },
    BaseUnit {
        names: &["second", "s"],
        scale: 1.0,
        dim: Dimension::TIME,
        powers: false,
    },
    BaseUnit {
        names: &["amp", "ampere", "A"],
        scale: 1.0,
        dim: Dimension::CURRENT,
        powers: false,
    },
    BaseUnit {
        names: &["kelvin", "K"],
        scale: 1.0,
        dim: Dimension::TEMPERATURE,
        powers: false,
    },
    BaseUnit {
        names: &["mole", "mol"],
        scale: 1.0,
        dim: Dimension::AMOUNT,
        powers: false,
    },
    BaseUnit {
        names: &["candela", "cd"],
        scale: 1.0,
        dim: Dimension::LUMINOSITY,
        powers: false,
    },
    BaseUnit {
        names: &["volt", "V"],
        scale: 1.0,
        dim: Dimension::VOLTAGE,
        powers: false,
    },
    BaseUnit {
        names: &["siemens", "S"],
        scale: 1.0,
        dim: Dimension::CONDUCTANCE,
        powers: false,
    },
    BaseUnit {
        names: &["ohm", "Ohm"],
        scale: 1.0,
        dim: Dimension::RESISTANCE,
        powers: false,
    },
    BaseUnit {
        names: &["farad", "F"],
        scale: 1.0,
        dim: Dimension::CAPACITANCE,
        powers: false,
    },
    BaseUnit {
        names: &["hertz", "Hz"],
        scale: 1.0,
        dim: Dimension::FREQUENCY,
        powers: false,
    },
    BaseUnit {
        names: &["newton", "N"],
        scale: 1.0,
        dim: Dimension::FORCE,
        powers: false,
    },
    BaseUnit {
        names: &["joule", "J"],
        scale: 1.0,
        dim: Dimension::ENERGY,
        powers: false,
    },
    BaseUnit {
        names: &["watt", "W"],
        scale: 1.0,
        dim: Dimension::POWER,
        powers: false,
    },
    BaseUnit {
        names: &["pascal", "Pa"],
        scale: 1.0,
        dim: Dimension::PRESSURE,
        powers: false,
    },
    BaseUnit {
        names: &["coulomb", "C"],
        scale: 1.0,
        dim: Dimension::CHARGE,
        powers: false,
    },
    BaseUnit {
        names: &["litre", "liter", "l"],
        scale: 1e-3,
        dim: Dimension::VOLUME,
        powers: false,
    },
    BaseUnit {
        names: &["molar", "M"],
        scale: 1e3,
        dim: Dimension::CONCENTRATION,
        powers: false,
    },
];

/// Register every unit, its prefixed forms and, for lengths, its powers.
///
/// Unprefixed spellings are registered first and never overwritten, so a
/// prefixed form that happens to collide with a unit name (there is none
/// today) cannot shadow it.
pub(crate) fn register(registry: &mut UnitRegistry) {
    for unit in BASE_UNITS {
        for name in unit.names {
            registry.insert(*name, Value::quantity(unit.scale, unit.dim));
        }
    }

    for unit in BASE_UNITS {
        for name in unit.names {
            for (prefix, factor) in PREFIXES {
                let scale = unit.scale * factor;
                registry.insert_if_absent(format!("{prefix}{name}"), Value::quantity(scale, unit.dim));
            }
        }
    }

    for unit in BASE_UNITS.iter().filter(|u| u.powers) {
        for name in unit.names {
            let prefixed = PREFIXES
                .iter()
                .map(|(prefix, factor)| (format!("{prefix}{name}"), unit.scale * factor))
                .chain(std::iter::once((name.to_string(), unit.scale)));
            for (spelling, scale) in prefixed {
                for power in [2, 3] {
                    registry.insert_if_absent(
                        format!("{spelling}{power}"),
                        Value::quantity(scale.powi(power), unit.dim.powf(f64::from(power))),
                    );
                }
            }
        }
    }

    // `gram` is not the SI base unit of mass; `kilogram` spelled out is
    // the common name for it.
    registry.insert("kilogram", Value::quantity(1.0, Dimension::MASS));
}
