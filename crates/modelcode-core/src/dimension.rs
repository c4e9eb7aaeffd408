//! Physical dimensions.
//!
//! A [`Dimension`] holds the exponents of the seven SI base quantities.
//! Exponents are real-valued because model equations routinely use
//! fractional powers: a white-noise term `xi` has dimension `s^-0.5`, and
//! `sqrt(area)` must come back as a length.
//!
//! Exponents are stored as [`OrderedFloat`] so dimensions can be compared
//! for exact equality and used as hash keys.

use std::fmt;
use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;

/// Symbols of the SI base units, in exponent order.
const BASE_SYMBOLS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// Exponents of the SI base quantities.
///
/// Order: length (m), mass (kg), time (s), electric current (A),
/// temperature (K), amount of substance (mol), luminous intensity (cd).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    exponents: [OrderedFloat<f64>; 7],
}

impl Dimension {
    /// Dimensionless (pure number).
    pub const DIMENSIONLESS: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// Length [L] - metre.
    pub const LENGTH: Self = Self::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// Mass [M] - kilogram.
    pub const MASS: Self = Self::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// Time [T] - second.
    pub const TIME: Self = Self::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    /// Electric current [I] - ampere.
    pub const CURRENT: Self = Self::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
    /// Temperature [Θ] - kelvin.
    pub const TEMPERATURE: Self = Self::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    /// Amount of substance [N] - mole.
    pub const AMOUNT: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    /// Luminous intensity [J] - candela.
    pub const LUMINOSITY: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    /// Frequency [T⁻¹] - hertz.
    pub const FREQUENCY: Self = Self::new(0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0);
    /// Force [M L T⁻²] - newton.
    pub const FORCE: Self = Self::new(1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// Energy [M L² T⁻²] - joule.
    pub const ENERGY: Self = Self::new(2.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// Power [M L² T⁻³] - watt.
    pub const POWER: Self = Self::new(2.0, 1.0, -3.0, 0.0, 0.0, 0.0, 0.0);
    /// Pressure [M L⁻¹ T⁻²] - pascal.
    pub const PRESSURE: Self = Self::new(-1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0);
    /// Electric charge [I T] - coulomb.
    pub const CHARGE: Self = Self::new(0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0);
    /// Voltage [M L² T⁻³ I⁻¹] - volt.
    pub const VOLTAGE: Self = Self::new(2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0);
    /// Resistance [M L² T⁻³ I⁻²] - ohm.
    pub const RESISTANCE: Self = Self::new(2.0, 1.0, -3.0, -2.0, 0.0, 0.0, 0.0);
    /// Conductance [M⁻¹ L⁻² T³ I²] - siemens.
    pub const CONDUCTANCE: Self = Self::new(-2.0, -1.0, 3.0, 2.0, 0.0, 0.0, 0.0);
    /// Capacitance [M⁻¹ L⁻² T⁴ I²] - farad.
    pub const CAPACITANCE: Self = Self::new(-2.0, -1.0, 4.0, 2.0, 0.0, 0.0, 0.0);
    /// Volume [L³] - cubic metre.
    pub const VOLUME: Self = Self::new(3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// Molar concentration [N L⁻³] - mol/m³.
    pub const CONCENTRATION: Self = Self::new(-3.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);

    /// Create a dimension from its seven base exponents.
    pub const fn new(
        length: f64,
        mass: f64,
        time: f64,
        current: f64,
        temperature: f64,
        amount: f64,
        luminosity: f64,
    ) -> Self {
        Self {
            exponents: [
                OrderedFloat(length),
                OrderedFloat(mass),
                OrderedFloat(time),
                OrderedFloat(current),
                OrderedFloat(temperature),
                OrderedFloat(amount),
                OrderedFloat(luminosity),
            ],
        }
    }

    /// The exponents in base order (m, kg, s, A, K, mol, cd).
    pub fn exponents(&self) -> [f64; 7] {
        self.exponents.map(|e| e.0)
    }

    /// Length exponent.
    pub fn length(&self) -> f64 {
        self.exponents[0].0
    }

    /// Mass exponent.
    pub fn mass(&self) -> f64 {
        self.exponents[1].0
    }

    /// Time exponent.
    pub fn time(&self) -> f64 {
        self.exponents[2].0
    }

    /// Check whether all exponents are zero.
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| e.0 == 0.0)
    }

    /// Raise the dimension to a real power.
    pub fn powf(self, exponent: f64) -> Self {
        Self {
            exponents: self.exponents.map(|e| OrderedFloat(normalize(e.0 * exponent))),
        }
    }

    /// The reciprocal dimension.
    pub fn recip(self) -> Self {
        self.powf(-1.0)
    }
}

/// Turn `-0.0` into `0.0` so that equal dimensions compare equal.
fn normalize(exponent: f64) -> f64 {
    if exponent == 0.0 { 0.0 } else { exponent }
}

impl Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (lhs, rhs) in exponents.iter_mut().zip(rhs.exponents) {
            *lhs = OrderedFloat(normalize(lhs.0 + rhs.0));
        }
        Dimension { exponents }
    }
}

impl Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.recip()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let mut first = true;
        for (symbol, exponent) in BASE_SYMBOLS.iter().zip(self.exponents()) {
            if exponent == 0.0 {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if exponent == 1.0 {
                write!(f, "{symbol}")?;
            } else if exponent.fract() == 0.0 {
                write!(f, "{symbol}^{}", exponent as i64)?;
            } else {
                write!(f, "{symbol}^{exponent}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dimension({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_add_exponents() {
        let velocity = Dimension::LENGTH / Dimension::TIME;
        assert_eq!(velocity.length(), 1.0);
        assert_eq!(velocity.time(), -1.0);
        assert_eq!(Dimension::FORCE * Dimension::LENGTH, Dimension::ENERGY);
    }

    #[test]
    fn division_by_self_is_dimensionless() {
        let ratio = Dimension::VOLTAGE / Dimension::VOLTAGE;
        assert!(ratio.is_dimensionless());
        assert_eq!(ratio, Dimension::DIMENSIONLESS);
    }

    #[test]
    fn ohms_law_dimensions() {
        assert_eq!(Dimension::CURRENT * Dimension::RESISTANCE, Dimension::VOLTAGE);
        assert_eq!(Dimension::RESISTANCE.recip(), Dimension::CONDUCTANCE);
    }

    #[test]
    fn fractional_powers_round_trip() {
        let noise = Dimension::TIME.powf(-0.5);
        assert_eq!(noise.time(), -0.5);
        assert_eq!(noise * noise, Dimension::FREQUENCY);
        let area = Dimension::LENGTH.powf(2.0);
        assert_eq!(area.powf(0.5), Dimension::LENGTH);
    }

    #[test]
    fn display_formats_exponents() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "1");
        assert_eq!(Dimension::VOLTAGE.to_string(), "m^2 kg s^-3 A^-1");
        assert_eq!(Dimension::TIME.powf(-0.5).to_string(), "s^-0.5");
    }
}
