// mx-core/src/units.rs

use uom::si::f64::{Mass as UomMass, MassDensity as UomMassDensity, Volume as UomVolume};
use uom::si::{mass::kilogram, mass_density::kilogram_per_cubic_meter, volume::liter};

// Public canonical unit types (SI, f64)
pub type Mass = UomMass;
pub type Volume = UomVolume;
pub type Density = UomMassDensity;

/// Reference volume of one cubic meter of concrete, in liters.
pub const BATCH_VOLUME_L: f64 = 1000.0;

#[inline]
pub fn kg(v: f64) -> Mass {
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn liters(v: f64) -> Volume {
    Volume::new::<liter>(v)
}

/// Density from a specific gravity (g/cm³, numerically kg/L).
#[inline]
pub fn specific_gravity(sg: f64) -> Density {
    Density::new::<kilogram_per_cubic_meter>(sg * 1000.0)
}

#[inline]
pub fn as_kg(m: Mass) -> f64 {
    m.get::<kilogram>()
}

#[inline]
pub fn as_liters(v: Volume) -> f64 {
    v.get::<liter>()
}

#[inline]
pub fn as_specific_gravity(rho: Density) -> f64 {
    rho.get::<kilogram_per_cubic_meter>() / 1000.0
}

/// Mass occupied by `volume` of a material with density `rho`.
#[inline]
pub fn mass_of(volume: Volume, rho: Density) -> Mass {
    kg(as_liters(volume) * as_specific_gravity(rho))
}

/// Absolute volume occupied by `mass` of a material with density `rho`.
#[inline]
pub fn volume_of(mass: Mass, rho: Density) -> Volume {
    liters(as_kg(mass) / as_specific_gravity(rho))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _m = kg(280.0);
        let _v = liters(180.0);
        let _rho = specific_gravity(3.15);
    }

    #[test]
    fn cement_volume_from_mass() {
        let v = volume_of(kg(315.0), specific_gravity(3.15));
        assert!(nearly_equal(as_liters(v), 100.0, Tolerances::default()));
    }

    #[test]
    fn mass_volume_inverse() {
        let rho = specific_gravity(2.65);
        let m = mass_of(liters(250.0), rho);
        assert!(nearly_equal(as_kg(m), 662.5, Tolerances::default()));
        let back = volume_of(m, rho);
        assert!(nearly_equal(as_liters(back), 250.0, Tolerances::default()));
    }
}
