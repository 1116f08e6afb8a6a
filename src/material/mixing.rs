use crate::error::MaterialError;
use crate::units::{Density, MolarMass, NumberDensity, AVOGADRO};

/// Result of [`compute_mixed_density`].
#[derive(Debug, Clone, PartialEq)]
pub struct MixedDensity {
    /// Total mass density of the mixture.
    pub density: Density,
    /// Mass fraction of each species, in input order; sums to 1.
    pub mass_fractions: Vec<f64>,
}

/// Converts per-species number densities into a total mass density and mass
/// fractions.
///
/// `massDensity_i = n_i / N_A * M_i`, `total = Σ massDensity_i`,
/// `fraction_i = massDensity_i / total`.
///
/// # Errors
///
/// Returns [`MaterialError::InvalidComposition`] if the slices differ in
/// length, are empty, or contain a non-positive or non-finite value.
pub fn compute_mixed_density(
    number_densities: &[NumberDensity],
    molar_masses: &[MolarMass],
) -> Result<MixedDensity, MaterialError> {
    const SUBJECT: &str = "number-density mixture";

    if number_densities.len() != molar_masses.len() {
        return Err(MaterialError::composition(
            SUBJECT,
            format!(
                "{} number densities but {} molar masses",
                number_densities.len(),
                molar_masses.len()
            ),
        ));
    }
    if number_densities.is_empty() {
        return Err(MaterialError::composition(SUBJECT, "no species given"));
    }

    let mut mass_densities = Vec::with_capacity(number_densities.len());
    for (n, m) in number_densities.iter().zip(molar_masses) {
        let (n, m) = (n.value_per_cm3(), m.g_per_mol());
        if !(n.is_finite() && n > 0.0 && m.is_finite() && m > 0.0) {
            return Err(MaterialError::composition(
                SUBJECT,
                format!("number density {n:e}/cm3 and molar mass {m} g/mol must be positive"),
            ));
        }
        mass_densities.push(n / AVOGADRO * m);
    }

    let total: f64 = mass_densities.iter().sum();
    Ok(MixedDensity {
        density: Density::from_g_per_cm3(total),
        mass_fractions: mass_densities.iter().map(|rho| rho / total).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const H_MASS: MolarMass = MolarMass::from_g_per_mol(1.007_94);
    const C_MASS: MolarMass = MolarMass::from_g_per_mol(12.010_7);

    fn ej276() -> [NumberDensity; 2] {
        [NumberDensity::per_cm3(4.647e22), NumberDensity::per_cm3(4.944e22)]
    }

    #[test]
    fn scintillator_density_from_atom_counts() {
        let mixed = compute_mixed_density(&ej276(), &[H_MASS, C_MASS]).unwrap();
        let expected = (4.647e22 * 1.007_94 + 4.944e22 * 12.010_7) / AVOGADRO;
        assert_relative_eq!(mixed.density.g_per_cm3(), expected, max_relative = 1e-12);
        assert_relative_eq!(mixed.mass_fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(mixed.mass_fractions[1] > mixed.mass_fractions[0]);
    }

    #[test]
    fn order_independent() {
        let [h, c] = ej276();
        let forward = compute_mixed_density(&[h, c], &[H_MASS, C_MASS]).unwrap();
        let reverse = compute_mixed_density(&[c, h], &[C_MASS, H_MASS]).unwrap();
        assert_relative_eq!(
            forward.density.g_per_cm3(),
            reverse.density.g_per_cm3(),
            max_relative = 1e-14
        );
        assert_relative_eq!(forward.mass_fractions[0], reverse.mass_fractions[1]);
        assert_relative_eq!(forward.mass_fractions[1], reverse.mass_fractions[0]);
    }

    #[test]
    fn fractions_invariant_under_scaling() {
        let base = compute_mixed_density(&ej276(), &[H_MASS, C_MASS]).unwrap();
        for factor in [1e-3, 0.5, 7.0, 1e6] {
            let scaled: Vec<_> = ej276()
                .iter()
                .map(|n| NumberDensity::per_cm3(n.value_per_cm3() * factor))
                .collect();
            let mixed = compute_mixed_density(&scaled, &[H_MASS, C_MASS]).unwrap();
            for (a, b) in base.mass_fractions.iter().zip(&mixed.mass_fractions) {
                assert_relative_eq!(*a, *b, max_relative = 1e-12);
            }
            assert_relative_eq!(
                mixed.density.g_per_cm3(),
                base.density.g_per_cm3() * factor,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn mismatched_lengths_fail() {
        let result = compute_mixed_density(&ej276(), &[H_MASS]);
        assert!(matches!(result, Err(MaterialError::InvalidComposition { .. })));
    }

    #[test]
    fn empty_and_negative_inputs_fail() {
        assert!(compute_mixed_density(&[], &[]).is_err());
        let negative = [NumberDensity::per_cm3(-1.0)];
        assert!(compute_mixed_density(&negative, &[H_MASS]).is_err());
    }
}
