//! # Strain-Compatibility Formulas
//!
//! Primitive relations shared by every flexure calculation: linear strain
//! distribution from the neutral axis, elastic-perfectly-plastic steel, the
//! equivalent rectangular stress block, and the singly-reinforced flexure
//! quadratic.
//!
//! ## Notation
//!
//! - `c` = neutral-axis depth from the compression face (mm)
//! - `a` = stress-block depth β1·c (mm)
//! - `d` = effective depth (mm)
//! - `εcu` = ultimate concrete strain
//! - `Es` = steel modulus (MPa)
//!
//! ## Sign Convention
//!
//! Steel strain and stress are **positive in compression**, negative in
//! tension, matching the strain profile measured from the compression face.

// =============================================================================
// STRAIN PROFILE
// =============================================================================

/// Strain at a fibre `depth` below the compression face.
///
/// ```text
///   εcu ├──┐  compression face
///       │   \
///     c │    \
///       │─────\──── neutral axis (ε = 0)
///       │      \
///       │       ● steel at `depth`: ε = εcu (c − depth) / c
/// ```
///
/// # Example
/// ```rust
/// use rcb_core::equations::flexure::strain_at_depth;
///
/// // Fibre at the compression face carries εcu
/// assert_eq!(strain_at_depth(0.003, 100.0, 0.0), 0.003);
/// // Fibre at depth 2c carries -εcu (tension)
/// assert!((strain_at_depth(0.003, 100.0, 200.0) + 0.003).abs() < 1e-12);
/// ```
#[inline]
pub fn strain_at_depth(epsilon_cu: f64, c: f64, depth: f64) -> f64 {
    epsilon_cu * (c - depth) / c
}

/// Net tensile strain εt at the extreme tension steel, positive in tension.
///
/// # Formula
/// εt = εcu (d − c) / c
#[inline]
pub fn tensile_strain(epsilon_cu: f64, c: f64, d: f64) -> f64 {
    epsilon_cu * (d - c) / c
}

/// Elastic-perfectly-plastic steel stress, capped at ±fy.
///
/// # Example
/// ```rust
/// use rcb_core::equations::flexure::steel_stress;
///
/// assert_eq!(steel_stress(0.001, 415.0, 200_000.0), 200.0);
/// assert_eq!(steel_stress(0.01, 415.0, 200_000.0), 415.0);
/// assert_eq!(steel_stress(-0.01, 415.0, 200_000.0), -415.0);
/// ```
#[inline]
pub fn steel_stress(strain: f64, fy: f64, es: f64) -> f64 {
    (strain * es).clamp(-fy, fy)
}

// =============================================================================
// STRESS BLOCK
// =============================================================================

/// Stress-block depth from horizontal equilibrium of a rectangular section
/// with yielded tension steel.
///
/// # Formula
/// T = C → As·fy = 0.85 f'c · b · a → a = As·fy / (0.85 f'c · b)
///
/// `block_stress` is 0.85 f'c (MPa).
#[inline]
pub fn stress_block_depth(as_mm2: f64, fy: f64, block_stress: f64, b: f64) -> f64 {
    as_mm2 * fy / (block_stress * b)
}

/// Nominal moment of a singly reinforced rectangle with yielded steel (N·mm).
///
/// # Formula
/// Mn = As·fy·(d − a/2)
#[inline]
pub fn singly_nominal_moment(as_mm2: f64, fy: f64, d: f64, a: f64) -> f64 {
    as_mm2 * fy * (d - a / 2.0)
}

/// Compression-steel stress net of the concrete it displaces.
///
/// When the bar sits inside the stress block (`a ≥ depth`) the block already
/// counts 0.85 f'c over the bar's area, so that share is removed.
#[inline]
pub fn net_compression_stress(stress: f64, depth: f64, a: f64, block_stress: f64) -> f64 {
    if a >= depth {
        stress - block_stress
    } else {
        stress
    }
}

// =============================================================================
// FLEXURE QUADRATIC
// =============================================================================

/// Flexural resistance coefficient Rn = Mu / (φ b d²) (MPa).
///
/// `mu_nmm` in N·mm, `b`, `d` in mm.
#[inline]
pub fn flexural_resistance_coefficient(mu_nmm: f64, phi: f64, b: f64, d: f64) -> f64 {
    mu_nmm / (phi * b * d.powi(2))
}

/// Required reinforcement ratio from the flexure quadratic.
///
/// # Formula
/// ρ = (0.85 f'c / fy) · (1 − √(1 − 2 Rn / 0.85 f'c))
///
/// Returns `None` when `2 Rn / 0.85 f'c > 1`: no real root, the concrete
/// block cannot develop the moment.
///
/// # Example
/// ```rust
/// use rcb_core::equations::flexure::required_ratio;
///
/// let rho = required_ratio(2.936, 23.8, 415.0).unwrap();
/// assert!((rho - 0.007576).abs() < 1e-5);
/// assert!(required_ratio(15.0, 23.8, 415.0).is_none());
/// ```
pub fn required_ratio(rn: f64, block_stress: f64, fy: f64) -> Option<f64> {
    let term = 2.0 * rn / block_stress;
    if term > 1.0 {
        return None;
    }
    Some((block_stress / fy) * (1.0 - (1.0 - term).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_profile_is_linear() {
        let c = 150.0;
        let e1 = strain_at_depth(0.003, c, 50.0);
        let e2 = strain_at_depth(0.003, c, 100.0);
        let e3 = strain_at_depth(0.003, c, 150.0);
        assert!(((e1 - e2) - (e2 - e3)).abs() < 1e-15);
        assert_eq!(e3, 0.0);
    }

    #[test]
    fn test_tensile_strain_matches_profile() {
        let c = 68.4;
        let d = 435.0;
        assert!((tensile_strain(0.003, c, d) + strain_at_depth(0.003, c, d)).abs() < 1e-15);
    }

    #[test]
    fn test_stress_block_depth() {
        // 1000 mm² of fy 415 against 0.85*28*300
        let a = stress_block_depth(1000.0, 415.0, 23.8, 300.0);
        assert!((a - 58.123).abs() < 0.01);
    }

    #[test]
    fn test_net_compression_stress() {
        assert_eq!(net_compression_stress(415.0, 60.0, 80.0, 23.8), 415.0 - 23.8);
        assert_eq!(net_compression_stress(415.0, 60.0, 50.0, 23.8), 415.0);
    }

    #[test]
    fn test_quadratic_recovers_moment() {
        let (b, d, fy, block) = (300.0, 435.0, 415.0, 23.8);
        let mu = 150.0e6;
        let rn = flexural_resistance_coefficient(mu, 0.9, b, d);
        let rho = required_ratio(rn, block, fy).unwrap();
        let as_req = rho * b * d;
        let a = stress_block_depth(as_req, fy, block, b);
        let phi_mn = 0.9 * singly_nominal_moment(as_req, fy, d, a);
        assert!((phi_mn - mu).abs() / mu < 1e-9);
    }
}
