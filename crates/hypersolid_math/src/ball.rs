//! Volume and surface area of the unit ball in any number of dimensions.

use std::f64::consts::PI;

use float_ord::FloatOrd;
use serde::Serialize;

use crate::gamma::{GammaMemo, ln_gamma_doubled};
use crate::{Float, MathResult, log_space};

/// Returns the natural logarithm of the volume of the unit `d`-ball,
/// π^(d/2) / Γ(d/2 + 1).
///
/// The 0-ball is a point with volume 1.
pub fn ln_unit_ball_volume(d: u32) -> Float {
    d as Float / 2.0 * PI.ln() - ln_gamma_doubled(d as u64 + 2)
}

/// Returns the natural logarithm of the surface area of the unit `d`-ball,
/// which is the (`d`-1)-dimensional measure of its boundary sphere,
/// `d · V_d`.
///
/// The boundary of the 0-ball is empty, so `d = 0` gives negative infinity.
pub fn ln_unit_sphere_area(d: u32) -> Float {
    (d as Float).ln() + ln_unit_ball_volume(d)
}

fn ln_unit_ball_volume_memo(memo: &mut GammaMemo, d: u32) -> MathResult<Float> {
    let half_d = d as Float / 2.0;
    Ok(half_d * PI.ln() - memo.ln_gamma(half_d + 1.0)?)
}

/// Unit ball measurements in one dimension.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct BallProfileEntry {
    /// Number of dimensions.
    pub ndim: u32,
    /// Volume of the unit ball.
    pub volume: Float,
    /// Surface area of the unit ball.
    pub surface_area: Float,
    /// Natural logarithm of `volume`.
    pub ln_volume: Float,
    /// Natural logarithm of `surface_area`.
    pub ln_surface_area: Float,
}

/// Unit ball measurements over a range of dimensions.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BallProfile {
    /// One entry per dimension, starting at 1.
    pub entries: Vec<BallProfileEntry>,
    /// Dimension in which the unit ball has the largest volume.
    pub peak_volume_ndim: Option<u32>,
    /// Dimension in which the unit ball has the largest surface area.
    pub peak_surface_area_ndim: Option<u32>,
}

/// Computes unit ball volume and surface area for every dimension from 1 to
/// `max_ndim` inclusive.
///
/// Both quantities rise and then decay toward zero: volume peaks in 5
/// dimensions and surface area in 7.
pub fn ball_profile(max_ndim: u32) -> MathResult<BallProfile> {
    let mut memo = GammaMemo::new();
    let entries = (1..=max_ndim)
        .map(|ndim| {
            let ln_volume = ln_unit_ball_volume_memo(&mut memo, ndim)?;
            let ln_surface_area = (ndim as Float).ln() + ln_volume;
            Ok(BallProfileEntry {
                ndim,
                volume: log_space::exp_checked(ln_volume)?,
                surface_area: log_space::exp_checked(ln_surface_area)?,
                ln_volume,
                ln_surface_area,
            })
        })
        .collect::<MathResult<Vec<_>>>()?;

    let peak_volume_ndim = entries
        .iter()
        .max_by_key(|e| FloatOrd(e.ln_volume))
        .map(|e| e.ndim);
    let peak_surface_area_ndim = entries
        .iter()
        .max_by_key(|e| FloatOrd(e.ln_surface_area))
        .map(|e| e.ndim);

    Ok(BallProfile {
        entries,
        peak_volume_ndim,
        peak_surface_area_ndim,
    })
}
