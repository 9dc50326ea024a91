use log::debug;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::init::initializer::Filter;
use crate::network::network::Network;

/// Built-in parameter initialization policies.
///
/// The Xavier (Glorot) policies only ever write weights: they derive their
/// scale from each layer's fan-in and fan-out, which biases don't have, so
/// biases keep their current values (zero on a fresh network) whatever the
/// filter says. Both use the per-layer scale `s = gain · sqrt(2 / (fan_in + fan_out))`:
/// the uniform variant samples `[-s, s]`, the normal variant uses `s` as its
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Init {
    Zeros,
    Ones,
    Constant {
        value: f64,
    },
    Uniform {
        #[serde(default = "default_min")]
        min: f64,
        #[serde(default = "default_max")]
        max: f64,
    },
    Normal {
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_std")]
        std: f64,
    },
    XavierUniform {
        #[serde(default = "default_gain")]
        gain: f64,
    },
    XavierNormal {
        #[serde(default = "default_gain")]
        gain: f64,
    },
}

fn default_min() -> f64 {
    -1.0
}

fn default_max() -> f64 {
    1.0
}

fn default_std() -> f64 {
    1.0
}

fn default_gain() -> f64 {
    1.0
}

impl Init {
    /// Uniform on `[-1, 1]`.
    pub fn uniform() -> Init {
        Init::Uniform { min: default_min(), max: default_max() }
    }

    /// Standard normal.
    pub fn normal() -> Init {
        Init::Normal { mean: 0.0, std: default_std() }
    }

    pub fn xavier_uniform() -> Init {
        Init::XavierUniform { gain: default_gain() }
    }

    pub fn xavier_normal() -> Init {
        Init::XavierNormal { gain: default_gain() }
    }

    /// Applies the policy to `network` using `rng` for every random draw.
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        filter: Filter,
        rng: &mut R,
    ) -> Result<()> {
        match *self {
            Init::Zeros => network.initialize(|_, _, _| Some(0.0), filter),
            Init::Ones => network.initialize(|_, _, _| Some(1.0), filter),
            Init::Constant { value } => {
                finite("value", value)?;
                network.initialize(|_, _, _| Some(value), filter)
            }
            Init::Uniform { min, max } => {
                finite("min", min)?;
                finite("max", max)?;
                if min > max {
                    return Err(invalid(format!("uniform min {min} exceeds max {max}")));
                }
                if !(max - min).is_finite() {
                    return Err(invalid(format!("uniform range [{min}, {max}] is too wide")));
                }
                let dist = Uniform::new_inclusive(min, max);
                network.initialize(|_, _, _| Some(dist.sample(rng)), filter)
            }
            Init::Normal { mean, std } => {
                finite("mean", mean)?;
                let dist = normal(mean, std)?;
                network.initialize(|_, _, _| Some(dist.sample(rng)), filter)
            }
            Init::XavierUniform { gain } => {
                let dists = xavier_scale(network, gain)?
                    .into_iter()
                    .map(|bound| Uniform::new_inclusive(-bound, bound))
                    .collect::<Vec<_>>();
                network.initialize(|layer, _, source| source.map(|_| dists[layer].sample(rng)), filter)
            }
            Init::XavierNormal { gain } => {
                let dists = xavier_scale(network, gain)?
                    .into_iter()
                    .map(|std| normal(0.0, std))
                    .collect::<Result<Vec<_>>>()?;
                network.initialize(|layer, _, source| source.map(|_| dists[layer].sample(rng)), filter)
            }
        }
        debug!("initialized {:?} network with {:?} ({})", network.shape, self, filter);
        Ok(())
    }
}

impl Network {
    /// Applies a built-in initialization policy, drawing from the thread RNG.
    pub fn init(&mut self, init: &Init, filter: Filter) -> Result<()> {
        init.apply_with_rng(self, filter, &mut rand::thread_rng())
    }
}

/// Per-layer Xavier scale: uniform bound or normal standard deviation.
fn xavier_scale(network: &Network, gain: f64) -> Result<Vec<f64>> {
    finite("gain", gain)?;
    if gain < 0.0 {
        return Err(invalid(format!("xavier gain must not be negative, got {gain}")));
    }
    let scales: Vec<f64> = network
        .shape
        .windows(2)
        .map(|w| gain * (2.0 / (w[0] + w[1]) as f64).sqrt())
        .collect();
    if scales.iter().any(|s| !(2.0 * s).is_finite()) {
        return Err(invalid(format!("xavier gain {gain} is too large")));
    }
    Ok(scales)
}

fn normal(mean: f64, std: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std).map_err(|e| invalid(format!("normal(mean={mean}, std={std}): {e}")))
}

fn finite(name: &str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite, got {v}")))
    }
}

fn invalid(message: String) -> NetError {
    NetError::InvalidInitializer { message }
}
