use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NetError;

const LEAKY_SLOPE: f64 = 0.01;

/// Element-wise nonlinearity applied by a layer after its weighted sum.
///
/// The serialized tag of each variant is its name as written in saved
/// networks (`"Sigmoid"`, `"TanH"`, ..., `"ELU"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    TanH,
    ArcTan,
    SoftPlus,
    Linear,
    ReLU,
    LeakyReLU,
    #[serde(rename = "ELU")]
    Elu,
}

impl Activation {
    pub const ALL: [Activation; 8] = [
        Activation::Sigmoid,
        Activation::TanH,
        Activation::ArcTan,
        Activation::SoftPlus,
        Activation::Linear,
        Activation::ReLU,
        Activation::LeakyReLU,
        Activation::Elu,
    ];

    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::TanH => x.tanh(),
            Activation::ArcTan => x.atan(),
            // ln(1 + e^x), rearranged so large |x| neither overflows nor loses precision.
            Activation::SoftPlus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
            Activation::Linear => x,
            Activation::ReLU => if x > 0.0 { x } else { 0.0 },
            Activation::LeakyReLU => if x > 0.0 { x } else { LEAKY_SLOPE * x },
            Activation::Elu => if x > 0.0 { x } else { x.exp_m1() },
        }
    }

    /// Derivative with respect to the pre-activation input `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            Activation::TanH => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::ArcTan => 1.0 / (1.0 + x * x),
            Activation::SoftPlus => sigmoid(x),
            Activation::Linear => 1.0,
            Activation::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::LeakyReLU => if x > 0.0 { 1.0 } else { LEAKY_SLOPE },
            Activation::Elu => if x > 0.0 { 1.0 } else { self.function(x) + 1.0 },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "Sigmoid",
            Activation::TanH => "TanH",
            Activation::ArcTan => "ArcTan",
            Activation::SoftPlus => "SoftPlus",
            Activation::Linear => "Linear",
            Activation::ReLU => "ReLU",
            Activation::LeakyReLU => "LeakyReLU",
            Activation::Elu => "ELU",
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activation::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| NetError::InvalidActivation { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn known_values() {
        assert!(close(Activation::Sigmoid.function(0.0), 0.5, 1e-12));
        assert!(close(Activation::TanH.function(0.0), 0.0, 1e-12));
        assert!(close(Activation::SoftPlus.function(0.0), 2f64.ln(), 1e-12));
        assert_eq!(Activation::ReLU.function(-3.0), 0.0);
        assert_eq!(Activation::LeakyReLU.function(-3.0), -0.03);
        assert!(close(Activation::Elu.function(-1.0), (-1f64).exp() - 1.0, 1e-12));
        assert_eq!(Activation::Linear.function(-7.5), -7.5);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let points = [-2.5, -0.7, -0.1, 0.3, 1.2, 3.0];
        for act in Activation::ALL {
            for &x in &points {
                let numeric = (act.function(x + EPS) - act.function(x - EPS)) / (2.0 * EPS);
                let analytic = act.derivative(x);
                assert!(
                    close(numeric, analytic, 1e-5),
                    "{act} at {x}: numeric {numeric}, analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn softplus_is_stable_for_large_inputs() {
        assert!(close(Activation::SoftPlus.function(800.0), 800.0, 1e-9));
        assert!(Activation::SoftPlus.function(-800.0) >= 0.0);
        assert!(Activation::SoftPlus.function(800.0).is_finite());
    }

    #[test]
    fn tags_round_trip_through_strings() {
        for act in Activation::ALL {
            assert_eq!(act.to_string().parse::<Activation>().unwrap(), act);
            let json = serde_json::to_string(&act).unwrap();
            assert_eq!(json, format!("\"{}\"", act.name()));
        }
        assert!(matches!(
            "Softmax".parse::<Activation>(),
            Err(NetError::InvalidActivation { .. })
        ));
    }
}
