//! End-to-end checks of the network life cycle: create, initialize, predict,
//! backpropagate, persist.

use nanoai::{Activation, Filter, Init, NetError, Network, NetworkSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TOLERANCE: f64 = 1e-9;

fn floats_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

fn squared_error(output: &[f64], expected: &[f64]) -> f64 {
    output.iter().zip(expected).map(|(o, e)| (o - e).powi(2)).sum()
}

#[test]
fn test_weight_matrices_follow_shape() {
    for shape in [vec![1, 1], vec![4, 7, 3], vec![2, 5, 5, 9, 1]] {
        let net = Network::create(&shape, Activation::ReLU).expect("valid shape");
        assert_eq!(net.size, shape.len() - 1);
        assert_eq!(net.activation.len(), net.size);
        for (i, w) in net.weights.iter().enumerate() {
            assert_eq!((w.rows, w.cols), (shape[i + 1], shape[i]));
            assert_eq!(net.biases[i].len(), shape[i + 1]);
        }
        net.validate().expect("fresh network is valid");
    }
}

#[test]
fn test_predict_then_backpropagate_lowers_error() {
    let input = [0.5, -0.25, 1.0];
    let expected = [0.2, 0.9];

    let mut net = Network::create(&[3, 5, 2], [Activation::LeakyReLU, Activation::Sigmoid]).unwrap();
    Init::normal()
        .apply_with_rng(&mut net, Filter::Both, &mut StdRng::seed_from_u64(21))
        .unwrap();

    let before = squared_error(&net.predict(&input).unwrap(), &expected);
    let reported = net.backpropagate(&input, &expected, 0.05).unwrap();
    let after = squared_error(&net.predict(&input).unwrap(), &expected);

    assert!(floats_close(reported, before / 2.0, TOLERANCE));
    assert!(after < before, "error went from {before} to {after}");
}

#[test]
fn test_explicit_forward_pass_training() {
    let mut net = Network::create(&[1, 1], Activation::Linear).unwrap();
    let target = [3.0];
    for _ in 0..200 {
        let pass = net.forward(&[1.0]).unwrap();
        net.backpropagate_pass(&pass, &target, 0.1).unwrap();
    }
    let out = net.predict(&[1.0]).unwrap();
    assert!(floats_close(out[0], 3.0, 1e-6), "got {}", out[0]);
}

#[test]
fn test_initialize_callback_filters() {
    let mut net = Network::create(&[2, 2, 2], Activation::Sigmoid).unwrap();
    net.initialize(|_, _, _| Some(5.0), Filter::Weights);
    assert!(net.weights.iter().all(|m| m.iter().all(|&w| w == 5.0)));
    assert!(net.biases.iter().flatten().all(|&b| b == 0.0));

    let filter: Filter = "biases".parse().unwrap();
    net.initialize(|_, _, _| Some(-2.0), filter);
    assert!(net.weights.iter().all(|m| m.iter().all(|&w| w == 5.0)));
    assert!(net.biases.iter().flatten().all(|&b| b == -2.0));

    assert!(matches!(
        "everything".parse::<Filter>(),
        Err(NetError::InvalidFilter { .. })
    ));
}

#[test]
fn test_clone_is_independent() {
    let mut original = Network::create(&[2, 3, 1], Activation::TanH).unwrap();
    original.init(&Init::uniform(), Filter::Both).unwrap();

    let mut copy = original.clone();
    assert_eq!(copy, original);
    let kept = original.weights[0].get(0, 0);
    copy.weights[0].data[0][0] = kept + 1.0;
    copy.predict(&[1.0, 1.0]).unwrap();
    assert_eq!(original.weights[0].get(0, 0), kept);
    assert_ne!(copy, original);
}

#[test]
fn test_network_survives_file_round_trip() {
    let mut net = Network::create(&[3, 4, 2], [Activation::SoftPlus, Activation::ArcTan]).unwrap();
    net.init(&Init::xavier_normal(), Filter::Both).unwrap();
    net.predict(&[0.1, 0.2, 0.3]).unwrap();

    let path = std::env::temp_dir().join(format!("nanoai-net-{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    net.save_json(path).unwrap();
    let loaded = Network::load_json(path).unwrap();
    std::fs::remove_file(path).ok();

    assert_eq!(loaded.shape, net.shape);
    assert_eq!(loaded.activation, net.activation);
    for (a, b) in loaded.weights.iter().zip(&net.weights) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(floats_close(*x, *y, 1e-12));
        }
    }
}

#[test]
fn test_spec_builds_networks() {
    let spec = NetworkSpec::new(vec![4, 8, 3], Activation::ReLU);
    let net = spec.build().unwrap();
    assert_eq!(net.activation, vec![Activation::ReLU; 2]);

    let bad = NetworkSpec::new(vec![4, 8, 3], vec![Activation::ReLU]);
    assert!(matches!(
        bad.build(),
        Err(NetError::InvalidActivationCount { expected: 2, actual: 1 })
    ));
}

#[test]
fn test_spec_survives_file_round_trip() {
    let spec = NetworkSpec::new(vec![3, 5, 2], vec![Activation::LeakyReLU, Activation::Sigmoid]);
    let path = std::env::temp_dir().join(format!("nanoai-spec-{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    spec.save_json(path).unwrap();
    let loaded = NetworkSpec::load_json(path).unwrap();
    std::fs::remove_file(path).ok();

    assert_eq!(loaded, spec);
    let net = loaded.build().unwrap();
    assert_eq!(net.shape, vec![3, 5, 2]);
    assert_eq!(net.activation, vec![Activation::LeakyReLU, Activation::Sigmoid]);
}

#[test]
fn test_spec_load_reports_bad_files() {
    let path = std::env::temp_dir().join(format!("nanoai-bad-spec-{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    std::fs::write(path, r#"{"shape":[2,3,1],"activation":"Swish"}"#).unwrap();
    assert!(matches!(NetworkSpec::load_json(path), Err(NetError::Serialization(_))));

    // Parses fine, but the layer count and activation count disagree.
    std::fs::write(path, r#"{"shape":[2,3,1],"activation":["ReLU"]}"#).unwrap();
    let spec = NetworkSpec::load_json(path).unwrap();
    assert!(matches!(
        spec.build(),
        Err(NetError::InvalidActivationCount { expected: 2, actual: 1 })
    ));

    std::fs::remove_file(path).ok();
    assert!(matches!(NetworkSpec::load_json(path), Err(NetError::Io(_))));
}
