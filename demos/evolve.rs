use nanoai::{Activation, Evolution, EvolutionConfig, Filter, Fitness, Init, Network};

const CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn main() -> nanoai::Result<()> {
    env_logger::init();

    let mut base = Network::create(&[2, 4, 1], [Activation::TanH, Activation::Sigmoid])?;
    base.init(&Init::uniform(), Filter::Both)?;

    let config = EvolutionConfig::new(50).epochs(500).mutation(0.2);
    let agents = Evolution::new(&base, config)
        .done(|epoch, agents| {
            if epoch % 50 == 0 {
                println!("Epoch {epoch}: best fitness = {:.6}", agents[0].fitness);
            }
            agents[0].fitness > -0.01
        })
        .run(|network, _| {
            // Fitness is the negated squared error over the truth table.
            let mut error = 0.0;
            for (input, expected) in CASES {
                let out = network.predict(&input)?[0];
                error += (out - expected).powi(2);
            }
            Ok(Fitness::Ready(-error))
        })?;

    let mut best = agents[0].network.clone();
    for (input, _) in CASES {
        println!("Input: {:?} -> Output: {:.4}", input, best.predict(&input)?[0]);
    }
    Ok(())
}
