use futures::future::{try_join_all, FutureExt};
use log::{debug, info, trace};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::error::{NetError, Result, SpawnError};
use crate::genetic::agent::{Agent, Fitness};
use crate::genetic::config::EvolutionConfig;
use crate::network::network::Network;

type DoneFn<'a> = Box<dyn FnMut(usize, &[Agent]) -> bool + 'a>;

/// Mutation-only genetic search over a network's weights and biases.
///
/// Every epoch evaluates `population` independent clones, ranks them by
/// fitness (highest first, ties keep population order) and, unless the run is
/// over, breeds the next generation from the single best agent by adding a
/// uniform offset in `[-mutation, mutation]` to each of its parameters.
/// Generation 0 is made of unmodified clones of the base network.
///
/// The run ends after `epochs` epochs or as soon as the `done` hook returns
/// `true`, and yields the last epoch's ranked agents. A failing fitness
/// evaluation aborts the whole run.
///
/// ```no_run
/// use nanoai::{Activation, Evolution, EvolutionConfig, Fitness, Network};
///
/// let base = Network::create(&[2, 3, 1], Activation::TanH)?;
/// let agents = Evolution::new(&base, EvolutionConfig::new(20).epochs(50))
///     .done(|_, agents| agents[0].fitness > -0.01)
///     .run(|net, _| {
///         let out = net.predict(&[1.0, 0.0])?[0];
///         Ok(Fitness::Ready(-(out - 1.0).abs()))
///     })?;
/// println!("best: {}", agents[0].fitness);
/// # Ok::<(), nanoai::NetError>(())
/// ```
pub struct Evolution<'a> {
    base: Network,
    config: EvolutionConfig,
    done: Option<DoneFn<'a>>,
}

enum Step {
    Finished(Vec<Agent>),
    Next(Vec<Network>),
}

/// Per-run state shared by the sequential, async and parallel drivers.
struct Driver<'a> {
    config: EvolutionConfig,
    rng: StdRng,
    done: Option<DoneFn<'a>>,
}

impl<'a> Evolution<'a> {
    /// Only the base network's values are read; it is cloned, never mutated.
    pub fn new(network: &Network, config: EvolutionConfig) -> Self {
        Evolution {
            base: network.clone(),
            config,
            done: None,
        }
    }

    /// Called with `(epoch, ranked agents)` after every epoch; returning
    /// `true` ends the run with those agents.
    pub fn done<D>(mut self, done: D) -> Self
    where
        D: FnMut(usize, &[Agent]) -> bool + 'a,
    {
        self.done = Some(Box::new(done));
        self
    }

    /// Runs to completion on the current thread.
    ///
    /// `spawn(clone, index)` scores one clone. It may mutate the clone; the
    /// returned agent keeps whatever the callback left in it. Pending scores
    /// are driven to completion before the epoch is ranked.
    pub fn run<S>(self, spawn: S) -> Result<Vec<Agent>>
    where
        S: FnMut(&mut Network, usize) -> std::result::Result<Fitness, SpawnError>,
    {
        futures::executor::block_on(self.run_async(spawn))
    }

    /// Same as [`Evolution::run`], awaiting pending scores on the caller's executor.
    pub async fn run_async<S>(self, mut spawn: S) -> Result<Vec<Agent>>
    where
        S: FnMut(&mut Network, usize) -> std::result::Result<Fitness, SpawnError>,
    {
        let (mut driver, mut generation) = self.start()?;
        let mut epoch = 0;
        loop {
            let fitness = evaluate(&mut generation, &mut spawn).await?;
            match driver.settle(epoch, generation, fitness)? {
                Step::Finished(agents) => return Ok(agents),
                Step::Next(next) => generation = next,
            }
            epoch += 1;
        }
    }

    /// Scores every clone of an epoch in parallel on the rayon thread pool.
    pub fn run_par<S>(self, spawn: S) -> Result<Vec<Agent>>
    where
        S: Fn(&mut Network, usize) -> std::result::Result<f64, SpawnError> + Sync,
    {
        let (mut driver, mut generation) = self.start()?;
        let mut epoch = 0;
        loop {
            let fitness = generation
                .par_iter_mut()
                .enumerate()
                .map(|(index, network)| {
                    spawn(network, index).map_err(|source| NetError::Spawn { index, source })
                })
                .collect::<Result<Vec<f64>>>()?;
            match driver.settle(epoch, generation, fitness)? {
                Step::Finished(agents) => return Ok(agents),
                Step::Next(next) => generation = next,
            }
            epoch += 1;
        }
    }

    fn start(self) -> Result<(Driver<'a>, Vec<Network>)> {
        self.config.validate()?;
        debug!(
            "evolving {:?} network: population {}, epochs {}, mutation {}",
            self.base.shape, self.config.population, self.config.epochs, self.config.mutation
        );
        let generation = vec![self.base; self.config.population];
        let driver = Driver {
            rng: self.config.rng(),
            config: self.config,
            done: self.done,
        };
        Ok((driver, generation))
    }
}

impl Driver<'_> {
    /// Ranks one evaluated epoch and decides whether the run continues.
    fn settle(&mut self, epoch: usize, generation: Vec<Network>, fitness: Vec<f64>) -> Result<Step> {
        if let Some(index) = fitness.iter().position(|f| f.is_nan()) {
            return Err(NetError::Spawn {
                index,
                source: "fitness is NaN".into(),
            });
        }

        let agents = rank(generation, fitness);
        let best = agents[0].fitness;
        debug!(
            "epoch {}/{}: best fitness {best}, worst {}",
            epoch + 1,
            self.config.epochs,
            agents[agents.len() - 1].fitness
        );

        let stop = match self.done.as_mut() {
            Some(done) => done(epoch, &agents),
            None => false,
        };
        if stop || epoch + 1 >= self.config.epochs {
            info!(
                "evolution finished after {} epoch(s), best fitness {best}",
                epoch + 1
            );
            return Ok(Step::Finished(agents));
        }

        let parent = &agents[0].network;
        let next = (0..self.config.population)
            .map(|_| mutate(parent, self.config.mutation, &mut self.rng))
            .collect();
        Ok(Step::Next(next))
    }
}

/// Calls `spawn` for every clone, then awaits all pending scores together.
async fn evaluate<S>(generation: &mut [Network], spawn: &mut S) -> Result<Vec<f64>>
where
    S: FnMut(&mut Network, usize) -> std::result::Result<Fitness, SpawnError>,
{
    let mut scores = vec![0.0; generation.len()];
    let mut pending = Vec::new();

    for (index, network) in generation.iter_mut().enumerate() {
        match spawn(network, index).map_err(|source| NetError::Spawn { index, source })? {
            Fitness::Ready(score) => scores[index] = score,
            Fitness::Pending(future) => pending.push(future.map(move |res| {
                res.map(|score| (index, score))
                    .map_err(|source| NetError::Spawn { index, source })
            })),
        }
    }

    if !pending.is_empty() {
        trace!("awaiting {} pending fitness evaluations", pending.len());
        for (index, score) in try_join_all(pending).await? {
            scores[index] = score;
        }
    }
    Ok(scores)
}

/// Sorts by descending fitness; the sort is stable so ties keep their order.
fn rank(generation: Vec<Network>, fitness: Vec<f64>) -> Vec<Agent> {
    let mut agents: Vec<Agent> = generation
        .into_iter()
        .zip(fitness)
        .map(|(network, fitness)| Agent { network, fitness })
        .collect();
    agents.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    agents
}

fn mutate<R: Rng + ?Sized>(parent: &Network, mutation: f64, rng: &mut R) -> Network {
    let mut child = parent.clone();
    let offset = Uniform::new_inclusive(-mutation, mutation);
    for p in child.parameters_mut() {
        *p += offset.sample(rng);
    }
    child
}
