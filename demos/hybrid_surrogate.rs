//! Surrogate-Guided Optimization
//!
//! Runs the hybrid GA against a cheap analytic surrogate whose optimum sits at
//! a known point. Importance weights tell the mutation operator which
//! variables matter most; the search box is then widened around the best
//! region for a second, seeded round.

use evolution_optimizer::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Stand-in for a trained regressor: the first variables dominate the response
struct QuadraticSurrogate {
    optimum: Vec<f64>,
    sensitivity: Vec<f64>,
}

impl SurrogateModel for QuadraticSurrogate {
    fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
        Ok(individuals
            .iter()
            .map(|x| {
                -x.genes()
                    .iter()
                    .zip(&self.optimum)
                    .zip(&self.sensitivity)
                    .map(|((v, o), s)| s * (v - o).powi(2))
                    .sum::<f64>()
            })
            .collect())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Surrogate-Guided Hybrid GA ===\n");

    let model = QuadraticSurrogate {
        optimum: vec![0.7, 0.2, 0.5, 0.9],
        sensitivity: vec![8.0, 4.0, 1.0, 0.5],
    };
    let weights = ImportanceWeights::from_importances(&model.sensitivity);
    let bounds = MultiBounds::from_pairs(&[(0.2, 0.6), (0.3, 0.8), (0.0, 1.0), (0.4, 1.0)])?;

    let mut rng = StdRng::seed_from_u64(42);
    let first = HybridGA::builder()
        .bounds(bounds.clone())
        .population_size(60)
        .generations(160)
        .crossover_rate(0.75)
        .elitism(3)
        .importance_weights(weights.clone())
        .build()?
        .run(&model, &mut rng)?;
    println!("Round 1 best prediction: {:.6}", first.best_fitness);
    println!("  solution: {:?}", first.best_solution.genes());

    // Widen the box where the model is most sensitive, then search again
    let widened = weights.widen_bounds(&bounds, 0.15, Bounds::unit())?;
    let second = HybridGA::builder()
        .bounds(widened.clone())
        .population_size(60)
        .generations(160)
        .crossover_rate(0.75)
        .elitism(3)
        .importance_weights(weights)
        .build()?
        .run_seeded(&model, vec![first.best_solution.clone()], &mut rng)?;

    println!("\nWidened bounds:");
    for (i, b) in widened.iter().enumerate() {
        println!("  x[{}] in [{:.3}, {:.3}]", i, b.min, b.max);
    }
    println!("Round 2 best prediction: {:.6}", second.best_fitness);
    println!("  solution: {:?}", second.best_solution.genes());

    let history = second.convergence(Direction::Maximize);
    println!(
        "  improvement over round: {:.6}",
        history.improvement().unwrap_or_default()
    );

    Ok(())
}
