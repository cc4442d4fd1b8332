//! Sphere Function Optimization
//!
//! This example runs the genetic algorithm and differential evolution side by
//! side on the 3-D Sphere function (sum of squares) and compares how far each
//! gets in 100 generations.
//!
//! Run with `RUST_LOG=debug` to see per-generation statistics.

use evolution_optimizer::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Sphere Function Optimization ===\n");

    const DIM: usize = 3;
    let fitness = Sphere::new(DIM);
    let bounds = MultiBounds::symmetric(5.0, DIM);

    // Genetic algorithm
    let mut rng = StdRng::seed_from_u64(42);
    let ga = GeneticAlgorithm::builder()
        .bounds(bounds.clone())
        .population_size(30)
        .mutation_rate(0.02)
        .crossover_rate(0.7)
        .generations(100)
        .minimize(true)
        .build()?
        .run(&fitness, &mut rng)?;

    // Differential evolution on the same problem
    let mut rng = StdRng::seed_from_u64(42);
    let de = DifferentialEvolution::builder()
        .bounds(bounds)
        .population_size(30)
        .mutation_factor(0.8)
        .crossover_rate(0.9)
        .generations(100)
        .build()?
        .run(&fitness, &mut rng)?;

    for (name, result) in [("GA", &ga), ("DE", &de)] {
        let history = result.convergence(Direction::Minimize);
        println!("{}:", name);
        println!("  Best fitness:     {:.6}", result.best_value);
        println!("  First generation: {:.6}", result.history[0]);
        println!("  Stagnant for:     {} generations", history.stagnation(1e-9));
        println!("  Best solution:");
        for (i, val) in result.best_solution.genes().iter().enumerate() {
            println!("    x[{}] = {:.6}", i, val);
        }
        println!();
    }

    println!("Result JSON: {}", serde_json::to_string(&de)?);

    Ok(())
}
