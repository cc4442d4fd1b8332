//! Recipe Diversification
//!
//! Builds a diverse set of lab recipes mixing continuous process parameters
//! with categorical choices, then prints them as JSON parameter maps ready to
//! hand to an experiment queue.

use evolution_optimizer::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Recipe Diversification ===\n");

    // Temperature (°C), time (h), concentration (mol/L)
    let bounds = MultiBounds::from_pairs(&[(100.0, 400.0), (0.5, 24.0), (0.01, 2.0)])?;

    let mut choices = CategoricalChoices::new();
    choices.insert(
        "solvent".to_string(),
        ["water", "ethanol", "acetone", "DMF"].map(String::from).to_vec(),
    );
    choices.insert(
        "atmosphere".to_string(),
        ["air", "N2", "Ar"].map(String::from).to_vec(),
    );

    let mut rng = StdRng::seed_from_u64(42);
    let config = MaxMinConfig::new(12, RecipeDiversifier::DEFAULT_CANDIDATES);
    let mut diversifier = RecipeDiversifier::new(bounds.clone(), choices, config)?;
    diversifier.generate(&mut rng);

    for (i, recipe) in diversifier.export().iter().enumerate() {
        println!("recipe {:>2}: {}", i, serde_json::to_string(recipe)?);
    }
    println!("\nRecipe diversity: {:.4}", diversifier.diversity_score());

    // The same space without categoricals, for comparison
    let mut continuous = MaxMinDiversifier::new(bounds, MaxMinConfig::new(12, 100))?;
    continuous.generate(&mut rng);
    println!("Continuous-only diversity: {:.4}", continuous.diversity_score());

    Ok(())
}
