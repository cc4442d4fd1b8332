//! Mixed continuous/categorical recipes
//!
//! A recipe pairs a continuous parameter vector with one chosen value per
//! categorical parameter. Diversification works exactly as in the continuous
//! case but uses the mixed distance.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::diversification::distance::{mean_pairwise_distance, mixed_distance};
use crate::diversification::maxmin::{extend_max_min, MaxMinConfig};
use crate::error::{EvoResult, EvolutionError, GenomeError};
use crate::genome::bounds::{Bounds, MultiBounds};
use crate::genome::real_vector::RealVector;

/// Finite choice set per categorical parameter, keyed by name
pub type CategoricalChoices = BTreeMap<String, Vec<String>>;

/// One value in an exported parameter map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A continuous parameter
    Number(f64),
    /// A categorical choice
    Choice(String),
}

/// A candidate recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Continuous parameters, one per continuous bound
    pub continuous: RealVector,
    /// Chosen value for each categorical parameter
    pub categorical: BTreeMap<String, String>,
}

impl Recipe {
    /// Draw a recipe uniformly from the bounds and choice sets
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: &MultiBounds,
        choices: &CategoricalChoices,
    ) -> Self {
        let continuous = RealVector::generate(rng, bounds);
        let mut categorical = BTreeMap::new();
        for (name, values) in choices {
            if let Some(value) = values.choose(rng) {
                categorical.insert(name.clone(), value.clone());
            }
        }
        Self {
            continuous,
            categorical,
        }
    }

    /// Mixed distance to another recipe
    pub fn distance(&self, other: &Self, bounds: &MultiBounds) -> f64 {
        mixed_distance(
            self.continuous.genes(),
            other.continuous.genes(),
            &self.categorical,
            &other.categorical,
            bounds,
        )
    }

    /// Flatten into `param_<i>` continuous entries plus the categorical entries
    ///
    /// A categorical parameter named like a continuous entry replaces it.
    pub fn to_parameter_map(&self) -> BTreeMap<String, ParamValue> {
        let mut map: BTreeMap<String, ParamValue> = self
            .continuous
            .genes()
            .iter()
            .enumerate()
            .map(|(i, &v)| (format!("param_{}", i), ParamValue::Number(v)))
            .collect();
        for (name, value) in &self.categorical {
            map.insert(name.clone(), ParamValue::Choice(value.clone()));
        }
        map
    }
}

/// Max-min diversifier over recipes
#[derive(Clone, Debug)]
pub struct RecipeDiversifier {
    bounds: MultiBounds,
    choices: CategoricalChoices,
    config: MaxMinConfig,
    recipes: Vec<Recipe>,
}

impl RecipeDiversifier {
    /// Candidates per iteration used for recipes unless configured otherwise
    pub const DEFAULT_CANDIDATES: usize = 50;

    /// Create a diversifier; every choice set must be non-empty
    pub fn new(
        bounds: MultiBounds,
        choices: CategoricalChoices,
        config: MaxMinConfig,
    ) -> EvoResult<Self> {
        config.validate()?;
        if bounds.is_empty() && choices.is_empty() {
            return Err(GenomeError::EmptySearchSpace.into());
        }
        for (i, b) in bounds.iter().enumerate() {
            Bounds::try_new(i, b.min, b.max)?;
        }
        if let Some((name, _)) = choices.iter().find(|(_, values)| values.is_empty()) {
            return Err(EvolutionError::Configuration(format!(
                "categorical parameter '{}' has no choices",
                name
            )));
        }
        Ok(Self {
            bounds,
            choices,
            config,
            recipes: Vec::new(),
        })
    }

    /// Start from caller-supplied recipes
    ///
    /// Each recipe must match the continuous dimension and pick a listed value
    /// for every categorical parameter, and for nothing else.
    pub fn with_initial_recipes(mut self, recipes: Vec<Recipe>) -> EvoResult<Self> {
        for recipe in &recipes {
            self.bounds.check_dimension(recipe.continuous.genes())?;
            self.check_categorical(&recipe.categorical)?;
        }
        if recipes.len() >= self.config.num_samples {
            log::warn!(
                "{} initial recipes already meet the target of {}; nothing will be generated",
                recipes.len(),
                self.config.num_samples
            );
        }
        self.recipes = recipes;
        Ok(self)
    }

    fn check_categorical(&self, categorical: &BTreeMap<String, String>) -> EvoResult<()> {
        for (name, value) in categorical {
            let values = self.choices.get(name).ok_or_else(|| {
                EvolutionError::Configuration(format!("unknown categorical parameter '{}'", name))
            })?;
            if !values.contains(value) {
                return Err(EvolutionError::Configuration(format!(
                    "'{}' is not a choice for categorical parameter '{}'",
                    value, name
                )));
            }
        }
        if let Some(name) = self.choices.keys().find(|name| !categorical.contains_key(*name)) {
            return Err(EvolutionError::Configuration(format!(
                "recipe has no value for categorical parameter '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Fill the recipe set up to `num_samples` and return it
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Recipe] {
        let bounds = &self.bounds;
        let choices = &self.choices;
        extend_max_min(
            &mut self.recipes,
            self.config.num_samples,
            self.config.candidates_per_iteration,
            rng,
            |rng: &mut R| Recipe::random(rng, bounds, choices),
            |a: &Recipe, b: &Recipe| a.distance(b, bounds),
        );
        log::debug!(
            "generated {} recipes, diversity {:.4}",
            self.recipes.len(),
            self.diversity_score()
        );
        &self.recipes
    }

    /// Mean pairwise mixed distance of the current set
    pub fn diversity_score(&self) -> f64 {
        mean_pairwise_distance(&self.recipes, |a, b| a.distance(b, &self.bounds))
    }

    /// Current recipes
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Every recipe as a flat parameter map
    pub fn export(&self) -> Vec<BTreeMap<String, ParamValue>> {
        self.recipes.iter().map(Recipe::to_parameter_map).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lab_choices() -> CategoricalChoices {
        let mut choices = CategoricalChoices::new();
        choices.insert(
            "solvent".to_string(),
            vec!["water", "ethanol", "acetone", "DMF"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        choices.insert(
            "atmosphere".to_string(),
            vec!["air", "N2", "Ar"].into_iter().map(String::from).collect(),
        );
        choices
    }

    fn lab_bounds() -> MultiBounds {
        MultiBounds::from_pairs(&[(100.0, 400.0), (0.5, 24.0), (0.01, 2.0)]).unwrap()
    }

    #[test]
    fn test_recipe_generation() {
        let mut rng = StdRng::seed_from_u64(12);
        let choices = lab_choices();
        let bounds = lab_bounds();
        let mut diversifier =
            RecipeDiversifier::new(bounds.clone(), choices.clone(), MaxMinConfig::new(12, 50)).unwrap();
        let recipes = diversifier.generate(&mut rng);

        assert_eq!(recipes.len(), 12);
        for recipe in recipes {
            assert!(bounds.contains_vec(recipe.continuous.genes()));
            for (name, value) in &recipe.categorical {
                assert!(choices[name].contains(value));
            }
            assert_eq!(recipe.categorical.len(), 2);
        }
        assert!(diversifier.diversity_score() > 0.0);
    }

    #[test]
    fn test_recipe_distance() {
        let bounds = MultiBounds::from_pairs(&[(0.0, 10.0)]).unwrap();
        let a = Recipe {
            continuous: RealVector::new(vec![0.0]),
            categorical: [("solvent".to_string(), "water".to_string())].into_iter().collect(),
        };
        let b = Recipe {
            continuous: RealVector::new(vec![5.0]),
            categorical: [("solvent".to_string(), "DMF".to_string())].into_iter().collect(),
        };
        assert_relative_eq!(a.distance(&b, &bounds), 1.0);
        assert_relative_eq!(b.distance(&a, &bounds), 1.0);
        assert_eq!(a.distance(&a, &bounds), 0.0);
    }

    #[test]
    fn test_to_parameter_map() {
        let recipe = Recipe {
            continuous: RealVector::new(vec![250.0, 2.0]),
            categorical: [("catalyst".to_string(), "Pt".to_string())].into_iter().collect(),
        };
        let map = recipe.to_parameter_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["param_0"], ParamValue::Number(250.0));
        assert_eq!(map["param_1"], ParamValue::Number(2.0));
        assert_eq!(map["catalyst"], ParamValue::Choice("Pt".to_string()));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"catalyst":"Pt","param_0":250.0,"param_1":2.0}"#);
    }

    #[test]
    fn test_empty_choice_set_rejected() {
        let mut choices = CategoricalChoices::new();
        choices.insert("catalyst".to_string(), vec![]);
        assert!(RecipeDiversifier::new(lab_bounds(), choices, MaxMinConfig::default()).is_err());
    }

    #[test]
    fn test_categorical_only_space() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut diversifier = RecipeDiversifier::new(
            MultiBounds::new(vec![]),
            lab_choices(),
            MaxMinConfig::new(3, 20),
        )
        .unwrap();
        let recipes = diversifier.generate(&mut rng);
        assert_eq!(recipes.len(), 3);
        assert!(recipes.iter().all(|r| r.continuous.dimension() == 0));
    }

    fn lab_recipe(temperature: f64, solvent: &str) -> Recipe {
        Recipe {
            continuous: RealVector::new(vec![temperature, 1.0, 0.5]),
            categorical: [
                ("solvent".to_string(), solvent.to_string()),
                ("atmosphere".to_string(), "air".to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_initial_recipes_are_kept() {
        let mut rng = StdRng::seed_from_u64(8);
        let initial = vec![lab_recipe(150.0, "water"), lab_recipe(350.0, "DMF")];
        let mut diversifier =
            RecipeDiversifier::new(lab_bounds(), lab_choices(), MaxMinConfig::new(4, 20))
                .unwrap()
                .with_initial_recipes(initial.clone())
                .unwrap();
        let recipes = diversifier.generate(&mut rng);

        assert_eq!(recipes.len(), 4);
        assert_eq!(&recipes[..2], &initial[..]);
    }

    #[test]
    fn test_initial_recipes_beyond_target_are_not_extended() {
        let mut rng = StdRng::seed_from_u64(8);
        let initial = vec![
            lab_recipe(150.0, "water"),
            lab_recipe(250.0, "ethanol"),
            lab_recipe(350.0, "DMF"),
        ];
        let mut diversifier =
            RecipeDiversifier::new(lab_bounds(), lab_choices(), MaxMinConfig::new(2, 20))
                .unwrap()
                .with_initial_recipes(initial)
                .unwrap();
        assert_eq!(diversifier.generate(&mut rng).len(), 3);
    }

    #[test]
    fn test_invalid_initial_recipes_rejected() {
        let diversifier =
            || RecipeDiversifier::new(lab_bounds(), lab_choices(), MaxMinConfig::new(4, 20)).unwrap();

        let mut short = lab_recipe(150.0, "water");
        short.continuous = RealVector::new(vec![150.0, 1.0]);
        assert!(matches!(
            diversifier().with_initial_recipes(vec![short]),
            Err(EvolutionError::Genome(GenomeError::DimensionMismatch { .. }))
        ));

        let unknown_value = lab_recipe(150.0, "toluene");
        assert!(diversifier().with_initial_recipes(vec![unknown_value]).is_err());

        let mut unknown_key = lab_recipe(150.0, "water");
        unknown_key
            .categorical
            .insert("catalyst".to_string(), "Pt".to_string());
        assert!(diversifier().with_initial_recipes(vec![unknown_key]).is_err());

        let mut missing_key = lab_recipe(150.0, "water");
        missing_key.categorical.remove("atmosphere");
        assert!(diversifier().with_initial_recipes(vec![missing_key]).is_err());
    }

    #[test]
    fn test_export_matches_recipes() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut diversifier =
            RecipeDiversifier::new(lab_bounds(), lab_choices(), MaxMinConfig::new(4, 10)).unwrap();
        diversifier.generate(&mut rng);
        let exported = diversifier.export();
        assert_eq!(exported.len(), 4);
        assert!(exported.iter().all(|m| m.contains_key("param_2") && m.contains_key("solvent")));
    }
}
