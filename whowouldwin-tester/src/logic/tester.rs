use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};
use whowouldwin_game::{CharacterProvider, FixtureProvider, SourcingConfig};

use super::faults::FlakyProvider;
use super::runner::{RunSummary, play};
use crate::scenarios::{Pool, Scenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub provider: String,
    pub strategy: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Mean rounds completed per iteration.
    pub average_rounds: f64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Where characters come from during a run.
#[derive(Clone)]
pub enum ProviderSource {
    /// A fresh in-memory fixture per iteration.
    Fixture,
    /// One shared live provider, so its roster cache spans the whole run.
    Live(Rc<dyn CharacterProvider>),
}

impl ProviderSource {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Live(_) => "jikan",
        }
    }

    fn build(&self, scenario: &Scenario) -> Rc<dyn CharacterProvider> {
        let base: Rc<dyn CharacterProvider> = match self {
            Self::Fixture => match scenario.pool {
                Pool::Generated(per_group) => Rc::new(FixtureProvider::generated(per_group)),
                Pool::Sample => Rc::new(FixtureProvider::sample()),
            },
            Self::Live(provider) => provider.clone(),
        };
        match scenario.faults {
            Some(plan) => Rc::new(FlakyProvider::new(base, plan)),
            None => base,
        }
    }
}

pub struct LogicTester {
    source: ProviderSource,
    config: SourcingConfig,
    verbose: bool,
}

impl LogicTester {
    #[must_use]
    pub fn new(source: ProviderSource, verbose: bool) -> Self {
        Self {
            source,
            config: SourcingConfig::default(),
            verbose,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &ProviderSource {
        &self.source
    }

    /// Whether `scenario` can run against the configured provider.
    #[must_use]
    pub fn supports(&self, scenario: &Scenario) -> bool {
        !scenario.fixture_only || matches!(self.source, ProviderSource::Fixture)
    }

    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (strategy: {} seed: {} provider: {})",
                    scenario.key.bright_white(),
                    scenario.options.strategy,
                    seed,
                    self.source.label()
                );
            }

            let result = self.run_single_scenario(scenario, seed, iterations).await;
            results.push(result);
        }

        results
    }

    async fn run_single_scenario(
        &self,
        scenario: &Scenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut rounds_total: u64 = 0;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let provider = self.source.build(scenario);

            let summary = play(&*provider, &self.config, &scenario.options, iteration_seed).await;
            rounds_total += u64::from(summary.rounds);

            if let Some(err) = scenario.evaluate(&summary) {
                failures.push(describe_failure(i + 1, &summary, &err));
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) rounds:{} retries:{} winner:{}",
                        i + 1,
                        iterations,
                        summary.rounds,
                        summary.retries,
                        summary
                            .leaderboard
                            .winner()
                            .map_or("-", |w| w.candidate.name())
                    );
                }
            }
        }

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let average_rounds = if iterations == 0 {
            0.0
        } else {
            rounds_total as f64 / iterations as f64
        };

        ScenarioResult {
            scenario_name: scenario.key.to_string(),
            provider: self.source.label().to_string(),
            strategy: scenario.options.strategy.label().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_rounds,
            average_duration: avg_duration,
            performance_data,
        }
    }
}

fn describe_failure(iteration: usize, summary: &RunSummary, err: &str) -> String {
    format!(
        "Iteration {iteration} (strategy {}, seed {}, rounds {}/{}, status {}, retries {}): {err}",
        summary.strategy.label(),
        summary.seed,
        summary.rounds,
        summary.round_limit,
        summary.status(),
        summary.retries,
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{catalog, find};

    #[tokio::test]
    async fn every_scenario_passes_on_fixtures() {
        let tester = LogicTester::new(ProviderSource::Fixture, false);
        for scenario in catalog() {
            let results = tester.run_scenario(&scenario, &[1337, 7], 2).await;
            for result in results {
                assert!(result.passed, "{}: {:?}", result.scenario_name, result.failures);
                assert_eq!(result.successful_iterations, 2);
            }
        }
    }

    #[tokio::test]
    async fn results_serialize_durations_as_millis() {
        let tester = LogicTester::new(ProviderSource::Fixture, false);
        let scenario = find("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[1], 1).await;
        let json = serde_json::to_value(&results[0]).unwrap();
        assert!(json["average_duration"].is_u64());
        assert_eq!(json["provider"], "fixture");
        assert!((json["average_rounds"].as_f64().unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn live_source_skips_fixture_only_scenarios() {
        let live: Rc<dyn CharacterProvider> = Rc::new(FixtureProvider::sample());
        let tester = LogicTester::new(ProviderSource::Live(live), false);
        assert!(!tester.supports(&find("exhausted-pool").unwrap()));
        assert!(tester.supports(&find("smoke").unwrap()));
        assert_eq!(tester.source().label(), "jikan");
    }
}
