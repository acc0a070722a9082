//! Simulation state driving order generation.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::order::{GeneratorError, OrderFactory, OrderRecord};
use crate::profile::SimulationProfile;
use crate::sequence::SequenceAllocator;
use crate::weather::{WeatherModel, WeatherState};

/// Owns everything that evolves during one run: the RNG, the weather walk
/// and the order factory (with its identifier allocator).
///
/// With a fixed seed the generated orders are reproducible, apart from the
/// identifiers, which come from the allocator.
pub struct OrderSimulator<S> {
    /// Random source shared by weather and order draws
    rng: StdRng,
    weather: WeatherModel,
    factory: OrderFactory<S>,
    /// Orders generated so far
    generated: u64,
}

impl<S: SequenceAllocator> OrderSimulator<S> {
    /// Create a simulator seeded with `seed`.
    pub fn new(profile: &SimulationProfile, sequence: S, seed: u64) -> Result<Self, GeneratorError> {
        Self::with_rng(profile, sequence, StdRng::seed_from_u64(seed))
    }

    /// Create a simulator seeded from OS entropy.
    pub fn from_entropy(profile: &SimulationProfile, sequence: S) -> Result<Self, GeneratorError> {
        Self::with_rng(profile, sequence, StdRng::from_entropy())
    }

    /// Create a simulator around an existing RNG.
    pub fn with_rng(
        profile: &SimulationProfile,
        sequence: S,
        rng: StdRng,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            rng,
            weather: WeatherModel::new(profile.initial_weather),
            factory: OrderFactory::new(profile, sequence)?,
            generated: 0,
        })
    }

    /// Advance the weather one step and generate the order placed at
    /// `timestamp`.
    ///
    /// On error the weather has still advanced; the state stays valid and the
    /// call can simply be repeated.
    pub fn next_order(&mut self, timestamp: DateTime<Utc>) -> Result<OrderRecord, GeneratorError> {
        let weather = self.weather.step(&mut self.rng);
        let order = self.factory.create(&mut self.rng, timestamp, weather)?;
        self.generated += 1;
        Ok(order)
    }

    /// Current weather, without advancing it.
    pub fn weather(&self) -> WeatherState {
        self.weather.current()
    }

    /// Number of orders generated so far.
    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    /// The identifier allocator.
    pub fn sequence(&self) -> &S {
        self.factory.sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{InMemorySequence, SequenceError};
    use chrono::TimeZone;

    /// Fails the first `failures` allocations, then counts up.
    struct FlakySequence {
        failures: u32,
        inner: InMemorySequence,
    }

    impl SequenceAllocator for FlakySequence {
        fn next_id(&mut self) -> Result<String, SequenceError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(SequenceError::Unavailable(std::io::Error::other(
                    "store offline",
                )));
            }
            self.inner.next_id()
        }
    }

    fn ts(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, second).unwrap()
    }

    #[test]
    fn test_generate_orders() {
        let mut sim =
            OrderSimulator::new(&SimulationProfile::default(), InMemorySequence::new(), 42)
                .unwrap();

        for i in 0..10 {
            let order = sim.next_order(ts(i)).unwrap();
            assert_eq!(order.order_id, format!("order_{}", i + 1));
            assert_eq!(order.timestamp, ts(i));
            assert_eq!(order.weather, sim.weather());
        }
        assert_eq!(sim.generated_count(), 10);
    }

    #[test]
    fn test_deterministic_generation() {
        let profile = SimulationProfile::default();
        let mut sim1 = OrderSimulator::new(&profile, InMemorySequence::new(), 42).unwrap();
        let mut sim2 = OrderSimulator::new(&profile, InMemorySequence::new(), 42).unwrap();

        for i in 0..100 {
            assert_eq!(sim1.next_order(ts(i % 60)).unwrap(), sim2.next_order(ts(i % 60)).unwrap());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let profile = SimulationProfile::default();
        let mut sim1 = OrderSimulator::new(&profile, InMemorySequence::new(), 1).unwrap();
        let mut sim2 = OrderSimulator::new(&profile, InMemorySequence::new(), 2).unwrap();

        let a: Vec<_> = (0..20).map(|i| sim1.next_order(ts(i)).unwrap()).collect();
        let b: Vec<_> = (0..20).map(|i| sim2.next_order(ts(i)).unwrap()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_recovers_after_allocation_failure() {
        let sequence = FlakySequence {
            failures: 2,
            inner: InMemorySequence::new(),
        };
        let mut sim = OrderSimulator::new(&SimulationProfile::default(), sequence, 42).unwrap();

        assert!(sim.next_order(ts(0)).is_err());
        assert!(sim.next_order(ts(1)).is_err());
        assert!(sim.weather().is_within_bounds());
        assert_eq!(sim.generated_count(), 0);

        let order = sim.next_order(ts(2)).unwrap();
        assert_eq!(order.order_id, "order_1");
        assert_eq!(sim.generated_count(), 1);
    }

    #[test]
    fn test_initial_weather_from_profile() {
        let mut profile = SimulationProfile::default();
        profile.initial_weather.temperature = -4.0;
        let sim = OrderSimulator::new(&profile, InMemorySequence::new(), 42).unwrap();
        assert_eq!(sim.weather().temperature, -4.0);
    }
}
