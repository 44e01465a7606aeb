//! Installation lifecycle generator.
//!
//! Each address gets a chain of installations: the first starts somewhere in
//! the lookback window, and every deleted installation may be replaced by a
//! successor created some days after the deletion. A chain stops at the first
//! installation that is still active.

use crate::config::GenerationPolicy;
use crate::domain::model::{Address, InstallationRecord};
use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDateTime, SubsecRound, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Triangular};

const MICROS_PER_YEAR: i64 = 31_557_600_000_000; // 365.25 days

/// Generates installation records from an explicit random source.
pub struct InstallationGenerator<R: Rng = StdRng> {
    policy: GenerationPolicy,
    rng: R,
    lifespan: Triangular<f64>,
    /// Reference "now" for the whole run
    now: NaiveDateTime,
}

impl InstallationGenerator<StdRng> {
    /// Seeds from `policy.seed`, or from OS entropy when no seed is configured.
    pub fn from_policy(policy: GenerationPolicy, now: NaiveDateTime) -> Result<Self> {
        let seed = policy.seed.unwrap_or_else(|| rand::rng().random());
        tracing::debug!("Installation generator seed: {}", seed);
        Self::with_rng(policy, StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> InstallationGenerator<R> {
    pub fn with_rng(policy: GenerationPolicy, rng: R, now: NaiveDateTime) -> Result<Self> {
        let lifespan = Triangular::new(
            policy.lifespan_min_days,
            policy.lifespan_max_days,
            policy.lifespan_mode_days,
        )
        .map_err(|e| EtlError::InvalidConfigValueError {
            field: "policy.lifespan_mode_days".to_string(),
            value: policy.lifespan_mode_days.to_string(),
            reason: format!("Invalid lifespan distribution: {}", e),
        })?;

        Ok(Self {
            policy,
            rng,
            lifespan,
            now: now.trunc_subsecs(6),
        })
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Upper bound on the number of installations for one address.
    pub fn sample_installation_count(&mut self) -> u32 {
        let r: f64 = self.rng.random();
        if r < self.policy.single_threshold {
            1
        } else if r < self.policy.few_threshold {
            self.rng
                .random_range(self.policy.few_min..=self.policy.few_max)
        } else {
            self.rng
                .random_range(self.policy.many_min..=self.policy.many_max)
        }
    }

    /// Uniform instant in `[now - lookback, now]`, microsecond resolution.
    ///
    /// Windows reaching past chrono's range clamp to the earliest date.
    pub fn sample_anchor(&mut self) -> NaiveDateTime {
        let window = i64::from(self.policy.lookback_years)
            .checked_mul(MICROS_PER_YEAR)
            .unwrap_or(i64::MAX);
        let back = self.rng.random_range(0..=window);
        self.now
            .checked_sub_signed(TimeDelta::microseconds(back))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Lifespan in whole days if this installation gets deleted.
    pub fn sample_deletion_offset(&mut self) -> Option<i64> {
        let r: f64 = self.rng.random();
        if r < self.policy.deletion_probability {
            // truncated towards zero
            Some(self.lifespan.sample(&mut self.rng) as i64)
        } else {
            None
        }
    }

    pub fn sample_replacement_gap(&mut self) -> i64 {
        self.rng.random_range(
            self.policy.replacement_gap_min_days..=self.policy.replacement_gap_max_days,
        )
    }

    /// Builds the chain for one address, starting at `anchor`.
    ///
    /// At most `max_installations` records are produced; the chain ends early
    /// at the first installation that is not deleted.
    pub fn build_chain(
        &mut self,
        address: &Address,
        max_installations: u32,
        anchor: NaiveDateTime,
    ) -> Vec<InstallationRecord> {
        let mut records = Vec::new();
        let mut current = anchor;

        for _ in 0..max_installations {
            let created_at = current;
            let deleted_at = self
                .sample_deletion_offset()
                .and_then(|days| resolve_deletion(created_at, days, self.now));

            records.push(InstallationRecord::new(address, created_at, deleted_at));

            // Active installation: nothing replaces it.
            let Some(deleted_at) = deleted_at else {
                break;
            };

            let gap = self.sample_replacement_gap();
            match TimeDelta::try_days(gap).and_then(|d| deleted_at.checked_add_signed(d)) {
                Some(next) => current = next,
                None => break,
            }
        }

        records
    }

    pub fn generate_for_address(&mut self, address: &Address) -> Vec<InstallationRecord> {
        let count = self.sample_installation_count();
        let anchor = self.sample_anchor();
        self.build_chain(address, count, anchor)
    }

    pub fn generate(&mut self, addresses: &[Address]) -> Vec<InstallationRecord> {
        let mut records = Vec::with_capacity(addresses.len());
        for address in addresses {
            records.extend(self.generate_for_address(address));
        }
        records
    }
}

/// Deletion time for an installation created at `created_at` that lived
/// `offset_days`.
///
/// Returns `None` (still active) when the deletion would fall after `now`,
/// and discards deletions that are not strictly after creation.
pub fn resolve_deletion(
    created_at: NaiveDateTime,
    offset_days: i64,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let deleted_at = created_at.checked_add_signed(TimeDelta::try_days(offset_days)?)?;
    if deleted_at > now || deleted_at <= created_at {
        return None;
    }
    Some(deleted_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn generator(policy: GenerationPolicy, seed: u64) -> InstallationGenerator<StdRng> {
        InstallationGenerator::with_rng(policy, StdRng::seed_from_u64(seed), at(2025, 6, 1))
            .unwrap()
    }

    fn address(id: &str) -> Address {
        Address {
            id: id.to_string(),
            estado: "PA".to_string(),
            municipio: "Belém".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_deletion_in_the_past_is_kept() {
        let deleted = resolve_deletion(at(2020, 1, 1), 100, at(2025, 6, 1));
        assert_eq!(deleted, Some(at(2020, 4, 10)));
    }

    #[test]
    fn test_resolve_deletion_in_the_future_is_active() {
        assert_eq!(resolve_deletion(at(2025, 5, 1), 100, at(2025, 6, 1)), None);
    }

    #[test]
    fn test_resolve_deletion_exactly_now_is_kept() {
        let now = at(2025, 6, 1);
        assert_eq!(resolve_deletion(at(2025, 5, 22), 10, now), Some(now));
    }

    #[test]
    fn test_resolve_deletion_requires_positive_lifespan() {
        let now = at(2025, 6, 1);
        assert_eq!(resolve_deletion(at(2020, 1, 1), 0, now), None);
        assert_eq!(resolve_deletion(at(2020, 1, 1), -3, now), None);
    }

    #[test]
    fn test_installation_count_distribution() {
        let mut generator = generator(GenerationPolicy::default(), 7);
        let draws = 20_000;

        let mut singles = 0;
        for _ in 0..draws {
            let count = generator.sample_installation_count();
            assert!((1..=20).contains(&count));
            if count == 1 {
                singles += 1;
            }
        }

        let ratio = singles as f64 / draws as f64;
        assert!((0.83..0.87).contains(&ratio), "single ratio was {ratio}");
    }

    #[test]
    fn test_installation_count_bands() {
        let mut few = generator(
            GenerationPolicy {
                single_threshold: 0.0,
                few_threshold: 1.0,
                ..Default::default()
            },
            1,
        );
        for _ in 0..500 {
            assert!((2..=3).contains(&few.sample_installation_count()));
        }

        let mut many = generator(
            GenerationPolicy {
                single_threshold: 0.0,
                few_threshold: 0.0,
                ..Default::default()
            },
            2,
        );
        for _ in 0..500 {
            assert!((3..=20).contains(&many.sample_installation_count()));
        }
    }

    #[test]
    fn test_anchor_within_lookback_window() {
        let mut generator = generator(GenerationPolicy::default(), 3);
        let now = generator.now();
        let earliest = now - TimeDelta::microseconds(5 * MICROS_PER_YEAR);

        for _ in 0..1_000 {
            let anchor = generator.sample_anchor();
            assert!(anchor <= now);
            assert!(anchor >= earliest);
        }
    }

    #[test]
    fn test_anchor_with_oversized_lookback_does_not_panic() {
        let mut generator = generator(
            GenerationPolicy {
                lookback_years: u32::MAX,
                ..Default::default()
            },
            12,
        );
        let now = generator.now();

        for _ in 0..1_000 {
            let anchor = generator.sample_anchor();
            assert!(anchor <= now);
            assert!(anchor >= NaiveDateTime::MIN);
        }
        // the chain itself still terminates normally
        let records = generator.generate_for_address(&address("1"));
        assert!(!records.is_empty());
    }

    #[test]
    fn test_deletion_offset_bounds() {
        let mut generator = generator(
            GenerationPolicy {
                deletion_probability: 1.0,
                ..Default::default()
            },
            4,
        );
        for _ in 0..2_000 {
            let days = generator.sample_deletion_offset().unwrap();
            assert!((20..=1800).contains(&days));
        }
    }

    #[test]
    fn test_no_deletion_gives_single_active_record() {
        let mut generator = generator(
            GenerationPolicy {
                deletion_probability: 0.0,
                single_threshold: 0.0,
                few_threshold: 0.0,
                ..Default::default()
            },
            5,
        );

        let records = generator.generate_for_address(&address("123"));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address_id, Some(123));
        assert_eq!(records[0].deleted_at, None);
    }

    #[test]
    fn test_always_deleted_chain_fills_sampled_count() {
        let mut generator = generator(
            GenerationPolicy {
                deletion_probability: 1.0,
                ..Default::default()
            },
            6,
        );
        // far enough back that every deletion lands before now
        let records = generator.build_chain(&address("9"), 5, at(1950, 1, 1));

        assert_eq!(records.len(), 5);
        for pair in records.windows(2) {
            let deleted = pair[0].deleted_at.unwrap();
            let gap = pair[1].created_at - deleted;
            assert!(gap >= TimeDelta::zero());
            assert!(gap <= TimeDelta::days(360));
        }
        assert!(records.iter().all(|r| r.deleted_at.is_some()));
    }

    #[test]
    fn test_chain_stops_when_deletion_is_in_the_future() {
        let mut generator = generator(
            GenerationPolicy {
                deletion_probability: 1.0,
                ..Default::default()
            },
            8,
        );
        let now = generator.now();

        // created yesterday: any lifespan of 20+ days ends after now
        let records = generator.build_chain(&address("1"), 10, now - TimeDelta::days(1));

        assert_eq!(records.len(), 1);
        assert!(records[0].is_active());
    }

    #[test]
    fn test_chain_invariants_hold_for_random_addresses() {
        let mut generator = generator(
            GenerationPolicy {
                deletion_probability: 0.6,
                ..Default::default()
            },
            11,
        );
        let now = generator.now();
        let address = address("55");

        for _ in 0..2_000 {
            let count = generator.sample_installation_count();
            let anchor = generator.sample_anchor();
            let records = generator.build_chain(&address, count, anchor);

            assert!(!records.is_empty());
            assert!(records.len() <= count as usize);
            assert_eq!(records[0].created_at, anchor);

            let (last, earlier) = records.split_last().unwrap();
            // every record before the last one was deleted
            assert!(earlier.iter().all(|r| r.deleted_at.is_some()));
            if records.len() < count as usize {
                assert!(last.is_active());
            }

            for record in &records {
                if let Some(deleted) = record.deleted_at {
                    assert!(deleted > record.created_at);
                    assert!(deleted <= now);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let addresses: Vec<Address> = (0..50).map(|i| address(&i.to_string())).collect();

        let first = generator(GenerationPolicy::default(), 99).generate(&addresses);
        let second = generator(GenerationPolicy::default(), 99).generate(&addresses);

        assert_eq!(first, second);
        assert!(first.len() >= addresses.len());
    }

    #[test]
    fn test_from_policy_uses_configured_seed() {
        let policy = GenerationPolicy {
            seed: Some(2024),
            ..Default::default()
        };
        let addresses = vec![address("1"), address("2"), address("x")];

        let mut a = InstallationGenerator::from_policy(policy.clone(), at(2025, 1, 1)).unwrap();
        let mut b = InstallationGenerator::from_policy(policy, at(2025, 1, 1)).unwrap();

        let records = a.generate(&addresses);
        assert_eq!(records, b.generate(&addresses));
        assert!(records.iter().any(|r| r.address_id.is_none()));
    }

    #[test]
    fn test_invalid_lifespan_is_rejected() {
        let policy = GenerationPolicy {
            lifespan_mode_days: 10_000.0,
            ..Default::default()
        };
        let result =
            InstallationGenerator::with_rng(policy, StdRng::seed_from_u64(0), at(2025, 1, 1));
        assert!(matches!(
            result,
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }
}
