//! Randomized challenge generation.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use shared_types::{Challenge, ChallengeKind, NodeTier, CHALLENGE_TTL_MS};
use uuid::Uuid;

use crate::policy::{self, KindSelector, KNOWN_ADDRESSES, NON_ARCHIVE_STATE_WINDOW};

/// Produces tier-appropriate challenges with a fixed 60-second lifetime.
///
/// Stateless; every draw uses the thread-local RNG, so a generator can be
/// shared freely across concurrent adjudications.
#[derive(Debug, Default)]
pub struct ChallengeGenerator;

impl ChallengeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a random challenge for a node.
    pub fn generate(&self, node_id: Uuid, tier: NodeTier) -> Challenge {
        let mut rng = rand::thread_rng();

        let selectors = policy::permitted_kinds(tier);
        let selector = *selectors
            .choose(&mut rng)
            .expect("every tier permits at least one kind");

        let now = Utc::now().timestamp_millis();

        Challenge {
            id: Uuid::new_v4(),
            node_id,
            kind: self.fill_params(selector, tier, &mut rng),
            created_at: now,
            expires_at: now + CHALLENGE_TTL_MS,
        }
    }

    /// Generate several challenges at once.
    pub fn generate_batch(&self, node_id: Uuid, tier: NodeTier, count: usize) -> Vec<Challenge> {
        (0..count).map(|_| self.generate(node_id, tier)).collect()
    }

    fn fill_params(
        &self,
        selector: KindSelector,
        tier: NodeTier,
        rng: &mut impl Rng,
    ) -> ChallengeKind {
        let range = policy::block_range(tier);

        match selector {
            KindSelector::BlockHash => ChallengeKind::BlockHash {
                height: random_height(rng, range.min, range.safe_max),
            },
            KindSelector::HeaderFields => ChallengeKind::HeaderFields {
                height: random_height(rng, range.min, range.safe_max),
            },
            KindSelector::BalanceAtHeight => {
                // Archive nodes can serve any height; everything else only
                // holds state for a recent window.
                let min = if tier == NodeTier::BscArchive {
                    range.min
                } else {
                    range.safe_max - NON_ARCHIVE_STATE_WINDOW
                };
                let address = KNOWN_ADDRESSES
                    .choose(rng)
                    .expect("known address list is non-empty");
                ChallengeKind::BalanceAtHeight {
                    height: random_height(rng, min, range.safe_max),
                    address: (*address).to_string(),
                }
            }
            KindSelector::SyncStatus => ChallengeKind::SyncStatus,
        }
    }
}

fn random_height(rng: &mut impl Rng, min: u64, max: u64) -> u64 {
    rng.gen_range(min..=max)
}
