//! Tier policy: which kinds a tier may be asked, and over which heights.

use shared_types::NodeTier;

/// Popular token contracts on BSC for balance probes.
///
/// These have been continuously active since early mainnet, so any archive
/// node holds state for them at every height in the safe range.
pub const KNOWN_ADDRESSES: &[&str] = &[
    "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c", // WBNB
    "0x55d398326f99059fF775485246999027B3197955", // USDT
    "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", // USDC
    "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56", // BUSD
    "0x2170Ed0880ac9A755fd29B2688956BD959F933F8", // ETH
    "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82", // CAKE
    "0x7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c", // BTCB
];

/// Non-archive nodes prune historical state; state queries against them are
/// clamped to this many blocks below the safe maximum.
pub const NON_ARCHIVE_STATE_WINDOW: u64 = 10_000;

/// Discriminant for a challenge kind, used when drawing from a tier's
/// permitted subset before parameters are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSelector {
    BlockHash,
    HeaderFields,
    BalanceAtHeight,
    SyncStatus,
}

/// Inclusive height range that is safe to query on a given chain.
#[derive(Debug, Clone, Copy)]
pub struct BlockRange {
    /// Old enough to be irreversible on every fork.
    pub min: u64,
    /// Recent enough to exist on all sync levels queried.
    pub safe_max: u64,
}

const BSC_RANGE: BlockRange = BlockRange {
    min: 1_000_000,
    safe_max: 45_000_000,
};

const OPBNB_RANGE: BlockRange = BlockRange {
    min: 1_000,
    safe_max: 30_000_000,
};

/// Safe height range for the chain a tier runs on.
pub fn block_range(tier: NodeTier) -> BlockRange {
    match tier {
        NodeTier::OpbnbFull | NodeTier::OpbnbFast => OPBNB_RANGE,
        _ => BSC_RANGE,
    }
}

/// Challenge kinds a tier can legitimately answer.
///
/// Asking a fast node for decade-old state is not a fair test and would
/// force false negatives, so each tier only sees kinds it can serve.
pub fn permitted_kinds(tier: NodeTier) -> &'static [KindSelector] {
    match tier {
        // Archive nodes keep all historical state
        NodeTier::BscArchive => &[
            KindSelector::BlockHash,
            KindSelector::HeaderFields,
            KindSelector::BalanceAtHeight,
            KindSelector::SyncStatus,
        ],
        // Full nodes have block data but limited historical state
        NodeTier::BscFull | NodeTier::OpbnbFull => &[
            KindSelector::BlockHash,
            KindSelector::HeaderFields,
            KindSelector::SyncStatus,
        ],
        // Fast nodes (and anything unrecognized) only keep recent data
        _ => &[KindSelector::BlockHash, KindSelector::SyncStatus],
    }
}
