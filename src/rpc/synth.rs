use rand::Rng;

use crate::args::{Ratio, TesterArgs};
use crate::error::ValidationError;
use crate::fixture::FixtureSet;

use super::{CallBundleParams, JSONRPC_VERSION, JsonRpcRequest, Priority};

#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub method: String,
    pub request_id: u64,
    pub base_block: u64,
    pub block_offset: u64,
    pub state_block: String,
    pub high_priority_ratio: Ratio,
    pub fast_track_ratio: Ratio,
}

impl BundleOptions {
    #[must_use]
    pub fn from_args(args: &TesterArgs) -> Self {
        Self {
            method: args.rpc_method.clone(),
            request_id: args.request_id,
            base_block: args.base_block,
            block_offset: args.block_offset,
            state_block: args.state_block.clone(),
            high_priority_ratio: args.high_priority_ratio,
            fast_track_ratio: args.fast_track_ratio,
        }
    }
}

/// One generated iteration: which fixture was used, how it is tagged, and the body.
#[derive(Debug, Clone)]
pub struct Synthesized<'synth> {
    pub index: usize,
    pub priority: Priority,
    pub fast_track: bool,
    pub request: JsonRpcRequest<'synth>,
}

#[derive(Debug)]
pub struct Synthesizer {
    fixtures: FixtureSet,
    method: String,
    request_id: u64,
    block_number: String,
    state_block: String,
    high_priority_ratio: Ratio,
    fast_track_ratio: Ratio,
}

/// `0x`-prefixed lowercase hex of `base + offset`.
///
/// # Errors
///
/// Returns an error when the sum overflows `u64`.
pub fn encode_block_number(base: u64, offset: u64) -> Result<String, ValidationError> {
    let block = base
        .checked_add(offset)
        .ok_or(ValidationError::BlockNumberOverflow { base, offset })?;
    Ok(format!("{:#x}", block))
}

impl Synthesizer {
    /// Builds a synthesizer; the block number is computed once here.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_block + block_offset` overflows.
    pub fn new(fixtures: FixtureSet, options: BundleOptions) -> Result<Self, ValidationError> {
        let block_number = encode_block_number(options.base_block, options.block_offset)?;
        Ok(Self {
            fixtures,
            method: options.method,
            request_id: options.request_id,
            block_number,
            state_block: options.state_block,
            high_priority_ratio: options.high_priority_ratio,
            fast_track_ratio: options.fast_track_ratio,
        })
    }

    #[must_use]
    pub fn block_number(&self) -> &str {
        &self.block_number
    }

    #[must_use]
    pub const fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Draws a fixture index, a priority and a fast-track flag, in that order.
    ///
    /// Returns `None` only for an empty fixture set, which `FixtureSet` never
    /// constructs.
    pub fn synthesize<R>(&self, rng: &mut R) -> Option<Synthesized<'_>>
    where
        R: Rng + ?Sized,
    {
        let (index, tx) = self.fixtures.pick(rng)?;
        let priority = Priority::from_flag(rng.gen_bool(self.high_priority_ratio.get()));
        let fast_track = rng.gen_bool(self.fast_track_ratio.get());

        Some(Synthesized {
            index,
            priority,
            fast_track,
            request: JsonRpcRequest {
                jsonrpc: JSONRPC_VERSION,
                id: self.request_id,
                method: &self.method,
                params: [CallBundleParams {
                    txs: [tx],
                    block_number: &self.block_number,
                    state_block_number: &self.state_block,
                }],
            },
        })
    }
}
