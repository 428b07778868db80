//! Greedy coin change.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// Most coins the greedy answer may use and still be traced coin by coin.
pub const MAX_COINS: u64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoinEvent {
    #[default]
    Start,
    /// One coin of this denomination taken.
    Take { coin: u64, remaining: u64 },
    /// Denomination larger than what is left; move down.
    TooLarge { coin: u64, remaining: u64 },
    Done { coins: u64 },
    /// Every denomination tried and `remaining` is still owed.
    Failed { remaining: u64 },
    /// The greedy answer needs more than `limit` coins.
    TooManyCoins { coins: u64, limit: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinStep {
    pub event: CoinEvent,
    /// Usable denominations, largest first.
    pub denominations: Vec<u64>,
    pub amount: u64,
    pub remaining: u64,
    /// Coins taken so far of each denomination, aligned with `denominations`.
    pub counts: Vec<u64>,
    /// Total coins taken so far.
    pub coins: u64,
    /// Position in `denominations` being used.
    pub current: Option<usize>,
}

impl Snapshot for CoinStep {
    type State = CoinStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(CoinStep);

impl CoinStep {
    /// Coins taken so far in the order they were taken.
    pub fn taken(&self) -> Vec<u64> {
        self.denominations
            .iter()
            .zip(&self.counts)
            .flat_map(|(&coin, &count)| std::iter::repeat(coin).take(count as usize))
            .collect()
    }

    fn summary(&self) -> String {
        let parts: Vec<String> = self
            .denominations
            .iter()
            .zip(&self.counts)
            .filter(|(_, count)| **count > 0)
            .map(|(coin, count)| format!("{count} × {coin}"))
            .collect();
        parts.join(" + ")
    }
}

/// Coins the greedy answer uses, whether or not it pays the amount exactly.
fn greedy_coins(denominations: &[u64], amount: u64) -> u64 {
    let mut remaining = amount;
    let mut coins = 0;
    for &coin in denominations {
        coins += remaining / coin;
        remaining %= coin;
    }
    coins
}

/// Trace greedy change-making for `amount`.
///
/// Denominations are used from largest to smallest, taking as many of each
/// as fit before moving down. The greedy answer is recorded even when a
/// better one exists. A remainder that no denomination can pay is a failure
/// step. An answer of more than [`MAX_COINS`] coins is refused up front.
pub fn coin_change(denominations: &[u64], amount: u64) -> Trace<CoinStep> {
    let mut coins: Vec<u64> = denominations.iter().copied().filter(|&c| c > 0).collect();
    coins.sort_unstable_by(|a, b| b.cmp(a));
    coins.dedup();

    let mut tracer = Tracer::new("coin_change");
    let mut step = CoinStep {
        event: CoinEvent::Start,
        denominations: coins.clone(),
        amount,
        remaining: amount,
        counts: vec![0; coins.len()],
        ..Default::default()
    };

    if amount == 0 {
        step.event = CoinEvent::Done { coins: 0 };
        tracer.record("Amount is 0: no coins needed", step);
        return tracer.finish();
    }
    let needed = greedy_coins(&coins, amount);
    if needed > MAX_COINS {
        step.event = CoinEvent::TooManyCoins {
            coins: needed,
            limit: MAX_COINS,
        };
        tracer.record(
            format!("Making {amount} greedily takes {needed} coins, more than {MAX_COINS}: too many to trace"),
            step,
        );
        return tracer.finish();
    }
    tracer.record(format!("Make {amount} from {coins:?}, largest first"), step.clone());

    for (position, &coin) in coins.iter().enumerate() {
        if step.remaining == 0 {
            break;
        }
        step.current = Some(position);
        if coin > step.remaining {
            step.event = CoinEvent::TooLarge {
                coin,
                remaining: step.remaining,
            };
            tracer.record(
                format!("{coin} is larger than the remaining {}: move down", step.remaining),
                step.clone(),
            );
            continue;
        }
        while coin <= step.remaining {
            step.remaining -= coin;
            step.counts[position] += 1;
            step.coins += 1;
            step.event = CoinEvent::Take {
                coin,
                remaining: step.remaining,
            };
            tracer.record(format!("Take {coin}: {} left", step.remaining), step.clone());
        }
    }

    step.current = None;
    if step.remaining == 0 {
        let count = step.coins;
        step.event = CoinEvent::Done { coins: count };
        tracer.record(format!("Done: {count} coins ({})", step.summary()), step);
    } else {
        let remaining = step.remaining;
        step.event = CoinEvent::Failed { remaining };
        tracer.record(
            format!("No denomination fits the remaining {remaining}: exact change is impossible"),
            step,
        );
    }

    tracing::debug!(amount, denominations = coins.len(), "coin change traced");
    tracer.finish()
}
