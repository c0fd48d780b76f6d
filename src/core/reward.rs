use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::context::GameContext;
use super::result::HarvestRunResult;

pub const DOUBLE_OFFER_MESSAGE: &str = "Watch an ad to double this harvest's points?";
pub const BONUS_USED_MESSAGE: &str = "The bonus for this harvest was already used.";

pub type GrantCallback = Box<dyn FnOnce() + Send>;

pub trait RewardOffers {
    fn present_reward_offer(&mut self, message: &str, on_granted: GrantCallback);

    fn present_message(&mut self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoRewardOffers;

impl RewardOffers for NoRewardOffers {
    fn present_reward_offer(&mut self, message: &str, _on_granted: GrantCallback) {
        log::info!("reward offers unavailable on this platform: {message}");
    }

    fn present_message(&mut self, message: &str) {
        log::info!("{message}");
    }
}

#[derive(Debug)]
enum Bonus {
    Available,
    Offered(Arc<AtomicBool>),
}

/// A resolved harvest whose points have not been credited yet. Claiming
/// consumes it, so a run can only ever be credited once, and the doubling
/// bonus can only apply before that happens.
#[derive(Debug)]
#[must_use = "an unclaimed reward never reaches the point balance"]
pub struct PendingReward {
    result: HarvestRunResult,
    bonus: Bonus,
}

#[derive(Debug, PartialEq)]
pub struct ClaimReceipt {
    pub credited: u64,
    pub doubled: bool,
    pub result: HarvestRunResult,
}

impl PendingReward {
    pub fn new(result: HarvestRunResult) -> Self {
        Self {
            result,
            bonus: Bonus::Available,
        }
    }

    pub fn result(&self) -> &HarvestRunResult {
        &self.result
    }

    pub fn base_points(&self) -> u64 {
        self.result.total_points()
    }

    pub fn request_double(&mut self, offers: &mut dyn RewardOffers) -> bool {
        match self.bonus {
            Bonus::Available => {
                let granted = Arc::new(AtomicBool::new(false));
                let signal = Arc::clone(&granted);
                offers.present_reward_offer(
                    DOUBLE_OFFER_MESSAGE,
                    Box::new(move || signal.store(true, Ordering::SeqCst)),
                );
                self.bonus = Bonus::Offered(granted);
                true
            }
            Bonus::Offered(_) => {
                offers.present_message(BONUS_USED_MESSAGE);
                false
            }
        }
    }

    pub fn bonus_granted(&self) -> bool {
        match &self.bonus {
            Bonus::Offered(granted) => granted.load(Ordering::SeqCst),
            Bonus::Available => false,
        }
    }

    pub fn claim(self, ctx: &mut GameContext) -> ClaimReceipt {
        let doubled = self.bonus_granted();
        let base = self.result.total_points();
        let credited = if doubled { base.saturating_mul(2) } else { base };
        ctx.credit_points(credited);
        log::info!("credited {credited} points (doubled: {doubled})");
        ClaimReceipt {
            credited,
            doubled,
            result: self.result,
        }
    }
}
