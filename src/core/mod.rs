mod context;
mod economy;
mod harvest;
mod result;
mod reward;
mod selector;
mod unlocks;

pub use context::{BoxedStore, GameContext};
pub use economy::{EconomyError, EconomyParts, UpgradeEconomy, UpgradeKind};
pub use harvest::{
    GestureEvent, HarvestEvent, HarvestPhase, HarvestStateMachine, PositionedItem, RunSize,
    ToolInstance,
};
pub use result::{HarvestRunResult, ItemTally};
pub use reward::{
    BONUS_USED_MESSAGE, ClaimReceipt, DOUBLE_OFFER_MESSAGE, GrantCallback, NoRewardOffers,
    PendingReward, RewardOffers,
};
pub use selector::{FLAT_RARE_CHANCE, ItemSelector, SPECIAL_CHANCE};
pub use unlocks::UnlockTracker;
