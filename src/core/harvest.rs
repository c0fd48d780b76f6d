use rand::Rng;
use rand::rngs::StdRng;

use crate::data::HarvestTuning;
use crate::model::{Bounds, ItemCatalog, ItemId, Point};

use super::context::GameContext;
use super::economy::UpgradeEconomy;
use super::result::HarvestRunResult;
use super::selector::ItemSelector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    DragStart(Point),
    DragMove(Point),
    DragRelease,
    Tap(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarvestPhase {
    Idle,
    Digging,
    ReadyToHarvest,
    Harvesting,
}

#[derive(Debug, PartialEq)]
pub enum HarvestEvent {
    PhaseChanged {
        from: HarvestPhase,
        to: HarvestPhase,
    },
    ToolGrabbed {
        index: usize,
    },
    ToolReturned {
        index: usize,
    },
    ToolSwiped {
        index: usize,
        position: Point,
        swipe_speed: f32,
        particle_count: u32,
    },
    HarvestStarted {
        run_size: u32,
        requested: u64,
        bonus: bool,
        positioned: usize,
    },
    ItemsUnlocked(Vec<ItemId>),
    Resolved(HarvestRunResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInstance {
    home: Point,
    position: Point,
    dragging: bool,
    active: bool,
    drag_start: Point,
    drag_end: Point,
    drag_elapsed: f32,
}

impl ToolInstance {
    fn at_home(home: Point) -> Self {
        Self {
            home,
            position: home,
            dragging: false,
            active: true,
            drag_start: Point::default(),
            drag_end: Point::default(),
            drag_elapsed: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn home(&self) -> Point {
        self.home
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn bounds(&self, tuning: &HarvestTuning) -> Bounds {
        Bounds::new(self.position, tuning.tool_width, tuning.tool_height)
    }

    fn return_home(&mut self) {
        self.dragging = false;
        self.position = self.home;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem {
    pub id: ItemId,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSize {
    pub requested: u64,
    pub run_size: u32,
    pub bonus: bool,
}

impl RunSize {
    pub fn compute(economy: &UpgradeEconomy, tuning: &HarvestTuning, swipe_speed: f32) -> Self {
        let bonus = swipe_speed > tuning.bonus_speed_threshold;
        let multiplier = if bonus { tuning.bonus_multiplier.max(1) } else { 1 };
        let requested = u64::from(economy.harvest_yield_base())
            .saturating_mul(u64::from(economy.tool_aggregate_value()))
            .saturating_mul(u64::from(multiplier));
        let run_size = requested.min(u64::from(tuning.max_run_size)) as u32;
        Self {
            requested,
            run_size,
            bonus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MoleSwipe {
    start: Point,
    elapsed: f32,
}

#[derive(Debug)]
enum SessionPhase {
    Idle,
    Digging {
        elapsed: f32,
    },
    ReadyToHarvest {
        swipe: Option<MoleSwipe>,
    },
    Harvesting {
        result: HarvestRunResult,
        items: Vec<PositionedItem>,
    },
}

impl SessionPhase {
    fn kind(&self) -> HarvestPhase {
        match self {
            Self::Idle => HarvestPhase::Idle,
            Self::Digging { .. } => HarvestPhase::Digging,
            Self::ReadyToHarvest { .. } => HarvestPhase::ReadyToHarvest,
            Self::Harvesting { .. } => HarvestPhase::Harvesting,
        }
    }
}

/// Per-play-session dig/harvest cycle. All transitions are synchronous state
/// updates; gestures that the current phase does not expect are ignored.
#[derive(Debug)]
pub struct HarvestStateMachine<R = StdRng> {
    selector: ItemSelector<R>,
    phase: SessionPhase,
    tools: Vec<ToolInstance>,
    mole_y: f32,
}

impl<R: Rng> HarvestStateMachine<R> {
    pub fn new(selector: ItemSelector<R>, ctx: &GameContext) -> Self {
        let tuning = &ctx.tuning().harvest;
        Self {
            selector,
            phase: SessionPhase::Idle,
            tools: home_tools(tuning, ctx.economy().active_tool_count()),
            mole_y: tuning.mole_rest_y,
        }
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase.kind()
    }

    pub fn tools(&self) -> &[ToolInstance] {
        &self.tools
    }

    pub fn mole_position(&self, tuning: &HarvestTuning) -> Point {
        Point::new(tuning.mole_origin_x(), self.mole_y)
    }

    pub fn positioned_items(&self) -> &[PositionedItem] {
        match &self.phase {
            SessionPhase::Harvesting { items, .. } => items,
            _ => &[],
        }
    }

    pub fn refresh_tools(&mut self, ctx: &GameContext) -> bool {
        let untouched = self.tools.iter().all(|tool| tool.active && !tool.dragging);
        if self.phase.kind() != HarvestPhase::Idle || !untouched {
            return false;
        }
        self.tools = home_tools(&ctx.tuning().harvest, ctx.economy().active_tool_count());
        true
    }

    pub fn handle_gesture(&mut self, gesture: GestureEvent, ctx: &mut GameContext) -> Vec<HarvestEvent> {
        match self.phase.kind() {
            HarvestPhase::Idle => self.handle_idle_gesture(gesture, &ctx.tuning().harvest),
            HarvestPhase::ReadyToHarvest => self.handle_mole_gesture(gesture, ctx),
            HarvestPhase::Digging | HarvestPhase::Harvesting => Vec::new(),
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &mut GameContext) -> Vec<HarvestEvent> {
        let dt = dt.max(0.0);
        let tuning = &ctx.tuning().harvest;
        match &mut self.phase {
            SessionPhase::Idle => {
                for tool in self.tools.iter_mut().filter(|tool| tool.dragging) {
                    tool.drag_elapsed += dt;
                }
                Vec::new()
            }
            SessionPhase::Digging { elapsed } => {
                *elapsed += dt;
                if *elapsed >= tuning.dig_duration {
                    vec![self.transition(SessionPhase::ReadyToHarvest { swipe: None })]
                } else {
                    Vec::new()
                }
            }
            SessionPhase::ReadyToHarvest { swipe } => {
                if let Some(swipe) = swipe {
                    swipe.elapsed += dt;
                }
                Vec::new()
            }
            SessionPhase::Harvesting { items, .. } => {
                let rise = tuning.rise_speed * dt;
                self.mole_y += rise;
                for item in items.iter_mut() {
                    item.position.y += rise;
                }
                let lowest = items
                    .iter()
                    .map(|item| item.position.y)
                    .fold(f32::INFINITY, f32::min);
                if items.is_empty() || lowest > tuning.world_height {
                    self.finish_harvest(ctx)
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn handle_idle_gesture(&mut self, gesture: GestureEvent, tuning: &HarvestTuning) -> Vec<HarvestEvent> {
        let mut events = Vec::new();
        match gesture {
            GestureEvent::DragStart(pointer) => {
                for (index, tool) in self.tools.iter_mut().enumerate() {
                    if tool.active && !tool.dragging && tool.bounds(tuning).contains(pointer) {
                        tool.dragging = true;
                        tool.drag_start = pointer;
                        tool.drag_end = pointer;
                        tool.drag_elapsed = 0.0;
                        events.push(HarvestEvent::ToolGrabbed { index });
                    }
                }
            }
            GestureEvent::DragMove(pointer) => {
                for (index, tool) in self.tools.iter_mut().enumerate() {
                    if !tool.active || !tool.dragging {
                        continue;
                    }
                    tool.drag_end = pointer;
                    tool.position = Point::new(
                        pointer.x - tuning.tool_width * 0.5,
                        pointer.y - tuning.tool_height * 0.5,
                    );
                    let downward = tool.drag_end.y < tool.drag_start.y;
                    if downward && tool.position.y <= tuning.ground_y {
                        let swipe_speed = tuning
                            .swipe_speed(tool.drag_start.distance(tool.drag_end), tool.drag_elapsed);
                        tool.active = false;
                        tool.dragging = false;
                        events.push(HarvestEvent::ToolSwiped {
                            index,
                            position: tool.position,
                            swipe_speed,
                            particle_count: tuning.particle_count(swipe_speed),
                        });
                    }
                }
                if !self.tools.iter().any(|tool| tool.active) {
                    log::debug!("all {} tools swiped", self.tools.len());
                    events.push(self.transition(SessionPhase::Digging { elapsed: 0.0 }));
                }
            }
            GestureEvent::DragRelease => {
                for (index, tool) in self.tools.iter_mut().enumerate() {
                    if tool.active && tool.dragging {
                        tool.return_home();
                        events.push(HarvestEvent::ToolReturned { index });
                    }
                }
            }
            GestureEvent::Tap(_) => {}
        }
        events
    }

    fn handle_mole_gesture(&mut self, gesture: GestureEvent, ctx: &mut GameContext) -> Vec<HarvestEvent> {
        let tuning = &ctx.tuning().harvest;
        let mole = tuning.mole_bounds(self.mole_y);
        let SessionPhase::ReadyToHarvest { swipe } = &mut self.phase else {
            return Vec::new();
        };

        let speed = match gesture {
            GestureEvent::DragStart(pointer) => {
                if mole.contains(pointer) {
                    *swipe = Some(MoleSwipe {
                        start: pointer,
                        elapsed: 0.0,
                    });
                }
                None
            }
            GestureEvent::DragMove(pointer) => swipe.and_then(|active| {
                let direction = (pointer - active.start).normalize_or_zero();
                (direction.y > tuning.upward_threshold)
                    .then(|| tuning.swipe_speed(active.start.distance(pointer), active.elapsed))
            }),
            GestureEvent::DragRelease => {
                *swipe = None;
                None
            }
            GestureEvent::Tap(pointer) => {
                let direction = (pointer - mole.origin).normalize_or_zero();
                (mole.contains(pointer) && direction.y > tuning.upward_threshold)
                    .then_some(tuning.tap_swipe_speed)
            }
        };

        match speed {
            Some(swipe_speed) => self.begin_harvest(swipe_speed, ctx),
            None => Vec::new(),
        }
    }

    fn begin_harvest(&mut self, swipe_speed: f32, ctx: &mut GameContext) -> Vec<HarvestEvent> {
        let tuning = &ctx.tuning().harvest;
        let size = RunSize::compute(ctx.economy(), tuning, swipe_speed);
        if size.requested > u64::from(size.run_size) {
            log::debug!("run size {} clamped to {}", size.requested, size.run_size);
        }

        let vine_y = self.mole_y - tuning.vine_height;
        let vine_center_x = tuning.mole_origin_x() + tuning.mole_width * 0.5;
        let (result, items) = draw_run(
            &mut self.selector,
            ctx.catalog(),
            size.run_size,
            tuning,
            Point::new(vine_center_x, vine_y),
        );

        let mut events = vec![HarvestEvent::HarvestStarted {
            run_size: size.run_size,
            requested: size.requested,
            bonus: size.bonus,
            positioned: items.len(),
        }];
        let unlocked = ctx.register_unlocks(result.item_ids());
        if !unlocked.is_empty() {
            events.push(HarvestEvent::ItemsUnlocked(unlocked));
        }
        events.push(self.transition(SessionPhase::Harvesting { result, items }));
        events
    }

    fn finish_harvest(&mut self, ctx: &GameContext) -> Vec<HarvestEvent> {
        let tuning = &ctx.tuning().harvest;
        self.mole_y = tuning.mole_rest_y;
        self.tools = home_tools(tuning, ctx.economy().active_tool_count());

        let from = self.phase.kind();
        let finished = std::mem::replace(&mut self.phase, SessionPhase::Idle);
        let mut events = vec![HarvestEvent::PhaseChanged {
            from,
            to: HarvestPhase::Idle,
        }];
        if let SessionPhase::Harvesting { result, .. } = finished {
            log::debug!(
                "harvest resolved: {} items for {} points",
                result.run_size(),
                result.total_points()
            );
            events.push(HarvestEvent::Resolved(result));
        }
        events
    }

    fn transition(&mut self, next: SessionPhase) -> HarvestEvent {
        let from = self.phase.kind();
        let to = next.kind();
        log::debug!("harvest phase {from:?} -> {to:?}");
        self.phase = next;
        HarvestEvent::PhaseChanged { from, to }
    }
}

fn home_tools(tuning: &HarvestTuning, count: usize) -> Vec<ToolInstance> {
    (0..count)
        .map(|index| ToolInstance::at_home(tuning.tool_home(index)))
        .collect()
}

/// Performs every draw of a run. Only the first `display_cap` draws receive a
/// spawn position; the rest count toward points and unlocks only.
fn draw_run<R: Rng>(
    selector: &mut ItemSelector<R>,
    catalog: &ItemCatalog,
    run_size: u32,
    tuning: &HarvestTuning,
    vine: Point,
) -> (HarvestRunResult, Vec<PositionedItem>) {
    let displayed = run_size.min(tuning.display_cap);
    let mut result = HarvestRunResult::new(run_size);
    let mut items = Vec::with_capacity(displayed as usize);

    for index in 0..run_size {
        let item = selector.select_item(catalog, run_size);
        result.record(item);
        if index < displayed {
            let i = index as f32;
            let offset_x = i * tuning.item_spread * (i * tuning.item_spread_angle).sin();
            items.push(PositionedItem {
                id: item.id.clone(),
                position: Point::new(
                    vine.x - tuning.item_width * 0.5 + offset_x,
                    vine.y - (i + 1.0) * tuning.item_spacing,
                ),
            });
        }
    }

    (result, items)
}

#[cfg(test)]
mod tests {
    use super::{GestureEvent, HarvestEvent, HarvestPhase, HarvestStateMachine, RunSize};
    use crate::core::{EconomyParts, GameContext, ItemSelector, UnlockTracker, UpgradeEconomy};
    use crate::data::{GameTuning, HarvestTuning, load_bundled_catalog};
    use crate::model::Point;
    use crate::save::MemoryStore;

    fn economy(harvest_yield_base: u32, tool_level: u32, unlocked: u32) -> UpgradeEconomy {
        UpgradeEconomy::from_parts(EconomyParts {
            point_balance: 0,
            harvest_yield_base,
            harvest_upgrade_cost: 50,
            tool_level,
            tool_level_upgrade_cost: 100,
            tool_instances_unlocked: unlocked,
            tool_unlock_cost: 350,
        })
    }

    fn context(economy: UpgradeEconomy) -> GameContext {
        GameContext::with_state(
            load_bundled_catalog().expect("catalog"),
            GameTuning::default(),
            economy,
            UnlockTracker::new(),
            Box::new(MemoryStore::new()),
        )
    }

    fn swipe_tool_down(
        machine: &mut HarvestStateMachine,
        ctx: &mut GameContext,
        index: usize,
    ) -> Vec<HarvestEvent> {
        let tuning = ctx.tuning().harvest.clone();
        let center = machine.tools()[index].bounds(&tuning).center();
        let mut events = machine.handle_gesture(GestureEvent::DragStart(center), ctx);
        events.extend(machine.update(0.1, ctx));
        events.extend(machine.handle_gesture(
            GestureEvent::DragMove(Point::new(center.x, tuning.ground_y - 50.0)),
            ctx,
        ));
        events
    }

    #[test]
    fn run_size_multiplies_stats_and_applies_bonus_and_cap() {
        let tuning = HarvestTuning::default();
        let slow = RunSize::compute(&economy(2, 3, 0), &tuning, 500.0);
        assert_eq!(slow.run_size, 6);
        assert!(!slow.bonus);

        let fast = RunSize::compute(&economy(2, 3, 0), &tuning, 1500.0);
        assert_eq!(fast.run_size, 12);
        assert!(fast.bonus);

        let huge = RunSize::compute(&economy(2500, 1, 0), &tuning, 1500.0);
        assert_eq!(huge.requested, 5000);
        assert_eq!(huge.run_size, 3000);
    }

    #[test]
    fn released_drag_returns_tool_home() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        let tuning = ctx.tuning().harvest.clone();
        let home = machine.tools()[0].home();
        let center = machine.tools()[0].bounds(&tuning).center();

        machine.handle_gesture(GestureEvent::DragStart(center), &mut ctx);
        machine.handle_gesture(GestureEvent::DragMove(Point::new(center.x, 1200.0)), &mut ctx);
        assert_ne!(machine.tools()[0].position(), home);

        let events = machine.handle_gesture(GestureEvent::DragRelease, &mut ctx);
        assert_eq!(events, vec![HarvestEvent::ToolReturned { index: 0 }]);
        assert_eq!(machine.tools()[0].position(), home);
        assert_eq!(machine.phase(), HarvestPhase::Idle);
    }

    #[test]
    fn upward_drag_past_the_ground_does_not_count() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        let tuning = ctx.tuning().harvest.clone();
        let center = machine.tools()[0].bounds(&tuning).center();

        machine.handle_gesture(GestureEvent::DragStart(center), &mut ctx);
        machine.handle_gesture(GestureEvent::DragMove(Point::new(center.x, 1900.0)), &mut ctx);

        assert!(machine.tools()[0].is_active());
        assert_eq!(machine.phase(), HarvestPhase::Idle);
    }

    #[test]
    fn every_tool_must_be_swiped_before_digging() {
        let mut ctx = context(economy(1, 3, 1));
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        assert_eq!(machine.tools().len(), 2);

        let events = swipe_tool_down(&mut machine, &mut ctx, 0);
        assert!(matches!(
            events.last(),
            Some(HarvestEvent::ToolSwiped { index: 0, .. })
        ));
        assert_eq!(machine.phase(), HarvestPhase::Idle);

        let events = swipe_tool_down(&mut machine, &mut ctx, 1);
        assert_eq!(
            events.last(),
            Some(&HarvestEvent::PhaseChanged {
                from: HarvestPhase::Idle,
                to: HarvestPhase::Digging
            })
        );
    }

    #[test]
    fn swipe_speed_sets_particle_count() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        let events = swipe_tool_down(&mut machine, &mut ctx, 0);

        let swiped = events.iter().find_map(|event| match event {
            HarvestEvent::ToolSwiped {
                swipe_speed,
                particle_count,
                ..
            } => Some((*swipe_speed, *particle_count)),
            _ => None,
        });
        let (speed, particles) = swiped.expect("tool swiped");
        // 1170 units in 0.1s.
        assert!((speed - 11_700.0).abs() < 1.0);
        assert_eq!(particles, 50);
    }

    #[test]
    fn digging_waits_for_its_timer_and_ignores_input() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        swipe_tool_down(&mut machine, &mut ctx, 0);
        assert_eq!(machine.phase(), HarvestPhase::Digging);

        assert!(machine.update(0.3, &mut ctx).is_empty());
        let tap = GestureEvent::Tap(Point::new(540.0, 800.0));
        assert!(machine.handle_gesture(tap, &mut ctx).is_empty());

        machine.update(0.2, &mut ctx);
        assert_eq!(machine.phase(), HarvestPhase::ReadyToHarvest);
    }

    #[test]
    fn sideways_mole_drag_does_not_harvest() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        swipe_tool_down(&mut machine, &mut ctx, 0);
        machine.update(0.5, &mut ctx);

        machine.handle_gesture(GestureEvent::DragStart(Point::new(540.0, 700.0)), &mut ctx);
        machine.handle_gesture(GestureEvent::DragMove(Point::new(700.0, 720.0)), &mut ctx);
        assert_eq!(machine.phase(), HarvestPhase::ReadyToHarvest);

        machine.handle_gesture(GestureEvent::DragMove(Point::new(560.0, 900.0)), &mut ctx);
        assert_eq!(machine.phase(), HarvestPhase::Harvesting);
    }

    #[test]
    fn only_the_display_cap_is_positioned() {
        let mut ctx = context(economy(100, 3, 0));
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(3), &ctx);
        swipe_tool_down(&mut machine, &mut ctx, 0);
        machine.update(0.5, &mut ctx);

        let events = machine.handle_gesture(GestureEvent::Tap(Point::new(600.0, 850.0)), &mut ctx);
        assert!(events.contains(&HarvestEvent::HarvestStarted {
            run_size: 600,
            requested: 600,
            bonus: true,
            positioned: 100,
        }));
        assert_eq!(machine.positioned_items().len(), 100);
    }

    #[test]
    fn taps_off_the_mole_or_below_its_origin_are_ignored() {
        let mut ctx = context(UpgradeEconomy::default());
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(1), &ctx);
        swipe_tool_down(&mut machine, &mut ctx, 0);
        machine.update(0.5, &mut ctx);

        let outside = GestureEvent::Tap(Point::new(100.0, 700.0));
        assert!(machine.handle_gesture(outside, &mut ctx).is_empty());
        // Inside the mole, but nearly level with its bottom-left corner.
        let flat = GestureEvent::Tap(Point::new(680.0, 600.0));
        assert!(machine.handle_gesture(flat, &mut ctx).is_empty());
        assert_eq!(machine.phase(), HarvestPhase::ReadyToHarvest);

        machine.handle_gesture(GestureEvent::Tap(Point::new(600.0, 850.0)), &mut ctx);
        assert_eq!(machine.phase(), HarvestPhase::Harvesting);
    }

    #[test]
    fn harvesting_ignores_every_gesture() {
        let mut ctx = context(economy(2, 3, 0));
        let mut machine = HarvestStateMachine::new(ItemSelector::seeded(4), &ctx);
        swipe_tool_down(&mut machine, &mut ctx, 0);
        machine.update(0.5, &mut ctx);
        machine.handle_gesture(GestureEvent::Tap(Point::new(600.0, 850.0)), &mut ctx);
        assert_eq!(machine.phase(), HarvestPhase::Harvesting);

        let items = machine.positioned_items().to_vec();
        let tool_home = ctx.tuning().harvest.tool_home(0);
        for gesture in [
            GestureEvent::DragStart(Point::new(tool_home.x + 10.0, tool_home.y + 10.0)),
            GestureEvent::DragMove(Point::new(540.0, 300.0)),
            GestureEvent::DragRelease,
            GestureEvent::Tap(Point::new(600.0, 850.0)),
        ] {
            assert!(machine.handle_gesture(gesture, &mut ctx).is_empty());
        }
        assert_eq!(machine.phase(), HarvestPhase::Harvesting);
        assert_eq!(machine.positioned_items(), items.as_slice());
    }
}
