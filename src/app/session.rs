use bevy::app::AppExit;
use bevy::prelude::*;
use imo_harvest::core::ClaimReceipt;
use imo_harvest::{HarvestEvent, PendingReward, PersistenceError, export_to_base64};

use super::resources::{GestureInput, Session, SessionAction};

pub fn apply_gestures(mut gestures: EventReader<GestureInput>, mut session: ResMut<Session>) {
    let session = &mut *session;
    for GestureInput(gesture) in gestures.read() {
        let events = session.machine.handle_gesture(*gesture, &mut session.ctx);
        absorb_events(session, events);
    }
}

pub fn tick_session(time: Res<Time>, mut session: ResMut<Session>) {
    let session = &mut *session;
    let events = session.machine.update(time.delta_secs(), &mut session.ctx);
    absorb_events(session, events);
}

pub fn apply_session_actions(mut actions: EventReader<SessionAction>, mut session: ResMut<Session>) {
    let session = &mut *session;
    for action in actions.read() {
        match *action {
            SessionAction::Purchase(kind) => match session.ctx.purchase(kind) {
                Ok(()) => {
                    if !session.machine.refresh_tools(&session.ctx) {
                        debug!("tool layout refresh deferred until the next idle round");
                    }
                    session.offers.notice = Some(format!("Bought {kind:?} upgrade"));
                }
                Err(err) => session.offers.notice = Some(err.to_string()),
            },
            SessionAction::RequestDouble => match session.pending.as_mut() {
                Some(pending) => {
                    pending.request_double(&mut session.offers);
                }
                None => session.offers.notice = Some("No harvest to double".to_string()),
            },
            SessionAction::Claim => claim_pending(session),
            SessionAction::ExportSaveCode => match export_to_base64(&session.ctx.snapshot()) {
                Ok(code) => {
                    info!("save code: {code}");
                    session.offers.notice = Some("Save code written to the log".to_string());
                }
                Err(err) => warn!("failed to export save code: {err:#}"),
            },
        }
    }
}

pub fn claim_granted_rewards(mut session: ResMut<Session>) {
    if session.pending.as_ref().is_some_and(PendingReward::bonus_granted) {
        claim_pending(&mut session);
    }
}

pub fn save_on_exit(mut exits: EventReader<AppExit>, mut session: ResMut<Session>) {
    if exits.read().next().is_none() {
        return;
    }
    match settle_and_save(&mut session) {
        Ok(()) => info!("progress saved on exit"),
        Err(err) => warn!("failed to save progress on exit: {err}"),
    }
}

fn settle_and_save(session: &mut Session) -> Result<(), PersistenceError> {
    claim_pending(session);
    session.ctx.save()
}

fn absorb_events(session: &mut Session, events: Vec<HarvestEvent>) {
    for event in events {
        match event {
            HarvestEvent::PhaseChanged { from, to } => debug!("harvest phase {from:?} -> {to:?}"),
            HarvestEvent::ToolSwiped {
                index,
                swipe_speed,
                particle_count,
                ..
            } => debug!("tool {index} swiped at {swipe_speed:.0} ({particle_count} particles)"),
            HarvestEvent::HarvestStarted {
                run_size, bonus, ..
            } => {
                info!("harvest of {run_size} started (bonus: {bonus})");
            }
            HarvestEvent::ItemsUnlocked(ids) => {
                let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                session.offers.notice = Some(format!("New: {}", names.join(", ")));
            }
            HarvestEvent::Resolved(result) => {
                // An unclaimed previous run is credited before it is replaced.
                claim_pending(session);
                session.pending = Some(PendingReward::new(result));
            }
            HarvestEvent::ToolGrabbed { .. } | HarvestEvent::ToolReturned { .. } => {}
        }
    }
}

fn claim_pending(session: &mut Session) {
    let Some(pending) = session.pending.take() else {
        return;
    };
    let receipt = pending.claim(&mut session.ctx);
    session.last_summary = Some(summarize(&receipt));
}

fn summarize(receipt: &ClaimReceipt) -> String {
    let mut lines: Vec<String> = receipt
        .result
        .tallies()
        .map(|tally| format!("{} x{} = {}", tally.item.name, tally.count, tally.points()))
        .collect();
    let doubled = if receipt.doubled { " (doubled)" } else { "" };
    lines.push(format!("+{} points{doubled}", receipt.credited));
    lines.join("\n")
}
