//! The chat-command interpreter: commit, diff-mode, rollback, help.
//!
//! Commands arrive as ordinary chat messages on a designated control
//! channel. The interpreter filters by channel and sender, resolves the
//! sender's in-world presence, and requires estate-manager privilege before
//! touching any state. Replies are plain-text notices sent back to the
//! originating region.

use gridrev_types::{ChatEvent, RegionId, RegionInfo};
use tracing::{debug, info, warn};

use crate::controller::Controller;
use crate::proximity::order_by_proximity;
use crate::traits::{DiffBroadcaster, EstateService, RevisionModel, SceneAccess};

/// Notice sent to senders without estate-manager privilege.
const DENIAL_NOTICE: &str = "You must be an estate manager to perform that action.";

/// Lines displayed in response to `help`.
const HELP_LINES: &[&str] = &[
    "Content management commands:",
    "  commit (ci) [message] -- save a new revision of all regions",
    "  diff-mode (dm) -- toggle display of changes since the last revision",
    "  rollback (rb) -- restore all regions to their latest revision",
    "  help -- show this menu",
];

impl<M, V, S, E> Controller<M, V, S, E>
where
    M: RevisionModel,
    V: DiffBroadcaster,
    S: SceneAccess,
    E: EstateService,
{
    /// Interpret one chat event. Wrong-channel and senderless messages are
    /// ignored outright; everything else produces at most one reply per
    /// rule in the command grammar.
    pub(crate) fn handle_chat(&mut self, event: &ChatEvent) {
        if event.channel != self.channel {
            return;
        }
        let Some(sender) = event.sender else {
            return;
        };

        debug!(message = event.message, origin = %event.origin, "Command message received");

        let Some(avatar) = self.scene.presence(event.origin, sender) else {
            // The sender disconnected between event capture and dispatch.
            warn!(%sender, origin = %event.origin, "Command sender has no presence; skipping");
            return;
        };

        if !self.estate.is_manager(avatar) {
            debug!(%avatar, "Command from non estate manager; denying");
            self.view.send_notice(event.origin, DENIAL_NOTICE);
            return;
        }

        let first = event.message.split(' ').next().unwrap_or_default();
        match first {
            "ci" | "commit" => self.commit(&event.message, event.origin),
            "dm" | "diff-mode" => self.diff_mode(event.origin),
            "rb" | "rollback" => self.rollback(event.origin),
            "help" => self.help(event.origin),
            other => {
                self.view
                    .send_notice(event.origin, &format!("Command not found: {other}"));
            }
        }
    }

    /// Commit every region in proximity order, tagged with the free-text
    /// message after the command token. Always marks the state dirty; if
    /// overlays are visible, rebuilds and redisplays them from the fresh
    /// revisions and clears the dirty mark again.
    fn commit(&mut self, message: &str, origin: RegionId) {
        let regions = self.regions_by_proximity(origin);
        let log_message = extract_commit_message(message);

        info!(origin = %origin, regions = regions.len(), "Saving terrain and objects of all regions");
        for info in &regions {
            match self.model.commit_region(info.id, &log_message) {
                Ok(revision) => {
                    debug!(region = %info.id, %revision, "Region committed");
                    self.view.send_notice(
                        origin,
                        &format!("Region Saved Successfully: {}", info.name),
                    );
                }
                Err(e) => {
                    warn!(region = %info.id, error = %e, "Region commit failed");
                    self.view
                        .send_notice(origin, &format!("Failed to save region {}: {e}", info.name));
                }
            }
        }
        self.view.send_notice(origin, "Successfully saved all regions.");
        self.state = self.state.mark_dirty();

        if self.state.is_showing() {
            // Display the delta against the new revision instead of the old.
            self.view.send_notice(
                origin,
                "Updating differences between new revision and current environment.",
            );
            self.rebuild_overlays(origin, &regions, true);
            self.view.display_recent_changes(&self.model.current_overlays());
            self.view.send_notice(origin, "Finished updating for DIFF-MODE.");
            self.state = self.state.clear_dirty();
        }
    }

    /// Toggle diff visibility. Turning off hides and clears everything;
    /// turning on rebuilds overlay state from the current revisions across
    /// the proximity-ordered set, then displays the computed diff.
    fn diff_mode(&mut self, origin: RegionId) {
        if self.state.is_showing() {
            self.view.send_notice(origin, "Hiding all meta objects.");
            self.view.hide_all_overlays();
            self.view.hide_all_auras();
            self.view.send_notice(origin, "Diff-mode = OFF");
            self.state = self.state.hide();
            return;
        }

        let regions = self.regions_by_proximity(origin);
        self.view.send_notice(
            origin,
            "Hiding meta objects and replacing with latest revision",
        );
        self.rebuild_overlays(origin, &regions, false);

        self.view.send_notice(
            origin,
            "Displaying differences between last revision and current environment",
        );
        for info in &regions {
            if let Err(e) = self.model.entities_missing_overlays(info.id) {
                warn!(region = %info.id, error = %e, "Diff evaluation failed");
            }
        }
        self.view.display_recent_changes(&self.model.current_overlays());

        self.view.send_notice(origin, "Diff-mode = ON");
        self.state = self.state.show();
    }

    /// Restore every region in proximity order to its latest revision,
    /// discarding live edits. Overlays visible at entry are hidden first
    /// and redisplayed (rebuilt if the state was dirty) at the end.
    fn rollback(&mut self, origin: RegionId) {
        let was_showing = self.state.is_showing();
        if was_showing {
            self.view.hide_all_auras();
            self.view.hide_all_overlays();
        }

        let regions = self.regions_by_proximity(origin);
        for info in &regions {
            match self.model.rollback_region(info.id) {
                Ok(()) => debug!(region = %info.id, "Region rolled back"),
                Err(e) => {
                    warn!(region = %info.id, error = %e, "Region rollback failed");
                    self.view.send_notice(
                        origin,
                        &format!("Failed to roll back region {}: {e}", info.name),
                    );
                }
            }
        }

        if self.state.is_dirty() {
            self.model.clear_all_overlays();
            for info in &regions {
                if let Err(e) = self.model.update_overlays(info.id) {
                    warn!(region = %info.id, error = %e, "Overlay recompute failed");
                }
            }
        }

        if was_showing {
            self.view.display_recent_changes(&self.model.current_overlays());
        }
    }

    /// Display the command help to the origin region.
    fn help(&mut self, origin: RegionId) {
        for line in HELP_LINES {
            self.view.send_notice(origin, line);
        }
    }

    /// Tear down and recompute overlay state across the given regions.
    /// `per_region_notice` adds the per-region completion notice used by
    /// the commit flow.
    fn rebuild_overlays(&mut self, origin: RegionId, regions: &[RegionInfo], per_region_notice: bool) {
        self.view.hide_all_overlays();
        self.view.hide_all_auras();
        self.model.clear_all_overlays();

        for info in regions {
            match self.model.update_overlays(info.id) {
                Ok(_) => {
                    if per_region_notice {
                        self.view.send_notice(
                            origin,
                            &format!(
                                "Finished updating differences between current scene and last revision: {}",
                                info.name
                            ),
                        );
                    }
                }
                Err(e) => {
                    warn!(region = %info.id, error = %e, "Overlay recompute failed");
                    self.view.send_notice(
                        origin,
                        &format!("Failed to compute differences for region {}: {e}", info.name),
                    );
                }
            }
        }
    }

    /// Snapshot the registry and order it by proximity to the origin.
    fn regions_by_proximity(&self, origin: RegionId) -> Vec<RegionInfo> {
        let snapshot = self.registry.snapshot();
        let origin_info = self.registry.get(origin).unwrap_or_else(|| RegionInfo {
            id: origin,
            name: origin.to_string(),
            grid_x: 0,
            grid_y: 0,
        });
        order_by_proximity(&snapshot, &origin_info, RegionInfo::is_neighbor)
    }
}

/// Extract the commit log message: everything after the first token, with
/// one separator stripped. A command with no message text commits with a
/// single blank placeholder.
fn extract_commit_message(message: &str) -> String {
    if message.split_whitespace().nth(1).is_none() {
        return String::from(" ");
    }
    let first = message.split(' ').next().unwrap_or_default();
    let rest = message.get(first.len()..).unwrap_or_default();
    rest.strip_prefix(' ').unwrap_or(rest).to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use gridrev_types::{ChatEvent, SessionId, WorkItem};
    use uuid::Uuid;

    use super::*;
    use crate::registry::RegionRegistry;
    use crate::state::DiffState;
    use crate::testutil::{ModelCall, RecordingModel, RecordingView, TestScene, ViewCall, make_region};
    use crate::traits::StaticEstateService;

    struct Fixture {
        controller:
            Controller<RecordingModel, RecordingView, TestScene, StaticEstateService>,
        model: RecordingModel,
        view: RecordingView,
        origin: RegionId,
        session: SessionId,
    }

    /// One manager session present in region "R1", with "R2" adjacent.
    fn make_fixture() -> Fixture {
        let model = RecordingModel::new();
        let view = RecordingView::new();
        let scene = TestScene::new();
        let registry = Arc::new(RegionRegistry::new());

        let r1 = make_region("R1", 1000, 1000);
        let r2 = make_region("R2", 1001, 1000);
        let origin = r1.id;
        registry.register(r1).unwrap();
        registry.register(r2).unwrap();

        let session = SessionId::new();
        let avatar = Uuid::now_v7();
        scene.put_presence(origin, session, avatar);

        let controller = Controller::new(
            model.clone(),
            view.clone(),
            scene,
            StaticEstateService::new([avatar]),
            registry,
            18,
        );
        Fixture {
            controller,
            model,
            view,
            origin,
            session,
        }
    }

    fn chat(fixture: &Fixture, message: &str) -> WorkItem {
        WorkItem::Chat(ChatEvent {
            channel: 18,
            sender: Some(fixture.session),
            message: message.to_owned(),
            origin: fixture.origin,
        })
    }

    fn notices(view: &RecordingView) -> Vec<String> {
        view.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Notice(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn commit_fans_out_in_proximity_order() {
        let mut fixture = make_fixture();

        fixture
            .controller
            .process(chat(&fixture, "commit bugfix"))
            .unwrap();

        let commits: Vec<ModelCall> = fixture
            .model
            .calls()
            .into_iter()
            .filter(|c| matches!(c, ModelCall::Commit(..)))
            .collect();
        let regions: Vec<RegionInfo> = fixture.controller.registry.snapshot();
        let r1 = regions.iter().find(|r| r.name == "R1").unwrap().id;
        let r2 = regions.iter().find(|r| r.name == "R2").unwrap().id;
        assert_eq!(
            commits,
            vec![
                ModelCall::Commit(r1, String::from("bugfix")),
                ModelCall::Commit(r2, String::from("bugfix")),
            ]
        );

        assert_eq!(
            notices(&fixture.view),
            vec![
                "Region Saved Successfully: R1",
                "Region Saved Successfully: R2",
                "Successfully saved all regions.",
            ]
        );
        assert_eq!(fixture.controller.state(), DiffState::Dirty);
    }

    #[test]
    fn commit_without_message_uses_blank_placeholder() {
        let mut fixture = make_fixture();

        fixture.controller.process(chat(&fixture, "ci")).unwrap();

        let first_commit = fixture
            .model
            .calls()
            .into_iter()
            .find_map(|c| match c {
                ModelCall::Commit(_, message) => Some(message),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_commit, " ");
    }

    #[test]
    fn commit_while_showing_rebuilds_and_stays_showing() {
        let mut fixture = make_fixture();
        fixture.controller.state = DiffState::Showing;

        fixture
            .controller
            .process(chat(&fixture, "commit polish pass"))
            .unwrap();

        let calls = fixture.model.calls();
        assert!(calls.contains(&ModelCall::ClearAll));
        assert_eq!(
            calls.iter().filter(|c| matches!(c, ModelCall::UpdateOverlays(_))).count(),
            2
        );
        assert!(fixture
            .view
            .calls()
            .iter()
            .any(|c| matches!(c, ViewCall::RecentChanges(_))));
        assert_eq!(fixture.controller.state(), DiffState::Showing);
    }

    #[test]
    fn diff_mode_toggle_is_idempotent_on_visibility() {
        let mut fixture = make_fixture();
        assert_eq!(fixture.controller.state(), DiffState::Clean);

        fixture.controller.process(chat(&fixture, "diff-mode")).unwrap();
        assert_eq!(fixture.controller.state(), DiffState::Showing);
        assert!(notices(&fixture.view).contains(&String::from("Diff-mode = ON")));

        fixture.controller.process(chat(&fixture, "dm")).unwrap();
        assert_eq!(fixture.controller.state(), DiffState::Clean);
        assert!(notices(&fixture.view).contains(&String::from("Diff-mode = OFF")));
    }

    #[test]
    fn diff_mode_on_from_dirty_rebuilds_fully() {
        let mut fixture = make_fixture();
        fixture.controller.state = DiffState::Dirty;

        fixture.controller.process(chat(&fixture, "dm")).unwrap();

        let calls = fixture.model.calls();
        assert!(calls.contains(&ModelCall::ClearAll));
        assert_eq!(
            calls.iter().filter(|c| matches!(c, ModelCall::UpdateOverlays(_))).count(),
            2
        );
        assert_eq!(
            calls.iter().filter(|c| matches!(c, ModelCall::Missing(_))).count(),
            2
        );
        assert_eq!(fixture.controller.state(), DiffState::Showing);
    }

    #[test]
    fn rollback_rolls_back_every_region_in_order() {
        let mut fixture = make_fixture();

        fixture.controller.process(chat(&fixture, "rollback")).unwrap();

        let rollbacks: Vec<ModelCall> = fixture
            .model
            .calls()
            .into_iter()
            .filter(|c| matches!(c, ModelCall::Rollback(_)))
            .collect();
        assert_eq!(rollbacks.len(), 2);
        // Hidden and clean: no overlay work at all.
        assert!(fixture.view.calls().is_empty());
    }

    #[test]
    fn rollback_while_showing_hides_then_redisplays() {
        let mut fixture = make_fixture();
        fixture.controller.state = DiffState::ShowingDirty;

        fixture.controller.process(chat(&fixture, "rb")).unwrap();

        let view_calls = fixture.view.calls();
        assert_eq!(view_calls.first(), Some(&ViewCall::HideAuras));
        assert_eq!(view_calls.get(1), Some(&ViewCall::HideOverlays));
        assert!(matches!(view_calls.last(), Some(ViewCall::RecentChanges(_))));
        assert!(fixture.model.calls().contains(&ModelCall::ClearAll));
    }

    #[test]
    fn unknown_command_replies_and_changes_nothing() {
        let mut fixture = make_fixture();

        fixture.controller.process(chat(&fixture, "frobnicate")).unwrap();

        assert!(fixture.model.calls().is_empty());
        assert_eq!(
            notices(&fixture.view),
            vec!["Command not found: frobnicate"]
        );
        assert_eq!(fixture.controller.state(), DiffState::Clean);
    }

    #[test]
    fn non_manager_gets_exactly_one_denial() {
        let mut fixture = make_fixture();
        let stranger = SessionId::new();
        fixture
            .controller
            .scene
            .put_presence(fixture.origin, stranger, Uuid::now_v7());

        fixture
            .controller
            .process(WorkItem::Chat(ChatEvent {
                channel: 18,
                sender: Some(stranger),
                message: String::from("commit sneaky"),
                origin: fixture.origin,
            }))
            .unwrap();

        assert!(fixture.model.calls().is_empty());
        assert_eq!(
            notices(&fixture.view),
            vec!["You must be an estate manager to perform that action."]
        );
        assert_eq!(fixture.controller.state(), DiffState::Clean);
    }

    #[test]
    fn missing_presence_is_a_silent_skip() {
        let mut fixture = make_fixture();
        let ghost = SessionId::new();

        fixture
            .controller
            .process(WorkItem::Chat(ChatEvent {
                channel: 18,
                sender: Some(ghost),
                message: String::from("commit orphaned"),
                origin: fixture.origin,
            }))
            .unwrap();

        assert!(fixture.model.calls().is_empty());
        assert!(fixture.view.calls().is_empty());
    }

    #[test]
    fn senderless_chat_is_ignored() {
        let mut fixture = make_fixture();

        fixture
            .controller
            .process(WorkItem::Chat(ChatEvent {
                channel: 18,
                sender: None,
                message: String::from("commit ghostly"),
                origin: fixture.origin,
            }))
            .unwrap();

        assert!(fixture.model.calls().is_empty());
        assert!(fixture.view.calls().is_empty());
    }

    #[test]
    fn help_lists_every_command() {
        let mut fixture = make_fixture();

        fixture.controller.process(chat(&fixture, "help")).unwrap();

        let text = notices(&fixture.view).join("\n");
        for token in ["commit", "diff-mode", "rollback", "help"] {
            assert!(text.contains(token), "help should mention {token}");
        }
        assert!(fixture.model.calls().is_empty());
    }

    #[test]
    fn message_extraction_preserves_internal_spacing() {
        assert_eq!(extract_commit_message("commit bugfix"), "bugfix");
        assert_eq!(extract_commit_message("ci fix  double  spaces"), "fix  double  spaces");
        assert_eq!(extract_commit_message("commit"), " ");
        assert_eq!(extract_commit_message("commit   "), " ");
    }
}
