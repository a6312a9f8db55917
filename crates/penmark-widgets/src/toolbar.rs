//! Widget toolbar visibility arbitration.
//!
//! Features register a toolbar together with a resolver mapping the current
//! selection to the view element the toolbar relates to. On every UI refresh
//! at most one toolbar is shown, through an external floating-panel
//! collaborator.

use crate::error::WidgetError;
use penmark_core::view::{ViewDocument, ViewId, ViewSelection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anchor positions for the floating panel, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelPosition {
    NorthArrowSouth,
    NorthArrowSouthWest,
    NorthArrowSouthEast,
    SouthArrowNorth,
    SouthArrowNorthWest,
    SouthArrowNorthEast,
}

/// The fixed anchor preference used for widget toolbars.
pub fn default_panel_positions() -> Vec<PanelPosition> {
    vec![
        PanelPosition::NorthArrowSouth,
        PanelPosition::NorthArrowSouthWest,
        PanelPosition::NorthArrowSouthEast,
        PanelPosition::SouthArrowNorth,
        PanelPosition::SouthArrowNorthWest,
        PanelPosition::SouthArrowNorthEast,
    ]
}

/// A panel-stack insertion request handed to the balloon collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalloonRequest {
    pub view: Uuid,
    pub positions: Vec<PanelPosition>,
    pub target: ViewId,
    pub class_name: Option<String>,
}

/// The floating-panel collaborator: a z-ordered stack of panels where only
/// the topmost is visible.
pub trait ContextualBalloon {
    fn add(&mut self, request: BalloonRequest);
    fn remove(&mut self, view: Uuid);
    /// Re-anchor the visible panel to a possibly moved target.
    fn update_position(&mut self, target: ViewId);
    fn visible_view(&self) -> Option<Uuid>;
    fn has_view(&self, view: Uuid) -> bool;
}

/// A toolbar built from a registered item list.
#[derive(Debug, Clone)]
pub struct ToolbarView {
    pub view_id: Uuid,
    pub items: Vec<String>,
}

impl ToolbarView {
    fn new(items: Vec<String>) -> Self {
        Self {
            view_id: Uuid::new_v4(),
            items,
        }
    }
}

/// Maps the current selection to the element a toolbar anchors to.
pub type RelatedElementResolver = Box<dyn Fn(&ViewDocument, &ViewSelection) -> Option<ViewId>>;

/// Registration options for one widget toolbar.
pub struct ToolbarOptions {
    pub items: Vec<String>,
    pub resolver: RelatedElementResolver,
    pub balloon_class: Option<String>,
}

struct ToolbarDefinition {
    id: String,
    view: ToolbarView,
    resolver: RelatedElementResolver,
    balloon_class: Option<String>,
}

/// Registry of widget toolbars plus the arbitration policy choosing which
/// one is shown.
#[derive(Default)]
pub struct WidgetToolbarRepository {
    definitions: Vec<ToolbarDefinition>,
}

impl WidgetToolbarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a toolbar under a unique id.
    pub fn register(&mut self, id: &str, options: ToolbarOptions) -> Result<(), WidgetError> {
        if self.definitions.iter().any(|def| def.id == id) {
            return Err(WidgetError::DuplicateToolbar { id: id.to_string() });
        }
        log::debug!("registering widget toolbar {id:?}");
        self.definitions.push(ToolbarDefinition {
            id: id.to_string(),
            view: ToolbarView::new(options.items),
            resolver: options.resolver,
            balloon_class: options.balloon_class,
        });
        Ok(())
    }

    /// The built toolbar view for a registered id.
    pub fn toolbar_view(&self, id: &str) -> Option<&ToolbarView> {
        self.definitions
            .iter()
            .find(|def| def.id == id)
            .map(|def| &def.view)
    }

    /// Arbitration tick: run the resolvers against the current selection and
    /// show at most one toolbar. Called on every UI refresh and on focus
    /// changes.
    ///
    /// Among eligible toolbars the one whose related element sits deepest in
    /// the view tree wins; a contender must be strictly deeper to displace
    /// the current leader, so registration order breaks ties.
    pub fn update(&mut self, view: &ViewDocument, balloon: &mut dyn ContextualBalloon) {
        let selection = view.selection();
        let mut chosen: Option<(usize, ViewId, usize)> = None;
        if view.is_focused() {
            for (index, def) in self.definitions.iter().enumerate() {
                let Some(target) = (def.resolver)(view, selection) else {
                    continue;
                };
                let depth = view.depth(target);
                if chosen.is_none_or(|(_, _, best)| depth > best) {
                    chosen = Some((index, target, depth));
                }
            }
        }
        for (index, def) in self.definitions.iter().enumerate() {
            match chosen {
                Some((winner, target, _)) if winner == index => {
                    show_toolbar(def, target, balloon);
                }
                _ => hide_toolbar(def, balloon),
            }
        }
    }

    /// Tear down: pull every registered toolbar out of the panel stack and
    /// drop the registry.
    pub fn destroy(&mut self, balloon: &mut dyn ContextualBalloon) {
        for def in &self.definitions {
            if balloon.has_view(def.view.view_id) {
                balloon.remove(def.view.view_id);
            }
        }
        self.definitions.clear();
    }
}

fn show_toolbar(def: &ToolbarDefinition, target: ViewId, balloon: &mut dyn ContextualBalloon) {
    if balloon.visible_view() == Some(def.view.view_id) {
        balloon.update_position(target);
        return;
    }
    if balloon.has_view(def.view.view_id) {
        // Stacked under another panel; leave the stack order alone.
        return;
    }
    log::debug!("showing widget toolbar {:?}", def.id);
    balloon.add(BalloonRequest {
        view: def.view.view_id,
        positions: default_panel_positions(),
        target,
        class_name: def.balloon_class.clone(),
    });
}

fn hide_toolbar(def: &ToolbarDefinition, balloon: &mut dyn ContextualBalloon) {
    // Only the visible panel is removed; a covered panel may belong to
    // whatever legitimately covers it.
    if balloon.visible_view() == Some(def.view.view_id) {
        log::debug!("hiding widget toolbar {:?}", def.id);
        balloon.remove(def.view.view_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penmark_core::view::HostProfile;

    #[derive(Default)]
    struct FakeBalloon {
        stack: Vec<BalloonRequest>,
        repositions: Vec<(Uuid, ViewId)>,
    }

    impl ContextualBalloon for FakeBalloon {
        fn add(&mut self, request: BalloonRequest) {
            self.stack.push(request);
        }

        fn remove(&mut self, view: Uuid) {
            self.stack.retain(|r| r.view != view);
        }

        fn update_position(&mut self, target: ViewId) {
            if let Some(top) = self.stack.last() {
                self.repositions.push((top.view, target));
            }
        }

        fn visible_view(&self) -> Option<Uuid> {
            self.stack.last().map(|r| r.view)
        }

        fn has_view(&self, view: Uuid) -> bool {
            self.stack.iter().any(|r| r.view == view)
        }
    }

    /// A focused view with a figure at the root and another figure nested
    /// inside it.
    fn nested_view() -> (ViewDocument, ViewId, ViewId) {
        let mut view = ViewDocument::new(HostProfile::default());
        let root = view.root();
        let mut writer = view.writer();
        let outer = writer.create_element("figure");
        writer.append(outer, root);
        let inner = writer.create_element("figure");
        writer.append(inner, outer);
        drop(writer);
        view.focus();
        (view, outer, inner)
    }

    fn options_for(target: ViewId) -> ToolbarOptions {
        ToolbarOptions {
            items: vec!["button".to_string()],
            resolver: Box::new(move |_, _| Some(target)),
            balloon_class: None,
        }
    }

    fn never() -> ToolbarOptions {
        ToolbarOptions {
            items: Vec::new(),
            resolver: Box::new(|_, _| None),
            balloon_class: None,
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut repo = WidgetToolbarRepository::new();
        repo.register("image", never()).unwrap();
        let err = repo.register("image", never()).unwrap_err();
        assert!(matches!(err, WidgetError::DuplicateToolbar { id } if id == "image"));
    }

    #[test]
    fn test_deepest_related_element_wins_regardless_of_order() {
        let (view, outer, inner) = nested_view();

        for registration_order in [true, false] {
            let mut repo = WidgetToolbarRepository::new();
            if registration_order {
                repo.register("outer", options_for(outer)).unwrap();
                repo.register("inner", options_for(inner)).unwrap();
            } else {
                repo.register("inner", options_for(inner)).unwrap();
                repo.register("outer", options_for(outer)).unwrap();
            }
            let mut balloon = FakeBalloon::default();
            repo.update(&view, &mut balloon);

            let inner_view = repo.toolbar_view("inner").unwrap().view_id;
            assert_eq!(balloon.visible_view(), Some(inner_view));
            assert_eq!(balloon.stack.len(), 1);
        }
    }

    #[test]
    fn test_equal_depth_keeps_first_registered() {
        let (mut view, outer, _) = nested_view();
        let sibling = {
            let mut writer = view.writer();
            let sibling = writer.create_element("figure");
            let root = writer.doc().root();
            writer.append(sibling, root);
            sibling
        };
        view.focus();

        let mut repo = WidgetToolbarRepository::new();
        repo.register("first", options_for(outer)).unwrap();
        repo.register("second", options_for(sibling)).unwrap();
        let mut balloon = FakeBalloon::default();
        repo.update(&view, &mut balloon);

        let first = repo.toolbar_view("first").unwrap().view_id;
        assert_eq!(balloon.visible_view(), Some(first));
    }

    #[test]
    fn test_visible_toolbar_is_repositioned_not_readded() {
        let (view, outer, _) = nested_view();
        let mut repo = WidgetToolbarRepository::new();
        repo.register("outer", options_for(outer)).unwrap();
        let mut balloon = FakeBalloon::default();

        repo.update(&view, &mut balloon);
        repo.update(&view, &mut balloon);

        let toolbar = repo.toolbar_view("outer").unwrap().view_id;
        assert_eq!(balloon.stack.len(), 1);
        assert_eq!(balloon.repositions, vec![(toolbar, outer)]);
    }

    #[test]
    fn test_toolbar_stacked_under_foreign_panel_left_alone() {
        let (view, outer, _) = nested_view();
        let mut repo = WidgetToolbarRepository::new();
        repo.register("outer", options_for(outer)).unwrap();
        let mut balloon = FakeBalloon::default();
        repo.update(&view, &mut balloon);

        // Another feature's panel covers the toolbar.
        let foreign = Uuid::new_v4();
        balloon.add(BalloonRequest {
            view: foreign,
            positions: default_panel_positions(),
            target: outer,
            class_name: None,
        });

        repo.update(&view, &mut balloon);

        // Not re-added, not repositioned, not removed from under the panel.
        assert_eq!(balloon.stack.len(), 2);
        assert_eq!(balloon.visible_view(), Some(foreign));
        assert!(balloon.repositions.is_empty());
    }

    #[test]
    fn test_resolver_returning_none_hides_visible_toolbar() {
        let (view, outer, _) = nested_view();
        let target = std::rc::Rc::new(std::cell::Cell::new(Some(outer)));
        let resolver_target = target.clone();
        let mut repo = WidgetToolbarRepository::new();
        repo.register(
            "outer",
            ToolbarOptions {
                items: Vec::new(),
                resolver: Box::new(move |_, _| resolver_target.get()),
                balloon_class: None,
            },
        )
        .unwrap();
        let mut balloon = FakeBalloon::default();
        repo.update(&view, &mut balloon);
        assert_eq!(balloon.stack.len(), 1);

        target.set(None);
        repo.update(&view, &mut balloon);
        assert!(balloon.stack.is_empty());
    }

    #[test]
    fn test_unfocused_document_hides_everything() {
        let (mut view, outer, _) = nested_view();
        let mut repo = WidgetToolbarRepository::new();
        repo.register("outer", options_for(outer)).unwrap();
        let mut balloon = FakeBalloon::default();
        repo.update(&view, &mut balloon);
        assert_eq!(balloon.stack.len(), 1);

        view.blur();
        repo.update(&view, &mut balloon);
        assert!(balloon.stack.is_empty());
    }

    #[test]
    fn test_destroy_clears_registry_and_stack() {
        let (view, outer, _) = nested_view();
        let mut repo = WidgetToolbarRepository::new();
        repo.register("outer", options_for(outer)).unwrap();
        let mut balloon = FakeBalloon::default();
        repo.update(&view, &mut balloon);

        repo.destroy(&mut balloon);
        assert!(balloon.stack.is_empty());
        assert!(repo.toolbar_view("outer").is_none());

        // The id is free again after teardown.
        assert!(repo.register("outer", never()).is_ok());
    }
}
