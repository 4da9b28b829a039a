//! The interaction controller
//!
//! Owns everything the viewer mutates: the assembled diagram, the current
//! layout and the revision it was computed for, the viewport, the hidden
//! set and the pointer drag state. Each public method is one event.

use std::collections::HashSet;

use grove_core::{
    Corpus, Diagram, DiagramNode, EdgeKind, NodeKind, NodeRef, SourceLookup, SymbolKind,
    VisibilityFilter, assemble,
};
use grove_layout::{Bounds, Layout, LayoutConfig, LayoutEngine, Point, run_layout, write_dot};
use serde::Serialize;

use crate::config::ViewerConfig;
use crate::hidden::{Bookmark, HiddenSet, ToggleOutcome};
use crate::scene::Scene;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Drag pans.
    Primary,
    /// Drag draws a zoom marquee.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Pan { last: Point },
    Marquee { start: Point, current: Point },
}

/// A layout job for the current diagram. Hand the result back to
/// [`InteractionController::apply_layout`] with the same revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRequest {
    pub revision: u64,
    pub dot: String,
}

/// A class the outline can jump to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTarget {
    pub label: String,
    pub node: NodeRef,
    /// Image-space centre of the class node.
    pub center: Point,
}

pub struct InteractionController {
    corpus: Corpus,
    config: ViewerConfig,
    layout_config: LayoutConfig,
    filter: VisibilityFilter,
    diagram: Diagram,
    revision: u64,
    layout: Layout,
    layout_revision: Option<u64>,
    viewport: Viewport,
    hidden: HiddenSet,
    drag: Option<Drag>,
    hover: Option<String>,
}

impl InteractionController {
    pub fn new(
        corpus: Corpus,
        config: ViewerConfig,
        layout_config: LayoutConfig,
        filter: VisibilityFilter,
    ) -> Self {
        let viewport = Self::fresh_viewport(&config);
        let mut controller = InteractionController {
            corpus,
            config,
            layout_config,
            filter,
            diagram: Diagram::new(),
            revision: 0,
            layout: Layout::default(),
            layout_revision: None,
            viewport,
            hidden: HiddenSet::new(),
            drag: None,
            hover: None,
        };
        controller.rebuild();
        controller
    }

    fn fresh_viewport(config: &ViewerConfig) -> Viewport {
        Viewport::new(
            config.viewport_width,
            config.viewport_height,
            config.min_scale,
            config.max_scale,
        )
    }

    /// Replace the corpus. All view state starts over.
    pub fn load(&mut self, corpus: Corpus) {
        self.corpus = corpus;
        self.hidden.clear();
        self.viewport = Self::fresh_viewport(&self.config);
        self.drag = None;
        self.hover = None;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.diagram = assemble(&self.corpus, &self.filter);
        self.revision += 1;
        self.layout = Layout::default();
        self.layout_revision = None;
        self.hover = None;
        tracing::debug!(
            "Diagram revision {}: {} nodes, {} edges",
            self.revision,
            self.diagram.node_count(),
            self.diagram.edge_count()
        );
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn filter(&self) -> VisibilityFilter {
        self.filter
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The layout, if one has been applied to the current diagram.
    pub fn layout(&self) -> Option<&Layout> {
        (self.layout_revision == Some(self.revision)).then_some(&self.layout)
    }

    /// Re-assemble under a new filter. The previous layout is dropped.
    pub fn set_filter(&mut self, filter: VisibilityFilter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.rebuild();
    }

    pub fn request_layout(&self) -> LayoutRequest {
        LayoutRequest {
            revision: self.revision,
            dot: write_dot(&self.diagram, &self.layout_config),
        }
    }

    /// Accept a layout computed for `revision`. Results for any older
    /// diagram are rejected.
    pub fn apply_layout(&mut self, revision: u64, layout: Layout) -> bool {
        if revision != self.revision {
            tracing::warn!(
                "Discarding layout for revision {} (current is {})",
                revision,
                self.revision
            );
            return false;
        }
        self.layout = layout;
        self.layout_revision = Some(revision);
        self.reset_view();
        true
    }

    /// Lay out the current diagram synchronously.
    pub fn relayout(&mut self, engine: &dyn LayoutEngine) -> bool {
        let revision = self.revision;
        let layout = run_layout(engine, &self.diagram, &self.layout_config);
        self.apply_layout(revision, layout)
    }

    // ── Hide / restore ──────────────────────────────────

    pub fn is_visible(&self, node: &NodeRef) -> bool {
        self.diagram.contains(node) && !self.hidden.is_hidden(node)
    }

    /// Hide `node` or, when it heads a hidden entry, restore it. Hiding a
    /// class takes its methods along.
    pub fn toggle_node(&mut self, node: &NodeRef) -> ToggleOutcome {
        if self.hidden.is_root(node) {
            return self.restore(node);
        }
        if self.hidden.is_hidden(node) {
            return ToggleOutcome::Ignored;
        }
        let Some(kind) = self.diagram.node(node).map(|n| n.kind) else {
            tracing::debug!("Toggle of unknown node {} ignored", node);
            return ToggleOutcome::Ignored;
        };

        let mut covered = Vec::new();
        if kind == NodeKind::Class {
            let prefix = format!("{}.", node.key());
            covered.extend(
                self.diagram
                    .nodes()
                    .filter(|n| n.kind == NodeKind::Method && n.node.key().starts_with(&prefix))
                    .map(|n| n.node.clone()),
            );
        }
        let label = self.lookup().display_label(node);
        self.hidden.hide(node.clone(), label, covered);
        ToggleOutcome::Hidden
    }

    /// Toggle by layout key, as forwarded by a renderer click.
    pub fn click_node(&mut self, key: &str) -> ToggleOutcome {
        match self.diagram.node_by_key(key).map(|n| n.node.clone()) {
            Some(node) => self.toggle_node(&node),
            None => ToggleOutcome::Ignored,
        }
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.hidden.bookmarks()
    }

    /// Restore the bookmark at `index`.
    pub fn restore_bookmark(&mut self, index: usize) -> ToggleOutcome {
        match self.hidden.root_at(index).cloned() {
            Some(node) => self.restore(&node),
            None => ToggleOutcome::Ignored,
        }
    }

    /// Undo the hide headed by `node`. A method hidden on its own is still
    /// covered by a hidden class, so the class entry goes too.
    fn restore(&mut self, node: &NodeRef) -> ToggleOutcome {
        if let Some(class) = self.owning_class(node) {
            self.hidden.restore(&class);
        }
        if !self.hidden.restore(node) {
            return ToggleOutcome::Ignored;
        }
        tracing::debug!("Restored {}", node);
        ToggleOutcome::Restored
    }

    fn owning_class(&self, node: &NodeRef) -> Option<NodeRef> {
        let symbol = self.corpus.symbol(node.as_symbol()?)?;
        if symbol.kind != SymbolKind::Method {
            return None;
        }
        symbol.parent.as_deref().map(NodeRef::symbol)
    }

    pub fn visible_nodes(&self) -> HashSet<NodeRef> {
        self.diagram
            .nodes()
            .filter(|n| !self.hidden.is_hidden(&n.node))
            .map(|n| n.node.clone())
            .collect()
    }

    pub fn visible_edges(&self) -> HashSet<(NodeRef, NodeRef, EdgeKind)> {
        self.diagram
            .edges()
            .filter(|e| {
                !self.hidden.is_hidden(&e.tail.node) && !self.hidden.is_hidden(&e.head.node)
            })
            .map(|e| (e.tail.node.clone(), e.head.node.clone(), e.kind))
            .collect()
    }

    // ── Pointer and zoom ────────────────────────────────

    pub fn pointer_down(&mut self, button: PointerButton, pos: Point) {
        self.drag = Some(match button {
            PointerButton::Primary => Drag::Pan { last: pos },
            PointerButton::Secondary => Drag::Marquee { start: pos, current: pos },
        });
    }

    pub fn pointer_move(&mut self, pos: Point) {
        match &mut self.drag {
            Some(Drag::Pan { last }) => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                *last = pos;
                self.viewport.pan(dx, dy);
            }
            Some(Drag::Marquee { current, .. }) => *current = pos,
            None => self.hover = self.node_at(pos).map(|n| n.key.clone()),
        }
    }

    /// End a drag. Returns whether the view changed.
    pub fn pointer_up(&mut self, pos: Point) -> bool {
        match self.drag.take() {
            Some(Drag::Pan { last }) => {
                self.viewport.pan(pos.x - last.x, pos.y - last.y);
                pos != last
            }
            Some(Drag::Marquee { start, .. }) => {
                self.viewport.zoom_to_rect(start, pos, self.config.min_marquee_px)
            }
            None => false,
        }
    }

    /// Rubber band of an in-progress marquee, in device coordinates.
    pub fn marquee(&self) -> Option<Bounds> {
        let Some(Drag::Marquee { start, current }) = self.drag else {
            return None;
        };
        Some(Bounds {
            min: Point::new(start.x.min(current.x), start.y.min(current.y)),
            max: Point::new(start.x.max(current.x), start.y.max(current.y)),
        })
    }

    /// One wheel notch per call; the sign of `delta` picks the direction.
    pub fn wheel(&mut self, delta: f64, pos: Point) -> bool {
        if delta > 0.0 {
            self.viewport.zoom_at(self.config.wheel_step, pos)
        } else if delta < 0.0 {
            self.viewport.zoom_at(1.0 / self.config.wheel_step, pos)
        } else {
            false
        }
    }

    /// Keyboard zoom around the pointer, or the viewport centre when the
    /// pointer is elsewhere.
    pub fn zoom_in(&mut self, pointer: Option<Point>) -> bool {
        let anchor = self.key_anchor(pointer);
        self.viewport.zoom_at(self.config.wheel_step, anchor)
    }

    pub fn zoom_out(&mut self, pointer: Option<Point>) -> bool {
        let anchor = self.key_anchor(pointer);
        self.viewport.zoom_at(1.0 / self.config.wheel_step, anchor)
    }

    fn key_anchor(&self, pointer: Option<Point>) -> Point {
        pointer
            .filter(|p| self.viewport.contains(*p))
            .unwrap_or_else(|| self.viewport.center())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Fit the whole layout into the viewport.
    pub fn reset_view(&mut self) -> bool {
        match self.layout().and_then(Layout::bounds) {
            Some(bounds) => self.viewport.fit(&bounds, self.config.fit_margin),
            None => false,
        }
    }

    // ── Lookups ─────────────────────────────────────────

    fn lookup(&self) -> SourceLookup<'_> {
        SourceLookup::new(&self.corpus, self.config.preview_lines)
    }

    /// Visible classes in layout order.
    pub fn class_outline(&self) -> Vec<ClassTarget> {
        let Some(layout) = self.layout() else {
            return Vec::new();
        };
        let lookup = self.lookup();
        layout
            .nodes
            .iter()
            .filter_map(|placed| {
                let node = self.diagram.node_by_key(&placed.key)?;
                (node.kind == NodeKind::Class && !self.hidden.is_hidden(&node.node)).then(|| {
                    ClassTarget {
                        label: lookup.display_label(&node.node),
                        node: node.node.clone(),
                        center: placed.center,
                    }
                })
            })
            .collect()
    }

    /// Centre the viewport on a class without changing scale.
    pub fn jump_to_class(&mut self, class: &NodeRef) -> bool {
        let Some(target) = self.class_outline().into_iter().find(|t| &t.node == class) else {
            return false;
        };
        self.viewport.center_on(target.center);
        true
    }

    /// Topmost visible node under a device point.
    pub fn node_at(&self, pos: Point) -> Option<&DiagramNode> {
        let layout = self.layout()?;
        let image = self.viewport.to_image(pos);
        layout
            .nodes
            .iter()
            .rev()
            .filter(|placed| placed.rect().contains(image))
            .filter_map(|placed| self.diagram.node_by_key(&placed.key))
            .find(|node| !self.hidden.is_hidden(&node.node))
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    /// Tooltip text for a node key.
    pub fn preview(&self, key: &str) -> Option<String> {
        let node = self.diagram.node_by_key(key)?;
        Some(self.lookup().preview(&node.node))
    }

    pub fn edge_tooltip(&self, tail_key: &str, head_key: &str) -> Option<String> {
        let kind = self.diagram.edge_kind_between(tail_key, head_key)?;
        let tail = self.diagram.node_by_key(tail_key)?;
        let head = self.diagram.node_by_key(head_key)?;
        Some(self.lookup().edge_tooltip(&tail.node, &head.node, kind))
    }

    /// Everything to draw. Empty unless a layout for the current diagram
    /// has been applied.
    pub fn scene(&self) -> Scene {
        let Some(layout) = self.layout() else {
            return Scene::default();
        };
        let mut scene = Scene::build(
            &self.diagram,
            layout,
            &self.viewport,
            &self.hidden,
            self.hover.as_deref(),
        );
        scene.marquee = self.marquee();
        scene
    }
}
