//! CLI command implementations

use std::path::Path;

use anyhow::Context;
use grove_core::{Corpus, NodeRef, SourceLookup, SymbolKind, assemble};
use grove_indexer::scan_path;
use grove_layout::GraphvizEngine;
use grove_viewer::InteractionController;
use serde::Serialize;

use crate::config::GroveConfig;

fn scan(path: &Path, config: &GroveConfig) -> anyhow::Result<Corpus> {
    scan_path(path, &config.analysis)
        .with_context(|| format!("Failed to analyse {}", path.display()))
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    corpus: &'a Corpus,
    diagram_nodes: usize,
    diagram_edges: usize,
}

pub fn analyze(path: &Path, config: &GroveConfig, json: bool) -> anyhow::Result<()> {
    let corpus = scan(path, config)?;
    let diagram = assemble(&corpus, &config.filter);

    if json {
        let report = AnalysisReport {
            corpus: &corpus,
            diagram_nodes: diagram.node_count(),
            diagram_edges: diagram.edge_count(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Modules:          {}", corpus.modules.len());
    for (heading, kind) in [
        ("Classes:", SymbolKind::Class),
        ("Functions:", SymbolKind::Function),
        ("Methods:", SymbolKind::Method),
    ] {
        println!("{:<18}{}", heading, corpus.symbols.of_kind(kind).count());
    }
    println!("Dependencies:     {}", corpus.edges.len());
    println!("Static data:      {}", corpus.static_resources.len());
    println!("Dynamic data:     {}", corpus.dynamic_resources.len());
    println!(
        "Diagram:          {} nodes, {} edges",
        diagram.node_count(),
        diagram.edge_count()
    );
    Ok(())
}

pub fn layout(path: &Path, config: &GroveConfig, json: bool) -> anyhow::Result<()> {
    let corpus = scan(path, config)?;
    let mut controller = InteractionController::new(
        corpus,
        config.viewer.clone(),
        config.layout.clone(),
        config.filter,
    );
    let engine = GraphvizEngine::from_config(&config.layout);
    controller.relayout(&engine);

    let scene = controller.scene();
    if scene.is_empty() {
        tracing::warn!("No layout available; is `{}` installed?", engine.program());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    let Some(layout) = controller.layout() else {
        return Ok(());
    };
    for node in &layout.nodes {
        println!(
            "node {} {:.1} {:.1} {:.1} {:.1} {:?}",
            node.key, node.center.x, node.center.y, node.width, node.height, node.label
        );
    }
    for edge in &layout.edges {
        let points: Vec<String> = edge
            .points
            .iter()
            .map(|p| format!("{:.1},{:.1}", p.x, p.y))
            .collect();
        println!("edge {} {} {}", edge.tail, edge.head, points.join(" "));
    }
    Ok(())
}

/// Print the preview for a symbol id or a diagram key.
pub fn source(path: &Path, id: &str, config: &GroveConfig) -> anyhow::Result<()> {
    let corpus = scan(path, config)?;
    let lookup = SourceLookup::new(&corpus, config.viewer.preview_lines);

    let node = if corpus.symbol(id).is_some() {
        NodeRef::symbol(id)
    } else {
        let diagram = assemble(&corpus, &config.filter);
        diagram
            .node_by_key(id)
            .map(|n| n.node.clone())
            .unwrap_or_else(|| NodeRef::symbol(id))
    };
    println!("{}", lookup.preview(&node));
    Ok(())
}
