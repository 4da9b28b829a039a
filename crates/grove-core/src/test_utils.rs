//! Test utilities for Grove

use crate::model::{Corpus, DependencyEdge, DependencyKind, NodeRef, Resolution, Symbol, SymbolKind};

/// Small fluent builder for hand-made corpora.
pub struct CorpusBuilder {
    corpus: Corpus,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        CorpusBuilder { corpus: Corpus::new() }
    }

    pub fn module(mut self, module: &str) -> Self {
        self.corpus.add_module(module);
        self
    }

    pub fn function(mut self, module: &str, name: &str) -> Self {
        self.corpus.add_symbol(symbol(module, module, name, SymbolKind::Function));
        self
    }

    pub fn class(mut self, module: &str, name: &str) -> Self {
        self.corpus.add_symbol(symbol(module, module, name, SymbolKind::Class));
        self
    }

    pub fn method(mut self, module: &str, class: &str, name: &str) -> Self {
        let parent = format!("{module}.{class}");
        self.corpus.add_symbol(symbol(module, &parent, name, SymbolKind::Method));
        self
    }

    pub fn call(self, source: &str, target: &str) -> Self {
        self.edge(source, NodeRef::symbol(target), DependencyKind::Call, Resolution::Exact)
    }

    pub fn attribute_call(self, source: &str, target: &str) -> Self {
        self.edge(source, NodeRef::symbol(target), DependencyKind::Call, Resolution::ByName)
    }

    pub fn inherit(self, source: &str, target: &str) -> Self {
        self.edge(source, NodeRef::symbol(target), DependencyKind::Inherit, Resolution::Exact)
    }

    pub fn static_data(mut self, source: &str, path: &str) -> Self {
        self.corpus.add_static_resource(path);
        self.edge(
            source,
            NodeRef::StaticResource(path.to_string()),
            DependencyKind::Data,
            Resolution::Exact,
        )
    }

    pub fn dynamic_data(mut self, source: &str, description: &str) -> Self {
        self.corpus.add_dynamic_resource(description, source);
        self.edge(
            source,
            NodeRef::DynamicResource(description.to_string()),
            DependencyKind::Data,
            Resolution::Exact,
        )
    }

    fn edge(
        mut self,
        source: &str,
        target: NodeRef,
        kind: DependencyKind,
        resolution: Resolution,
    ) -> Self {
        self.corpus.add_edge(DependencyEdge {
            source: source.to_string(),
            target,
            kind,
            resolution,
            line: None,
        });
        self
    }

    pub fn build(self) -> Corpus {
        self.corpus
    }
}

fn symbol(module: &str, parent: &str, name: &str, kind: SymbolKind) -> Symbol {
    let id = format!("{parent}.{name}");
    Symbol {
        source: Some(format!("# source of {id}")),
        id,
        label: name.to_string(),
        kind,
        module: module.to_string(),
        parent: Some(parent.to_string()),
    }
}

/// `m` with `def f`, `class C(B)` holding `g`, a base `B`, plus data access.
pub fn sample_corpus() -> Corpus {
    CorpusBuilder::new()
        .module("m")
        .function("m", "f")
        .function("m", "load_cfg")
        .class("m", "B")
        .class("m", "C")
        .method("m", "C", "g")
        .method("m", "C", "h")
        .call("m.C.g", "m.f")
        .attribute_call("m.C.h", "m.g")
        .inherit("m.C", "m.B")
        .static_data("m.load_cfg", "config.json")
        .dynamic_data("m.C.g", "<NAME>.json")
        .dynamic_data("m.f", "<NAME>.json")
        .build()
}
