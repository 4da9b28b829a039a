//! Symbol table for corpus-wide lookup

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Symbol, SymbolKind};

/// Symbols in insertion order, indexed by id and by owning module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_id: HashMap<String, usize>,
    /// For fast module lookup: module id -> positions of its symbols
    module_symbols: HashMap<String, Vec<usize>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol. A repeated id replaces the earlier definition in
    /// place, and the methods of the earlier definition go with it; a
    /// redefined class brings its own members back afterwards.
    pub fn insert(&mut self, symbol: Symbol) {
        if let Some(&pos) = self.by_id.get(&symbol.id) {
            tracing::debug!("Redefinition of {} replaces earlier symbol", symbol.id);
            let id = symbol.id.clone();
            self.symbols[pos] = symbol;
            self.remove_methods_of(&id);
            return;
        }
        self.symbols.push(symbol);
        self.index(self.symbols.len() - 1);
    }

    fn remove_methods_of(&mut self, parent: &str) {
        let before = self.symbols.len();
        self.symbols
            .retain(|s| !(s.kind == SymbolKind::Method && s.parent.as_deref() == Some(parent)));
        if self.symbols.len() == before {
            return;
        }
        tracing::debug!("Dropped {} stale methods of {}", before - self.symbols.len(), parent);
        self.by_id.clear();
        self.module_symbols.clear();
        for pos in 0..self.symbols.len() {
            self.index(pos);
        }
    }

    fn index(&mut self, pos: usize) {
        let symbol = &self.symbols[pos];
        self.by_id.insert(symbol.id.clone(), pos);
        self.module_symbols
            .entry(symbol.module.clone())
            .or_default()
            .push(pos);
    }

    /// Look up a symbol by qualified id.
    pub fn lookup(&self, id: &str) -> Option<&Symbol> {
        self.by_id.get(id).map(|&pos| &self.symbols[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All symbols defined in a module, the module itself included.
    pub fn symbols_in_module(&self, module: &str) -> Vec<&Symbol> {
        self.module_symbols
            .get(module)
            .map(|positions| positions.iter().map(|&pos| &self.symbols[pos]).collect())
            .unwrap_or_default()
    }

    /// Symbols of `module` whose final dotted component equals `name`.
    pub fn named_in_module(&self, module: &str, name: &str) -> Vec<&Symbol> {
        self.symbols_in_module(module)
            .into_iter()
            .filter(|s| s.kind != SymbolKind::Module && s.label == name)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<Vec<Symbol>> for SymbolTable {
    fn from(symbols: Vec<Symbol>) -> Self {
        let mut table = SymbolTable::new();
        for symbol in symbols {
            table.insert(symbol);
        }
        table
    }
}

impl From<SymbolTable> for Vec<Symbol> {
    fn from(table: SymbolTable) -> Self {
        table.symbols
    }
}
