//! Parser for Graphviz "plain" output
//!
//! ```text
//! graph scale width height
//! node name x y width height label style shape color fillcolor
//! edge tail head n x1 y1 .. xn yn [label xl yl] style color
//! stop
//! ```
//!
//! Units are inches with the origin at the bottom left of the page.

use crate::error::LayoutError;

#[derive(Debug, Clone, PartialEq)]
pub struct PlainNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainEdge {
    pub tail: String,
    pub head: String,
    pub points: Vec<(f64, f64)>,
}

/// Plain output as reported, still in engine units.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainGraph {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<PlainNode>,
    pub edges: Vec<PlainEdge>,
}

pub fn parse_plain(text: &str) -> Result<PlainGraph, LayoutError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(LayoutError::Empty);
    };
    let header = tokenize(header);
    if header.first().map(String::as_str) != Some("graph") || header.len() < 4 {
        return Err(LayoutError::malformed(header_line, "expected `graph scale width height`"));
    }
    let mut graph = PlainGraph {
        scale: number(&header, 1, header_line)?,
        width: number(&header, 2, header_line)?,
        height: number(&header, 3, header_line)?,
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    for (line_no, line) in lines {
        let tokens = tokenize(line);
        match tokens.first().map(String::as_str) {
            Some("node") => {
                if tokens.len() < 7 {
                    return Err(LayoutError::malformed(line_no, "node line is too short"));
                }
                graph.nodes.push(PlainNode {
                    name: tokens[1].clone(),
                    x: number(&tokens, 2, line_no)?,
                    y: number(&tokens, 3, line_no)?,
                    width: number(&tokens, 4, line_no)?,
                    height: number(&tokens, 5, line_no)?,
                    label: tokens[6].clone(),
                });
            }
            Some("edge") => {
                if tokens.len() < 4 {
                    return Err(LayoutError::malformed(line_no, "edge line is too short"));
                }
                let count: usize = tokens[3]
                    .parse()
                    .map_err(|_| LayoutError::malformed(line_no, "bad point count"))?;
                if tokens.len() < 4 + 2 * count {
                    return Err(LayoutError::malformed(
                        line_no,
                        format!("edge declares {count} points but lists fewer"),
                    ));
                }
                let points = (0..count)
                    .map(|i| {
                        let at = 4 + 2 * i;
                        Ok((number(&tokens, at, line_no)?, number(&tokens, at + 1, line_no)?))
                    })
                    .collect::<Result<Vec<_>, LayoutError>>()?;
                graph.edges.push(PlainEdge {
                    tail: tokens[1].clone(),
                    head: tokens[2].clone(),
                    points,
                });
            }
            Some("stop") => break,
            Some(other) => tracing::debug!("Ignoring plain line {} ({})", line_no, other),
            None => {}
        }
    }

    Ok(graph)
}

fn number(tokens: &[String], index: usize, line: usize) -> Result<f64, LayoutError> {
    let raw = tokens
        .get(index)
        .ok_or_else(|| LayoutError::malformed(line, format!("missing field {index}")))?;
    raw.parse::<f64>()
        .map_err(|_| LayoutError::malformed(line, format!("`{raw}` is not a number")))
}

/// Split on whitespace, keeping double-quoted strings whole and unescaped.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => match chars.next() {
                        Some('n') => token.push('\n'),
                        Some(other) => token.push(other),
                        None => {}
                    },
                    _ => token.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }
    tokens
}
