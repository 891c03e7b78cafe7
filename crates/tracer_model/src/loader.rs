//! Parser for the intermediate format.
//!
//! The model is a sequence of sections. A bare line naming a section starts
//! it; the records that follow belong to it until a blank line, a line
//! starting with whitespace, or the next section header. Lines starting
//! with `#` are comments everywhere.

use crate::cell::{Cell, LocationFlags};
use crate::model::{Edge, Model, Process};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::BufRead;
use std::str::FromStr;
use tracer_core::{TracerError, TracerResult};

/// Sections of an IF model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Global cell layout
    Layout,
    /// Bytecode of the model
    Instructions,
    /// Process table
    Processes,
    /// Location ownership and invariants
    Locations,
    /// Edge table
    Edges,
    /// Expression texts
    Expressions,
}

impl Section {
    /// Header text of the section
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Instructions => "instructions",
            Self::Processes => "processes",
            Self::Locations => "locations",
            Self::Edges => "edges",
            Self::Expressions => "expressions",
        }
    }
}

impl FromStr for Section {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layout" => Ok(Self::Layout),
            "instructions" => Ok(Self::Instructions),
            "processes" => Ok(Self::Processes),
            "locations" => Ok(Self::Locations),
            "edges" => Ok(Self::Edges),
            "expressions" => Ok(Self::Expressions),
            other => Err(TracerError::UnknownSection {
                name: other.to_string(),
            }),
        }
    }
}

// Numbers may be preceded by blanks; names run up to the next blank.
const INT: &str = r"\s*([+-]?\d+)";
const NAME: &str = r"\s*(\S+)";

fn record(parts: &[&str]) -> Regex {
    let pattern = format!("^{}", parts.concat());
    Regex::new(&pattern).expect("record pattern is valid")
}

static CLOCK: Lazy<Regex> = Lazy::new(|| record(&[INT, ":clock:", INT, ":", NAME]));
static CONST: Lazy<Regex> = Lazy::new(|| record(&[INT, ":const:", INT]));
static VAR: Lazy<Regex> =
    Lazy::new(|| record(&[INT, ":var:", INT, ":", INT, ":", INT, ":", INT, ":", NAME]));
static META: Lazy<Regex> =
    Lazy::new(|| record(&[INT, ":meta:", INT, ":", INT, ":", INT, ":", INT, ":", NAME]));
static SYS_META: Lazy<Regex> = Lazy::new(|| record(&[INT, ":sys_meta:", INT, ":", INT, ":", NAME]));
static LOCATION: Lazy<Regex> = Lazy::new(|| record(&[INT, ":location::", NAME]));
static COMMITTED: Lazy<Regex> = Lazy::new(|| record(&[INT, ":location:committed:", NAME]));
static URGENT: Lazy<Regex> = Lazy::new(|| record(&[INT, ":location:urgent:", NAME]));
static FIXED: Lazy<Regex> = Lazy::new(|| record(&[INT, ":static:", INT, ":", INT, ":", NAME]));
static COST: Lazy<Regex> = Lazy::new(|| record(&[INT, r":\s*cost(?:\s|$)"]));

static PROCESS: Lazy<Regex> = Lazy::new(|| record(&[INT, ":", INT, ":", NAME]));
static LOCATION_OWNER: Lazy<Regex> = Lazy::new(|| record(&[INT, ":", INT, ":", INT]));
static EDGE: Lazy<Regex> =
    Lazy::new(|| record(&[INT, ":", INT, ":", INT, ":", INT, ":", INT, ":", INT]));
static LEADING_INT: Lazy<Regex> = Lazy::new(|| record(&[INT]));

/// Loads an IF model from a line-oriented stream
pub struct ModelLoader<R> {
    reader: R,
    line_number: usize,
    pending_header: Option<String>,
    model: Model,
}

impl<R: BufRead> ModelLoader<R> {
    /// Create a loader over a stream
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending_header: None,
            model: Model::default(),
        }
    }

    /// Read the whole stream into a model.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModelFormat` for a record matching no shape of its
    /// section and `UnknownSection` for an unknown header. The partially
    /// built model is dropped.
    pub fn load(mut self) -> TracerResult<Model> {
        while let Some(header) = self.next_header()? {
            let section: Section = header.parse()?;
            tracing::debug!(section = section.name(), line = self.line_number, "loading section");
            match section {
                Section::Layout => {
                    self.load_layout()?;
                    #[cfg(feature = "priced")]
                    self.append_cost_variables();
                }
                Section::Instructions => self.load_instructions()?,
                Section::Processes => self.load_processes()?,
                Section::Locations => self.load_locations()?,
                Section::Edges => self.load_edges()?,
                Section::Expressions => self.load_expressions()?,
            }
        }

        if self.model.processes.is_empty() {
            tracing::warn!(
                "model declares no processes; the line endings of the model may be wrong"
            );
        }
        tracing::info!(
            processes = self.model.process_count(),
            clocks = self.model.clock_count(),
            variables = self.model.variable_count(),
            edges = self.model.edges.len(),
            "model loaded"
        );
        Ok(self.model)
    }

    /// Read one raw line without its `\n`. A trailing `\r` is kept and
    /// bytes that are not UTF-8 are replaced.
    fn next_line(&mut self) -> TracerResult<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        self.line_number += 1;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Next section header, skipping blank lines and comments
    fn next_header(&mut self) -> TracerResult<Option<String>> {
        if let Some(header) = self.pending_header.take() {
            return Ok(Some(header));
        }
        while let Some(line) = self.next_line()? {
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    /// Next record of the current section, or `None` at its end.
    ///
    /// Comments are skipped. With `annotations`, lines starting with a tab
    /// are pretty-printed text belonging to the section and are skipped too.
    fn next_record(&mut self, annotations: bool) -> TracerResult<Option<String>> {
        while let Some(line) = self.next_line()? {
            if line.starts_with('#') || (annotations && line.starts_with('\t')) {
                continue;
            }
            match line.chars().next() {
                None => return Ok(None),
                Some(c) if c.is_whitespace() => return Ok(None),
                Some(_) => {}
            }
            if line.parse::<Section>().is_ok() {
                self.pending_header = Some(line);
                return Ok(None);
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    fn load_layout(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(false)? {
            let at = self.line_number;
            let (index, cell) = parse_layout_record(&line).ok_or_else(|| invalid(at, &line))?;

            match &cell {
                Cell::Clock { name, .. } => self.model.clocks.push(name.clone()),
                Cell::Var { name, .. } | Cell::Meta { name, .. } => {
                    self.model.variables.push(name.clone());
                }
                _ => {}
            }
            if usize::try_from(index).ok() != Some(self.model.layout.len()) {
                tracing::warn!(
                    index,
                    kind = cell.kind(),
                    position = self.model.layout.len(),
                    "layout index differs from its position"
                );
            }
            self.model.layout.push(cell);
        }
        Ok(())
    }

    /// Cost-accounting variables of priced models
    #[cfg(feature = "priced")]
    fn append_cost_variables(&mut self) {
        let mut names = vec!["infimum_cost".to_string(), "offset_cost".to_string()];
        names.extend(
            self.model
                .clocks
                .iter()
                .skip(1)
                .map(|clock| format!("#rate[{}]", clock)),
        );

        for name in names {
            let nr = i32::try_from(self.model.variables.len()).unwrap_or(i32::MAX);
            self.model.variables.push(name.clone());
            self.model.layout.push(Cell::Var {
                min: i32::MIN,
                max: i32::MAX,
                init: 0,
                nr,
                name,
            });
        }
    }

    fn load_instructions(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(true)? {
            let at = self.line_number;
            let values = parse_instruction(&line).ok_or_else(|| invalid(at, &line))?;
            self.model.instructions.extend(values);
        }
        Ok(())
    }

    fn load_processes(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(false)? {
            let at = self.line_number;
            let caps = PROCESS.captures(&line).ok_or_else(|| invalid(at, &line))?;
            let initial = int(&caps, 2).ok_or_else(|| invalid(at, &line))?;
            self.model.processes.push(Process::new(initial, &caps[3]));
        }
        Ok(())
    }

    fn load_locations(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(false)? {
            let at = self.line_number;
            let caps = LOCATION_OWNER.captures(&line).ok_or_else(|| invalid(at, &line))?;
            let (Some(index), Some(owner), Some(invariant_id)) =
                (index(&caps, 1), index(&caps, 2), int(&caps, 3))
            else {
                return Err(invalid(at, &line));
            };
            if owner >= self.model.processes.len() {
                return Err(invalid(at, &line));
            }

            match self.model.layout.get_mut(index) {
                Some(Cell::Location {
                    process, invariant, ..
                }) => {
                    *process = Some(owner);
                    *invariant = Some(invariant_id);
                }
                _ => return Err(invalid(at, &line)),
            }
            self.model.processes[owner].locations.push(index);
        }
        Ok(())
    }

    fn load_edges(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(false)? {
            let at = self.line_number;
            let edge = EDGE
                .captures(&line)
                .and_then(|caps| parse_edge(&caps))
                .ok_or_else(|| invalid(at, &line))?;

            let layout = &self.model.layout;
            let is_location = |i: usize| layout.get(i).is_some_and(Cell::is_location);
            if !is_location(edge.source) || !is_location(edge.target) {
                return Err(invalid(at, &line));
            }

            let position = self.model.edges.len();
            let Some(owner) = self.model.processes.get_mut(edge.process) else {
                return Err(invalid(at, &line));
            };
            owner.edges.push(position);
            self.model.edges.push(edge);
        }
        Ok(())
    }

    fn load_expressions(&mut self) -> TracerResult<()> {
        while let Some(line) = self.next_record(false)? {
            let at = self.line_number;
            let (id, text) = parse_expression(&line).ok_or_else(|| invalid(at, &line))?;
            self.model.expressions.insert(id, text.to_string());
        }
        Ok(())
    }
}

fn invalid(line_number: usize, line: &str) -> TracerError {
    TracerError::invalid_model(line_number, line)
}

fn int(caps: &Captures<'_>, group: usize) -> Option<i32> {
    caps.get(group)?.as_str().trim().parse().ok()
}

fn index(caps: &Captures<'_>, group: usize) -> Option<usize> {
    caps.get(group)?.as_str().trim().parse().ok()
}

fn name(caps: &Captures<'_>, group: usize) -> Option<String> {
    Some(caps.get(group)?.as_str().to_string())
}

fn parse_edge(caps: &Captures<'_>) -> Option<Edge> {
    Some(Edge {
        process: index(caps, 1)?,
        source: index(caps, 2)?,
        target: index(caps, 3)?,
        guard: int(caps, 4)?,
        sync: int(caps, 5)?,
        update: int(caps, 6)?,
    })
}

/// Match a layout line against the record shapes, first match wins
fn parse_layout_record(line: &str) -> Option<(i64, Cell)> {
    let location = |caps: Captures<'_>, flags: LocationFlags| -> Option<(i64, Cell)> {
        Some((
            caps[1].trim().parse().ok()?,
            Cell::Location {
                flags,
                process: None,
                invariant: None,
                name: name(&caps, 2)?,
            },
        ))
    };

    if let Some(caps) = CLOCK.captures(line) {
        let cell = Cell::Clock {
            nr: int(&caps, 2)?,
            name: name(&caps, 3)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = CONST.captures(line) {
        let cell = Cell::Const {
            value: int(&caps, 2)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = VAR.captures(line) {
        let cell = Cell::Var {
            min: int(&caps, 2)?,
            max: int(&caps, 3)?,
            init: int(&caps, 4)?,
            nr: int(&caps, 5)?,
            name: name(&caps, 6)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = META.captures(line) {
        let cell = Cell::Meta {
            min: int(&caps, 2)?,
            max: int(&caps, 3)?,
            init: int(&caps, 4)?,
            nr: int(&caps, 5)?,
            name: name(&caps, 6)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = SYS_META.captures(line) {
        let cell = Cell::SysMeta {
            min: int(&caps, 2)?,
            max: int(&caps, 3)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = LOCATION.captures(line) {
        return location(caps, LocationFlags::None);
    }
    if let Some(caps) = COMMITTED.captures(line) {
        return location(caps, LocationFlags::Committed);
    }
    if let Some(caps) = URGENT.captures(line) {
        return location(caps, LocationFlags::Urgent);
    }
    if let Some(caps) = FIXED.captures(line) {
        let cell = Cell::Fixed {
            min: int(&caps, 2)?,
            max: int(&caps, 3)?,
        };
        return Some((caps[1].trim().parse().ok()?, cell));
    }
    if let Some(caps) = COST.captures(line) {
        return Some((caps[1].trim().parse().ok()?, Cell::Cost));
    }
    None
}

/// `address:v1 v2 v3 v4`, at least one value
fn parse_instruction(line: &str) -> Option<Vec<i32>> {
    let (address, rest) = line.split_once(':')?;
    address.trim_start().parse::<i32>().ok()?;

    let values: Vec<i32> = rest
        .split_whitespace()
        .take(4)
        .map_while(|token| token.parse().ok())
        .collect();
    (!values.is_empty()).then_some(values)
}

/// `index:a:b:text`; the text follows the third colon and is trimmed
fn parse_expression(line: &str) -> Option<(i32, &str)> {
    let id = LEADING_INT.captures(line)?[1].trim().parse().ok()?;
    let mut rest = line;
    for _ in 0..3 {
        rest = rest.split_once(':')?.1;
    }
    Some((id, rest.trim()))
}

/// Load a model from a stream
///
/// # Errors
///
/// See [`ModelLoader::load`]
pub fn load<R: BufRead>(reader: R) -> TracerResult<Model> {
    ModelLoader::new(reader).load()
}

/// Load a model held in memory
///
/// # Errors
///
/// See [`ModelLoader::load`]
pub fn parse(input: &str) -> TracerResult<Model> {
    load(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
# generated by a model checker
layout
0:clock:1:t(0)
1:clock:1:P.x
2:const:5
3:var:0:10:0:0:count
4:meta:0:1:0:1:P.m
5:location::idle
6:location:committed:busy
7:location:urgent:done
8:sys_meta:0:1:sm
9:static:0:3:fixed
10:cost

instructions
0:1 2 3
\tpush 1
1:4

processes
0:0:P

locations
5:0:1
6:0:1
7:0:1

edges
0:5:6:1:2:3
0:6:7:1:4:1

expressions
1:0:0:1
2:0:0: tau
3:0:0:x := 0
4:0:0:go!
";

    #[test]
    fn test_parse_full_model() {
        let model = parse(MODEL).unwrap();
        #[cfg(not(feature = "priced"))]
        assert_eq!(model.layout().len(), 11);
        assert_eq!(model.instructions(), &[1, 2, 3, 4]);
        assert_eq!(model.process_count(), 1);
        assert_eq!(model.processes()[0].name, "P");
        assert_eq!(model.processes()[0].locations, vec![5, 6, 7]);
        assert_eq!(model.processes()[0].edges, vec![0, 1]);
        assert_eq!(model.edges().len(), 2);
        assert_eq!(model.expression(2), "tau");
        assert_eq!(model.expression(3), "x := 0");
    }

    #[test]
    fn test_layout_shapes() {
        let model = parse(MODEL).unwrap();
        let layout = model.layout();
        assert!(matches!(layout[0], Cell::Clock { nr: 1, ref name } if name == "t(0)"));
        assert_eq!(layout[2], Cell::Const { value: 5 });
        assert!(matches!(layout[3], Cell::Var { min: 0, max: 10, init: 0, nr: 0, .. }));
        assert!(matches!(layout[4], Cell::Meta { max: 1, nr: 1, .. }));
        assert!(matches!(
            layout[6],
            Cell::Location {
                flags: LocationFlags::Committed,
                process: Some(0),
                invariant: Some(1),
                ..
            }
        ));
        assert!(matches!(layout[7], Cell::Location { flags: LocationFlags::Urgent, .. }));
        assert_eq!(layout[8], Cell::SysMeta { min: 0, max: 1 });
        assert_eq!(layout[9], Cell::Fixed { min: 0, max: 3 });
        assert_eq!(layout[10], Cell::Cost);
    }

    #[test]
    fn test_name_tables_match_cells() {
        let model = parse(MODEL).unwrap();
        let clocks = model
            .layout()
            .iter()
            .filter(|c| matches!(c, Cell::Clock { .. }))
            .count();
        let variables = model.layout().iter().filter(|c| c.is_variable()).count();

        assert_eq!(clocks, model.clock_count());
        assert_eq!(variables, model.variable_count());
        #[cfg(not(feature = "priced"))]
        assert_eq!(model.variable_names(), &["count".to_string(), "P.m".to_string()]);
        assert_eq!(model.clock_names(), &["t(0)".to_string(), "P.x".to_string()]);
    }

    #[test]
    fn test_unrecognized_layout_line() {
        let err = parse("layout\n0:clock:1:t(0)\n3:bogus:1\n").unwrap_err();
        assert_eq!(
            err,
            TracerError::InvalidModelFormat {
                line_number: 3,
                line: "3:bogus:1".to_string()
            }
        );
    }

    #[test]
    fn test_failed_layout_leaves_no_cell_for_later_sections() {
        let input = "layout\n0:location::a\n1:bogus:1\n\nprocesses\n0:0:P\n\nlocations\n1:0:0\n";
        assert!(matches!(
            parse(input),
            Err(TracerError::InvalidModelFormat { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_cost_requires_exact_word() {
        assert_eq!(parse_layout_record("4:cost").map(|(_, c)| c), Some(Cell::Cost));
        assert!(parse_layout_record("4:costly").is_none());
    }

    #[test]
    fn test_long_names_are_not_truncated() {
        let long = "a".repeat(80);
        let model = parse(&format!("layout\n0:clock:1:{}\n", long)).unwrap();
        assert_eq!(model.clock_names()[0], long);
    }

    #[test]
    fn test_unknown_section() {
        let err = parse("layout\n0:const:1\n\nfoo\n").unwrap_err();
        assert_eq!(
            err,
            TracerError::UnknownSection {
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_crlf_header_is_unknown_section() {
        let err = parse("layout\r\n0:const:1\r\n").unwrap_err();
        assert!(matches!(err, TracerError::UnknownSection { ref name } if name == "layout\r"));
        assert!(!err.hints().is_empty());
    }

    #[test]
    fn test_header_ends_section_without_blank_line() {
        let model = parse("layout\n0:location::a\nprocesses\n0:0:P\n").unwrap();
        assert_eq!(model.process_count(), 1);
    }

    #[test]
    fn test_locations_require_processes() {
        let err = parse("layout\n0:location::a\n\nlocations\n0:0:0\n").unwrap_err();
        assert!(matches!(err, TracerError::InvalidModelFormat { line_number: 5, .. }));
    }

    #[test]
    fn test_locations_require_location_cell() {
        let err = parse("layout\n0:const:1\n\nprocesses\n0:0:P\n\nlocations\n0:0:0\n").unwrap_err();
        assert!(matches!(err, TracerError::InvalidModelFormat { .. }));
    }

    #[test]
    fn test_edge_source_must_be_location() {
        let input = "layout\n0:const:1\n1:location::a\n\nprocesses\n0:0:P\n\nedges\n0:0:1:1:1:1\n";
        assert_eq!(
            parse(input),
            Err(TracerError::InvalidModelFormat {
                line_number: 9,
                line: "0:0:1:1:1:1".to_string()
            })
        );
    }

    #[test]
    fn test_non_utf8_bytes_in_expression() {
        let input: &[u8] = b"layout\n0:clock:1:t(0)\n\nexpressions\n1:0:0:x := 0 // caf\xE9\n";
        let model = load(input).unwrap();
        assert_eq!(model.expression(1), "x := 0 // caf\u{FFFD}");
        assert_eq!(model.clock_count(), 1);
    }

    #[test]
    fn test_edge_with_unknown_process() {
        let input = "layout\n0:location::a\n\nprocesses\n0:0:P\n\nedges\n1:0:0:1:1:1\n";
        assert!(matches!(
            parse(input),
            Err(TracerError::InvalidModelFormat { line_number: 8, .. })
        ));
    }

    #[test]
    fn test_expression_needs_three_colons() {
        let err = parse("expressions\n1:0:x\n").unwrap_err();
        assert!(matches!(err, TracerError::InvalidModelFormat { ref line, .. } if line == "1:0:x"));
    }

    #[test]
    fn test_expression_keeps_inner_colons() {
        assert_eq!(parse_expression("7:1:2:a ? b : c"), Some((7, "a ? b : c")));
    }

    #[test]
    fn test_instruction_needs_a_value() {
        assert_eq!(parse_instruction("3:7 8"), Some(vec![7, 8]));
        assert_eq!(parse_instruction("3:1 2 3 4 5"), Some(vec![1, 2, 3, 4]));
        assert!(parse_instruction("3:").is_none());
        assert!(parse("instructions\n3:\n").is_err());
    }

    #[test]
    fn test_comments_inside_sections() {
        let model = parse("layout\n# cells\n0:clock:1:t(0)\n# more\n1:clock:1:x\n").unwrap();
        assert_eq!(model.clock_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let model = parse("").unwrap();
        assert_eq!(model.process_count(), 0);
    }

    #[cfg(feature = "priced")]
    #[test]
    fn test_priced_cost_variables() {
        let model = parse("layout\n0:clock:1:t(0)\n1:clock:1:x\n2:var:0:1:0:0:v\n").unwrap();
        assert_eq!(
            model.variable_names(),
            &[
                "v".to_string(),
                "infimum_cost".to_string(),
                "offset_cost".to_string(),
                "#rate[x]".to_string()
            ]
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_loader_never_panics(input in "[a-z0-9:#\\n\\t ]{0,200}") {
            let _ = parse(&input);
        }
    }
}
