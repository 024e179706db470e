// src/io/qwml.rs

//! QWML documents: an XML file bundling a graph with the probability
//! distribution computed on it.
//!
//! ```text
//! <?xml version="1.0"?>
//! <qwml>
//! <adjacency> <row> <col>0</col> ... </row> ... </adjacency>
//! <probdist> <vertex> <prob>0.50000000</prob> ... </vertex> ... </probdist>
//! <graphlayout> <vertex> <xcoord>..</xcoord> <ycoord>..</ycoord> </vertex> ... </graphlayout>
//! <filename>walk.qwml</filename>
//! <comment>computed_by_qwalk</comment>
//! </qwml>
//! ```
//!
//! `<probdist>` is vertex-major: one `<vertex>` per graph vertex, one
//! `<prob>` per time step. `<graphlayout>`, `<filename>` and `<comment>` are
//! optional. Only the element structure matters; line breaks and
//! indentation are free. Unknown elements are skipped with a warning.
//!
//! Markup is read and written with `quick-xml`, so entity and character
//! references, CDATA sections and self-closing tags all behave as XML says.

use crate::core::{QwError, Result};
use crate::graph::Graph;
use crate::simulation::ProbabilityTable;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A parsed or to-be-written QWML file.
#[derive(Debug, Clone, PartialEq)]
pub struct QwmlDocument {
    graph: Graph,
    table: ProbabilityTable,
    layout: Option<Vec<(f64, f64)>>,
    filename: Option<String>,
    comment: Option<String>,
}

impl QwmlDocument {
    /// Pairs a graph with the table computed on it.
    ///
    /// # Errors
    /// `QwError::InvalidParameter` when the vertex counts differ.
    pub fn new(graph: Graph, table: ProbabilityTable) -> Result<Self> {
        if graph.vertex_count() != table.vertex_count() {
            return Err(QwError::InvalidParameter {
                message: format!(
                    "graph has {} vertices but the probability table has {}",
                    graph.vertex_count(),
                    table.vertex_count()
                ),
            });
        }
        Ok(Self { graph, table, layout: None, filename: None, comment: None })
    }

    /// Sets the free-text `<comment>`.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the `<filename>` recorded in the document. [`write_qwml`] uses
    /// the target's file name when none is set.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attaches 2D vertex coordinates.
    ///
    /// # Errors
    /// `QwError::InvalidParameter` unless there is exactly one point per vertex.
    pub fn with_layout(mut self, layout: Vec<(f64, f64)>) -> Result<Self> {
        if layout.len() != self.graph.vertex_count() {
            return Err(QwError::InvalidParameter {
                message: format!("layout has {} points for {} vertices", layout.len(), self.graph.vertex_count()),
            });
        }
        self.layout = Some(layout);
        Ok(self)
    }

    /// The graph from `<adjacency>`.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The per-step vertex probabilities from `<probdist>`.
    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    /// One `(x, y)` point per vertex, if the document carries a complete layout.
    pub fn layout(&self) -> Option<&[(f64, f64)]> {
        self.layout.as_deref()
    }

    /// The recorded `<filename>`, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The recorded `<comment>`, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Splits the document into its graph and table, dropping the metadata.
    pub fn into_parts(self) -> (Graph, ProbabilityTable) {
        (self.graph, self.table)
    }

    /// Renders the document as QWML text.
    pub fn to_qwml_string(&self) -> Result<String> {
        self.render(self.filename.as_deref())
    }

    fn render(&self, filename: Option<&str>) -> Result<String> {
        let n = self.graph.vertex_count();
        let mut out = QwmlWriter::with_capacity(64 + n * n * 16 + n * self.table.steps() * 24);
        out.declaration()?;
        out.open("qwml")?;
        out.open("adjacency")?;
        for v in 0..n {
            out.open("row")?;
            for &a in self.graph.adjacency_row(v) {
                out.leaf("col", if a { "1" } else { "0" })?;
            }
            out.close("row")?;
        }
        out.close("adjacency")?;
        out.open("probdist")?;
        for v in 0..n {
            out.open("vertex")?;
            for p in self.table.vertex_series(v) {
                out.leaf("prob", &format!("{:10.8}", p))?;
            }
            out.close("vertex")?;
        }
        out.close("probdist")?;
        if let Some(layout) = &self.layout {
            out.open("graphlayout")?;
            for (x, y) in layout {
                out.open("vertex")?;
                out.leaf("xcoord", &x.to_string())?;
                out.leaf("ycoord", &y.to_string())?;
                out.close("vertex")?;
            }
            out.close("graphlayout")?;
        }
        if let Some(filename) = filename {
            out.leaf("filename", filename)?;
        }
        if let Some(comment) = &self.comment {
            out.leaf("comment", comment)?;
        }
        out.close("qwml")?;
        out.finish()
    }
}

/// Writes `doc` to `path`. Without an explicit filename the document records
/// the file name of `path`.
pub fn write_qwml(path: impl AsRef<Path>, doc: &QwmlDocument) -> Result<()> {
    let path = path.as_ref();
    let fallback = path.file_name().and_then(|f| f.to_str());
    debug!(path = %path.display(), vertices = doc.graph.vertex_count(), steps = doc.table.steps(), "writing QWML");
    fs::write(path, doc.render(doc.filename.as_deref().or(fallback))?)?;
    Ok(())
}

/// Reads and parses the QWML file at `path`.
pub fn read_qwml(path: impl AsRef<Path>) -> Result<QwmlDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading QWML");
    parse_qwml(&fs::read_to_string(path)?)
}

/// Parses a QWML document.
///
/// # Errors
/// * `QwError::Format` for malformed XML (including an unclosed `<qwml>`),
///   non-numeric values, a missing `<adjacency>` or `<probdist>`, or a
///   distribution whose vertex count differs from the adjacency.
/// * `QwError::InvalidTopology` when the adjacency is not a valid graph.
///
/// A layout with the wrong number of vertices is dropped with a warning.
pub fn parse_qwml(text: &str) -> Result<QwmlDocument> {
    let mut reader = QwmlReader::new(text);
    reader.expect_root("qwml")?;

    let mut adjacency: Option<(Vec<Vec<u8>>, usize)> = None;
    let mut series: Option<(Vec<Vec<f64>>, usize)> = None;
    let mut layout: Option<Vec<(f64, f64)>> = None;
    let mut filename = None;
    let mut comment = None;

    reader.children("qwml", |r, tag, line| {
        match tag {
            "adjacency" => adjacency = Some((read_adjacency_block(r)?, line)),
            "probdist" => series = Some((read_probdist_block(r)?, line)),
            "graphlayout" => layout = read_layout_block(r)?,
            "filename" => filename = Some(r.text_until_close("filename")?),
            "comment" => comment = Some(r.text_until_close("comment")?),
            other => r.skip_unknown(other, line)?,
        }
        Ok(())
    })?;

    let end = reader.line();
    let (rows, adjacency_line) =
        adjacency.ok_or_else(|| QwError::format(end, "QWML document has no <adjacency> block"))?;
    let graph = Graph::from_matrix(&rows)?;
    let (series, probdist_line) =
        series.ok_or_else(|| QwError::format(end, "QWML document has no <probdist> block"))?;
    let table = ProbabilityTable::from_vertex_series(series).map_err(|e| QwError::format(probdist_line, e.to_string()))?;
    if table.vertex_count() != graph.vertex_count() {
        return Err(QwError::format(
            probdist_line,
            format!(
                "<probdist> has {} vertices but <adjacency> (line {}) has {}",
                table.vertex_count(),
                adjacency_line,
                graph.vertex_count()
            ),
        ));
    }
    if let Some(points) = &layout {
        if points.len() != graph.vertex_count() {
            warn!(
                layout_vertices = points.len(),
                graph_vertices = graph.vertex_count(),
                "discarding QWML graph layout with mismatched vertex count"
            );
            layout = None;
        }
    }

    debug!(vertices = graph.vertex_count(), steps = table.steps(), has_layout = layout.is_some(), "parsed QWML");
    Ok(QwmlDocument { graph, table, layout, filename, comment })
}

fn read_adjacency_block(r: &mut QwmlReader<'_>) -> Result<Vec<Vec<u8>>> {
    let mut rows = Vec::new();
    r.children("adjacency", |r, tag, line| {
        if tag != "row" {
            return r.skip_unknown(tag, line);
        }
        let mut row = Vec::new();
        r.children("row", |r, tag, line| {
            if tag != "col" {
                return r.skip_unknown(tag, line);
            }
            let text = r.text_until_close("col")?;
            let value = text
                .parse::<u8>()
                .map_err(|_| QwError::format(line, format!("<col> value '{}' is not 0 or 1", text)))?;
            row.push(value);
            Ok(())
        })?;
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}

fn read_probdist_block(r: &mut QwmlReader<'_>) -> Result<Vec<Vec<f64>>> {
    let mut series = Vec::new();
    r.children("probdist", |r, tag, line| {
        if tag != "vertex" {
            return r.skip_unknown(tag, line);
        }
        let mut probs = Vec::new();
        r.children("vertex", |r, tag, line| {
            if tag != "prob" {
                return r.skip_unknown(tag, line);
            }
            probs.push(parse_number(&r.text_until_close("prob")?, "prob", line)?);
            Ok(())
        })?;
        series.push(probs);
        Ok(())
    })?;
    Ok(series)
}

/// Returns `None` (with a warning) if any vertex lacks a coordinate.
fn read_layout_block(r: &mut QwmlReader<'_>) -> Result<Option<Vec<(f64, f64)>>> {
    let mut points = Vec::new();
    let mut complete = true;
    r.children("graphlayout", |r, tag, line| {
        if tag != "vertex" {
            return r.skip_unknown(tag, line);
        }
        let (mut x, mut y) = (None, None);
        r.children("vertex", |r, tag, line| {
            match tag {
                "xcoord" => x = Some(parse_number(&r.text_until_close("xcoord")?, "xcoord", line)?),
                "ycoord" => y = Some(parse_number(&r.text_until_close("ycoord")?, "ycoord", line)?),
                other => r.skip_unknown(other, line)?,
            }
            Ok(())
        })?;
        match (x, y) {
            (Some(x), Some(y)) => points.push((x, y)),
            _ => {
                warn!(line, "graph layout vertex is missing a coordinate");
                complete = false;
            }
        }
        Ok(())
    })?;
    Ok(complete.then_some(points))
}

fn parse_number(text: &str, tag: &str, line: usize) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|e| QwError::format(line, format!("<{}> value '{}' is not a number: {}", tag, text, e)))
}

// --- Event plumbing over quick-xml ---

/// Element-level view of the `quick-xml` event stream.
enum Node {
    Open(String),
    Close(String),
    Text(String),
    End,
}

struct QwmlReader<'a> {
    source: &'a [u8],
    reader: Reader<&'a [u8]>,
    /// `<tag/>` is reported as an open followed by this close.
    pending_close: Option<String>,
    /// 1-indexed line of the last event, advanced incrementally.
    line: usize,
    scanned: usize,
}

impl<'a> QwmlReader<'a> {
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        Self { source: text.as_bytes(), reader, pending_close: None, line: 1, scanned: 0 }
    }

    fn line(&self) -> usize {
        self.line
    }

    fn track_position(&mut self) {
        let offset = usize::try_from(self.reader.buffer_position())
            .unwrap_or(usize::MAX)
            .min(self.source.len());
        if offset > self.scanned {
            self.line += self.source[self.scanned..offset].iter().filter(|&&b| b == b'\n').count();
            self.scanned = offset;
        }
    }

    fn element_name(&self, raw: &[u8]) -> Result<String> {
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|e| QwError::format(self.line, format!("element name is not UTF-8: {}", e)))
    }

    fn next(&mut self) -> Result<Node> {
        if let Some(name) = self.pending_close.take() {
            return Ok(Node::Close(name));
        }
        loop {
            let event = self.reader.read_event();
            self.track_position();
            match event {
                Ok(Event::Start(e)) => return Ok(Node::Open(self.element_name(e.name().as_ref())?)),
                Ok(Event::Empty(e)) => {
                    let name = self.element_name(e.name().as_ref())?;
                    self.pending_close = Some(name.clone());
                    return Ok(Node::Open(name));
                }
                Ok(Event::End(e)) => return Ok(Node::Close(self.element_name(e.name().as_ref())?)),
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| QwError::format(self.line, e.to_string()))?;
                    return Ok(Node::Text(text.into_owned()));
                }
                Ok(Event::CData(c)) => return Ok(Node::Text(String::from_utf8_lossy(&c).into_owned())),
                Ok(Event::Eof) => return Ok(Node::End),
                // Declarations, comments, processing instructions, doctypes.
                Ok(_) => continue,
                Err(e) => return Err(QwError::format(self.line, e.to_string())),
            }
        }
    }

    fn unexpected(&self, node: &Node, wanted: fmt::Arguments<'_>) -> QwError {
        let found = match node {
            Node::Open(tag) => format!("<{}>", tag),
            Node::Close(tag) => format!("</{}>", tag),
            Node::Text(text) => format!("text '{}'", text),
            Node::End => "end of input".to_owned(),
        };
        QwError::format(self.line, format!("expected {}, found {}", wanted, found))
    }

    /// Skips leading text and expects the root element `<name>`.
    fn expect_root(&mut self, name: &str) -> Result<()> {
        loop {
            match self.next()? {
                Node::Text(_) => continue,
                Node::Open(found) if found == name => return Ok(()),
                other => return Err(self.unexpected(&other, format_args!("<{}>", name))),
            }
        }
    }

    /// Visits each child element of the open element `parent` until its
    /// closing tag. `visit` must consume the child through its closing tag.
    fn children(&mut self, parent: &str, mut visit: impl FnMut(&mut Self, &str, usize) -> Result<()>) -> Result<()> {
        loop {
            match self.next()? {
                Node::Open(tag) => {
                    let line = self.line;
                    visit(self, &tag, line)?;
                }
                Node::Close(tag) if tag == parent => return Ok(()),
                Node::Text(_) => {}
                Node::End => return Err(QwError::format(self.line, format!("<{}> is never closed", parent))),
                other => return Err(self.unexpected(&other, format_args!("</{}>", parent))),
            }
        }
    }

    /// Reads the text content of the open element `name` through its
    /// closing tag. Adjacent text and CDATA runs are joined.
    fn text_until_close(&mut self, name: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Node::Text(t) => text.push_str(&t),
                Node::Close(found) if found == name => return Ok(text),
                other => return Err(self.unexpected(&other, format_args!("</{}>", name))),
            }
        }
    }

    /// Skips an unrecognised element and everything inside it.
    fn skip_unknown(&mut self, tag: &str, line: usize) -> Result<()> {
        warn!(tag, line, "skipping unrecognised QWML element");
        let mut depth = 1usize;
        loop {
            match self.next()? {
                Node::Open(_) => depth += 1,
                Node::Close(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Node::Text(_) => {}
                Node::End => return Err(QwError::format(self.line, format!("<{}> is never closed", tag))),
            }
        }
    }
}

/// One element or text run per line, no indentation.
struct QwmlWriter {
    inner: Writer<Vec<u8>>,
}

fn write_failed(e: impl fmt::Display) -> QwError {
    QwError::Io(std::io::Error::other(e.to_string()))
}

impl QwmlWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self { inner: Writer::new(Vec::with_capacity(capacity)) }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(write_failed)
    }

    fn newline(&mut self) {
        self.inner.get_mut().push(b'\n');
    }

    fn declaration(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        self.newline();
        Ok(())
    }

    fn open(&mut self, tag: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(tag)))?;
        self.newline();
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(tag)))?;
        self.newline();
        Ok(())
    }

    /// `<tag>text</tag>`, with `text` escaped.
    fn leaf(&mut self, tag: &str, text: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(tag)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(write_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;

    fn sample() -> Result<QwmlDocument> {
        let table = ProbabilityTable::from_rows(vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.5, 0.5]])?;
        Ok(QwmlDocument::new(generators::path(3), table)?.with_comment("unit test"))
    }

    #[test]
    fn test_render_layout() -> Result<()> {
        let text = sample()?.to_qwml_string()?;
        assert!(text.starts_with("<?xml version=\"1.0\"?>\n<qwml>\n<adjacency>\n<row>\n<col>0</col>\n<col>1</col>"));
        assert!(text.contains("<vertex>\n<prob>1.00000000</prob>\n<prob>0.00000000</prob>\n</vertex>"));
        assert!(text.contains("<comment>unit test</comment>"));
        assert!(!text.contains("<filename>"));
        assert!(text.ends_with("</qwml>\n"));
        Ok(())
    }

    #[test]
    fn test_parse_rendered_document() -> Result<()> {
        let doc = sample()?.with_filename("a&b.qwml").with_comment("x < y > z");
        let text = doc.to_qwml_string()?;
        assert!(text.contains("<filename>a&amp;b.qwml</filename>"), "{}", text);
        let parsed = parse_qwml(&text)?;
        assert_eq!(parsed.graph(), doc.graph());
        assert_eq!(parsed.table(), doc.table());
        assert_eq!(parsed.filename(), Some("a&b.qwml"));
        assert_eq!(parsed.comment(), Some("x < y > z"));
        Ok(())
    }

    #[test]
    fn test_compact_markup_and_unknown_tags() -> Result<()> {
        let text = r#"<?xml version="1.0"?>
<!-- two vertices -->
<qwml><meta><author>x</author></meta>
<adjacency><row><col>0</col><col>1</col></row><row><col>1</col><col>0</col></row></adjacency>
<probdist><vertex><prob>1.0</prob><prob>0</prob></vertex><vertex><prob>0</prob><prob>1</prob></vertex></probdist>
<graphlayout><vertex><xcoord>0.5</xcoord><ycoord>1</ycoord></vertex></graphlayout>
</qwml>"#;
        let doc = parse_qwml(text)?;
        assert_eq!(doc.graph(), &generators::path(2));
        assert_eq!(doc.table().probability_at(1, 1), Some(1.0));
        // One layout point for two vertices: dropped.
        assert!(doc.layout().is_none());
        Ok(())
    }

    #[test]
    fn test_layout_kept_when_complete() -> Result<()> {
        let doc = sample()?.with_layout(vec![(0.0, 0.0), (1.0, 0.5), (2.0, -1.25)])?;
        let parsed = parse_qwml(&doc.to_qwml_string()?)?;
        assert_eq!(parsed.layout(), Some(&[(0.0, 0.0), (1.0, 0.5), (2.0, -1.25)][..]));
        Ok(())
    }

    const ONE_VERTEX: &str = "<adjacency><row><col>0</col></row></adjacency>\
                              <probdist><vertex><prob>1</prob></vertex></probdist>";

    #[test]
    fn test_comment_cdata_section_is_literal() -> Result<()> {
        let doc = parse_qwml(&format!("<qwml>{}<comment><![CDATA[a>b]]></comment></qwml>", ONE_VERTEX))?;
        assert_eq!(doc.comment(), Some("a>b"));
        let doc = parse_qwml(&format!("<qwml>{}<comment>x<![CDATA[<y>]]>z</comment></qwml>", ONE_VERTEX))?;
        assert_eq!(doc.comment(), Some("x<y>z"));
        Ok(())
    }

    #[test]
    fn test_character_references_are_decoded() -> Result<()> {
        let doc = parse_qwml(&format!(
            "<qwml>{}<comment>a&#60;b</comment><filename>c&#x3E;d&apos;</filename></qwml>",
            ONE_VERTEX
        ))?;
        assert_eq!(doc.comment(), Some("a<b"));
        assert_eq!(doc.filename(), Some("c>d'"));
        Ok(())
    }

    #[test]
    fn test_self_closing_elements() -> Result<()> {
        let doc = parse_qwml(&format!("<qwml>{}<comment/><extra/></qwml>", ONE_VERTEX))?;
        assert_eq!(doc.comment(), Some(""));
        assert_eq!(doc.table().steps(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_probdist_is_format_error() {
        let text = "<qwml><adjacency><row><col>0</col></row></adjacency></qwml>";
        assert!(matches!(parse_qwml(text), Err(QwError::Format { .. })));
    }

    #[test]
    fn test_bad_probability_reports_line() {
        let text = "<qwml>\n<adjacency><row><col>0</col></row></adjacency>\n<probdist><vertex>\n<prob>abc</prob>\n</vertex></probdist></qwml>";
        assert!(matches!(parse_qwml(text), Err(QwError::Format { line: 4, .. })));
    }

    #[test]
    fn test_mismatched_close_tag() {
        let text = "<qwml><adjacency><row><col>0</col></adjacency></qwml>";
        assert!(matches!(parse_qwml(text), Err(QwError::Format { .. })));
    }

    #[test]
    fn test_unterminated_root_is_format_error() {
        let text = format!("<qwml>{}", ONE_VERTEX);
        assert!(matches!(parse_qwml(&text), Err(QwError::Format { .. })));
    }

    #[test]
    fn test_invalid_adjacency_is_topology_error() {
        let text = "<qwml><adjacency><row><col>0</col><col>1</col></row><row><col>0</col><col>0</col></row></adjacency>\
                    <probdist><vertex><prob>1</prob></vertex><vertex><prob>0</prob></vertex></probdist></qwml>";
        assert!(matches!(parse_qwml(text), Err(QwError::InvalidTopology { .. })));
    }

    #[test]
    fn test_vertex_count_mismatch_rejected() {
        let text = "<qwml><adjacency><row><col>0</col></row></adjacency>\
                    <probdist><vertex><prob>1</prob></vertex><vertex><prob>0</prob></vertex></probdist></qwml>";
        assert!(matches!(parse_qwml(text), Err(QwError::Format { .. })));
    }
}
