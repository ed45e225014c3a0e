//! Folding ranges
//!
//! Two sources: byte-adjacent comment runs from the syntax map, and
//! non-empty structure bodies from the substructure walk. A client
//! `rangeLimit` stops emission entirely once reached; `lineFoldingOnly`
//! normalizes ranges to whole-line spans.

use lsp_types::{FoldingRange, FoldingRangeKind};
use serde_json::{Value, json};
use swift_lsp_protocol::{internal_error, req_uri};
use swift_position_tracking::LineTable;
use swift_sourcekitd::{Keys, SkValue, Values};

use crate::runtime::{LspServer, Responder};

impl LspServer {
    pub(crate) fn handle_folding_range(&mut self, params: Option<Value>, responder: Responder) {
        let params = params.unwrap_or(Value::Null);
        let uri = match req_uri(&params) {
            Ok(uri) => uri.to_owned(),
            Err(err) => return responder.err(err),
        };
        let Some(snapshot) = self.latest_snapshot_or_log(&uri, "foldingRange") else {
            return responder.ok(json!([]));
        };

        let name = format!("FoldingRanges:{uri}");
        let request = self.bridge.editor_open(&name, snapshot.text(), None, true);
        let line_folding_only = self.client_capabilities.line_folding_only;
        let limit = self.client_capabilities.folding_range_limit;

        let events = self.events.clone();
        self.bridge.send(
            request,
            Box::new(move |result| {
                events.task(move |server| {
                    server.close_synthetic_document(&name);
                    if responder.is_cancelled() {
                        return responder.cancelled();
                    }
                    match result {
                        Ok(response) => {
                            let ranges = folding_ranges(
                                server.bridge.keys(),
                                server.bridge.values(),
                                snapshot.line_table(),
                                &response,
                                line_folding_only,
                                limit,
                            );
                            responder.ok(json!(ranges));
                        }
                        Err(err) => responder.err(internal_error(err.to_string())),
                    }
                });
            }),
        );
    }
}

/// Bounded collector: stops accepting once the client's range limit is
/// reached.
struct Collector {
    out: Vec<FoldingRange>,
    limit: usize,
}

impl Collector {
    fn new(limit: Option<usize>) -> Self {
        Self { out: Vec::new(), limit: limit.unwrap_or(usize::MAX) }
    }

    fn full(&self) -> bool {
        self.out.len() >= self.limit
    }

    fn push(&mut self, range: Option<FoldingRange>) {
        if let Some(range) = range {
            if !self.full() {
                self.out.push(range);
            }
        }
    }
}

fn folding_ranges(
    keys: &Keys,
    values: &Values,
    table: &LineTable,
    response: &SkValue,
    line_folding_only: bool,
    limit: Option<usize>,
) -> Vec<FoldingRange> {
    let mut collector = Collector::new(limit);

    // Comment runs from the syntax map, coalescing byte-adjacent entries.
    let mut pending: Option<(usize, usize)> = None;
    for entry in response.array(keys.syntaxmap).unwrap_or(&[]) {
        if collector.full() {
            break;
        }
        let Some(kind) = entry.uid(keys.kind) else { continue };
        if !values.is_comment_kind(kind) {
            continue;
        }
        let (Some(offset), Some(length)) = (entry.offset(keys.offset), entry.offset(keys.length))
        else {
            continue;
        };
        pending = match pending {
            Some((start, end)) if end == offset => Some((start, offset + length)),
            Some((start, end)) => {
                collector.push(comment_range(table, start, end, line_folding_only));
                Some((offset, offset + length))
            }
            None => Some((offset, offset + length)),
        };
    }
    if let Some((start, end)) = pending {
        collector.push(comment_range(table, start, end, line_folding_only));
    }

    // Structure bodies, walked with an explicit stack.
    let mut stack: Vec<&SkValue> = Vec::new();
    for item in response.array(keys.substructure).unwrap_or(&[]).iter().rev() {
        stack.push(item);
    }
    while let Some(item) = stack.pop() {
        if collector.full() {
            break;
        }
        if let (Some(offset), Some(length)) =
            (item.offset(keys.bodyoffset), item.offset(keys.bodylength))
        {
            if length > 0 {
                collector.push(code_range(table, offset, offset + length, line_folding_only));
            }
        }
        for child in item.array(keys.substructure).unwrap_or(&[]).iter().rev() {
            stack.push(child);
        }
    }

    let mut ranges = collector.out;
    ranges.sort_by_key(|range| (range.start_line, range.end_line));
    ranges
}

fn comment_range(
    table: &LineTable,
    start: usize,
    end: usize,
    line_folding_only: bool,
) -> Option<FoldingRange> {
    make_range(table, start, end, Some(FoldingRangeKind::Comment), line_folding_only)
}

fn code_range(
    table: &LineTable,
    start: usize,
    end: usize,
    line_folding_only: bool,
) -> Option<FoldingRange> {
    make_range(table, start, end, None, line_folding_only)
}

fn make_range(
    table: &LineTable,
    start: usize,
    end: usize,
    kind: Option<FoldingRangeKind>,
    line_folding_only: bool,
) -> Option<FoldingRange> {
    let (start_line, start_character) = table.line_and_utf16_column(start)?;
    let (end_line, end_character) = table.line_and_utf16_column(end)?;
    if line_folding_only {
        let end_line = end_line.checked_sub(1)?;
        if end_line <= start_line {
            return None;
        }
        Some(FoldingRange {
            start_line,
            start_character: None,
            end_line,
            end_character: None,
            kind,
            collapsed_text: None,
        })
    } else {
        Some(FoldingRange {
            start_line,
            start_character: Some(start_character),
            end_line,
            end_character: Some(end_character),
            kind,
            collapsed_text: None,
        })
    }
}
