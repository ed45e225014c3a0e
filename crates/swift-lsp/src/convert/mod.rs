//! Conversions between analyzer vocabulary and LSP shapes
//!
//! The kind and severity tables here are the normative translation layer:
//! analyzer UIDs in, `lsp_types` values out. Unmapped inputs degrade the
//! way each consumer expects (absent severity, `VALUE` completions,
//! skipped symbols) instead of faulting.

use lsp_types::{
    CompletionItemKind, Diagnostic, DiagnosticSeverity, Position, Range, SymbolKind,
};
use swift_position_tracking::LineTable;
use swift_sourcekitd::{Keys, SkValue, Uid, Values};

/// Analyzer severity to LSP severity. Unknown severities are absent.
pub fn diagnostic_severity(values: &Values, severity: Uid) -> Option<DiagnosticSeverity> {
    if severity == values.severity_error {
        Some(DiagnosticSeverity::ERROR)
    } else if severity == values.severity_warning {
        Some(DiagnosticSeverity::WARNING)
    } else {
        None
    }
}

/// Analyzer declaration kind to LSP completion item kind.
pub fn completion_item_kind(values: &Values, kind: Option<Uid>) -> CompletionItemKind {
    let Some(kind) = kind else {
        return CompletionItemKind::VALUE;
    };
    if kind == values.decl_class {
        CompletionItemKind::CLASS
    } else if kind == values.decl_struct {
        CompletionItemKind::STRUCT
    } else if kind == values.decl_enum {
        CompletionItemKind::ENUM
    } else if kind == values.decl_enumelement {
        CompletionItemKind::ENUM_MEMBER
    } else if kind == values.decl_protocol {
        CompletionItemKind::INTERFACE
    } else if kind == values.decl_associatedtype
        || kind == values.decl_generic_type_param
        || kind == values.decl_typealias
    {
        CompletionItemKind::TYPE_PARAMETER
    } else if kind == values.decl_constructor {
        CompletionItemKind::CONSTRUCTOR
    } else if kind == values.decl_method_instance
        || kind == values.decl_method_static
        || kind == values.decl_method_class
    {
        CompletionItemKind::METHOD
    } else if kind == values.decl_operator_prefix
        || kind == values.decl_operator_postfix
        || kind == values.decl_operator_infix
    {
        CompletionItemKind::OPERATOR
    } else if kind == values.decl_function_free {
        CompletionItemKind::FUNCTION
    } else if kind == values.decl_var_instance
        || kind == values.decl_var_static
        || kind == values.decl_var_class
    {
        CompletionItemKind::PROPERTY
    } else if kind == values.decl_var_local
        || kind == values.decl_var_global
        || kind == values.decl_var_parameter
    {
        CompletionItemKind::VARIABLE
    } else if kind == values.decl_module {
        CompletionItemKind::MODULE
    } else if kind == values.keyword {
        CompletionItemKind::KEYWORD
    } else {
        CompletionItemKind::VALUE
    }
}

/// Analyzer declaration kind to LSP symbol kind. Unmapped kinds are
/// skipped by the document-symbol walk.
pub fn symbol_kind(values: &Values, kind: Uid) -> Option<SymbolKind> {
    if kind == values.decl_class {
        Some(SymbolKind::CLASS)
    } else if kind == values.decl_method_instance
        || kind == values.decl_method_static
        || kind == values.decl_method_class
    {
        Some(SymbolKind::METHOD)
    } else if kind == values.decl_var_instance
        || kind == values.decl_var_static
        || kind == values.decl_var_class
    {
        Some(SymbolKind::PROPERTY)
    } else if kind == values.decl_enum {
        Some(SymbolKind::ENUM)
    } else if kind == values.decl_enumelement {
        Some(SymbolKind::ENUM_MEMBER)
    } else if kind == values.decl_protocol {
        Some(SymbolKind::INTERFACE)
    } else if kind == values.decl_function_free {
        Some(SymbolKind::FUNCTION)
    } else if kind == values.decl_var_global || kind == values.decl_var_local {
        Some(SymbolKind::VARIABLE)
    } else if kind == values.decl_struct {
        Some(SymbolKind::STRUCT)
    } else if kind == values.decl_generic_type_param {
        Some(SymbolKind::TYPE_PARAMETER)
    } else if kind == values.decl_extension {
        Some(SymbolKind::NAMESPACE)
    } else {
        None
    }
}

/// LSP position of a byte offset.
pub fn position_from_offset(table: &LineTable, offset: usize) -> Option<Position> {
    let (line, character) = table.line_and_utf16_column(offset)?;
    Some(Position { line, character })
}

/// LSP range of a byte span.
pub fn range_from_byte_span(table: &LineTable, offset: usize, length: usize) -> Option<Range> {
    let start = position_from_offset(table, offset)?;
    let end = position_from_offset(table, offset + length)?;
    Some(Range { start, end })
}

/// Translate the diagnostics array of an editor response.
///
/// An absent `key.diagnostics` yields an empty vector; the caller still
/// publishes it so stale client state is cleared. Entries that cannot be
/// positioned against the snapshot are dropped.
pub fn diagnostics_from_response(
    keys: &Keys,
    values: &Values,
    response: &SkValue,
    table: &LineTable,
) -> Vec<Diagnostic> {
    let Some(entries) = response.array(keys.diagnostics) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let message = entry.string(keys.description)?;
            let offset = entry.offset(keys.offset)?;
            let length = entry.offset(keys.length).unwrap_or(0);
            let range = range_from_byte_span(table, offset, length)?;
            let severity =
                entry.uid(keys.severity).and_then(|uid| diagnostic_severity(values, uid));
            Some(Diagnostic {
                range,
                severity,
                source: Some("sourcekitd".to_owned()),
                message: message.to_owned(),
                ..Diagnostic::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use swift_sourcekitd::testing::ScriptedSourceKit;
    use swift_sourcekitd::{Bridge, SourceKitService};

    fn bridge() -> (Arc<ScriptedSourceKit>, Bridge) {
        let service = Arc::new(ScriptedSourceKit::new());
        let bridge = Bridge::new(Arc::clone(&service) as Arc<dyn SourceKitService>);
        (service, bridge)
    }

    #[test]
    fn severity_table_matches_the_analyzer_vocabulary() {
        let (service, bridge) = bridge();
        let values = bridge.values();
        assert_eq!(
            diagnostic_severity(values, service.intern("source.diagnostic.severity.error")),
            Some(DiagnosticSeverity::ERROR)
        );
        assert_eq!(
            diagnostic_severity(values, service.intern("source.diagnostic.severity.warning")),
            Some(DiagnosticSeverity::WARNING)
        );
        assert_eq!(diagnostic_severity(values, service.intern("something.else")), None);
    }

    #[test]
    fn completion_kinds_cover_the_declaration_table() {
        let (service, bridge) = bridge();
        let values = bridge.values();
        let kind = |name: &str| completion_item_kind(values, Some(service.intern(name)));
        assert_eq!(kind("source.lang.swift.decl.class"), CompletionItemKind::CLASS);
        assert_eq!(kind("source.lang.swift.decl.enumelement"), CompletionItemKind::ENUM_MEMBER);
        assert_eq!(kind("source.lang.swift.decl.protocol"), CompletionItemKind::INTERFACE);
        assert_eq!(kind("source.lang.swift.decl.typealias"), CompletionItemKind::TYPE_PARAMETER);
        assert_eq!(
            kind("source.lang.swift.decl.function.method.static"),
            CompletionItemKind::METHOD
        );
        assert_eq!(
            kind("source.lang.swift.decl.function.operator.infix"),
            CompletionItemKind::OPERATOR
        );
        assert_eq!(kind("source.lang.swift.decl.var.instance"), CompletionItemKind::PROPERTY);
        assert_eq!(kind("source.lang.swift.decl.var.parameter"), CompletionItemKind::VARIABLE);
        assert_eq!(kind("source.lang.swift.keyword"), CompletionItemKind::KEYWORD);
        assert_eq!(kind("source.lang.swift.decl.module"), CompletionItemKind::MODULE);
        assert_eq!(kind("source.lang.swift.stmt.if"), CompletionItemKind::VALUE);
        assert_eq!(completion_item_kind(values, None), CompletionItemKind::VALUE);
    }

    #[test]
    fn symbol_kinds_map_or_stay_absent() {
        let (service, bridge) = bridge();
        let values = bridge.values();
        let kind = |name: &str| symbol_kind(values, service.intern(name));
        assert_eq!(kind("source.lang.swift.decl.extension"), Some(SymbolKind::NAMESPACE));
        assert_eq!(kind("source.lang.swift.decl.var.local"), Some(SymbolKind::VARIABLE));
        assert_eq!(kind("source.lang.swift.decl.var.class"), Some(SymbolKind::PROPERTY));
        assert_eq!(kind("source.lang.swift.expr.call"), None);
    }

    #[test]
    fn diagnostics_translate_spans_and_clear_when_absent() {
        let (service, bridge) = bridge();
        let table = LineTable::new("let x = 1\nlet y = 2\n");

        let response = service.dict(&[(
            "key.diagnostics",
            SkValue::Array(vec![
                service.dict(&[
                    ("key.description", SkValue::from("unused variable")),
                    ("key.offset", SkValue::from(10usize)),
                    ("key.length", SkValue::from(3usize)),
                    ("key.severity", service.uid_value("source.diagnostic.severity.warning")),
                ]),
                // Unpositionable entry is dropped.
                service.dict(&[
                    ("key.description", SkValue::from("broken")),
                    ("key.offset", SkValue::from(999usize)),
                ]),
            ]),
        )]);

        let diags =
            diagnostics_from_response(bridge.keys(), bridge.values(), &response, &table);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "unused variable");
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diags[0].range.start, Position { line: 1, character: 0 });
        assert_eq!(diags[0].range.end, Position { line: 1, character: 3 });

        let empty = diagnostics_from_response(
            bridge.keys(),
            bridge.values(),
            &SkValue::dictionary(),
            &table,
        );
        assert_eq!(empty, Vec::new());
    }
}
