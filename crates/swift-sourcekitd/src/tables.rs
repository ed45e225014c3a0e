//! Cached tables of well-known UIDs.
//!
//! Interned once per bridge so request building and response traversal
//! never pay the interner round trip per message.

use crate::service::SourceKitService;
use crate::uid::Uid;

/// Request-class names.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct RequestNames {
    pub editor_open: Uid,
    pub editor_close: Uid,
    pub editor_replacetext: Uid,
    pub codecomplete: Uid,
    pub cursorinfo: Uid,
    pub relatedidents: Uid,
    pub semantic_refactoring: Uid,
}

impl RequestNames {
    pub(crate) fn new(service: &dyn SourceKitService) -> Self {
        Self {
            editor_open: service.intern("source.request.editor.open"),
            editor_close: service.intern("source.request.editor.close"),
            editor_replacetext: service.intern("source.request.editor.replacetext"),
            codecomplete: service.intern("source.request.codecomplete"),
            cursorinfo: service.intern("source.request.cursorinfo"),
            relatedidents: service.intern("source.request.relatedidents"),
            semantic_refactoring: service.intern("source.request.semantic.refactoring"),
        }
    }
}

/// Request and response dictionary keys.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct Keys {
    pub request: Uid,
    pub name: Uid,
    pub sourcefile: Uid,
    pub sourcetext: Uid,
    pub compilerargs: Uid,
    pub offset: Uid,
    pub length: Uid,
    pub syntactic_only: Uid,
    pub enable_syntaxmap: Uid,
    pub enable_substructure: Uid,
    pub diagnostics: Uid,
    pub severity: Uid,
    pub description: Uid,
    pub results: Uid,
    pub kind: Uid,
    pub usr: Uid,
    pub typename: Uid,
    pub annotated_decl: Uid,
    pub doc_full_as_xml: Uid,
    pub filter_text: Uid,
    pub substructure: Uid,
    pub syntaxmap: Uid,
    pub bodyoffset: Uid,
    pub bodylength: Uid,
    pub nameoffset: Uid,
    pub namelength: Uid,
    pub line: Uid,
    pub column: Uid,
    pub endline: Uid,
    pub endcolumn: Uid,
    pub text: Uid,
    pub actionuid: Uid,
    pub actionname: Uid,
    pub retrieve_refactor_actions: Uid,
    pub refactor_actions: Uid,
    pub categorized_edits: Uid,
    pub edits: Uid,
    pub notification: Uid,
}

impl Keys {
    pub(crate) fn new(service: &dyn SourceKitService) -> Self {
        Self {
            request: service.intern("key.request"),
            name: service.intern("key.name"),
            sourcefile: service.intern("key.sourcefile"),
            sourcetext: service.intern("key.sourcetext"),
            compilerargs: service.intern("key.compilerargs"),
            offset: service.intern("key.offset"),
            length: service.intern("key.length"),
            syntactic_only: service.intern("key.syntactic_only"),
            enable_syntaxmap: service.intern("key.enablesyntaxmap"),
            enable_substructure: service.intern("key.enablesubstructure"),
            diagnostics: service.intern("key.diagnostics"),
            severity: service.intern("key.severity"),
            description: service.intern("key.description"),
            results: service.intern("key.results"),
            kind: service.intern("key.kind"),
            usr: service.intern("key.usr"),
            typename: service.intern("key.typename"),
            annotated_decl: service.intern("key.annotated_decl"),
            doc_full_as_xml: service.intern("key.doc.full_as_xml"),
            filter_text: service.intern("key.filtertext"),
            substructure: service.intern("key.substructure"),
            syntaxmap: service.intern("key.syntaxmap"),
            bodyoffset: service.intern("key.bodyoffset"),
            bodylength: service.intern("key.bodylength"),
            nameoffset: service.intern("key.nameoffset"),
            namelength: service.intern("key.namelength"),
            line: service.intern("key.line"),
            column: service.intern("key.column"),
            endline: service.intern("key.endline"),
            endcolumn: service.intern("key.endcolumn"),
            text: service.intern("key.text"),
            actionuid: service.intern("key.actionuid"),
            actionname: service.intern("key.actionname"),
            retrieve_refactor_actions: service.intern("key.retrieve_refactor_actions"),
            refactor_actions: service.intern("key.refactoractions"),
            categorized_edits: service.intern("key.categorizededits"),
            edits: service.intern("key.edits"),
            notification: service.intern("key.notification"),
        }
    }
}

/// Well-known response values: declaration kinds, syntax kinds,
/// severities, and notification names.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct Values {
    pub severity_error: Uid,
    pub severity_warning: Uid,

    pub decl_class: Uid,
    pub decl_struct: Uid,
    pub decl_enum: Uid,
    pub decl_enumelement: Uid,
    pub decl_protocol: Uid,
    pub decl_associatedtype: Uid,
    pub decl_generic_type_param: Uid,
    pub decl_typealias: Uid,
    pub decl_constructor: Uid,
    pub decl_method_instance: Uid,
    pub decl_method_static: Uid,
    pub decl_method_class: Uid,
    pub decl_operator_prefix: Uid,
    pub decl_operator_postfix: Uid,
    pub decl_operator_infix: Uid,
    pub decl_function_free: Uid,
    pub decl_var_instance: Uid,
    pub decl_var_static: Uid,
    pub decl_var_class: Uid,
    pub decl_var_local: Uid,
    pub decl_var_global: Uid,
    pub decl_var_parameter: Uid,
    pub decl_extension: Uid,
    pub decl_module: Uid,
    pub keyword: Uid,

    pub syntax_comment: Uid,
    pub syntax_comment_marker: Uid,
    pub syntax_comment_url: Uid,
    pub syntax_doccomment: Uid,
    pub syntax_doccomment_field: Uid,

    pub notification_document_update: Uid,
}

impl Values {
    pub(crate) fn new(service: &dyn SourceKitService) -> Self {
        Self {
            severity_error: service.intern("source.diagnostic.severity.error"),
            severity_warning: service.intern("source.diagnostic.severity.warning"),

            decl_class: service.intern("source.lang.swift.decl.class"),
            decl_struct: service.intern("source.lang.swift.decl.struct"),
            decl_enum: service.intern("source.lang.swift.decl.enum"),
            decl_enumelement: service.intern("source.lang.swift.decl.enumelement"),
            decl_protocol: service.intern("source.lang.swift.decl.protocol"),
            decl_associatedtype: service.intern("source.lang.swift.decl.associatedtype"),
            decl_generic_type_param: service.intern("source.lang.swift.decl.generic_type_param"),
            decl_typealias: service.intern("source.lang.swift.decl.typealias"),
            decl_constructor: service.intern("source.lang.swift.decl.function.constructor"),
            decl_method_instance: service.intern("source.lang.swift.decl.function.method.instance"),
            decl_method_static: service.intern("source.lang.swift.decl.function.method.static"),
            decl_method_class: service.intern("source.lang.swift.decl.function.method.class"),
            decl_operator_prefix: service.intern("source.lang.swift.decl.function.operator.prefix"),
            decl_operator_postfix: service
                .intern("source.lang.swift.decl.function.operator.postfix"),
            decl_operator_infix: service.intern("source.lang.swift.decl.function.operator.infix"),
            decl_function_free: service.intern("source.lang.swift.decl.function.free"),
            decl_var_instance: service.intern("source.lang.swift.decl.var.instance"),
            decl_var_static: service.intern("source.lang.swift.decl.var.static"),
            decl_var_class: service.intern("source.lang.swift.decl.var.class"),
            decl_var_local: service.intern("source.lang.swift.decl.var.local"),
            decl_var_global: service.intern("source.lang.swift.decl.var.global"),
            decl_var_parameter: service.intern("source.lang.swift.decl.var.parameter"),
            decl_extension: service.intern("source.lang.swift.decl.extension"),
            decl_module: service.intern("source.lang.swift.decl.module"),
            keyword: service.intern("source.lang.swift.keyword"),

            syntax_comment: service.intern("source.lang.swift.syntaxtype.comment"),
            syntax_comment_marker: service.intern("source.lang.swift.syntaxtype.comment.mark"),
            syntax_comment_url: service.intern("source.lang.swift.syntaxtype.comment.url"),
            syntax_doccomment: service.intern("source.lang.swift.syntaxtype.doccomment"),
            syntax_doccomment_field: service
                .intern("source.lang.swift.syntaxtype.doccomment.field"),

            notification_document_update: service
                .intern("source.notification.editor.documentupdate"),
        }
    }

    /// Whether `kind` is one of the syntax-map comment kinds; all of them
    /// fold as comments.
    pub fn is_comment_kind(&self, kind: Uid) -> bool {
        kind == self.syntax_comment
            || kind == self.syntax_comment_marker
            || kind == self.syntax_comment_url
            || kind == self.syntax_doccomment
            || kind == self.syntax_doccomment_field
    }
}
