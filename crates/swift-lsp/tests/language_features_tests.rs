//! Feature handlers end to end: completion, hover, symbols, highlight,
//! folding, driven through the dispatcher against the scripted analyzer.

mod common;

use common::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use swift_sourcekitd::SkValue;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const URI: &str = "file:///a.swift";

#[test]
fn completion_rewinds_to_the_identifier_and_rewrites_snippets() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "let foo = 1\nfoo.")?;

    let result = harness.service.dict(&[
        ("key.description", SkValue::from("foo(x: Int)")),
        ("key.name", SkValue::from("foo(x:)")),
        ("key.sourcetext", SkValue::from("foo(<#T##x: Int##Int#>)")),
        ("key.typename", SkValue::from("Int")),
        ("key.kind", harness.service.uid_value("source.lang.swift.decl.function.free")),
    ]);
    let response = harness.service.dict(&[("key.results", SkValue::Array(vec![result]))]);
    harness
        .service
        .on_request("source.request.codecomplete", move |_request| Ok(response.clone()));

    // Position in the middle of `foo`; the completer gets the identifier
    // start.
    let id = harness.request("textDocument/completion", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 1, "character": 3 },
    }))?;
    let reply = harness.response_for(id).ok_or("missing completion reply")?;

    let keys = *harness.server.bridge().keys();
    let completes = harness.service.requests_of("source.request.codecomplete");
    assert_eq!(completes.len(), 1);
    assert_eq!(completes[0].int(keys.offset), Some(12));
    assert_eq!(completes[0].string(keys.sourcetext), Some("let foo = 1\nfoo."));

    assert_eq!(reply.pointer("/result/isIncomplete"), Some(&json!(false)));
    let item = reply.pointer("/result/items/0").ok_or("missing item")?;
    assert_eq!(item.get("label"), Some(&json!("foo(x: Int)")));
    assert_eq!(item.get("detail"), Some(&json!("Int")));
    assert_eq!(item.get("filterText"), Some(&json!("foo(x:)")));
    assert_eq!(item.get("insertText"), Some(&json!("foo(${1:x: Int})")));
    assert_eq!(item.get("insertTextFormat"), Some(&json!(2)));
    assert_eq!(item.get("kind"), Some(&json!(3)));
    Ok(())
}

#[test]
fn cancelled_completion_replies_with_request_cancelled() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "let foo = 1\n")?;

    let id = harness.request("textDocument/completion", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 0, "character": 4 },
    }))?;
    // The bridge completion is queued but not yet applied; the client
    // cancels first.
    harness.send(json!({
        "jsonrpc": "2.0",
        "method": "$/cancelRequest",
        "params": { "id": id },
    }))?;
    let reply = harness.response_for(id).ok_or("missing completion reply")?;
    assert_eq!(reply.pointer("/error/code"), Some(&json!(-32800)));
    Ok(())
}

#[test]
fn hover_renders_documentation_xml_as_markdown() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "func greet() {}\n")?;

    let response = harness.service.dict(&[
        ("key.name", SkValue::from("greet()")),
        (
            "key.doc.full_as_xml",
            SkValue::from(
                "<Function><Name>greet()</Name>\
                 <Declaration>func greet()</Declaration>\
                 <Abstract><Para>Hi.</Para></Abstract></Function>",
            ),
        ),
    ]);
    harness
        .service
        .on_request("source.request.cursorinfo", move |_request| Ok(response.clone()));

    let id = harness.request("textDocument/hover", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 0, "character": 6 },
    }))?;
    let reply = harness.response_for(id).ok_or("missing hover reply")?;
    assert_eq!(reply.pointer("/result/contents/kind"), Some(&json!("markdown")));
    let value = reply
        .pointer("/result/contents/value")
        .and_then(Value::as_str)
        .ok_or("missing hover markdown")?;
    assert!(value.starts_with("# greet()\n\n"));
    assert!(value.contains("```swift\nfunc greet()\n```"));
    assert!(value.contains("Hi."));
    Ok(())
}

#[test]
fn hover_without_a_symbol_is_null() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "   \n")?;
    let id = harness.request("textDocument/hover", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 0, "character": 1 },
    }))?;
    let reply = harness.response_for(id).ok_or("missing hover reply")?;
    assert_eq!(reply.get("result"), Some(&Value::Null));
    Ok(())
}

#[test]
fn symbol_info_reports_the_symbol_under_the_cursor() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "let value = 1\n")?;

    let response = harness.service.dict(&[
        ("key.name", SkValue::from("value")),
        ("key.kind", harness.service.uid_value("source.lang.swift.decl.var.local")),
        ("key.usr", SkValue::from("s:4main5valueSivp")),
    ]);
    harness
        .service
        .on_request("source.request.cursorinfo", move |_request| Ok(response.clone()));

    let id = harness.request("textDocument/symbolInfo", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 0, "character": 5 },
    }))?;
    let reply = harness.response_for(id).ok_or("missing symbolInfo reply")?;
    assert_eq!(
        reply.get("result"),
        Some(&json!([{
            "name": "value",
            "kind": "source.lang.swift.decl.var.local",
            "usr": "s:4main5valueSivp",
        }]))
    );
    Ok(())
}

#[test]
fn document_symbols_skip_unmapped_parents_but_keep_their_children() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    let text = "class Inner { func m() {} }\n";
    harness.open_document(URI, text)?;

    let method = harness.service.dict(&[
        ("key.kind", harness.service.uid_value("source.lang.swift.decl.function.method.instance")),
        ("key.name", SkValue::from("m()")),
        ("key.offset", SkValue::from(14usize)),
        ("key.length", SkValue::from(11usize)),
        ("key.nameoffset", SkValue::from(19usize)),
        ("key.namelength", SkValue::from(1usize)),
    ]);
    let class = harness.service.dict(&[
        ("key.kind", harness.service.uid_value("source.lang.swift.decl.class")),
        ("key.name", SkValue::from("Inner")),
        ("key.offset", SkValue::from(0usize)),
        ("key.length", SkValue::from(27usize)),
        ("key.nameoffset", SkValue::from(6usize)),
        ("key.namelength", SkValue::from(5usize)),
        ("key.substructure", SkValue::Array(vec![method])),
    ]);
    // The wrapper has no mappable kind; its child floats to the top.
    let wrapper = harness.service.dict(&[
        ("key.kind", harness.service.uid_value("source.lang.swift.expr.call")),
        ("key.name", SkValue::from("wrapper")),
        ("key.substructure", SkValue::Array(vec![class])),
    ]);
    let response =
        harness.service.dict(&[("key.substructure", SkValue::Array(vec![wrapper]))]);
    harness
        .service
        .on_request("source.request.editor.open", move |_request| Ok(response.clone()));

    let id = harness.request("textDocument/documentSymbol", json!({
        "textDocument": { "uri": URI },
    }))?;
    let reply = harness.response_for(id).ok_or("missing documentSymbol reply")?;

    assert_eq!(reply.pointer("/result/0/name"), Some(&json!("Inner")));
    assert_eq!(reply.pointer("/result/0/kind"), Some(&json!(5)));
    assert_eq!(
        reply.pointer("/result/0/selectionRange"),
        Some(&json!({
            "start": { "line": 0, "character": 6 },
            "end": { "line": 0, "character": 11 },
        }))
    );
    assert_eq!(reply.pointer("/result/0/children/0/name"), Some(&json!("m()")));
    assert_eq!(reply.pointer("/result/0/children/0/kind"), Some(&json!(6)));
    assert_eq!(reply.pointer("/result/1"), None);

    // The synthetic session is released again.
    let keys = *harness.server.bridge().keys();
    let closes = harness.service.requests_of("source.request.editor.close");
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].string(keys.name), Some(format!("DocumentSymbols:{URI}").as_str()));
    Ok(())
}

#[test]
fn document_highlights_are_reads_over_related_identifiers() -> TestResult {
    let mut harness = TestServer::initialized(json!({}))?;
    harness.open_document(URI, "let foo = 1\nprint(foo)\n")?;

    let response = harness.service.dict(&[(
        "key.results",
        SkValue::Array(vec![
            harness.service.dict(&[
                ("key.offset", SkValue::from(4usize)),
                ("key.length", SkValue::from(3usize)),
            ]),
            harness.service.dict(&[
                ("key.offset", SkValue::from(18usize)),
                ("key.length", SkValue::from(3usize)),
            ]),
        ]),
    )]);
    harness
        .service
        .on_request("source.request.relatedidents", move |_request| Ok(response.clone()));

    let id = harness.request("textDocument/documentHighlight", json!({
        "textDocument": { "uri": URI },
        "position": { "line": 0, "character": 4 },
    }))?;
    let reply = harness.response_for(id).ok_or("missing highlight reply")?;
    assert_eq!(
        reply.get("result"),
        Some(&json!([
            {
                "range": {
                    "start": { "line": 0, "character": 4 },
                    "end": { "line": 0, "character": 7 },
                },
                "kind": 2,
            },
            {
                "range": {
                    "start": { "line": 1, "character": 6 },
                    "end": { "line": 1, "character": 9 },
                },
                "kind": 2,
            },
        ]))
    );
    Ok(())
}

#[test]
fn folding_honors_line_folding_only_clients() -> TestResult {
    let mut harness = TestServer::initialized(json!({
        "textDocument": { "foldingRange": { "lineFoldingOnly": true } },
    }))?;
    // Eight lines of seven bytes each ("line N\n").
    let text = "line 0\nline 1\nline 2\nline 3\nline 4\nline 5\nline 6\nline 7\n";
    harness.open_document(URI, text)?;

    let kept = harness.service.dict(&[
        ("key.bodyoffset", SkValue::from(25usize)),   // (3,4)
        ("key.bodylength", SkValue::from(24usize)),   // ..(7,0)
    ]);
    let dropped = harness.service.dict(&[
        ("key.bodyoffset", SkValue::from(25usize)),   // (3,4)
        ("key.bodylength", SkValue::from(3usize)),    // ..(4,0)
    ]);
    let response = harness
        .service
        .dict(&[("key.substructure", SkValue::Array(vec![kept, dropped]))]);
    harness
        .service
        .on_request("source.request.editor.open", move |_request| Ok(response.clone()));

    let id = harness.request("textDocument/foldingRange", json!({
        "textDocument": { "uri": URI },
    }))?;
    let reply = harness.response_for(id).ok_or("missing folding reply")?;
    assert_eq!(reply.get("result"), Some(&json!([{ "startLine": 3, "endLine": 6 }])));

    let keys = *harness.server.bridge().keys();
    let closes = harness.service.requests_of("source.request.editor.close");
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].string(keys.name), Some(format!("FoldingRanges:{URI}").as_str()));
    Ok(())
}
