//! Round-trip laws for the command layer.

use lsp_types::{Command, TextDocumentIdentifier};
use proptest::prelude::*;
use serde_json::Value;
use swift_lsp::commands::SemanticRefactorCommand;
use swift_lsp::util::parse_uri;

/// Arbitrary command-argument trees: the JSON-ish sum type of null, bool,
/// int, double, string, list, and map, nested a few levels deep.
fn arb_argument() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_filter("finite doubles", |f| f.is_finite()).prop_map(Value::from),
        "[a-zA-Z0-9 _.]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn fail(err: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(err.to_string())
}

proptest! {
    // Any command with an arbitrary argument tree survives JSON encode
    // then decode unchanged, nested nulls included.
    #[test]
    fn commands_survive_the_json_codec(tree in arb_argument()) {
        let command = Command::new(
            "Act".to_owned(),
            "swift.lsp.test.command".to_owned(),
            Some(vec![tree]),
        );
        let encoded = serde_json::to_string(&command).map_err(fail)?;
        let decoded: Command = serde_json::from_str(&encoded).map_err(fail)?;
        prop_assert_eq!(decoded, command);
    }

    // A semantic refactor command reconstructs itself from its own
    // `as_command` envelope.
    #[test]
    fn semantic_refactor_commands_round_trip(
        title in "[a-zA-Z ]{1,16}",
        action in "[a-z.]{1,24}",
        line in 0u32..10_000,
        column in 0u32..10_000,
        length in 0u32..10_000,
    ) {
        let command = SemanticRefactorCommand {
            title,
            action_string: action,
            line,
            column,
            length,
            text_document: TextDocumentIdentifier { uri: parse_uri("file:///a.swift") },
        };
        let wire = command.as_command();
        prop_assert_eq!(wire.command.as_str(), SemanticRefactorCommand::IDENTIFIER);
        let decoded =
            SemanticRefactorCommand::try_decode(&wire.command, wire.arguments.as_deref());
        prop_assert_eq!(decoded, Some(command));
    }
}
