//! Feature handlers.
//!
//! Every handler follows the same template: take the latest snapshot,
//! translate LSP coordinates through the line table, issue a bridge
//! request with the build system's compiler arguments attached, and
//! translate the response back on the dispatcher queue. An absent
//! snapshot yields an empty reply plus a log line.

mod code_action;
mod completion;
mod folding;
mod highlight;
mod hover;
mod markup;
mod symbols;
