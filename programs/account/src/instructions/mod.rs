// Built-in account operations
//
// Every built-in is an `Operation` implementing `Method`. The account keeps
// them in a `MethodTable`, which dispatch reaches only through the module
// table's reserved routes.

pub mod access_control;
pub mod execute;
pub mod identity;
pub mod overrides;
pub mod registry;
