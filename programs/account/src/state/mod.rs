pub mod module_table;
pub mod overrides;
pub mod reentrancy;
pub mod roles;
pub mod settings;

pub use module_table::{ModuleMutation, ModuleOperations, ModuleTable, MutationAction};
pub use overrides::{MissPolicy, OverrideEntry, OverrideTarget};
pub use reentrancy::ExecutionState;
pub use roles::RoleGrant;
pub use settings::{AccountInit, IdentityBinding};
