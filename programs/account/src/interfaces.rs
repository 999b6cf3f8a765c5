// Capability discovery
//
// A capability id is the XOR of the selectors in its group, so a caller can
// probe for a whole surface with one query.

use vessel_common::{InterfaceId, Operation};

use crate::operations::*;

pub fn capability_discovery() -> InterfaceId {
    InterfaceId::from_selectors([SupportsInterface::selector()])
}

pub fn module_registry() -> InterfaceId {
    InterfaceId::from_selectors([
        ApplyMutations::selector(),
        Modules::selector(),
        ModuleOf::selector(),
        ModuleAddresses::selector(),
        OperationsOf::selector(),
    ])
}

pub fn override_table() -> InterfaceId {
    InterfaceId::from_selectors([
        SetOverrides::selector(),
        OverrideOf::selector(),
        SetMissPolicy::selector(),
        GetMissPolicy::selector(),
    ])
}

pub fn access_control() -> InterfaceId {
    InterfaceId::from_selectors([GrantOrRevoke::selector(), HasRole::selector()])
}

pub fn execution_router() -> InterfaceId {
    InterfaceId::from_selectors([
        Execute::selector(),
        ExecuteBatch::selector(),
        ExecuteByRole::selector(),
        ExecuteBatchByRole::selector(),
    ])
}

/// Identity-bound account surface
pub fn bound_account() -> InterfaceId {
    InterfaceId::from_selectors([
        Token::selector(),
        Owner::selector(),
        State::selector(),
        IsValidSigner::selector(),
    ])
}

pub fn supported() -> [InterfaceId; 6] {
    [
        capability_discovery(),
        module_registry(),
        override_table(),
        access_control(),
        execution_router(),
        bound_account(),
    ]
}

pub fn supports(id: &InterfaceId) -> bool {
    *id != InterfaceId::INVALID && supported().contains(id)
}
